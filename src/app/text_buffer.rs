//! Rich-Text-Puffer einer Inline-Textbearbeitung.
//!
//! Der Inhalt eines editierbaren Elements wird beim Aktivieren in Glyphen
//! zerlegt (Zeichen mit Fett/Kursiv/Unterstrichen, Zeilenumbrüche, opake
//! Teilbäume). Nach jeder Änderung wird der Puffer als `<b>`/`<i>`/`<u>`
//! zurück in den lebenden Node geschrieben; opake Teilbäume behalten ihre IDs.

use std::ops::Range;

use crate::core::text::{decode_entities, escape_text};
use crate::core::{DocumentTree, ElementData, NodeData, NodeId};
use crate::input::{CaretMotion, FormatCommand};
use crate::shared::FormatState;

/// Formatierung eines Zeichens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    pub const PLAIN: TextStyle = TextStyle {
        bold: false,
        italic: false,
        underline: false,
    };

    fn with(mut self, format: FormatCommand, on: bool) -> Self {
        match format {
            FormatCommand::Bold => self.bold = on,
            FormatCommand::Italic => self.italic = on,
            FormatCommand::Underline => self.underline = on,
            FormatCommand::RemoveFormat => return TextStyle::PLAIN,
        }
        self
    }

    fn has(&self, format: FormatCommand) -> bool {
        match format {
            FormatCommand::Bold => self.bold,
            FormatCommand::Italic => self.italic,
            FormatCommand::Underline => self.underline,
            FormatCommand::RemoveFormat => *self == TextStyle::PLAIN,
        }
    }
}

/// Kleinste Einheit des Puffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Char { ch: char, style: TextStyle },
    LineBreak,
    /// Unveränderter Teilbaum (Links, Spans mit Attributen, Kommentare)
    Opaque { node: NodeId, style: TextStyle },
}

impl Glyph {
    fn style(&self) -> Option<TextStyle> {
        match self {
            Glyph::Char { style, .. } | Glyph::Opaque { style, .. } => Some(*style),
            Glyph::LineBreak => None,
        }
    }

    fn set_style(&mut self, new_style: TextStyle) {
        match self {
            Glyph::Char { style, .. } | Glyph::Opaque { style, .. } => *style = new_style,
            Glyph::LineBreak => {}
        }
    }
}

/// Bearbeitbarer Inhalt mit Auswahl (`anchor`..`caret` in Glyph-Indizes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichTextBuffer {
    glyphs: Vec<Glyph>,
    anchor: usize,
    caret: usize,
    /// Format für die nächste Eingabe bei leerer Auswahl
    pending_style: Option<TextStyle>,
}

impl RichTextBuffer {
    /// Liest den Inhalt eines Elements ein.
    pub fn from_node(tree: &DocumentTree, node: NodeId) -> Self {
        let mut glyphs = Vec::new();
        import_children(tree, node, TextStyle::PLAIN, &mut glyphs);
        let len = glyphs.len();
        Self {
            glyphs,
            anchor: len,
            caret: len,
            pending_style: None,
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Sortierter Auswahlbereich.
    pub fn selection(&self) -> Range<usize> {
        self.anchor.min(self.caret)..self.anchor.max(self.caret)
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.caret
    }

    /// Text ohne Formatierung (opake Teilbäume als Platzhalter `\u{fffc}`).
    pub fn plain_text(&self) -> String {
        self.glyphs
            .iter()
            .map(|g| match g {
                Glyph::Char { ch, .. } => *ch,
                Glyph::LineBreak => '\n',
                Glyph::Opaque { .. } => '\u{fffc}',
            })
            .collect()
    }

    pub fn select_all(&mut self) {
        self.anchor = 0;
        self.caret = self.glyphs.len();
        self.pending_style = None;
    }

    pub fn set_selection(&mut self, anchor: usize, caret: usize) {
        let len = self.glyphs.len();
        self.anchor = anchor.min(len);
        self.caret = caret.min(len);
        self.pending_style = None;
    }

    /// Format der nächsten Eingabe.
    fn typing_style(&self) -> TextStyle {
        if let Some(style) = self.pending_style {
            return style;
        }
        let range = self.selection();
        let source = if range.is_empty() {
            range.start.checked_sub(1)
        } else {
            Some(range.start)
        };
        source
            .and_then(|i| self.glyphs.get(i))
            .and_then(Glyph::style)
            .unwrap_or_default()
    }

    fn delete_selection(&mut self) -> bool {
        let range = self.selection();
        if range.is_empty() {
            return false;
        }
        self.glyphs.drain(range.clone());
        self.anchor = range.start;
        self.caret = range.start;
        true
    }

    /// Ersetzt die Auswahl durch Text. `\n` wird zum Zeilenumbruch.
    pub fn insert_text(&mut self, text: &str) {
        let style = self.typing_style();
        self.delete_selection();
        for ch in text.chars() {
            let glyph = match ch {
                '\n' => Glyph::LineBreak,
                '\r' => continue,
                _ => Glyph::Char { ch, style },
            };
            self.glyphs.insert(self.caret, glyph);
            self.caret += 1;
        }
        self.anchor = self.caret;
        self.pending_style = Some(style);
    }

    pub fn insert_line_break(&mut self) {
        let style = self.typing_style();
        self.delete_selection();
        self.glyphs.insert(self.caret, Glyph::LineBreak);
        self.caret += 1;
        self.anchor = self.caret;
        self.pending_style = Some(style);
    }

    pub fn delete_backward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.caret > 0 {
            self.caret -= 1;
            self.glyphs.remove(self.caret);
            self.anchor = self.caret;
        }
        self.pending_style = None;
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.caret < self.glyphs.len() {
            self.glyphs.remove(self.caret);
        }
        self.pending_style = None;
    }

    pub fn move_caret(&mut self, motion: CaretMotion, extend: bool) {
        let len = self.glyphs.len();
        let collapsed = !extend && self.has_selection();
        let range = self.selection();
        self.caret = match motion {
            CaretMotion::Left if collapsed => range.start,
            CaretMotion::Right if collapsed => range.end,
            CaretMotion::Left => self.caret.saturating_sub(1),
            CaretMotion::Right => (self.caret + 1).min(len),
            CaretMotion::Home => 0,
            CaretMotion::End => len,
        };
        if !extend {
            self.anchor = self.caret;
        }
        self.pending_style = None;
    }

    /// Wendet einen Formatbefehl auf die Auswahl an. Bei leerer Auswahl gilt
    /// er für die nächste Eingabe.
    pub fn apply_format(&mut self, format: FormatCommand) {
        let range = self.selection();
        if range.is_empty() {
            let current = self.typing_style();
            let on = !current.has(format);
            self.pending_style = Some(current.with(format, on));
            return;
        }

        let all_set = self.glyphs[range.clone()]
            .iter()
            .filter_map(Glyph::style)
            .all(|style| style.has(format));
        let on = !all_set;
        for glyph in &mut self.glyphs[range] {
            if let Some(style) = glyph.style() {
                glyph.set_style(style.with(format, on));
            }
        }
    }

    /// Formate, die in der gesamten Auswahl (bzw. an der Eingabestelle) aktiv sind.
    pub fn active_formats(&self) -> FormatState {
        let range = self.selection();
        let styles: Vec<TextStyle> = if range.is_empty() {
            vec![self.typing_style()]
        } else {
            self.glyphs[range].iter().filter_map(Glyph::style).collect()
        };
        if styles.is_empty() {
            return FormatState::default();
        }
        FormatState {
            bold: styles.iter().all(|s| s.bold),
            italic: styles.iter().all(|s| s.italic),
            underline: styles.iter().all(|s| s.underline),
        }
    }

    /// Opake Teilbäume in Puffer-Reihenfolge.
    pub fn opaque_nodes(&self) -> Vec<NodeId> {
        self.glyphs
            .iter()
            .filter_map(|g| match g {
                Glyph::Opaque { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Schreibt den Puffer als Kinder von `node` in den Baum.
    pub fn write_to(&self, tree: &mut DocumentTree, node: NodeId) {
        self.write_to_preserving(tree, node, &[]);
    }

    /// Wie [`write_to`](Self::write_to); `preserve` wird nur abgehängt statt
    /// gelöscht, auch wenn der Puffer den Node nicht mehr enthält.
    ///
    /// Text-Nodes und Format-Elemente des alten Inhalts werden
    /// wiederverwendet, damit die Arena pro Eingabe nicht wächst.
    pub fn write_to_preserving(&self, tree: &mut DocumentTree, node: NodeId, preserve: &[NodeId]) {
        let mut keep = preserve.to_vec();
        keep.extend(self.opaque_nodes());
        for &kept in &keep {
            tree.detach(kept);
        }
        let mut pool = NodePool::default();
        for child in tree.children(node).to_vec() {
            pool.collect(tree, child);
        }

        let mut new_children = Vec::new();
        let mut index = 0;
        while index < self.glyphs.len() {
            match self.glyphs[index] {
                Glyph::LineBreak => {
                    new_children.push(pool.element(tree, "br"));
                    index += 1;
                }
                Glyph::Opaque { node: opaque, style } => {
                    new_children.push(pool.wrap(tree, opaque, style));
                    index += 1;
                }
                Glyph::Char { style, .. } => {
                    let mut text = String::new();
                    while let Some(Glyph::Char { ch, style: next }) = self.glyphs.get(index) {
                        if *next != style {
                            break;
                        }
                        text.push(*ch);
                        index += 1;
                    }
                    let text_node = pool.text(tree, escape_text(&text));
                    new_children.push(pool.wrap(tree, text_node, style));
                }
            }
        }

        tree.replace_children(node, &new_children);
        pool.discard(tree);
    }
}

/// Wiederverwendbare Nodes aus dem bisherigen Inhalt eines Elements.
#[derive(Default)]
struct NodePool {
    texts: Vec<NodeId>,
    elements: Vec<(&'static str, NodeId)>,
}

impl NodePool {
    /// Format-Tags, deren Elemente ohne Attribute wiederverwendet werden.
    const TAGS: [&'static str; 4] = ["b", "i", "u", "br"];

    /// Hängt Text-Nodes und schlichte Format-Elemente ab und merkt sie vor.
    /// Opake Nodes sind zu diesem Zeitpunkt bereits abgehängt.
    fn collect(&mut self, tree: &mut DocumentTree, id: NodeId) {
        if tree.raw_text(id).is_some() {
            tree.detach(id);
            self.texts.push(id);
            return;
        }
        let Some(element) = tree.element(id) else {
            return;
        };
        if element.marks.marker || !element.attributes.is_empty() {
            return;
        }
        let tag = element.tag.clone();
        if matches!(tag.as_str(), "b" | "strong" | "i" | "em" | "u") {
            for child in tree.children(id).to_vec() {
                self.collect(tree, child);
            }
        }
        if let Some(&reusable) = Self::TAGS.iter().find(|&&t| t == tag) {
            tree.detach(id);
            self.elements.push((reusable, id));
        }
    }

    fn text(&mut self, tree: &mut DocumentTree, raw: String) -> NodeId {
        if let Some(id) = self.texts.pop() {
            if let Some(existing) = tree.raw_text_mut(id) {
                *existing = raw;
                return id;
            }
        }
        tree.create_text(raw)
    }

    /// Leeres Element mit `tag`, wiederverwendet oder neu.
    fn element(&mut self, tree: &mut DocumentTree, tag: &str) -> NodeId {
        match self.elements.iter().position(|(t, _)| *t == tag) {
            Some(position) => {
                let (_, id) = self.elements.swap_remove(position);
                tree.replace_children(id, &[]);
                id
            }
            None => tree.create_element(ElementData::new(tag)),
        }
    }

    /// Umhüllt einen Node mit `<u>`, `<i>`, `<b>` (von innen nach außen).
    fn wrap(&mut self, tree: &mut DocumentTree, inner: NodeId, style: TextStyle) -> NodeId {
        let mut current = inner;
        for (flag, tag) in [
            (style.underline, "u"),
            (style.italic, "i"),
            (style.bold, "b"),
        ] {
            if flag {
                let wrapper = self.element(tree, tag);
                tree.append_child(wrapper, current);
                current = wrapper;
            }
        }
        current
    }

    /// Entfernt übrig gebliebene Nodes endgültig.
    fn discard(self, tree: &mut DocumentTree) {
        for id in self.texts {
            tree.remove(id);
        }
        for (_, id) in self.elements {
            tree.remove(id);
        }
    }
}

fn import_children(tree: &DocumentTree, id: NodeId, style: TextStyle, out: &mut Vec<Glyph>) {
    for &child in tree.children(id) {
        let Some(node) = tree.get(child) else {
            continue;
        };
        match &node.data {
            NodeData::Text(raw) => {
                out.extend(
                    decode_entities(raw)
                        .chars()
                        .map(|ch| Glyph::Char { ch, style }),
                );
            }
            NodeData::Comment(_) => out.push(Glyph::Opaque { node: child, style }),
            NodeData::Element(element) => {
                if element.marks.marker {
                    continue;
                }
                let plain = element.attributes.is_empty();
                match element.tag.as_str() {
                    "br" => out.push(Glyph::LineBreak),
                    "b" | "strong" if plain => {
                        import_children(tree, child, style.with(FormatCommand::Bold, true), out)
                    }
                    "i" | "em" if plain => {
                        import_children(tree, child, style.with(FormatCommand::Italic, true), out)
                    }
                    "u" if plain => import_children(
                        tree,
                        child,
                        style.with(FormatCommand::Underline, true),
                        out,
                    ),
                    _ => out.push(Glyph::Opaque { node: child, style }),
                }
            }
        }
    }
}
