//! Layout-Snapshot: Boxen aller sichtbaren Elemente für Hit-Tests und Geometrie.
//!
//! Der eingebaute Fluss-Schätzer liefert deterministische Boxen ohne
//! Rendering-Runtime. Ein Host kann einzelne Boxen mit gemessenen Werten
//! überschreiben; diese gelten bis zur nächsten Strukturänderung.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::document::{DocumentTree, NodeData, NodeId, ROOT_TAG};
use super::geometry::Rect;
use super::style::InlineStyle;
use super::tags;
use super::text::{collapse_whitespace, decode_entities};

/// Klassen, deren Kinder horizontal nebeneinander fließen.
const ROW_CLASSES: &[&str] = &[
    "row", "flex", "d-flex", "flex-row", "grid", "columns", "form-row", "card-deck",
];

/// Metriken des Fluss-Schätzers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Breite eines Zeichens
    pub char_width: f32,
    /// Höhe einer Textzeile
    pub line_height: f32,
    /// Innenabstand von Block-Elementen
    pub block_padding: f32,
    /// Abstand zwischen aufeinanderfolgenden Blöcken
    pub block_gap: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            block_padding: 12.0,
            block_gap: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutEntry {
    rect: Rect,
    depth: u32,
    order: u32,
}

/// Boxen aller Elemente zum Zeitpunkt der Berechnung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    entries: BTreeMap<NodeId, LayoutEntry>,
}

impl LayoutSnapshot {
    /// Berechnet das Layout des gesamten Baums und wendet gemessene Boxen an.
    pub fn compute(
        tree: &DocumentTree,
        viewport: Vec2,
        metrics: &LayoutMetrics,
        measured: &BTreeMap<NodeId, Rect>,
    ) -> Self {
        let mut estimator = FlowEstimator {
            tree,
            metrics,
            snapshot: LayoutSnapshot::default(),
            next_order: 0,
        };
        estimator.layout_root(viewport);
        let mut snapshot = estimator.snapshot;
        snapshot.apply_measured(tree, measured);
        snapshot
    }

    /// Überschreibt Boxen mit Host-Messungen. Vom Nutzer platzierte
    /// Elemente behalten ihre Box aus dem Inline-Style.
    fn apply_measured(&mut self, tree: &DocumentTree, measured: &BTreeMap<NodeId, Rect>) {
        for (id, rect) in measured {
            if !tree.is_attached(*id) || tree.attr(*id, "data-placed") == Some("user") {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(id) {
                entry.rect = *rect;
            }
        }
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.entries.get(&id).map(|e| e.rect)
    }

    /// Box oder leeres Rechteck, wenn der Node kein Layout hat.
    pub fn rect_or_zero(&self, id: NodeId) -> Rect {
        self.rect(id).unwrap_or(Rect::ZERO)
    }

    /// Setzt eine einzelne Box (nach Freiform-Platzierung).
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.rect = rect;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Alle Elemente, deren Box `pos` enthält, tiefste zuerst.
    /// Bei gleicher Tiefe gewinnt das später gezeichnete Element.
    pub fn hits_at(&self, pos: Vec2) -> Vec<NodeId> {
        let mut hits: Vec<(NodeId, LayoutEntry)> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.rect.is_empty() && e.rect.contains(pos))
            .map(|(id, e)| (*id, *e))
            .collect();
        hits.sort_by(|a, b| {
            b.1.depth
                .cmp(&a.1.depth)
                .then_with(|| b.1.order.cmp(&a.1.order))
        });
        hits.into_iter().map(|(id, _)| id).collect()
    }
}

struct FlowEstimator<'a> {
    tree: &'a DocumentTree,
    metrics: &'a LayoutMetrics,
    snapshot: LayoutSnapshot,
    next_order: u32,
}

/// Zustand einer laufenden Inline-Zeile innerhalb eines Blocks.
#[derive(Default)]
struct LineRun {
    open: bool,
    x: f32,
    top: f32,
    height: f32,
}

impl FlowEstimator<'_> {
    fn record(&mut self, id: NodeId, rect: Rect, depth: u32) {
        let order = self.next_order;
        self.next_order += 1;
        self.snapshot
            .entries
            .insert(id, LayoutEntry { rect, depth, order });
    }

    fn update(&mut self, id: NodeId, rect: Rect) {
        self.snapshot.set_rect(id, rect);
    }

    fn layout_root(&mut self, viewport: Vec2) {
        let root = self.tree.root();
        let origin = Vec2::ZERO;
        self.record(root, Rect::from_min_size(origin, Vec2::new(viewport.x, 0.0)), 0);
        let style = InlineStyle::default();
        let content_height = self.layout_children(root, &style, origin, origin, viewport.x, 1);
        let height = content_height.max(viewport.y);
        self.update(root, Rect::from_min_size(origin, Vec2::new(viewport.x, height)));
    }

    /// Alle Nachfahren bekommen eine leere Box (versteckte Teilbäume).
    fn zero_subtree(&mut self, id: NodeId, origin: Vec2, depth: u32) {
        self.record(id, Rect::from_min_size(origin, Vec2::ZERO), depth);
        for &child in self.tree.children(id) {
            if self.tree.is_element(child) {
                self.zero_subtree(child, origin, depth + 1);
            }
        }
    }

    fn padding_for(&self, tag: &str) -> f32 {
        if tag == ROOT_TAG || tags::is_inline(tag) || tags::is_void(tag) {
            0.0
        } else {
            self.metrics.block_padding
        }
    }

    /// Breite des Textes eines Elements in einer Zeile.
    fn text_width(&self, id: NodeId) -> f32 {
        collapse_whitespace(&self.tree.text_content(id)).chars().count() as f32
            * self.metrics.char_width
    }

    fn void_size(&self, tag: &str, style: &InlineStyle, id: NodeId, available: f32) -> Vec2 {
        let attr_px = |name: &str| {
            self.tree
                .attr(id, name)
                .and_then(super::style::parse_px)
        };
        let (default_w, default_h) = match tag {
            "img" => (120.0, 80.0),
            "hr" => (available, 2.0),
            "br" => (0.0, 0.0),
            "input" | "select" => (160.0, self.metrics.line_height),
            _ => (0.0, 0.0),
        };
        Vec2::new(
            style.px("width").or_else(|| attr_px("width")).unwrap_or(default_w),
            style.px("height").or_else(|| attr_px("height")).unwrap_or(default_h),
        )
    }

    /// Layoutet ein Element an `origin` und gibt seine Größe zurück.
    fn layout_element(&mut self, id: NodeId, origin: Vec2, available: f32, depth: u32) -> Vec2 {
        let Some(element) = self.tree.element(id) else {
            return Vec2::ZERO;
        };
        let style = element.style();
        let tag = element.tag.as_str();

        if element.marks.marker || tags::is_hidden(tag) || style.is_hidden() {
            self.zero_subtree(id, origin, depth);
            return Vec2::ZERO;
        }

        if tags::is_void(tag) {
            let size = self.void_size(tag, &style, id, available);
            self.record(id, Rect::from_min_size(origin, size), depth);
            return size;
        }

        let padding = self.padding_for(tag);
        let shrink = tags::is_inline(tag) || style.is_absolute();
        let width = match style.px("width") {
            Some(width) => width,
            None if shrink => (self.text_width(id) + 2.0 * padding).min(available.max(0.0)),
            None => available,
        }
        .max(0.0);

        self.record(id, Rect::from_min_size(origin, Vec2::new(width, 0.0)), depth);

        let content_origin = origin + Vec2::splat(padding);
        let content_width = (width - 2.0 * padding).max(0.0);
        let content_height =
            self.layout_children(id, &style, origin, content_origin, content_width, depth + 1);

        let mut height = content_height + 2.0 * padding;
        if let Some(explicit) = style.px("height") {
            height = explicit;
        } else if let Some(min_height) = style.px("min-height") {
            height = height.max(min_height);
        }

        let size = Vec2::new(width, height.max(0.0));
        self.update(id, Rect::from_min_size(origin, size));
        size
    }

    fn is_row(&self, id: NodeId, style: &InlineStyle) -> bool {
        style.is_horizontal_flow()
            || self
                .tree
                .element(id)
                .is_some_and(|e| e.classes().any(|c| ROW_CLASSES.contains(&c)))
    }

    fn is_absolute_child(&self, id: NodeId) -> bool {
        self.tree
            .element(id)
            .is_some_and(|e| e.style().is_absolute())
    }

    /// Layoutet die Kinder eines Elements und gibt die Inhaltshöhe zurück.
    fn layout_children(
        &mut self,
        id: NodeId,
        style: &InlineStyle,
        frame_min: Vec2,
        origin: Vec2,
        width: f32,
        depth: u32,
    ) -> f32 {
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        let (absolute, in_flow): (Vec<NodeId>, Vec<NodeId>) = children
            .iter()
            .copied()
            .partition(|&child| self.is_absolute_child(child));

        let height = if self.is_row(id, style) {
            self.layout_row(&in_flow, origin, width, depth)
        } else {
            self.layout_column(&in_flow, origin, width, depth)
        };

        for child in absolute {
            let child_style = self.tree.style(child);
            let offset = Vec2::new(
                child_style.px("left").unwrap_or(0.0),
                child_style.px("top").unwrap_or(0.0),
            );
            let available = (width - offset.x).max(0.0);
            self.layout_element(child, frame_min + offset, available, depth);
        }

        height
    }

    /// Horizontale Aufteilung: alle Element-Kinder teilen sich die Breite.
    fn layout_row(&mut self, children: &[NodeId], origin: Vec2, width: f32, depth: u32) -> f32 {
        let elements: Vec<NodeId> = children
            .iter()
            .copied()
            .filter(|&c| self.tree.is_element(c))
            .collect();
        let visible = elements
            .iter()
            .filter(|&&c| {
                let hidden = self.tree.element(c).is_some_and(|e| {
                    e.marks.marker || tags::is_hidden(&e.tag) || e.style().is_hidden()
                });
                !hidden
            })
            .count();
        if visible == 0 {
            for child in elements {
                self.zero_subtree(child, origin, depth);
            }
            return 0.0;
        }

        let gap = self.metrics.block_gap;
        let column_width = ((width - gap * (visible as f32 - 1.0)) / visible as f32).max(0.0);
        let mut x = 0.0;
        let mut max_height: f32 = 0.0;
        for child in elements {
            let size = self.layout_element(child, origin + Vec2::new(x, 0.0), column_width, depth);
            if size != Vec2::ZERO {
                x += column_width + gap;
                max_height = max_height.max(size.y);
            }
        }
        max_height
    }

    /// Vertikaler Fluss: Blöcke untereinander, Inline-Inhalt in Zeilen.
    fn layout_column(&mut self, children: &[NodeId], origin: Vec2, width: f32, depth: u32) -> f32 {
        let line_height = self.metrics.line_height;
        let char_width = self.metrics.char_width;
        let mut cursor_y = 0.0;
        let mut placed_block = false;
        let mut line = LineRun::default();

        for &child in children {
            let Some(node) = self.tree.get(child) else {
                continue;
            };
            match &node.data {
                NodeData::Comment(_) => {}
                NodeData::Text(raw) => {
                    let text = collapse_whitespace(&decode_entities(raw));
                    if text.is_empty() {
                        continue;
                    }
                    Self::open_line(&mut line, line_height);
                    line.x += text.chars().count() as f32 * char_width;
                    if width > 0.0 {
                        while line.x > width {
                            line.x -= width;
                            line.top += line_height;
                        }
                    }
                    line.height = line.height.max(line.top + line_height);
                }
                NodeData::Element(element) => {
                    let tag = element.tag.as_str();
                    if tag == "br" {
                        self.layout_element(child, origin + Vec2::new(line.x, cursor_y + line.top), 0.0, depth);
                        Self::open_line(&mut line, line_height);
                        line.x = 0.0;
                        line.top += line_height;
                        line.height = line.height.max(line.top);
                        continue;
                    }
                    if tags::is_inline(tag) {
                        Self::open_line(&mut line, line_height);
                        let remaining = (width - line.x).max(0.0);
                        let wanted = self.text_width(child);
                        if line.x > 0.0 && wanted > remaining {
                            line.x = 0.0;
                            line.top += line_height;
                        }
                        let pos = origin + Vec2::new(line.x, cursor_y + line.top);
                        let size = self.layout_element(child, pos, (width - line.x).max(0.0), depth);
                        line.x += size.x;
                        line.height = line.height.max(line.top + size.y.max(line_height));
                        continue;
                    }

                    if line.open {
                        cursor_y += line.height;
                        line = LineRun::default();
                    }
                    if placed_block {
                        cursor_y += self.metrics.block_gap;
                    }
                    let size =
                        self.layout_element(child, origin + Vec2::new(0.0, cursor_y), width, depth);
                    if size.y > 0.0 {
                        cursor_y += size.y;
                        placed_block = true;
                    }
                }
            }
        }

        if line.open {
            cursor_y += line.height;
        }
        cursor_y
    }

    fn open_line(line: &mut LineRun, line_height: f32) {
        if !line.open {
            line.open = true;
            line.height = line_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::ElementData;

    fn element(tree: &mut DocumentTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut data = ElementData::new(tag);
        for (name, value) in attrs {
            data.attributes.insert(name.to_string(), value.to_string());
        }
        let id = tree.create_element(data);
        tree.append_child(parent, id);
        id
    }

    fn text(tree: &mut DocumentTree, parent: NodeId, raw: &str) {
        let id = tree.create_text(raw);
        tree.append_child(parent, id);
    }

    fn compute(tree: &DocumentTree) -> LayoutSnapshot {
        LayoutSnapshot::compute(
            tree,
            Vec2::new(800.0, 600.0),
            &LayoutMetrics::default(),
            &BTreeMap::new(),
        )
    }

    #[test]
    fn blocks_stack_vertically() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let a = element(&mut tree, root, "div", &[]);
        text(&mut tree, a, "Card A");
        let b = element(&mut tree, root, "div", &[]);
        text(&mut tree, b, "Card B");

        let layout = compute(&tree);
        let rect_a = layout.rect(a).expect("Box für A");
        let rect_b = layout.rect(b).expect("Box für B");
        assert_eq!(rect_a.width(), 800.0);
        assert_eq!(rect_a.height(), 44.0);
        assert_eq!(rect_b.min.y, rect_a.max.y + 8.0);
    }

    #[test]
    fn row_class_splits_width() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let row = element(&mut tree, root, "div", &[("class", "row")]);
        let a = element(&mut tree, row, "div", &[]);
        let b = element(&mut tree, row, "div", &[]);

        let layout = compute(&tree);
        let rect_a = layout.rect(a).expect("Box für A");
        let rect_b = layout.rect(b).expect("Box für B");
        assert_eq!(rect_a.min.y, rect_b.min.y);
        assert!(rect_b.min.x > rect_a.max.x);
    }

    #[test]
    fn absolute_children_use_inline_box() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let stage = element(&mut tree, root, "div", &[("style", "position: relative; height: 400px;")]);
        let placed = element(
            &mut tree,
            root,
            "div",
            &[("style", "position: absolute; left: 40px; top: 30px; width: 100px; height: 50px;")],
        );
        tree.append_child(stage, placed);

        let layout = compute(&tree);
        let stage_rect = layout.rect(stage).expect("Box für Stage");
        let rect = layout.rect(placed).expect("Box für platziertes Element");
        assert_eq!(rect.min, stage_rect.min + Vec2::new(40.0, 30.0));
        assert_eq!(rect.size(), Vec2::new(100.0, 50.0));
        assert_eq!(stage_rect.height(), 400.0);
    }

    #[test]
    fn hidden_elements_have_no_area() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let style = element(&mut tree, root, "style", &[]);
        text(&mut tree, style, ".card { color: red; }");
        let hidden = element(&mut tree, root, "div", &[("style", "display: none")]);

        let layout = compute(&tree);
        assert!(layout.rect(style).is_some_and(|r| r.is_empty()));
        assert!(layout.rect(hidden).is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn hits_prefer_deepest_element() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let section = element(&mut tree, root, "section", &[]);
        let p = element(&mut tree, section, "p", &[]);
        text(&mut tree, p, "Hello");

        let layout = compute(&tree);
        let center = layout.rect(p).expect("Box für p").center();
        assert_eq!(layout.hits_at(center), vec![p, section, root]);
    }

    #[test]
    fn measured_rects_override_estimate() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let a = element(&mut tree, root, "div", &[]);
        let mut measured = BTreeMap::new();
        measured.insert(a, Rect::new(5.0, 6.0, 70.0, 80.0));

        let layout = LayoutSnapshot::compute(
            &tree,
            Vec2::new(800.0, 600.0),
            &LayoutMetrics::default(),
            &measured,
        );
        assert_eq!(layout.rect(a), Some(Rect::new(5.0, 6.0, 70.0, 80.0)));
    }
}
