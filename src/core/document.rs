//! Der lebende Dokument-Baum: Arena aus Element-, Text- und Kommentar-Nodes.
//!
//! Der Baum ist Modell und Sicht zugleich. Nodes behalten ihre `NodeId`
//! über ihre gesamte Lebenszeit, auch wenn sie verschoben werden.

use super::classification::NodeRoles;
use super::style::InlineStyle;
use super::text::decode_entities;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stabile ID eines Nodes in der Arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Die Wurzel ist immer der erste Arena-Eintrag.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag-Name der synthetischen Wurzel (wird nie serialisiert).
pub const ROOT_TAG: &str = "#root";

/// Flüchtige Editor-Markierungen eines Elements (werden nie serialisiert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeMarks {
    /// Einfügemarker während eines Reorder-Drags
    pub marker: bool,
    /// Element befindet sich in einer aktiven Text-Edit-Session
    pub editing: bool,
    /// Letzte Klassifikation durch den Segmenter
    pub roles: NodeRoles,
}

/// Daten eines Element-Nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag-Name, klein geschrieben
    pub tag: String,
    /// Attribute in Original-Reihenfolge, Werte in roher (escapter) Form
    pub attributes: IndexMap<String, String>,
    /// Nicht-void Element wurde als `<tag/>` notiert (SVG etc.)
    pub self_closing: bool,
    pub marks: NodeMarks,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            self_closing: false,
            marks: NodeMarks::default(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Alle Klassen-Tokens des `class`-Attributs.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn style(&self) -> InlineStyle {
        InlineStyle::parse(self.attr("style").unwrap_or(""))
    }
}

/// Inhalt eines Nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(ElementData),
    /// Text in roher Markup-Form (Entities unaufgelöst)
    Text(String),
    /// Kommentar-Inhalt ohne `<!--`/`-->`
    Comment(String),
}

/// Ein Arena-Eintrag.
#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
    alive: bool,
}

/// Hierarchischer, mutierbarer Dokument-Baum mit genau einer Wurzel.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Erstellt einen Baum, der nur die synthetische Wurzel enthält.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Element(ElementData::new(ROOT_TAG)),
                alive: true,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Anzahl lebender Nodes (inklusive Wurzel und abgehängter Teilbäume).
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Anzahl aller Arena-Einträge inklusive entfernter Nodes.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    // ── Erzeugen ────────────────────────────────────────────────────

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
            alive: true,
        });
        id
    }

    /// Erzeugt ein abgehängtes Element.
    pub fn create_element(&mut self, element: ElementData) -> NodeId {
        self.push(NodeData::Element(element))
    }

    /// Erzeugt einen abgehängten Text-Node (roher Inhalt).
    pub fn create_text(&mut self, raw: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(raw.into()))
    }

    /// Erzeugt einen abgehängten Kommentar-Node.
    pub fn create_comment(&mut self, raw: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(raw.into()))
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|n| n.alive)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).filter(|n| n.alive)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.get_mut(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element-Kinder ohne Einfügemarker.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.element(child).is_some_and(|e| !e.marks.marker))
            .collect()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Setzt ein Attribut. Gibt `false` zurück, wenn der Node kein Element ist.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.attributes.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.attributes.shift_remove(name)
    }

    pub fn style(&self, id: NodeId) -> InlineStyle {
        self.element(id).map(ElementData::style).unwrap_or_default()
    }

    /// Schreibt einen Style zurück; ein leerer Style entfernt das Attribut.
    pub fn set_style(&mut self, id: NodeId, style: &InlineStyle) {
        if style.is_empty() {
            self.remove_attr(id, "style");
        } else {
            self.set_attr(id, "style", style.to_attribute());
        }
    }

    pub fn marks(&self, id: NodeId) -> NodeMarks {
        self.element(id).map(|e| e.marks).unwrap_or_default()
    }

    pub fn marks_mut(&mut self, id: NodeId) -> Option<&mut NodeMarks> {
        self.element_mut(id).map(|e| &mut e.marks)
    }

    pub fn is_marker(&self, id: NodeId) -> bool {
        self.marks(id).marker
    }

    /// Rohtext eines Text-Nodes.
    pub fn raw_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn raw_text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.get_mut(id)?.data {
            NodeData::Text(raw) => Some(raw),
            _ => None,
        }
    }

    /// Dekodierter, verketteter Text aller Nachfahren.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut raw = String::new();
        self.collect_raw_text(id, &mut raw);
        decode_entities(&raw)
    }

    fn collect_raw_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(raw) => out.push_str(raw),
            NodeData::Element(element) if element.marks.marker => {}
            NodeData::Element(_) => {
                for &child in &node.children {
                    self.collect_raw_text(child, out);
                }
            }
            NodeData::Comment(_) => {}
        }
    }

    /// Prüft, ob der Node noch am lebenden Baum hängt.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == NodeId::ROOT {
                return self.get(current).is_some();
            }
            match self.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Prüft, ob `ancestor` ein (echter) Vorfahre von `id` ist.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Tiefe unterhalb der Wurzel (Wurzel = 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(node) = current {
            depth += 1;
            current = self.parent(node);
        }
        depth
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Alle Nachfahren in Pre-Order (ohne `id` selbst).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Alle Element-Nachfahren in Pre-Order ohne Marker.
    pub fn element_descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.element(n).is_some_and(|e| !e.marks.marker))
            .collect()
    }

    /// Findet das erste Element mit passendem Attributwert.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.element_descendants(NodeId::ROOT)
            .into_iter()
            .find(|&id| self.attr(id, name) == Some(value))
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Hängt einen Node von seinem Parent ab (Teilbaum bleibt erhalten).
    pub fn detach(&mut self, id: NodeId) {
        if id == NodeId::ROOT {
            return;
        }
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Entfernt einen Node samt Teilbaum endgültig.
    pub fn remove(&mut self, id: NodeId) {
        if id == NodeId::ROOT {
            return;
        }
        self.detach(id);
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node_id in doomed {
            if let Some(node) = self.nodes.get_mut(node_id.index()) {
                node.alive = false;
                node.children = Vec::new();
                node.parent = None;
                // Inhalt freigeben, nur der leere Slot bleibt
                node.data = NodeData::Comment(String::new());
            }
        }
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        child != NodeId::ROOT
            && parent != child
            && self.is_element(parent)
            && self.get(child).is_some()
            && !self.is_ancestor_of(child, parent)
    }

    /// Hängt `child` als letztes Kind an `parent` (vorher abgehängt).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.detach(child);
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Fügt `child` vor `reference` ein. `reference` muss Kind von `parent` sein.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        self.insert_relative(parent, child, reference, 0)
    }

    /// Fügt `child` hinter `reference` ein. `reference` muss Kind von `parent` sein.
    pub fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        self.insert_relative(parent, child, reference, 1)
    }

    fn insert_relative(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
        offset: usize,
    ) -> bool {
        if child == reference || !self.can_adopt(parent, child) {
            return false;
        }
        if self.parent(reference) != Some(parent) {
            return false;
        }
        self.detach(child);
        let Some(index) = self.children(parent).iter().position(|&c| c == reference) else {
            return false;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.insert(index + offset, child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Ersetzt einen Node durch seine Kinder (Wrapper-Collapse).
    pub fn unwrap_node(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children {
            if !self.insert_before(parent, child, id) {
                return false;
            }
        }
        self.remove(id);
        true
    }

    /// Ersetzt alle Kinder eines Elements (alte Kinder werden entfernt).
    pub fn replace_children(&mut self, parent: NodeId, new_children: &[NodeId]) {
        let old: Vec<NodeId> = self.children(parent).to_vec();
        for child in old {
            if !new_children.contains(&child) {
                self.remove(child);
            } else {
                self.detach(child);
            }
        }
        for &child in new_children {
            self.append_child(parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tree: &mut DocumentTree, parent: NodeId, tag: &str) -> NodeId {
        let id = tree.create_element(ElementData::new(tag));
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn insert_before_moves_existing_node() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let a = element(&mut tree, root, "div");
        let b = element(&mut tree, root, "div");

        assert!(tree.insert_before(root, b, a));
        assert_eq!(tree.children(root), &[b, a]);
        assert_eq!(tree.parent(b), Some(root));
    }

    #[test]
    fn cannot_move_node_into_own_subtree() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let outer = element(&mut tree, root, "section");
        let inner = element(&mut tree, outer, "div");

        assert!(!tree.append_child(inner, outer));
        assert_eq!(tree.parent(outer), Some(root));
    }

    #[test]
    fn removed_nodes_are_not_attached() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let outer = element(&mut tree, root, "section");
        let inner = element(&mut tree, outer, "p");

        tree.remove(outer);
        assert!(!tree.is_attached(outer));
        assert!(!tree.is_attached(inner));
        assert!(tree.get(inner).is_none());
    }

    #[test]
    fn removed_nodes_release_their_content() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let p = element(&mut tree, root, "p");
        let text = tree.create_text("x".repeat(4096));
        tree.append_child(p, text);

        tree.remove(p);

        assert_eq!(tree.arena_len(), 3);
        assert_eq!(tree.len(), 1);
        match &tree.nodes[text.index()].data {
            NodeData::Comment(raw) => assert!(raw.is_empty()),
            other => panic!("Unerwarteter Inhalt: {other:?}"),
        }
    }

    #[test]
    fn unwrap_node_promotes_children_in_order() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let wrapper = element(&mut tree, root, "div");
        let a = element(&mut tree, wrapper, "header");
        let b = element(&mut tree, wrapper, "main");

        assert!(tree.unwrap_node(wrapper));
        assert_eq!(tree.children(root), &[a, b]);
        assert!(tree.get(wrapper).is_none());
    }

    #[test]
    fn text_content_decodes_entities() {
        let mut tree = DocumentTree::new();
        let root = tree.root();
        let p = element(&mut tree, root, "p");
        let text = tree.create_text("Tom &amp; Jerry");
        tree.append_child(p, text);
        assert_eq!(tree.text_content(p), "Tom & Jerry");
    }
}
