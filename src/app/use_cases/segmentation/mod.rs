//! Strukturelle Segmentierung: Container, Blöcke und editierbare Blätter.
//!
//! Die Klassifikation ist eine reine Funktion aus Baum, Layout und Optionen.
//! Ergebnisse werden als Rollen in die Node-Markierungen geschrieben, damit
//! spätere Abfragen ohne erneute Heuristik auskommen.

use std::sync::OnceLock;

use regex::Regex;

use crate::app::drag_registry::init_registry;
use crate::app::use_cases::layout::relayout;
use crate::app::EditorState;
use crate::core::tags::{is_block_level, is_hidden};
use crate::core::{Classification, DocumentTree, LayoutSnapshot, NodeId};
use crate::shared::EditorOptions;

/// Tags, die immer als Drop-Container gelten (Größe vorausgesetzt).
const CONTAINER_TAGS: &[&str] = &["section", "main", "article", "form", "aside"];

/// Tags struktureller Blöcke.
const BLOCK_TAGS: &[&str] = &[
    "form", "header", "footer", "nav", "section", "article", "aside", "figure", "table", "ul", "ol",
];

/// Klassen struktureller Blöcke (exakte Tokens).
const BLOCK_CLASSES: &[&str] = &[
    "card",
    "hero",
    "banner",
    "jumbotron",
    "panel",
    "block",
    "feature",
    "tile",
    "widget",
];

/// Text-tragende Blatt-Tags.
const TEXT_LEAF_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "a", "button", "label", "li", "td", "th",
    "strong", "em", "b", "i", "small",
];

/// Generische Block-Elemente, die als Textträger zugelassen sind.
const GENERIC_TEXT_TAGS: &[&str] = &["div", "section", "article"];

/// Klassen-Bestandteile, die eine Layout-Rolle anzeigen.
const LAYOUT_CLASS_PARTS: &[&str] = &["card", "container", "wrapper", "section", "row", "column"];

/// Klassen der Editor-Oberfläche selbst.
const CHROME_CLASS_PARTS: &[&str] = &["editor-ui", "editor-chrome", "toolbar"];

/// Tags, die als Wrapper aufgelöst werden dürfen.
const WRAPPER_TAGS: &[&str] = &["div", "section", "main", "article"];

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn container_class() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(
        &CELL,
        r"(?i)^(row|col(-[a-z0-9-]+)?|columns?|container(-fluid)?|grid|card-body|section|d-flex|flex)$",
    )
}

fn grid_utility_class() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(
        &CELL,
        r"(?i)^(row|grid(-[a-z0-9-]+)?|cols?(-[a-z0-9-]+)?|columns?|g-\d+|gap-\d+)$",
    )
}

fn wrapper_class() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?i)wrapper|container|layout|root")
}

fn class_matches(tree: &DocumentTree, id: NodeId, re: Option<&Regex>) -> bool {
    let Some(re) = re else {
        return false;
    };
    tree.element(id)
        .is_some_and(|e| e.classes().any(|class| re.is_match(class)))
}

/// Node samt Teilbaum wird nie klassifiziert.
fn is_excluded(tree: &DocumentTree, id: NodeId) -> bool {
    let Some(element) = tree.element(id) else {
        return true;
    };
    if element.marks.marker || is_hidden(&element.tag) || element.style().is_hidden() {
        return true;
    }
    element.attributes.contains_key("data-editor-chrome")
        || element.classes().any(|class| {
            let class = class.to_ascii_lowercase();
            CHROME_CLASS_PARTS.iter().any(|part| class.contains(part))
        })
}

fn is_container_candidate(tree: &DocumentTree, id: NodeId) -> bool {
    tree.tag(id).is_some_and(|tag| CONTAINER_TAGS.contains(&tag))
        || class_matches(tree, id, container_class())
}

fn is_block_candidate(tree: &DocumentTree, id: NodeId) -> bool {
    let Some(element) = tree.element(id) else {
        return false;
    };
    BLOCK_TAGS.contains(&element.tag.as_str())
        || element.classes().any(|class| {
            let class = class.to_ascii_lowercase();
            BLOCK_CLASSES.contains(&class.as_str())
        })
}

fn has_layout_class(tree: &DocumentTree, id: NodeId) -> bool {
    tree.element(id).is_some_and(|e| {
        e.classes().any(|class| {
            let class = class.to_ascii_lowercase();
            LAYOUT_CLASS_PARTS.iter().any(|part| class.contains(part))
        })
    })
}

fn is_editable_candidate(tree: &DocumentTree, id: NodeId, options: &EditorOptions) -> bool {
    let Some(tag) = tree.tag(id) else {
        return false;
    };
    if class_matches(tree, id, grid_utility_class()) {
        return false;
    }
    let children = tree.element_children(id);

    if TEXT_LEAF_TAGS.contains(&tag) {
        return !children
            .iter()
            .any(|&child| tree.tag(child).is_some_and(is_block_level));
    }

    if GENERIC_TEXT_TAGS.contains(&tag) {
        let text_chars = tree.text_content(id).trim().chars().count();
        return children.is_empty()
            && text_chars >= options.min_editable_text_chars
            && !has_layout_class(tree, id);
    }

    false
}

/// Walk-Kontext einer Klassifikation.
struct Segmenter<'a> {
    tree: &'a DocumentTree,
    layout: &'a LayoutSnapshot,
    options: &'a EditorOptions,
}

impl Segmenter<'_> {
    fn meets(&self, id: NodeId, min_size: [f32; 2]) -> bool {
        self.layout.rect_or_zero(id).meets(min_size)
    }

    /// Alle klassifizierbaren Elemente in Pre-Order.
    fn visible_elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_visible(self.tree.root(), &mut out);
        out
    }

    fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.tree.element_children(id) {
            if is_excluded(self.tree, child) {
                continue;
            }
            out.push(child);
            self.collect_visible(child, out);
        }
    }

    fn containers(&self, elements: &[NodeId]) -> Vec<NodeId> {
        let mut containers = vec![self.tree.root()];
        containers.extend(elements.iter().copied().filter(|&id| {
            is_container_candidate(self.tree, id) && self.meets(id, self.options.min_container_size)
        }));
        containers
    }

    /// Blöcke mit dreistufigem Fallback. Liefert auch die genutzte Stufe.
    fn blocks(&self, elements: &[NodeId]) -> (Vec<NodeId>, u8) {
        let min_size = self.options.min_block_size;

        let mut tagged = Vec::new();
        self.collect_blocks(self.tree.root(), false, &mut tagged);
        if !tagged.is_empty() {
            return (tagged, 1);
        }

        let first_level: Vec<NodeId> = self
            .tree
            .element_children(self.tree.root())
            .into_iter()
            .filter(|&id| !is_excluded(self.tree, id) && self.meets(id, min_size))
            .collect();
        if !first_level.is_empty() {
            log::warn!(
                "Keine strukturellen Blöcke erkannt, verwende {} Elemente der ersten Ebene",
                first_level.len()
            );
            return (first_level, 2);
        }

        let anywhere: Vec<NodeId> = elements
            .iter()
            .copied()
            .filter(|&id| self.meets(id, min_size))
            .take(self.options.fallback_block_limit)
            .collect();
        if anywhere.is_empty() {
            log::warn!("Keine ausreichend großen Elemente für Blöcke gefunden");
            return (anywhere, 0);
        }
        log::warn!(
            "Auch erste Ebene leer, verwende die ersten {} großen Elemente",
            anywhere.len()
        );
        (anywhere, 3)
    }

    fn collect_blocks(&self, id: NodeId, inside_block: bool, out: &mut Vec<NodeId>) {
        for child in self.tree.element_children(id) {
            if is_excluded(self.tree, child) {
                continue;
            }
            let tagged = !inside_block
                && is_block_candidate(self.tree, child)
                && self.meets(child, self.options.min_block_size);
            if tagged {
                out.push(child);
            }
            self.collect_blocks(child, inside_block || tagged, out);
        }
    }

    fn editables(&self, out: &mut Vec<NodeId>) {
        self.collect_editables(self.tree.root(), out);
    }

    fn collect_editables(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.tree.element_children(id) {
            if is_excluded(self.tree, child) {
                continue;
            }
            // Element in laufender Bearbeitung samt Teilbaum überspringen
            if self.tree.marks(child).editing {
                continue;
            }
            if is_editable_candidate(self.tree, child, self.options) {
                out.push(child);
                continue;
            }
            self.collect_editables(child, out);
        }
    }
}

/// Klassifiziert alle Elemente des Baums.
pub fn classify(
    tree: &DocumentTree,
    layout: &LayoutSnapshot,
    options: &EditorOptions,
) -> Classification {
    let segmenter = Segmenter {
        tree,
        layout,
        options,
    };
    let elements = segmenter.visible_elements();
    let mut classification = Classification::new();

    for id in segmenter.containers(&elements) {
        let mut roles = classification.roles(id);
        roles.container = true;
        classification.set(id, roles);
    }

    let (blocks, tier) = segmenter.blocks(&elements);
    classification.block_tier = tier;
    for id in blocks {
        let mut roles = classification.roles(id);
        roles.block = true;
        classification.set(id, roles);
    }

    let mut editables = Vec::new();
    segmenter.editables(&mut editables);
    for id in editables {
        let mut roles = classification.roles(id);
        roles.editable = true;
        classification.set(id, roles);
    }

    classification
}

/// Schreibt die Rollen in die Node-Markierungen.
pub fn apply_marks(tree: &mut DocumentTree, classification: &Classification) {
    for id in tree.element_descendants(tree.root()) {
        let roles = classification.roles(id);
        if let Some(marks) = tree.marks_mut(id) {
            marks.roles = roles;
        }
    }
}

/// Löst einen einzelnen Wrapper unter der Wurzel auf.
///
/// Gibt `true` zurück, wenn der Baum verändert wurde.
pub fn collapse_wrapper(tree: &mut DocumentTree) -> bool {
    let root = tree.root();
    let visible: Vec<NodeId> = tree
        .element_children(root)
        .into_iter()
        .filter(|&id| tree.tag(id).is_some_and(|tag| !is_hidden(tag)))
        .collect();
    let [wrapper] = visible.as_slice() else {
        return false;
    };
    let wrapper = *wrapper;
    let is_wrapper_tag = tree.tag(wrapper).is_some_and(|tag| WRAPPER_TAGS.contains(&tag));
    let is_wrapper_class = wrapper_class()
        .is_some_and(|re| tree.attr(wrapper, "class").is_some_and(|c| re.is_match(c)));
    if !is_wrapper_tag || !is_wrapper_class || tree.element_children(wrapper).is_empty() {
        return false;
    }

    let collapsed = tree.unwrap_node(wrapper);
    if collapsed {
        log::info!("Wrapper-Element {} aufgelöst", wrapper);
    }
    collapsed
}

/// Layout, Klassifikation, Markierungen und Registry neu ableiten.
pub fn refresh_structure(state: &mut EditorState) {
    relayout(state);
    let classification = classify(&state.document, &state.layout, &state.options);
    apply_marks(&mut state.document, &classification);
    state.classification = classification;
    state.registry = init_registry(
        &state.document,
        &state.layout,
        &state.classification,
        &state.options,
        state.granularity,
    );
    log::debug!(
        "Struktur neu abgeleitet: {} klassifiziert, {} ziehbar ({:?})",
        state.classification.len(),
        state.registry.draggable_count(),
        state.registry.effective_granularity()
    );
}

/// Nur die Registry für eine neue Granularität ableiten (ohne Re-Parse).
pub fn rederive_registry(state: &mut EditorState) {
    state.registry = init_registry(
        &state.document,
        &state.layout,
        &state.classification,
        &state.options,
        state.granularity,
    );
}
