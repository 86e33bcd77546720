//! Registry der Drop-Container und ziehbaren Elemente.
//!
//! Wird nach jeder Segmentierung neu abgeleitet und ist die einzige
//! Nachschlagetabelle, über die Pointer-Events Ziehbarkeit und Drop-Ziele
//! prüfen. Ein Granularitätswechsel baut nur die Registry neu auf, das
//! Dokument wird dabei nicht erneut gelesen.

use std::collections::BTreeSet;

use anyhow::{bail, Result};

use crate::core::{Classification, DocumentTree, Granularity, LayoutSnapshot, NodeId};
use crate::shared::EditorOptions;

/// Ziehbare Elemente und Drop-Container für die effektive Granularität.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragRegistry {
    effective: Granularity,
    containers: BTreeSet<NodeId>,
    draggables: BTreeSet<NodeId>,
    enabled: bool,
    /// Angeforderte Granularität konnte nicht gehalten werden
    downgraded: bool,
}

impl DragRegistry {
    /// Registry ohne Drag-Unterstützung.
    pub fn disabled() -> Self {
        Self {
            effective: Granularity::Simple,
            containers: BTreeSet::new(),
            draggables: BTreeSet::new(),
            enabled: false,
            downgraded: false,
        }
    }

    pub fn effective_granularity(&self) -> Granularity {
        self.effective
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn was_downgraded(&self) -> bool {
        self.downgraded
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        self.containers.contains(&id)
    }

    pub fn is_draggable(&self, id: NodeId) -> bool {
        self.draggables.contains(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.containers.iter().copied()
    }

    pub fn draggables(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.draggables.iter().copied()
    }

    pub fn draggable_count(&self) -> usize {
        self.draggables.len()
    }
}

/// Prüft, ob ein Container außer der Wurzel mindestens zwei Element-Kinder hat.
fn has_multi_node_container(tree: &DocumentTree, classification: &Classification) -> bool {
    classification
        .containers()
        .into_iter()
        .filter(|&id| id != tree.root())
        .any(|id| tree.element_children(id).len() >= 2)
}

/// Baut die Registry für eine Granularität.
///
/// Fehlschlag bedeutet: nichts Ziehbares gefunden.
pub fn build_registry(
    tree: &DocumentTree,
    layout: &LayoutSnapshot,
    classification: &Classification,
    options: &EditorOptions,
    requested: Granularity,
) -> Result<DragRegistry> {
    let mut effective = requested;
    let mut downgraded = false;
    if requested == Granularity::Normal && !has_multi_node_container(tree, classification) {
        log::info!("Kein Container mit mehreren Kindern gefunden, wechsle auf Simple-Granularität");
        effective = Granularity::Simple;
        downgraded = true;
    }

    let root = tree.root();
    let (containers, draggables): (BTreeSet<NodeId>, BTreeSet<NodeId>) = match effective {
        Granularity::Simple => {
            let draggables = tree
                .element_children(root)
                .into_iter()
                .filter(|&id| layout.rect_or_zero(id).meets(options.min_draggable_size))
                .collect();
            (BTreeSet::from([root]), draggables)
        }
        Granularity::Normal => {
            let mut containers: BTreeSet<NodeId> =
                classification.containers().into_iter().collect();
            containers.insert(root);
            let draggables = classification
                .blocks()
                .into_iter()
                .filter(|&id| id != root)
                .collect();
            (containers, draggables)
        }
    };

    if draggables.is_empty() {
        bail!(
            "keine ziehbaren Elemente für Granularität {:?} ({} Elemente im Dokument)",
            effective,
            tree.element_descendants(root).len()
        );
    }

    Ok(DragRegistry {
        effective,
        containers,
        draggables,
        enabled: true,
        downgraded,
    })
}

/// Initialisiert die Registry fail-soft: ein erneuter Versuch im
/// Simple-Modus, danach bleibt Drag deaktiviert.
pub fn init_registry(
    tree: &DocumentTree,
    layout: &LayoutSnapshot,
    classification: &Classification,
    options: &EditorOptions,
    requested: Granularity,
) -> DragRegistry {
    match build_registry(tree, layout, classification, options, requested) {
        Ok(registry) => registry,
        Err(first) if requested == Granularity::Normal => {
            log::warn!(
                "Drag-Initialisierung fehlgeschlagen ({:#}), neuer Versuch im Simple-Modus",
                first
            );
            match build_registry(tree, layout, classification, options, Granularity::Simple) {
                Ok(mut registry) => {
                    registry.downgraded = true;
                    registry
                }
                Err(second) => {
                    log::warn!("Drag deaktiviert: {:#}", second);
                    DragRegistry::disabled()
                }
            }
        }
        Err(e) => {
            log::warn!("Drag deaktiviert: {:#}", e);
            DragRegistry::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NodeRoles, Rect};
    use crate::markup::parse_markup;

    fn layout_for(tree: &DocumentTree) -> LayoutSnapshot {
        let mut layout = LayoutSnapshot::default();
        for id in tree.element_descendants(tree.root()) {
            layout.set_rect(id, Rect::new(0.0, 0.0, 200.0, 60.0));
        }
        layout
    }

    fn container_roles() -> NodeRoles {
        NodeRoles {
            container: true,
            ..NodeRoles::NONE
        }
    }

    fn block_roles() -> NodeRoles {
        NodeRoles {
            block: true,
            ..NodeRoles::NONE
        }
    }

    #[test]
    fn normal_granularity_uses_classified_blocks() {
        let tree = parse_markup("<div class=\"row\"><div class=\"card\">A</div><div class=\"card\">B</div></div>");
        let row = tree.element_children(tree.root())[0];
        let cards = tree.element_children(row);
        let mut classification = Classification::new();
        classification.set(row, container_roles());
        for &card in &cards {
            classification.set(card, block_roles());
        }

        let registry = init_registry(
            &tree,
            &layout_for(&tree),
            &classification,
            &EditorOptions::default(),
            Granularity::Normal,
        );

        assert!(registry.is_enabled());
        assert_eq!(registry.effective_granularity(), Granularity::Normal);
        assert!(registry.is_container(row));
        assert!(registry.is_container(tree.root()));
        assert!(cards.iter().all(|&c| registry.is_draggable(c)));
    }

    #[test]
    fn downgrades_without_multi_node_container() {
        let tree = parse_markup("<section><p>only</p></section><div>other</div>");
        let top = tree.element_children(tree.root());
        let mut classification = Classification::new();
        classification.set(top[0], container_roles());

        let registry = init_registry(
            &tree,
            &layout_for(&tree),
            &classification,
            &EditorOptions::default(),
            Granularity::Normal,
        );

        assert_eq!(registry.effective_granularity(), Granularity::Simple);
        assert!(registry.was_downgraded());
        assert!(registry.is_draggable(top[0]));
        assert!(registry.is_draggable(top[1]));
        assert!(!registry.is_container(top[0]));
    }

    #[test]
    fn empty_document_disables_drag() {
        let tree = parse_markup("");
        let registry = init_registry(
            &tree,
            &LayoutSnapshot::default(),
            &Classification::new(),
            &EditorOptions::default(),
            Granularity::Normal,
        );
        assert!(!registry.is_enabled());
        assert_eq!(registry.draggable_count(), 0);
    }
}
