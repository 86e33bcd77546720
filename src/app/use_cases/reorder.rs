//! Reorder-Engine: Einfügemarker, Einfügepunkt und Verschieben im Baum.

use glam::Vec2;

use crate::app::semantics::{MoveContext, MoveSemantics, ReorderSemantics};
use crate::app::state::{InsertionPoint, InsertionSide};
use crate::core::{DocumentTree, ElementData, LayoutSnapshot, NodeId, Rect};

/// Klasse des Einfügemarkers (wird nie serialisiert).
pub const MARKER_CLASS: &str = "drop-marker";

/// Legt den Einfügemarker direkt hinter dem gezogenen Node an.
pub fn create_marker(tree: &mut DocumentTree, target: NodeId) -> Option<NodeId> {
    let parent = tree.parent(target)?;
    let mut element = ElementData::new("div");
    element.attributes.insert("class".into(), MARKER_CLASS.into());
    element.marks.marker = true;
    let marker = tree.create_element(element);
    if !tree.insert_after(parent, marker, target) {
        tree.remove(marker);
        return None;
    }
    Some(marker)
}

/// Tiefster annehmender Container unter dem Pointer, außerhalb des gezogenen Teilbaums.
pub fn container_at(ctx: &MoveContext<'_>, pos: Vec2, dragged: NodeId) -> Option<NodeId> {
    ctx.layout.hits_at(pos).into_iter().find(|&id| {
        id != dragged
            && !ctx.tree.is_ancestor_of(dragged, id)
            && ReorderSemantics.accepts(ctx, id)
    })
}

/// Bestimmt den Einfügepunkt über die vertikalen Mitten der Container-Kinder.
pub fn resolve_insertion(ctx: &MoveContext<'_>, pos: Vec2, dragged: NodeId) -> Option<InsertionPoint> {
    let container = container_at(ctx, pos, dragged)?;
    let children: Vec<(NodeId, Rect)> = ctx
        .tree
        .element_children(container)
        .into_iter()
        .filter(|&child| child != dragged)
        .map(|child| (child, ctx.layout.rect_or_zero(child)))
        .filter(|(_, rect)| !rect.is_empty())
        .collect();

    if let Some((anchor, _)) = children.iter().find(|(_, rect)| rect.center().y > pos.y) {
        return Some(InsertionPoint {
            container,
            anchor: Some(*anchor),
            side: InsertionSide::Before,
        });
    }
    Some(InsertionPoint {
        container,
        anchor: children.last().map(|(id, _)| *id),
        side: InsertionSide::After,
    })
}

/// Y-Position der Einfügelinie für die Feedback-Anzeige.
pub fn marker_line_y(layout: &LayoutSnapshot, insertion: &InsertionPoint) -> f32 {
    match (insertion.anchor, insertion.side) {
        (Some(anchor), InsertionSide::Before) => layout.rect_or_zero(anchor).min.y,
        (Some(anchor), InsertionSide::After) => layout.rect_or_zero(anchor).max.y,
        (None, _) => layout.rect_or_zero(insertion.container).min.y,
    }
}

/// Bewegt den Marker an den Einfügepunkt.
pub fn place_marker(tree: &mut DocumentTree, marker: NodeId, insertion: &InsertionPoint) -> bool {
    match (insertion.anchor, insertion.side) {
        (Some(anchor), InsertionSide::Before) => {
            tree.insert_before(insertion.container, marker, anchor)
        }
        (Some(anchor), InsertionSide::After) => tree.insert_after(insertion.container, marker, anchor),
        (None, _) => tree.append_child(insertion.container, marker),
    }
}

/// Setzt den gezogenen Node an die Markerposition und entfernt den Marker.
///
/// Gibt `true` zurück, wenn sich Parent oder Position geändert haben.
pub fn finish_move(tree: &mut DocumentTree, dragged: NodeId, marker: NodeId) -> bool {
    let before = (tree.parent(dragged), tree.index_in_parent(dragged));
    let moved = match tree.parent(marker) {
        Some(parent) if tree.is_attached(marker) && tree.is_attached(dragged) => {
            tree.insert_before(parent, dragged, marker)
        }
        _ => false,
    };
    tree.remove(marker);
    let after = (tree.parent(dragged), tree.index_in_parent(dragged));
    moved && before != after
}

/// Entfernt den Marker ohne den Node zu bewegen.
pub fn discard_marker(tree: &mut DocumentTree, marker: NodeId) {
    tree.remove(marker);
}
