//! Freiform-Engine: absolute Platzierung, Begrenzung und Kollisionsauflösung.

use glam::Vec2;

use crate::app::feedback;
use crate::app::state::FreeformSession;
use crate::app::use_cases::layout::relayout;
use crate::app::use_cases::snapping::{apply_snap, collect_snap_points};
use crate::app::EditorState;
use crate::core::{clamp_into, format_px, DocumentTree, NodeId, Rect, SnapIndex};
use crate::shared::SnapIndicator;

/// Attribut vom Nutzer platzierter Elemente.
pub const PLACED_ATTR: &str = "data-placed";
pub const PLACED_USER: &str = "user";

pub fn is_user_placed(tree: &DocumentTree, id: NodeId) -> bool {
    tree.attr(id, PLACED_ATTR) == Some(PLACED_USER)
}

/// Schreibt Position und Größe (Container-Koordinaten) als Inline-Style.
pub fn write_position(tree: &mut DocumentTree, node: NodeId, local_min: Vec2, size: Vec2) {
    let mut style = tree.style(node);
    style.set("position", "absolute");
    style.set("left", format_px(local_min.x));
    style.set("top", format_px(local_min.y));
    style.set("width", format_px(size.x));
    style.set("height", format_px(size.y));
    tree.set_style(node, &style);
    tree.set_attr(node, PLACED_ATTR, PLACED_USER);
}

/// Sorgt dafür, dass der Container Bezugsrahmen ist und nicht kollabiert.
fn prepare_container(tree: &mut DocumentTree, container: NodeId, min_height: f32) {
    if container == tree.root() {
        return;
    }
    let mut style = tree.style(container);
    let position = style.position();
    if position.is_empty() || position == "static" {
        style.set("position", "relative");
    }
    if style.px("height").is_none() {
        let current = style.px("min-height").unwrap_or(0.0);
        if min_height > current {
            style.set("min-height", format_px(min_height));
        }
    }
    tree.set_style(container, &style);
}

/// Konvertiert den Node in absolute Platzierung und baut die Snap-Punkte.
pub fn begin(state: &mut EditorState, target: NodeId, origin: Rect) -> Option<FreeformSession> {
    let container = state.document.parent(target)?;
    let container_rect = state.layout.rect(container)?;

    let previous_style = state.document.attr(target, "style").map(String::from);
    let previous_placed = state.document.attr(target, PLACED_ATTR).map(String::from);
    let container_style_before = state.document.attr(container, "style").map(String::from);

    let local = origin.min - container_rect.min;
    write_position(&mut state.document, target, local, origin.size());
    prepare_container(&mut state.document, container, container_rect.height());
    relayout(state);

    let container_rect = state.layout.rect(container).unwrap_or(container_rect);
    let points = collect_snap_points(
        &state.document,
        &state.layout,
        container,
        container_rect,
        target,
        &state.options,
    );
    log::debug!(
        "Freiform-Session: {} Snap-Punkte in Container {}",
        points.len(),
        container
    );

    Some(FreeformSession {
        container,
        container_rect,
        element_size: origin.size(),
        snap_index: SnapIndex::from_points(points),
        current: origin.min - container_rect.min,
        last_snap: None,
        previous_style,
        previous_placed,
        container_style_before,
    })
}

/// Neue Zielposition aus Pointer, Snap und Begrenzung.
pub fn update(
    state: &mut EditorState,
    freeform: &mut FreeformSession,
    pointer_offset: Vec2,
    pos: Vec2,
) {
    let candidate = pos - pointer_offset - freeform.container_rect.min;
    let (snapped, found) = apply_snap(&freeform.snap_index, candidate, &state.options);
    freeform.current = clamp_into(
        snapped,
        freeform.element_size,
        freeform.container_rect.size(),
        state.options.boundary_padding,
    );
    freeform.last_snap = found;

    let indicator = found.map(|m| SnapIndicator {
        point: m.point,
        absolute: freeform.container_rect.min + m.point.pos,
    });
    feedback::set_snap_indicator(&mut state.feedback, indicator);
}

/// Aktuelle Ghost-Box in Dokument-Koordinaten.
pub fn ghost_rect(freeform: &FreeformSession) -> Rect {
    Rect::from_min_size(
        freeform.container_rect.min + freeform.current,
        freeform.element_size,
    )
}

/// Übernimmt die Position und löst Überlappungen auf.
pub fn finish(state: &mut EditorState, target: NodeId, freeform: &FreeformSession) {
    write_position(
        &mut state.document,
        target,
        freeform.current,
        freeform.element_size,
    );
    relayout(state);
    resolve_collisions(state, target, freeform.container);
}

/// Stellt den Zustand vor dem Drag-Start wieder her.
pub fn restore(state: &mut EditorState, target: NodeId, freeform: &FreeformSession) {
    let tree = &mut state.document;
    if tree.is_attached(target) {
        restore_attr(tree, target, "style", freeform.previous_style.as_deref());
        restore_attr(tree, target, PLACED_ATTR, freeform.previous_placed.as_deref());
    }
    if tree.is_attached(freeform.container) {
        restore_attr(
            tree,
            freeform.container,
            "style",
            freeform.container_style_before.as_deref(),
        );
    }
    relayout(state);
}

fn restore_attr(tree: &mut DocumentTree, node: NodeId, name: &str, value: Option<&str>) {
    match value {
        Some(value) => {
            tree.set_attr(node, name, value);
        }
        None => {
            tree.remove_attr(node, name);
        }
    }
}

/// Schiebt überlappende, vom Nutzer platzierte Geschwister vom Node weg.
pub fn resolve_collisions(state: &mut EditorState, dropped: NodeId, container: NodeId) {
    let Some(container_rect) = state.layout.rect(container) else {
        return;
    };
    let Some(dropped_rect) = state.layout.rect(dropped) else {
        return;
    };
    let min_distance = state.options.collision_min_distance;
    let padding = state.options.boundary_padding;

    let siblings: Vec<NodeId> = state
        .document
        .element_children(container)
        .into_iter()
        .filter(|&id| id != dropped && is_user_placed(&state.document, id))
        .collect();

    let mut moved = 0;
    for sibling in siblings {
        let rect = state.layout.rect_or_zero(sibling);
        if rect.is_empty() || !rect.intersects(&dropped_rect) {
            continue;
        }
        let target_min = separate(dropped_rect, rect, container_rect, min_distance, padding);
        let local = target_min - container_rect.min;
        write_position(&mut state.document, sibling, local, rect.size());
        let new_rect = Rect::from_min_size(target_min, rect.size());
        state.layout.set_rect(sibling, new_rect);
        feedback::push_transition(
            &mut state.feedback,
            sibling,
            rect,
            new_rect,
            state.clock_ms,
            0,
            state.options.transition_duration_ms,
        );
        moved += 1;
    }

    if moved > 0 {
        log::debug!("{} überlappende Elemente verschoben", moved);
        relayout(state);
    }
}

/// Zielposition (Dokument-Koordinaten, obere linke Ecke) für `other`, sodass
/// es `fixed` nicht mehr überlappt.
///
/// Zuerst entlang der Verbindungslinie der Mittelpunkte; bleibt nach der
/// Begrenzung eine Überlappung (oder fallen die Mittelpunkte zusammen),
/// gewinnt die kleinste achsparallele Verschiebung ohne Überlappung.
pub fn separate(fixed: Rect, other: Rect, container: Rect, min_distance: f32, padding: f32) -> Vec2 {
    let size = other.size();
    let clamp = |min: Vec2| {
        container.min + clamp_into(min - container.min, size, container.size(), padding)
    };
    let overlaps = |min: Vec2| Rect::from_min_size(min, size).intersects(&fixed);

    let delta = other.center() - fixed.center();
    if delta.length_squared() > f32::EPSILON {
        let direction = delta.normalize();
        let half = (fixed.size() + size) / 2.0 + Vec2::splat(min_distance);
        let needed = |axis: usize| {
            let component = direction[axis].abs();
            if component <= f32::EPSILON {
                f32::INFINITY
            } else {
                ((half[axis] - delta[axis].abs()) / component).max(0.0)
            }
        };
        let distance = needed(0).min(needed(1));
        if distance.is_finite() {
            let candidate = clamp(other.min + direction * distance);
            if !overlaps(candidate) {
                return candidate;
            }
        }
    }

    let candidates = [
        Vec2::new(fixed.max.x + min_distance, other.min.y),
        Vec2::new(other.min.x, fixed.max.y + min_distance),
        Vec2::new(fixed.min.x - min_distance - size.x, other.min.y),
        Vec2::new(other.min.x, fixed.min.y - min_distance - size.y),
    ];
    let best = candidates
        .iter()
        .map(|&c| clamp(c))
        .filter(|&c| !overlaps(c))
        .min_by(|a, b| {
            a.distance_squared(other.min)
                .total_cmp(&b.distance_squared(other.min))
        });
    match best {
        Some(position) => position,
        None => {
            log::warn!("Überlappung nicht auflösbar, Container zu klein");
            clamp(candidates[0])
        }
    }
}
