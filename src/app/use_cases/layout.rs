//! Use-Case-Funktionen für Layout-Snapshot und Viewport.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::app::EditorState;
use crate::core::{LayoutSnapshot, NodeId, Rect};

/// Leitet den Layout-Snapshot neu aus dem Baum ab.
pub fn relayout(state: &mut EditorState) {
    state.layout = LayoutSnapshot::compute(
        &state.document,
        state.viewport,
        &state.options.layout,
        &state.measured_layout,
    );
}

/// Aktualisiert die Viewport-Größe und das Layout.
pub fn resize(state: &mut EditorState, size: Vec2) {
    if size.x <= 0.0 || size.y <= 0.0 {
        log::debug!("Ungültige Viewport-Größe {:?} ignoriert", size);
        return;
    }
    state.viewport = size;
    relayout(state);
}

/// Übernimmt Host-Messungen. Messungen für nicht mehr vorhandene Nodes
/// werden verworfen.
pub fn apply_measured(state: &mut EditorState, rects: BTreeMap<NodeId, Rect>) {
    let before = rects.len();
    let rects: BTreeMap<NodeId, Rect> = rects
        .into_iter()
        .filter(|(id, _)| state.document.is_attached(*id))
        .collect();
    if rects.len() < before {
        log::debug!("{} Messungen für abgehängte Nodes verworfen", before - rects.len());
    }
    state.measured_layout = rects;
    relayout(state);
}

/// Verwirft Host-Messungen nach einer Strukturänderung.
pub fn invalidate_measurements(state: &mut EditorState) {
    state.measured_layout.clear();
}
