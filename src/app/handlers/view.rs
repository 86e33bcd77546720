//! Handler für Viewport, Uhr und Debug-Ausgaben.

use glam::Vec2;

use crate::app::use_cases;
use crate::app::EditorState;

/// Aktualisiert die Viewport-Größe.
pub fn set_viewport_size(state: &mut EditorState, size: Vec2) {
    use_cases::layout::resize(state, size);
}

pub fn advance_clock(state: &mut EditorState, elapsed_ms: u32) {
    use_cases::clock::advance(state, elapsed_ms);
}

/// Schreibt den Zustands-Dump ins Log.
pub fn debug_dump(state: &mut EditorState) {
    use_cases::debug_dump::debug_dump(state);
}
