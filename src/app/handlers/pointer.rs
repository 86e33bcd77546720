//! Handler für Pointer-Gesten (Armieren, Drag, Drop, Klick).

use glam::Vec2;

use crate::app::use_cases;
use crate::app::EditorState;
use crate::core::NodeId;

pub fn arm(state: &mut EditorState, pos: Vec2) {
    use_cases::drag::arm_pointer(state, pos);
}

pub fn disarm(state: &mut EditorState) {
    use_cases::drag::disarm(state);
}

/// Öffnet die Drag-Session; scheitert ein Gate, bleibt der Editor idle.
pub fn start_drag(state: &mut EditorState, target: NodeId, press: Vec2) {
    use_cases::drag::start_drag(state, target, press);
}

pub fn update_drag(state: &mut EditorState, pos: Vec2) {
    use_cases::drag::update_drag(state, pos);
}

pub fn drop_drag(state: &mut EditorState, pos: Vec2) {
    use_cases::drag::drop_drag(state, pos);
}

pub fn cancel_drag(state: &mut EditorState) {
    use_cases::drag::cancel_drag(state);
}

/// Release vor der Drag-Schwelle.
pub fn click(state: &mut EditorState, pos: Vec2) {
    use_cases::text_edit::click(state, pos);
}
