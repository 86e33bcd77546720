//! Handler für die Inline-Textbearbeitung.

use crate::app::state::EditEndReason;
use crate::app::use_cases;
use crate::app::EditorState;
use crate::core::NodeId;
use crate::input::{CaretMotion, FormatCommand};

pub fn activate(state: &mut EditorState, node: NodeId) {
    use_cases::text_edit::activate(state, node);
}

/// Beendet die Bearbeitung; der Commit läuft als aufgeschobene Aufgabe.
pub fn end(state: &mut EditorState, reason: EditEndReason) {
    use_cases::text_edit::end_edit(state, reason);
}

pub fn insert_text(state: &mut EditorState, text: &str) {
    use_cases::text_edit::insert_text(state, text);
}

pub fn insert_line_break(state: &mut EditorState) {
    use_cases::text_edit::insert_line_break(state);
}

pub fn delete_backward(state: &mut EditorState) {
    use_cases::text_edit::delete_backward(state);
}

pub fn delete_forward(state: &mut EditorState) {
    use_cases::text_edit::delete_forward(state);
}

pub fn move_caret(state: &mut EditorState, motion: CaretMotion, extend: bool) {
    use_cases::text_edit::move_caret(state, motion, extend);
}

pub fn set_selection(state: &mut EditorState, anchor: usize, caret: usize) {
    use_cases::text_edit::set_selection(state, anchor, caret);
}

pub fn select_all(state: &mut EditorState) {
    use_cases::text_edit::select_all(state);
}

pub fn apply_format(state: &mut EditorState, format: FormatCommand) {
    use_cases::text_edit::apply_format(state, format);
}
