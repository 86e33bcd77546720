//! Handler für Laden und Layout-Messungen.

use std::collections::BTreeMap;

use crate::app::state::EditEndReason;
use crate::app::use_cases;
use crate::app::EditorState;
use crate::core::{NodeId, Rect};

/// Lädt neues Markup. Eine laufende Textbearbeitung wird vorher beendet.
pub fn load(state: &mut EditorState, markup: &str) {
    if state.text_edit.is_active() {
        use_cases::text_edit::finish_edit(state, EditEndReason::Reload);
    }
    use_cases::document::load_markup(state, markup);
}

/// Übernimmt vom Host gemessene Boxen.
pub fn apply_measured(state: &mut EditorState, rects: BTreeMap<NodeId, Rect>) {
    use_cases::layout::apply_measured(state, rects);
}
