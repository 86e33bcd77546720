//! Handler für Platzierungsmodus, Granularität und Auto-Arrange.

use crate::app::use_cases;
use crate::app::EditorState;
use crate::core::{Granularity, PlacementMode};

pub fn set_placement_mode(state: &mut EditorState, mode: PlacementMode) {
    use_cases::mode::set_placement_mode(state, mode);
}

pub fn toggle_placement_mode(state: &mut EditorState) {
    use_cases::mode::toggle_placement_mode(state);
}

pub fn set_granularity(state: &mut EditorState, granularity: Granularity) {
    use_cases::mode::set_granularity(state, granularity);
}

/// Reiht die Arrange-Schritte ein.
pub fn auto_arrange(state: &mut EditorState) {
    use_cases::arrange::auto_arrange(state);
}
