//! Use-Cases für Platzierungsmodus und Reorder-Granularität.

use crate::app::use_cases::segmentation::{rederive_registry, refresh_structure};
use crate::app::EditorState;
use crate::core::{Granularity, PlacementMode};

/// Setzt den Platzierungsmodus und leitet die Struktur neu ab.
pub fn set_placement_mode(state: &mut EditorState, mode: PlacementMode) {
    if state.placement_mode == mode {
        return;
    }
    state.placement_mode = mode;
    refresh_structure(state);
    log::info!("Platzierungsmodus: {:?}", mode);
}

pub fn toggle_placement_mode(state: &mut EditorState) {
    set_placement_mode(state, state.placement_mode.toggled());
}

/// Setzt die gewünschte Granularität. Fehlen echte Container, bleibt die
/// effektive Granularität `Simple`.
pub fn set_granularity(state: &mut EditorState, granularity: Granularity) {
    state.granularity = granularity;
    rederive_registry(state);
    if state.registry.was_downgraded() {
        log::warn!(
            "Granularität {:?} angefordert, effektiv {:?}",
            granularity,
            state.registry.effective_granularity()
        );
    } else {
        log::info!("Granularität: {:?}", granularity);
    }
}
