//! Editor-Uhr für Animationen.

use crate::app::feedback;
use crate::app::EditorState;

/// Schreitet die Uhr fort und verwirft abgelaufene Animationen.
pub fn advance(state: &mut EditorState, elapsed_ms: u32) {
    state.clock_ms = state.clock_ms.saturating_add(elapsed_ms as u64);
    feedback::prune(&mut state.feedback, state.clock_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn expired_ripples_are_pruned() {
        let mut state = EditorState::new();
        feedback::spawn_drop_cues(&mut state.feedback, Vec2::ZERO, 0, &state.options);
        assert!(state.feedback.is_animating());

        let elapsed = state.options.ripple_duration_ms + 1;
        advance(&mut state, elapsed);

        assert_eq!(state.clock_ms, elapsed as u64);
        assert!(state.feedback.ripples.is_empty());
        assert!(state.feedback.particles.is_empty());
    }
}
