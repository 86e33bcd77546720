//! Use-Case: Markup laden.

use crate::app::state::{InteractionPhase, TextEditSession};
use crate::app::use_cases::segmentation::{collapse_wrapper, refresh_structure};
use crate::app::EditorState;
use crate::markup::{parse_markup, sanitize_markup, write_markup, FALLBACK_MARKUP};
use crate::shared::FeedbackScene;

/// Ersetzt das Dokument durch neues Markup.
///
/// Laufende Sessions und aufgeschobene Arbeit werden verworfen. Das Laden
/// erzeugt keine Ausgaben; erst Commits melden Änderungen.
pub fn load_markup(state: &mut EditorState, markup: &str) {
    state.interaction = InteractionPhase::Idle;
    state.text_edit = TextEditSession::Inactive;
    state.tasks.clear();
    state.feedback = FeedbackScene::default();
    state.measured_layout.clear();

    let sanitized = sanitize_markup(markup);
    let mut source = sanitized.markup;
    let mut document = parse_markup(&source);
    if document.element_children(document.root()).is_empty() {
        log::warn!("Markup enthält keine Elemente, verwende Platzhalter");
        source = FALLBACK_MARKUP.to_string();
        document = parse_markup(&source);
    }
    if state.options.collapse_wrappers {
        collapse_wrapper(&mut document);
    }

    state.document = document;
    state.source_markup = source;
    refresh_structure(state);
    state.last_markup = write_markup(&state.document);

    log::info!(
        "Markup geladen: {} Elemente, {} Container, {} ziehbar, {} editierbar",
        state.element_count(),
        state.classification.containers().len(),
        state.registry.draggable_count(),
        state.classification.editables().len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Granularity;

    #[test]
    fn whitespace_input_loads_fallback_placeholder() {
        let mut state = EditorState::new();
        load_markup(&mut state, "   ");
        assert_eq!(state.source_markup, FALLBACK_MARKUP);
        assert_eq!(state.last_markup, FALLBACK_MARKUP);
    }

    #[test]
    fn load_without_interaction_round_trips() {
        let mut state = EditorState::new();
        let input = r#"<section class="row"><div class="card" id="a">A text</div><div class="card">B text</div></section>"#;
        load_markup(&mut state, input);
        assert_eq!(state.last_markup, input);
        assert!(state.outbox.is_empty());
    }

    #[test]
    fn wrapper_collapse_respects_option() {
        let input = r#"<div class="app-container"><section>One text</section><section>Two text</section></div>"#;

        let mut state = EditorState::new();
        load_markup(&mut state, input);
        assert_eq!(state.document.element_children(state.document.root()).len(), 2);

        let mut keep = EditorState::new();
        keep.options.collapse_wrappers = false;
        load_markup(&mut keep, input);
        assert_eq!(keep.last_markup, input);
    }

    #[test]
    fn single_section_downgrades_to_simple() {
        let mut state = EditorState::new();
        load_markup(&mut state, "<p>Only one paragraph</p>");
        assert_eq!(state.registry.effective_granularity(), Granularity::Simple);
        assert!(state.registry.is_enabled());
    }
}
