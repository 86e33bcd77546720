//! Pointer-Zustandsautomat: Armed → Dragging → Settling → Idle.
//!
//! Die Geometrie liefern Reorder- und Freiform-Engine, das Feedback der
//! Ghost-Renderer. Vor jeder Mutation wird geprüft, ob der gezogene Node
//! noch im Baum hängt.

use glam::Vec2;

use crate::app::feedback;
use crate::app::semantics::{semantics_for, MoveContext};
use crate::app::state::{
    DragSession, EditEndReason, EngineSession, InteractionPhase, ReorderSession,
};
use crate::app::task_queue::DeferredTask;
use crate::app::use_cases::layout::relayout;
use crate::app::use_cases::{arrange, freeform, reorder, serialization, text_edit};
use crate::app::EditorState;
use crate::core::{NodeId, PlacementMode, Rect};

/// Ziehbarer Node unter dem Pointer (tiefster zuerst).
///
/// Ein Press innerhalb der laufenden Textbearbeitung gehört der
/// Textauswahl und armiert keinen Drag.
pub fn pick_drag_target(state: &EditorState, pos: Vec2) -> Option<NodeId> {
    let ctx = MoveContext::from_state(state);
    let semantics = semantics_for(state.placement_mode);
    for hit in state.layout.hits_at(pos) {
        if let Some(edit) = ctx.edit_node {
            if hit == edit || state.document.is_ancestor_of(edit, hit) {
                return None;
            }
        }
        if semantics.can_drag(&ctx, hit) {
            return Some(hit);
        }
    }
    None
}

/// Primär-Button gedrückt.
pub fn arm_pointer(state: &mut EditorState, pos: Vec2) {
    if !state.interaction.is_idle() {
        log::debug!("Pointer-Down in Phase {} ignoriert", state.interaction.label());
        return;
    }
    let target = pick_drag_target(state, pos);
    log::debug!("Pointer armiert bei {:?}, Ziel {:?}", pos, target);
    state.interaction = InteractionPhase::Armed { target, press: pos };
}

/// Armed-Zustand ohne Klick verlassen.
pub fn disarm(state: &mut EditorState) {
    if matches!(state.interaction, InteractionPhase::Armed { .. }) {
        state.interaction = InteractionPhase::Idle;
    }
}

/// Öffnet die Drag-Session. Gibt `false` zurück, wenn ein Gate greift.
pub fn start_drag(state: &mut EditorState, target: NodeId, press: Vec2) -> bool {
    match state.interaction {
        InteractionPhase::Armed {
            target: Some(armed), ..
        } if armed == target => {}
        _ => {
            log::warn!("Drag-Start für {} ohne passende Armierung", target);
            return false;
        }
    }
    state.interaction = InteractionPhase::Idle;

    if !state.document.is_attached(target) {
        log::warn!("Drag-Ziel {} nicht mehr im Dokument", target);
        return false;
    }

    // Textbearbeitung wird vor dem Drag synchron übernommen
    if state.text_edit.is_active() {
        if text_edit::finish_edit(state, EditEndReason::DragStart) {
            serialization::commit_text(state);
        }
        let ctx = MoveContext::from_state(state);
        if !semantics_for(state.placement_mode).can_drag(&ctx, target) {
            log::debug!("{} nach Text-Commit nicht mehr ziehbar", target);
            return false;
        }
    }

    let Some(origin) = state.layout.rect(target) else {
        log::warn!("Drag-Ziel {} ohne Layout", target);
        return false;
    };

    let mode = state.placement_mode;
    let engine = match mode {
        PlacementMode::Reorder => {
            let Some(marker) = reorder::create_marker(&mut state.document, target) else {
                log::warn!("Einfügemarker für {} nicht anlegbar", target);
                return false;
            };
            relayout(state);
            EngineSession::Reorder(ReorderSession {
                marker,
                insertion: None,
            })
        }
        PlacementMode::Freeform => {
            let Some(session) = freeform::begin(state, target, origin) else {
                log::warn!("Freiform-Session für {} nicht startbar", target);
                return false;
            };
            EngineSession::Freeform(session)
        }
    };

    feedback::show_drag_ghost(&mut state.feedback, &state.document, target, origin, &state.options);
    state.interaction = InteractionPhase::Dragging(Box::new(DragSession {
        target,
        pointer_offset: press - origin.min,
        origin,
        mode,
        pointer: press,
        engine,
    }));
    log::info!("Drag gestartet: {} ({:?})", target, mode);
    true
}

/// Nimmt die laufende Session aus dem Zustand.
fn take_session(state: &mut EditorState) -> Option<Box<DragSession>> {
    if !state.interaction.is_dragging() {
        return None;
    }
    match std::mem::take(&mut state.interaction) {
        InteractionPhase::Dragging(session) => Some(session),
        _ => None,
    }
}

/// Räumt eine Session auf, deren Node oder Marker verschwunden ist.
fn abort_stale(state: &mut EditorState, session: Box<DragSession>) {
    log::warn!("Drag-Ziel {} während der Session entfernt, Abbruch", session.target);
    match session.engine {
        EngineSession::Reorder(reorder_session) => {
            reorder::discard_marker(&mut state.document, reorder_session.marker);
        }
        EngineSession::Freeform(freeform_session) => {
            freeform::restore(state, session.target, &freeform_session);
        }
    }
    feedback::clear_drag(&mut state.feedback);
    state.interaction = InteractionPhase::Idle;
    relayout(state);
}

/// Pointer-Bewegung während einer Session.
pub fn update_drag(state: &mut EditorState, pos: Vec2) {
    let Some(mut session) = take_session(state) else {
        return;
    };
    let marker_lost = match &session.engine {
        EngineSession::Reorder(reorder_session) => {
            !state.document.is_attached(reorder_session.marker)
        }
        EngineSession::Freeform(_) => false,
    };
    if marker_lost || !state.document.is_attached(session.target) {
        abort_stale(state, session);
        return;
    }
    session.pointer = pos;
    let target = session.target;
    let offset = session.pointer_offset;
    let origin_size = session.origin.size();

    match &mut session.engine {
        EngineSession::Reorder(reorder_session) => {
            feedback::move_ghost(&mut state.feedback, Rect::from_min_size(pos - offset, origin_size));
            let insertion = {
                let ctx = MoveContext::from_state(state);
                reorder::resolve_insertion(&ctx, pos, target)
            };
            match insertion {
                Some(insertion) => {
                    if reorder_session.insertion != Some(insertion)
                        && reorder::place_marker(&mut state.document, reorder_session.marker, &insertion)
                    {
                        reorder_session.insertion = Some(insertion);
                        relayout(state);
                    }
                    let container_rect = state.layout.rect_or_zero(insertion.container);
                    let y = reorder::marker_line_y(&state.layout, &insertion);
                    feedback::set_insertion_marker(&mut state.feedback, insertion.container, container_rect, y);
                }
                None => feedback::clear_insertion_marker(&mut state.feedback),
            }
        }
        EngineSession::Freeform(freeform_session) => {
            freeform::update(state, freeform_session, offset, pos);
            feedback::move_ghost(&mut state.feedback, freeform::ghost_rect(freeform_session));
        }
    }

    state.interaction = InteractionPhase::Dragging(session);
}

/// Release während einer Session: Position übernehmen, Commit einreihen.
pub fn drop_drag(state: &mut EditorState, pos: Vec2) {
    update_drag(state, pos);
    let Some(session) = take_session(state) else {
        return;
    };
    let target = session.target;
    let ghost = state
        .feedback
        .ghost
        .as_ref()
        .map_or(session.origin, |ghost| ghost.rect);

    match &session.engine {
        EngineSession::Reorder(reorder_session) => {
            let changed = reorder::finish_move(&mut state.document, target, reorder_session.marker);
            relayout(state);
            if changed {
                state.tasks.push(DeferredTask::CommitStructure);
            } else {
                log::debug!("Drop ohne Strukturänderung");
            }
        }
        EngineSession::Freeform(freeform_session) => {
            freeform::finish(state, target, freeform_session);
            if state.options.auto_arrange_after_drop {
                arrange::auto_arrange(state);
            }
            state.tasks.push(DeferredTask::CommitStructure);
        }
    }

    let landed = state.layout.rect_or_zero(target);
    feedback::clear_drag(&mut state.feedback);
    feedback::push_transition(
        &mut state.feedback,
        target,
        ghost,
        landed,
        state.clock_ms,
        0,
        state.options.transition_duration_ms,
    );
    feedback::spawn_drop_cues(&mut state.feedback, landed.center(), state.clock_ms, &state.options);

    state.interaction = InteractionPhase::Settling;
    state.tasks.push(DeferredTask::SettleComplete);
    log::info!("Drop: {} bei {:?}", target, pos);
}

/// Escape während einer Session: Ausgangszustand wiederherstellen.
pub fn cancel_drag(state: &mut EditorState) {
    let Some(session) = take_session(state) else {
        return;
    };
    match &session.engine {
        EngineSession::Reorder(reorder_session) => {
            reorder::discard_marker(&mut state.document, reorder_session.marker);
            relayout(state);
        }
        EngineSession::Freeform(freeform_session) => {
            freeform::restore(state, session.target, freeform_session);
        }
    }
    feedback::clear_drag(&mut state.feedback);
    state.interaction = InteractionPhase::Idle;
    log::info!("Drag von {} abgebrochen", session.target);
}

/// Settling-Phase nach abgearbeitetem Commit beenden.
pub fn settle_complete(state: &mut EditorState) {
    if matches!(state.interaction, InteractionPhase::Settling) {
        state.interaction = InteractionPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::document::load_markup;
    use crate::markup::write_markup;

    const LIST: &str = concat!(
        "<main>",
        "<div class=\"card\" id=\"a\">Alpha card text</div>",
        "<div class=\"card\" id=\"b\">Bravo card text</div>",
        "<div class=\"card\" id=\"c\">Charlie card text</div>",
        "</main>"
    );

    fn cards(state: &EditorState) -> Vec<NodeId> {
        let section = state.document.element_children(state.document.root())[0];
        state.document.element_children(section)
    }

    fn start(state: &mut EditorState, target: NodeId) -> Vec2 {
        let press = state.layout.rect_or_zero(target).center();
        arm_pointer(state, press);
        assert!(start_drag(state, target, press), "Drag sollte starten");
        press
    }

    #[test]
    fn arm_picks_deepest_draggable() {
        let mut state = EditorState::new();
        load_markup(&mut state, LIST);
        let b = cards(&state)[1];
        let center = state.layout.rect_or_zero(b).center();

        arm_pointer(&mut state, center);

        match state.interaction {
            InteractionPhase::Armed { target, .. } => assert_eq!(target, Some(b)),
            ref other => panic!("Unerwartete Phase: {other:?}"),
        }
    }

    #[test]
    fn start_without_matching_arm_is_rejected() {
        let mut state = EditorState::new();
        load_markup(&mut state, LIST);
        let a = cards(&state)[0];
        assert!(!start_drag(&mut state, a, Vec2::ZERO));
        assert!(state.interaction.is_idle());
    }

    #[test]
    fn reorder_drop_moves_first_card_last() {
        let mut state = EditorState::new();
        load_markup(&mut state, LIST);
        let &[a, _, c] = cards(&state).as_slice() else {
            panic!("drei Karten erwartet");
        };
        start(&mut state, a);
        let below_c = Vec2::new(
            state.layout.rect_or_zero(c).center().x,
            state.layout.rect_or_zero(c).max.y - 1.0,
        );

        drop_drag(&mut state, below_c);

        let order: Vec<String> = cards(&state)
            .into_iter()
            .filter_map(|id| state.document.attr(id, "id").map(String::from))
            .collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert!(matches!(state.interaction, InteractionPhase::Settling));
        assert!(state.tasks.iter().any(|t| *t == DeferredTask::CommitStructure));
        assert!(state.feedback.ghost.is_none());
        assert!(!state.feedback.ripples.is_empty());
    }

    #[test]
    fn cancel_restores_tree() {
        let mut state = EditorState::new();
        load_markup(&mut state, LIST);
        let before = write_markup(&state.document);
        let &[a, _, c] = cards(&state).as_slice() else {
            panic!("drei Karten erwartet");
        };
        start(&mut state, a);
        let near_c = state.layout.rect_or_zero(c).max - Vec2::ONE;
        update_drag(&mut state, near_c);

        cancel_drag(&mut state);

        assert_eq!(write_markup(&state.document), before);
        assert!(state.interaction.is_idle());
        assert!(state.tasks.is_empty());
        assert!(!state.feedback.has_drag_feedback());
    }

    #[test]
    fn removed_target_aborts_session() {
        let mut state = EditorState::new();
        load_markup(&mut state, LIST);
        let a = cards(&state)[0];
        start(&mut state, a);

        state.document.remove(a);
        update_drag(&mut state, Vec2::new(50.0, 50.0));

        assert!(state.interaction.is_idle());
        assert!(!state.feedback.has_drag_feedback());
        assert!(!write_markup(&state.document).contains("drop-marker"));
    }

    #[test]
    fn freeform_drop_writes_absolute_position() {
        let mut state = EditorState::new();
        state.placement_mode = PlacementMode::Freeform;
        state.options.grid_snap_enabled = false;
        state.options.element_snap_enabled = false;
        load_markup(&mut state, LIST);
        let a = cards(&state)[0];
        let press = start(&mut state, a);

        drop_drag(&mut state, press + Vec2::new(40.0, 30.0));

        let style = state.document.style(a);
        assert_eq!(style.get("position"), Some("absolute"));
        assert_eq!(state.document.attr(a, "data-placed"), Some("user"));
        assert!(state.tasks.iter().any(|t| *t == DeferredTask::CommitStructure));
    }
}
