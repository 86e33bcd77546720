//! Editor-Controller für zentrale Event-Verarbeitung.

use super::output::{ContentSink, EditorOutput};
use super::{EditorCommand, EditorIntent, EditorState};
use crate::shared::FeedbackScene;

/// Obergrenze abgearbeiteter Tasks pro Intent.
const MAX_TASKS_PER_PASS: usize = 4096;

/// Orchestriert Host-Events und Use-Cases auf den EditorState.
#[derive(Default)]
pub struct EditorController;

impl EditorController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    ///
    /// Nach allen Commands wird die Task-Queue abgearbeitet; aufgeschobene
    /// Commits laufen damit erst nach dem vollständigen Intent.
    pub fn handle_intent(
        &mut self,
        state: &mut EditorState,
        intent: EditorIntent,
    ) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }
        self.drain_tasks(state);

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &EditorState, intent: EditorIntent) -> Vec<EditorCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem EditorState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut EditorState,
        command: EditorCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Dokument ===
            EditorCommand::LoadMarkup { markup } => handlers::document::load(state, &markup),
            EditorCommand::SetViewportSize { size } => {
                handlers::view::set_viewport_size(state, size)
            }
            EditorCommand::ApplyMeasuredLayout { rects } => {
                handlers::document::apply_measured(state, rects)
            }
            EditorCommand::AdvanceClock { elapsed_ms } => {
                handlers::view::advance_clock(state, elapsed_ms)
            }

            // === Pointer / Drag ===
            EditorCommand::ArmPointer { pos } => handlers::pointer::arm(state, pos),
            EditorCommand::StartDrag { target, press } => {
                handlers::pointer::start_drag(state, target, press)
            }
            EditorCommand::UpdateDrag { pos } => handlers::pointer::update_drag(state, pos),
            EditorCommand::DropDrag { pos } => handlers::pointer::drop_drag(state, pos),
            EditorCommand::CancelDrag => handlers::pointer::cancel_drag(state),
            EditorCommand::ClickAt { pos } => handlers::pointer::click(state, pos),
            EditorCommand::Disarm => handlers::pointer::disarm(state),

            // === Textbearbeitung ===
            EditorCommand::ActivateTextEdit { node } => handlers::text_edit::activate(state, node),
            EditorCommand::EndTextEdit { reason } => handlers::text_edit::end(state, reason),
            EditorCommand::InsertText { text } => handlers::text_edit::insert_text(state, &text),
            EditorCommand::InsertLineBreak => handlers::text_edit::insert_line_break(state),
            EditorCommand::DeleteBackward => handlers::text_edit::delete_backward(state),
            EditorCommand::DeleteForward => handlers::text_edit::delete_forward(state),
            EditorCommand::MoveCaret { motion, extend } => {
                handlers::text_edit::move_caret(state, motion, extend)
            }
            EditorCommand::SetTextSelection { anchor, caret } => {
                handlers::text_edit::set_selection(state, anchor, caret)
            }
            EditorCommand::SelectAllText => handlers::text_edit::select_all(state),
            EditorCommand::ApplyFormat { format } => {
                handlers::text_edit::apply_format(state, format)
            }

            // === Modi ===
            EditorCommand::SetPlacementMode { mode } => {
                handlers::mode::set_placement_mode(state, mode)
            }
            EditorCommand::TogglePlacementMode => handlers::mode::toggle_placement_mode(state),
            EditorCommand::SetGranularity { granularity } => {
                handlers::mode::set_granularity(state, granularity)
            }
            EditorCommand::AutoArrange => handlers::mode::auto_arrange(state),
            EditorCommand::DebugDump => handlers::view::debug_dump(state),
        }

        Ok(())
    }

    /// Arbeitet die Task-Queue ab. Gibt die Anzahl ausgeführter Tasks zurück.
    pub fn drain_tasks(&mut self, state: &mut EditorState) -> usize {
        let mut executed = 0;
        while executed < MAX_TASKS_PER_PASS {
            let Some(task) = state.tasks.pop() else {
                break;
            };
            log::trace!("Task: {:?}", task);
            super::handlers::tasks::run(state, task);
            executed += 1;
        }
        if !state.tasks.is_empty() {
            log::warn!(
                "Task-Budget erschöpft, {} Aufgaben verbleiben für den nächsten Intent",
                state.tasks.len()
            );
        }
        executed
    }

    /// Entnimmt alle seit dem letzten Aufruf erzeugten Ausgaben.
    pub fn take_outputs(&mut self, state: &mut EditorState) -> Vec<EditorOutput> {
        state.outbox.drain()
    }

    /// Reicht alle Ausgaben an einen Sink weiter.
    pub fn forward_outputs(&mut self, state: &mut EditorState, sink: &mut dyn ContentSink) {
        state.outbox.forward_to(sink);
    }

    /// Aktuelles visuelles Feedback für den Host.
    pub fn feedback_scene<'a>(&self, state: &'a EditorState) -> &'a FeedbackScene {
        &state.feedback
    }
}
