//! Mapping von Host-Intents auf mutierende Editor-Commands.
//!
//! Das Mapping ist die einzige Stelle, die Pointer-Events gegen die
//! Interaktions-Phase auswertet: Drag und Textbearbeitung schließen sich
//! hier gegenseitig aus.

use super::state::{EditEndReason, InteractionPhase};
use super::{EditorCommand, EditorIntent, EditorState};
use crate::input::{resolve_key, Key, KeyAction, Modifiers, PointerButton};
use glam::Vec2;

/// Übersetzt einen `EditorIntent` in eine Sequenz ausführbarer `EditorCommand`s.
pub fn map_intent_to_commands(state: &EditorState, intent: EditorIntent) -> Vec<EditorCommand> {
    match intent {
        EditorIntent::LoadMarkupRequested { markup } => vec![EditorCommand::LoadMarkup { markup }],
        EditorIntent::ViewportResized { size } => vec![EditorCommand::SetViewportSize { size }],
        EditorIntent::LayoutMeasured { rects } => {
            vec![EditorCommand::ApplyMeasuredLayout { rects }]
        }
        EditorIntent::PointerDown { pos, button, .. } => {
            // Zweiter Press während einer Session wird ignoriert
            if button != PointerButton::Primary || !state.interaction.is_idle() {
                return Vec::new();
            }
            vec![EditorCommand::ArmPointer { pos }]
        }
        EditorIntent::PointerMove { pos } => map_pointer_move(state, pos),
        EditorIntent::PointerUp { pos, button } => {
            if button != PointerButton::Primary {
                return Vec::new();
            }
            match state.interaction {
                InteractionPhase::Armed { .. } => vec![EditorCommand::ClickAt { pos }],
                InteractionPhase::Dragging(_) => vec![EditorCommand::DropDrag { pos }],
                _ => Vec::new(),
            }
        }
        EditorIntent::KeyPressed { key, modifiers } => map_key(state, key, modifiers),
        EditorIntent::TextInput { text } => {
            if state.text_edit.is_active() && !text.is_empty() {
                vec![EditorCommand::InsertText { text }]
            } else {
                Vec::new()
            }
        }
        EditorIntent::TextSelectionChanged { anchor, caret } => {
            when_editing(state, EditorCommand::SetTextSelection { anchor, caret })
        }
        EditorIntent::FocusLost => {
            let mut commands = abort_pointer(state);
            if state.text_edit.is_active() {
                commands.push(EditorCommand::EndTextEdit {
                    reason: EditEndReason::FocusLost,
                });
            }
            commands
        }
        EditorIntent::FormatRequested { format } => {
            when_editing(state, EditorCommand::ApplyFormat { format })
        }
        EditorIntent::SetPlacementModeRequested { mode } => {
            if mode == state.placement_mode {
                return Vec::new();
            }
            let mut commands = abort_pointer(state);
            commands.push(EditorCommand::SetPlacementMode { mode });
            commands
        }
        EditorIntent::SetGranularityRequested { granularity } => {
            with_abort(state, EditorCommand::SetGranularity { granularity })
        }
        EditorIntent::AutoArrangeRequested => with_abort(state, EditorCommand::AutoArrange),
        EditorIntent::DebugDumpRequested => vec![EditorCommand::DebugDump],
        EditorIntent::FrameAdvanced { elapsed_ms } => {
            vec![EditorCommand::AdvanceClock { elapsed_ms }]
        }
    }
}

fn map_pointer_move(state: &EditorState, pos: Vec2) -> Vec<EditorCommand> {
    match &state.interaction {
        InteractionPhase::Armed {
            target: Some(target),
            press,
        } if press.distance(pos) >= state.options.drag_threshold => {
            let target = *target;
            vec![
                EditorCommand::StartDrag {
                    target,
                    press: *press,
                },
                EditorCommand::UpdateDrag { pos },
            ]
        }
        InteractionPhase::Dragging(_) => vec![EditorCommand::UpdateDrag { pos }],
        _ => Vec::new(),
    }
}

fn map_key(state: &EditorState, key: Key, modifiers: Modifiers) -> Vec<EditorCommand> {
    let Some(action) = resolve_key(key, modifiers) else {
        return Vec::new();
    };

    match action {
        KeyAction::Format(format) => when_editing(state, EditorCommand::ApplyFormat { format }),
        KeyAction::SetGranularity(granularity) => {
            with_abort(state, EditorCommand::SetGranularity { granularity })
        }
        KeyAction::DebugDump => vec![EditorCommand::DebugDump],
        KeyAction::TogglePlacementMode => with_abort(state, EditorCommand::TogglePlacementMode),
        KeyAction::AutoArrange => with_abort(state, EditorCommand::AutoArrange),
        KeyAction::SelectAll => when_editing(state, EditorCommand::SelectAllText),
        KeyAction::Commit => when_editing(
            state,
            EditorCommand::EndTextEdit {
                reason: EditEndReason::Enter,
            },
        ),
        KeyAction::LineBreak => when_editing(state, EditorCommand::InsertLineBreak),
        KeyAction::Escape => {
            if state.interaction.is_dragging() {
                vec![EditorCommand::CancelDrag]
            } else {
                when_editing(
                    state,
                    EditorCommand::EndTextEdit {
                        reason: EditEndReason::Escape,
                    },
                )
            }
        }
        KeyAction::Backspace => when_editing(state, EditorCommand::DeleteBackward),
        KeyAction::Delete => when_editing(state, EditorCommand::DeleteForward),
        KeyAction::MoveCaret { motion, extend } => {
            when_editing(state, EditorCommand::MoveCaret { motion, extend })
        }
    }
}

/// Command nur während einer Textbearbeitung.
fn when_editing(state: &EditorState, command: EditorCommand) -> Vec<EditorCommand> {
    if state.text_edit.is_active() {
        vec![command]
    } else {
        Vec::new()
    }
}

/// Beendet eine laufende Pointer-Interaktion ohne Drop.
fn abort_pointer(state: &EditorState) -> Vec<EditorCommand> {
    match state.interaction {
        InteractionPhase::Dragging(_) => vec![EditorCommand::CancelDrag],
        InteractionPhase::Armed { .. } => vec![EditorCommand::Disarm],
        _ => Vec::new(),
    }
}

fn with_abort(state: &EditorState, command: EditorCommand) -> Vec<EditorCommand> {
    let mut commands = abort_pointer(state);
    commands.push(command);
    commands
}

#[cfg(test)]
mod tests;
