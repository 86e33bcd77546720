use glam::Vec2;

use crate::app::state::InteractionPhase;
use crate::app::{EditorCommand, EditorIntent, EditorState};
use crate::core::{Granularity, NodeId, PlacementMode};
use crate::input::{Key, Modifiers, PointerButton};

use super::map_intent_to_commands;

fn armed_state(target: Option<NodeId>) -> EditorState {
    let mut state = EditorState::new();
    state.interaction = InteractionPhase::Armed {
        target,
        press: Vec2::new(100.0, 100.0),
    };
    state
}

#[test]
fn pointer_down_arms_only_when_idle() {
    let state = EditorState::new();
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::PointerDown {
            pos: Vec2::new(10.0, 10.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        },
    );
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], EditorCommand::ArmPointer { .. }));

    let busy = armed_state(Some(NodeId(3)));
    let commands = map_intent_to_commands(
        &busy,
        EditorIntent::PointerDown {
            pos: Vec2::new(10.0, 10.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        },
    );
    assert!(commands.is_empty());
}

#[test]
fn secondary_button_is_ignored() {
    let state = EditorState::new();
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::PointerDown {
            pos: Vec2::ZERO,
            button: PointerButton::Secondary,
            modifiers: Modifiers::NONE,
        },
    );
    assert!(commands.is_empty());
}

#[test]
fn move_below_threshold_does_not_start_drag() {
    let state = armed_state(Some(NodeId(3)));
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::PointerMove {
            pos: Vec2::new(105.0, 100.0),
        },
    );
    assert!(commands.is_empty());
}

#[test]
fn move_past_threshold_starts_and_updates_drag_in_order() {
    let state = armed_state(Some(NodeId(3)));
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::PointerMove {
            pos: Vec2::new(140.0, 100.0),
        },
    );
    assert_eq!(commands.len(), 2);
    assert!(matches!(
        commands[0],
        EditorCommand::StartDrag {
            target: NodeId(3),
            ..
        }
    ));
    assert!(matches!(commands[1], EditorCommand::UpdateDrag { .. }));
}

#[test]
fn armed_without_target_never_drags() {
    let state = armed_state(None);
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::PointerMove {
            pos: Vec2::new(400.0, 400.0),
        },
    );
    assert!(commands.is_empty());
}

#[test]
fn release_while_armed_is_a_click() {
    let state = armed_state(None);
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::PointerUp {
            pos: Vec2::new(100.0, 100.0),
            button: PointerButton::Primary,
        },
    );
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], EditorCommand::ClickAt { .. }));
}

#[test]
fn editing_keys_are_dropped_without_text_session() {
    let state = EditorState::new();
    for key in [Key::Enter, Key::Backspace, Key::Escape, Key::Char('b')] {
        let modifiers = if key == Key::Char('b') {
            Modifiers::ctrl()
        } else {
            Modifiers::NONE
        };
        let commands = map_intent_to_commands(&state, EditorIntent::KeyPressed { key, modifiers });
        assert!(commands.is_empty(), "{key:?} sollte ignoriert werden");
    }
}

#[test]
fn debug_dump_binding_maps_to_command() {
    let state = EditorState::new();
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::KeyPressed {
            key: Key::Char('d'),
            modifiers: Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::NONE
            },
        },
    );
    assert_eq!(commands, vec![EditorCommand::DebugDump]);
}

#[test]
fn focus_lost_while_armed_disarms() {
    let state = armed_state(Some(NodeId(3)));
    let commands = map_intent_to_commands(&state, EditorIntent::FocusLost);
    assert_eq!(commands, vec![EditorCommand::Disarm]);
}

#[test]
fn granularity_change_disarms_pending_press_first() {
    let state = armed_state(Some(NodeId(3)));
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::SetGranularityRequested {
            granularity: Granularity::Simple,
        },
    );
    assert_eq!(
        commands,
        vec![
            EditorCommand::Disarm,
            EditorCommand::SetGranularity {
                granularity: Granularity::Simple
            }
        ]
    );

    let commands = map_intent_to_commands(
        &state,
        EditorIntent::KeyPressed {
            key: Key::Char('2'),
            modifiers: Modifiers {
                ctrl: true,
                alt: true,
                ..Modifiers::NONE
            },
        },
    );
    assert_eq!(
        commands,
        vec![
            EditorCommand::Disarm,
            EditorCommand::SetGranularity {
                granularity: Granularity::Normal
            }
        ]
    );
}

#[test]
fn unchanged_placement_mode_is_a_no_op() {
    let state = EditorState::new();
    let commands = map_intent_to_commands(
        &state,
        EditorIntent::SetPlacementModeRequested {
            mode: PlacementMode::Reorder,
        },
    );
    assert!(commands.is_empty());

    let commands = map_intent_to_commands(
        &state,
        EditorIntent::SetPlacementModeRequested {
            mode: PlacementMode::Freeform,
        },
    );
    assert_eq!(
        commands,
        vec![EditorCommand::SetPlacementMode {
            mode: PlacementMode::Freeform
        }]
    );
}

#[test]
fn intents_deserialize_from_tagged_json() {
    let intent: EditorIntent =
        serde_json::from_str(r#"{"type":"PointerDown","pos":[12.0,40.0]}"#).expect("gültiges JSON");
    assert_eq!(
        intent,
        EditorIntent::PointerDown {
            pos: Vec2::new(12.0, 40.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    );

    let intent: EditorIntent =
        serde_json::from_str(r#"{"type":"KeyPressed","key":"Enter"}"#).expect("gültiges JSON");
    assert!(matches!(intent, EditorIntent::KeyPressed { key: Key::Enter, .. }));
}
