use glam::Vec2;
use markup_canvas_editor::app::state::InteractionPhase;
use markup_canvas_editor::input::{FormatCommand, Key, Modifiers, PointerButton};
use markup_canvas_editor::markup::FALLBACK_MARKUP;
use markup_canvas_editor::{
    ContentSink, EditorCommand, EditorController, EditorIntent, EditorOptions, EditorOutput,
    EditorState, NodeId, OrderingNode, PlacementMode,
};

const CARDS: &str = concat!(
    "<main>",
    "<div class=\"card\" id=\"a\">Card A text</div>",
    "<div class=\"card\" id=\"b\">Card B text</div>",
    "</main>"
);

const CANVAS: &str = concat!(
    "<main style=\"position: relative; width: 800px; height: 600px\">",
    "<div class=\"card\" id=\"anchor\" data-placed=\"user\" style=\"position: absolute; left: 100px; top: 100px; width: 200px; height: 100px\">Anchor</div>",
    "<div class=\"card\" id=\"mover\" data-placed=\"user\" style=\"position: absolute; left: 400px; top: 400px; width: 100px; height: 50px\">Mover</div>",
    "</main>"
);

const ROWS: &str = concat!(
    "<main>",
    "<div class=\"row\" id=\"top\">",
    "<div class=\"card\" id=\"a\">Card A text</div>",
    "<div class=\"card\" id=\"b\">Card B text</div>",
    "</div>",
    "<div class=\"row\" id=\"bottom\">",
    "<div class=\"card\" id=\"c\">Card C text</div>",
    "<div class=\"card\" id=\"d\">Card D text</div>",
    "</div>",
    "</main>"
);

fn load(controller: &mut EditorController, state: &mut EditorState, markup: &str) {
    controller
        .handle_intent(
            state,
            EditorIntent::LoadMarkupRequested {
                markup: markup.to_string(),
            },
        )
        .expect("LoadMarkupRequested sollte ohne Fehler durchlaufen");
}

fn send(controller: &mut EditorController, state: &mut EditorState, intent: EditorIntent) {
    controller
        .handle_intent(state, intent)
        .expect("Intent sollte ohne Fehler durchlaufen");
}

fn pointer_down(pos: Vec2) -> EditorIntent {
    EditorIntent::PointerDown {
        pos,
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    }
}

fn pointer_up(pos: Vec2) -> EditorIntent {
    EditorIntent::PointerUp {
        pos,
        button: PointerButton::Primary,
    }
}

fn key(key: Key) -> EditorIntent {
    EditorIntent::KeyPressed {
        key,
        modifiers: Modifiers::NONE,
    }
}

fn by_id(state: &EditorState, id: &str) -> NodeId {
    state
        .document
        .find_by_attr("id", id)
        .unwrap_or_else(|| panic!("Node mit id={id} erwartet"))
}

fn drag(controller: &mut EditorController, state: &mut EditorState, from: Vec2, to: Vec2) {
    send(controller, state, pointer_down(from));
    send(controller, state, EditorIntent::PointerMove { pos: to });
    send(controller, state, pointer_up(to));
}

fn freeform_state() -> EditorState {
    let options = EditorOptions {
        grid_snap_enabled: false,
        ..EditorOptions::default()
    };
    EditorState::with_options(options)
}

#[derive(Default)]
struct RecordingSink {
    contents: Vec<String>,
    orderings: Vec<Vec<OrderingNode>>,
}

impl ContentSink for RecordingSink {
    fn on_update_content(&mut self, markup: &str) {
        self.contents.push(markup.to_string());
    }

    fn on_ordering_change(&mut self, ordering: &[OrderingNode]) {
        self.orderings.push(ordering.to_vec());
    }
}

#[test]
fn test_dragging_second_card_before_first_swaps_order() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, CARDS);

    let a = by_id(&state, "a");
    let b = by_id(&state, "b");
    let a_rect = state.layout.rect_or_zero(a);
    let press = state.layout.rect_or_zero(b).center();
    let target = Vec2::new(a_rect.center().x, a_rect.min.y + 2.0);

    drag(&mut controller, &mut state, press, target);

    let mut sink = RecordingSink::default();
    controller.forward_outputs(&mut state, &mut sink);
    assert_eq!(
        sink.contents,
        vec![concat!(
            "<main>",
            "<div class=\"card\" id=\"b\">Card B text</div>",
            "<div class=\"card\" id=\"a\">Card A text</div>",
            "</main>"
        )
        .to_string()]
    );
    let ordering = &sink.orderings[0];
    let ids: Vec<&str> = ordering[0].children.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert!(state.interaction.is_idle());
    assert!(state.command_log.entries().iter().any(|c| matches!(c, EditorCommand::DropDrag { .. })));
}

#[test]
fn test_dragging_card_into_other_row_moves_it_across_containers() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, ROWS);

    let top = by_id(&state, "top");
    let bottom = by_id(&state, "bottom");
    let a = by_id(&state, "a");
    assert!(state.classification.is_container(top));
    assert!(state.classification.is_container(bottom));
    assert!(state.registry.is_draggable(a));

    let press = state.layout.rect_or_zero(a).center();
    let c_rect = state.layout.rect_or_zero(by_id(&state, "c"));
    let bottom_rect = state.layout.rect_or_zero(bottom);
    let target = Vec2::new(c_rect.center().x, bottom_rect.min.y + 2.0);

    drag(&mut controller, &mut state, press, target);

    assert_eq!(state.document.parent(a), Some(bottom));
    let mut sink = RecordingSink::default();
    controller.forward_outputs(&mut state, &mut sink);
    assert_eq!(
        sink.contents,
        vec![concat!(
            "<main>",
            "<div class=\"row\" id=\"top\">",
            "<div class=\"card\" id=\"b\">Card B text</div>",
            "</div>",
            "<div class=\"row\" id=\"bottom\">",
            "<div class=\"card\" id=\"a\">Card A text</div>",
            "<div class=\"card\" id=\"c\">Card C text</div>",
            "<div class=\"card\" id=\"d\">Card D text</div>",
            "</div>",
            "</main>"
        )
        .to_string()]
    );
    let rows = &sink.orderings[0][0].children;
    let top_ids: Vec<&str> = rows[0].children.iter().map(|n| n.id.as_str()).collect();
    let bottom_ids: Vec<&str> = rows[1].children.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(top_ids, vec!["b"]);
    assert_eq!(bottom_ids, vec!["a", "c", "d"]);
}

#[test]
fn test_click_type_and_enter_commits_paragraph() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, "<p>Hello</p>");

    let p = state.document.element_children(state.document.root())[0];
    assert!(state.classification.is_editable(p));
    let center = state.layout.rect_or_zero(p).center();

    send(&mut controller, &mut state, pointer_down(center));
    send(&mut controller, &mut state, pointer_up(center));

    let edit = state.text_edit.active().expect("Textbearbeitung sollte aktiv sein");
    assert_eq!(edit.node, p);
    assert_eq!(edit.buffer.selection(), 0..5);

    send(
        &mut controller,
        &mut state,
        EditorIntent::TextInput {
            text: "Hi".to_string(),
        },
    );
    send(&mut controller, &mut state, key(Key::Enter));

    assert!(!state.text_edit.is_active());
    let outputs = controller.take_outputs(&mut state);
    assert_eq!(outputs, vec![EditorOutput::ContentUpdated("<p>Hi</p>".to_string())]);
}

#[test]
fn test_freeform_drop_snaps_left_edge_to_right_edge_midpoint() {
    let mut controller = EditorController::new();
    let mut state = freeform_state();
    load(&mut controller, &mut state, CANVAS);
    send(
        &mut controller,
        &mut state,
        EditorIntent::SetPlacementModeRequested {
            mode: PlacementMode::Freeform,
        },
    );

    let mover = by_id(&state, "mover");
    let origin = state.layout.rect_or_zero(mover);
    let press = origin.center();
    // obere linke Ecke landet bei (306, 155), 7.8 Einheiten neben (300, 150)
    let release = press + (Vec2::new(306.0, 155.0) - origin.min);

    drag(&mut controller, &mut state, press, release);

    let rect = state.layout.rect_or_zero(mover);
    approx::assert_relative_eq!(rect.min.x, 300.0);
    approx::assert_relative_eq!(rect.min.y, 150.0);
    assert_eq!(state.document.style(mover).get("left"), Some("300px"));
}

#[test]
fn test_whitespace_and_tagless_input_use_fallback() {
    let mut controller = EditorController::new();
    for input in ["   ", "just some words"] {
        let mut state = EditorState::new();
        load(&mut controller, &mut state, input);
        assert_eq!(state.last_markup, FALLBACK_MARKUP);
        assert!(state.element_count() > 0);
    }
}

#[test]
fn test_freeform_drop_onto_sibling_leaves_no_overlap() {
    let mut controller = EditorController::new();
    let mut state = freeform_state();
    load(&mut controller, &mut state, CANVAS);
    send(
        &mut controller,
        &mut state,
        EditorIntent::SetPlacementModeRequested {
            mode: PlacementMode::Freeform,
        },
    );

    let anchor = by_id(&state, "anchor");
    let mover = by_id(&state, "mover");
    let origin = state.layout.rect_or_zero(mover);
    let press = origin.center();
    let release = press + (Vec2::new(150.0, 120.0) - origin.min);

    drag(&mut controller, &mut state, press, release);

    let mover_rect = state.layout.rect_or_zero(mover);
    let anchor_rect = state.layout.rect_or_zero(anchor);
    assert!(
        !mover_rect.intersects(&anchor_rect),
        "Überlappung: {mover_rect:?} / {anchor_rect:?}"
    );
    approx::assert_relative_eq!(mover_rect.min.x, 150.0);
    assert!(state
        .feedback
        .transitions
        .iter()
        .any(|t| t.node == anchor));
}

#[test]
fn test_freeform_drag_never_leaves_container() {
    for release in [
        Vec2::new(5000.0, 5000.0),
        Vec2::new(-300.0, -300.0),
        Vec2::new(790.0, 10.0),
    ] {
        let mut controller = EditorController::new();
        let mut state = freeform_state();
        load(&mut controller, &mut state, CANVAS);
        send(
            &mut controller,
            &mut state,
            EditorIntent::SetPlacementModeRequested {
                mode: PlacementMode::Freeform,
            },
        );
        let mover = by_id(&state, "mover");
        let press = state.layout.rect_or_zero(mover).center();

        drag(&mut controller, &mut state, press, release);

        let rect = state.layout.rect_or_zero(mover);
        let padding = state.options.boundary_padding;
        assert!(rect.min.x >= padding && rect.min.y >= padding, "{rect:?}");
        assert!(
            rect.max.x <= 800.0 - padding && rect.max.y <= 600.0 - padding,
            "{rect:?}"
        );
    }
}

#[test]
fn test_escape_cancels_drag_and_restores_markup() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, CARDS);
    let a = by_id(&state, "a");
    let b = by_id(&state, "b");
    let press = state.layout.rect_or_zero(b).center();
    let target = state.layout.rect_or_zero(a).min + Vec2::new(20.0, 2.0);

    send(&mut controller, &mut state, pointer_down(press));
    send(&mut controller, &mut state, EditorIntent::PointerMove { pos: target });
    assert!(state.interaction.is_dragging());

    send(&mut controller, &mut state, key(Key::Escape));

    assert!(state.interaction.is_idle());
    assert_eq!(
        markup_canvas_editor::write_markup(&state.document),
        CARDS
    );
    assert!(controller.take_outputs(&mut state).is_empty());
}

#[test]
fn test_second_pointer_down_during_drag_is_ignored() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, CARDS);
    let a = by_id(&state, "a");
    let b = by_id(&state, "b");
    let press = state.layout.rect_or_zero(b).center();

    send(&mut controller, &mut state, pointer_down(press));
    send(
        &mut controller,
        &mut state,
        EditorIntent::PointerMove {
            pos: press + Vec2::new(0.0, 30.0),
        },
    );
    let logged = state.command_log.len();
    let a_center = state.layout.rect_or_zero(a).center();
    send(&mut controller, &mut state, pointer_down(a_center));

    assert_eq!(state.command_log.len(), logged);
    assert_eq!(state.dragged_node(), Some(b));
}

#[test]
fn test_click_on_other_paragraph_swaps_edit_session() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(
        &mut controller,
        &mut state,
        "<main><p id=\"one\">First paragraph</p><p id=\"two\">Second paragraph</p></main>",
    );
    let one = by_id(&state, "one");
    let two = by_id(&state, "two");

    let one_center = state.layout.rect_or_zero(one).center();
    send(&mut controller, &mut state, pointer_down(one_center));
    send(&mut controller, &mut state, pointer_up(one_center));
    send(
        &mut controller,
        &mut state,
        EditorIntent::TextInput {
            text: "Edited".to_string(),
        },
    );

    let two_center = state.layout.rect_or_zero(two).center();
    send(&mut controller, &mut state, pointer_down(two_center));
    send(&mut controller, &mut state, pointer_up(two_center));

    assert_eq!(state.editing_node(), Some(two));
    assert!(!state.document.marks(one).editing);
    let outputs = controller.take_outputs(&mut state);
    assert_eq!(outputs.len(), 1);
    match &outputs[0] {
        EditorOutput::ContentUpdated(markup) => {
            assert!(markup.contains("<p id=\"one\">Edited</p>"))
        }
        other => panic!("Unerwartete Ausgabe: {other:?}"),
    }
}

#[test]
fn test_format_shortcut_and_focus_lost_commit() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, "<p>Hello world</p>");
    let p = state.document.element_children(state.document.root())[0];
    let center = state.layout.rect_or_zero(p).center();
    send(&mut controller, &mut state, pointer_down(center));
    send(&mut controller, &mut state, pointer_up(center));

    send(
        &mut controller,
        &mut state,
        EditorIntent::KeyPressed {
            key: Key::Char('b'),
            modifiers: Modifiers::ctrl(),
        },
    );
    send(&mut controller, &mut state, EditorIntent::FocusLost);

    assert!(!state.text_edit.is_active());
    let outputs = controller.take_outputs(&mut state);
    assert_eq!(
        outputs,
        vec![EditorOutput::ContentUpdated(
            "<p><b>Hello world</b></p>".to_string()
        )]
    );
    assert!(matches!(
        state.command_log.last(),
        Some(EditorCommand::EndTextEdit { .. })
    ));
}

#[test]
fn test_format_request_without_edit_is_dropped() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, "<p>Hello world</p>");
    let logged = state.command_log.len();

    send(
        &mut controller,
        &mut state,
        EditorIntent::FormatRequested {
            format: FormatCommand::Italic,
        },
    );

    assert_eq!(state.command_log.len(), logged);
}

#[test]
fn test_removed_node_mid_drag_aborts_cleanly() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, CARDS);
    let b = by_id(&state, "b");
    let press = state.layout.rect_or_zero(b).center();
    send(&mut controller, &mut state, pointer_down(press));
    send(
        &mut controller,
        &mut state,
        EditorIntent::PointerMove {
            pos: press - Vec2::new(0.0, 30.0),
        },
    );
    assert!(state.interaction.is_dragging());

    state.document.remove(b);
    send(
        &mut controller,
        &mut state,
        EditorIntent::PointerMove {
            pos: press - Vec2::new(0.0, 40.0),
        },
    );

    assert!(matches!(state.interaction, InteractionPhase::Idle));
    assert!(state.feedback.ghost.is_none());
    assert!(!markup_canvas_editor::write_markup(&state.document).contains("drop-marker"));
}

#[test]
fn test_load_then_serialize_round_trips() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    let input = concat!(
        "<style>.card{padding:8px}</style>",
        "<main class=\"page\"><section id=\"hero\"><h1>Title text</h1><p>Intro &amp; more</p></section>",
        "<!-- note --><img src=\"a.png\" alt=\"\"/></main>"
    );
    load(&mut controller, &mut state, input);
    assert_eq!(
        markup_canvas_editor::app::use_cases::serialization::serialize(&state),
        input
    );
}

#[test]
fn test_granularity_shortcut_and_debug_dump() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, CARDS);

    send(
        &mut controller,
        &mut state,
        EditorIntent::KeyPressed {
            key: Key::Char('1'),
            modifiers: Modifiers {
                ctrl: true,
                alt: true,
                ..Modifiers::NONE
            },
        },
    );
    assert_eq!(
        state.registry.effective_granularity(),
        markup_canvas_editor::core::Granularity::Simple
    );

    send(&mut controller, &mut state, EditorIntent::DebugDumpRequested);
    let dump = state.last_debug_dump.as_deref().expect("Dump erwartet");
    assert!(dump.contains("granularity=Simple"));
}

#[test]
fn test_granularity_change_mid_drag_cancels_drag_first() {
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    load(&mut controller, &mut state, CARDS);
    let a = by_id(&state, "a");
    let b = by_id(&state, "b");
    let press = state.layout.rect_or_zero(b).center();
    let target = state.layout.rect_or_zero(a).min + Vec2::new(20.0, 2.0);

    send(&mut controller, &mut state, pointer_down(press));
    send(&mut controller, &mut state, EditorIntent::PointerMove { pos: target });
    assert!(state.interaction.is_dragging());

    send(
        &mut controller,
        &mut state,
        EditorIntent::SetGranularityRequested {
            granularity: markup_canvas_editor::core::Granularity::Simple,
        },
    );

    let entries = state.command_log.entries();
    let tail = &entries[entries.len() - 2..];
    assert_eq!(tail[0], EditorCommand::CancelDrag);
    assert!(matches!(tail[1], EditorCommand::SetGranularity { .. }));
    assert!(state.interaction.is_idle());
    assert!(state.document.find_by_attr("class", "drop-marker").is_none());
    assert_eq!(markup_canvas_editor::write_markup(&state.document), CARDS);
}

#[test]
fn test_auto_arrange_request_stacks_placed_elements() {
    let mut controller = EditorController::new();
    let mut state = freeform_state();
    load(&mut controller, &mut state, CANVAS);

    send(&mut controller, &mut state, EditorIntent::AutoArrangeRequested);

    let anchor = state.layout.rect_or_zero(by_id(&state, "anchor"));
    let mover = state.layout.rect_or_zero(by_id(&state, "mover"));
    approx::assert_relative_eq!(anchor.min.x, 4.0);
    approx::assert_relative_eq!(anchor.min.y, 4.0);
    approx::assert_relative_eq!(mover.min.y, 4.0 + 100.0 + 16.0);
    let outputs = controller.take_outputs(&mut state);
    assert!(matches!(outputs.first(), Some(EditorOutput::ContentUpdated(_))));
    assert!(matches!(outputs.last(), Some(EditorOutput::OrderingChanged(_))));
}
