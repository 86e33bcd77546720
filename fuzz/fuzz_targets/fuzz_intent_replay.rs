#![no_main]

use libfuzzer_sys::fuzz_target;
use markup_canvas_editor::{EditorController, EditorIntent, EditorState};

const PAGE: &str = concat!(
    "<main><div class=\"card\" id=\"a\">Card A text</div>",
    "<div class=\"card\" id=\"b\">Card B text</div>",
    "<p id=\"c\">Paragraph text</p></main>"
);

fuzz_target!(|data: &[u8]| {
    let Ok(script) = serde_json::from_slice::<Vec<EditorIntent>>(data) else {
        return;
    };
    let mut controller = EditorController::new();
    let mut state = EditorState::new();
    let load = EditorIntent::LoadMarkupRequested {
        markup: PAGE.to_string(),
    };
    if controller.handle_intent(&mut state, load).is_err() {
        return;
    }
    for intent in script {
        let _ = controller.handle_intent(&mut state, intent);
    }
    let _ = controller.take_outputs(&mut state);
});
