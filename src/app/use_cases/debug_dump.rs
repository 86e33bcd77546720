//! Textueller Zustands-Dump (Ctrl+Shift+D).

use std::fmt::Write;

use crate::app::EditorState;

/// Erzeugt den Dump, loggt ihn und legt ihn im Zustand ab.
pub fn debug_dump(state: &mut EditorState) -> String {
    let dump = render_dump(state);
    log::info!("Debug-Dump:\n{}", dump);
    state.last_debug_dump = Some(dump.clone());
    dump
}

fn render_dump(state: &EditorState) -> String {
    let tree = &state.document;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "phase={} mode={:?} granularity={:?} effective={:?} downgraded={} enabled={}",
        state.interaction.label(),
        state.placement_mode,
        state.granularity,
        state.registry.effective_granularity(),
        state.registry.was_downgraded(),
        state.registry.is_enabled(),
    );
    let _ = writeln!(
        out,
        "elements={} classified={} draggable={} editing={:?} tasks={} outbox={}",
        state.element_count(),
        state.classification.len(),
        state.registry.draggable_count(),
        state.editing_node(),
        state.tasks.len(),
        state.outbox.len(),
    );
    if let Some(session) = state.interaction.drag_session() {
        let _ = writeln!(
            out,
            "drag target={} origin={:?} pointer={:?}",
            session.target, session.origin, session.pointer
        );
    }

    for (id, roles) in state.classification.iter() {
        let tag = tree.tag(id).unwrap_or("?");
        let rect = state.layout.rect_or_zero(id);
        let _ = writeln!(
            out,
            "{} <{}> {:?} container={} block={} editable={} draggable={} rect=({:.0},{:.0} {:.0}x{:.0})",
            id,
            tag,
            roles.primary(),
            roles.container,
            roles.block,
            roles.editable,
            state.registry.is_draggable(id),
            rect.min.x,
            rect.min.y,
            rect.width(),
            rect.height(),
        );
    }
    out
}
