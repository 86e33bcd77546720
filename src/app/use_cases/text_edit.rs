//! Text-Edit-Session: Aktivieren, Bearbeiten und Beenden der Inline-Bearbeitung.
//!
//! Jede Änderung wird sofort in den lebenden Node geschrieben. Der Commit
//! (Markup-Ausgabe) läuft aufgeschoben über die Task-Queue.

use glam::Vec2;

use crate::app::feedback;
use crate::app::state::{ActiveEdit, EditEndReason, InteractionPhase, TextEditSession};
use crate::app::task_queue::DeferredTask;
use crate::app::text_buffer::RichTextBuffer;
use crate::app::use_cases::layout::relayout;
use crate::app::use_cases::segmentation::refresh_structure;
use crate::app::EditorState;
use crate::core::NodeId;
use crate::input::{CaretMotion, FormatCommand};
use crate::markup::write_children;

/// Startet die Bearbeitung eines editierbaren Elements.
///
/// Läuft bereits eine Bearbeitung an einem anderen Element, wird diese
/// beendet und die Aktivierung als Task nachgeholt.
pub fn activate(state: &mut EditorState, node: NodeId) -> bool {
    if state.interaction.is_dragging() {
        log::debug!("Textbearbeitung während Drag unterdrückt");
        return false;
    }
    match state.editing_node() {
        Some(active) if active == node => return false,
        Some(_) => {
            end_edit(state, EditEndReason::Swap);
            state.tasks.push(DeferredTask::ActivateTextEdit { node });
            return false;
        }
        None => {}
    }

    if !state.document.is_attached(node) || !state.classification.is_editable(node) {
        log::debug!("{} ist nicht editierbar", node);
        return false;
    }

    let original_markup = write_children(&state.document, node);
    let original_buffer = RichTextBuffer::from_node(&state.document, node);
    let mut buffer = original_buffer.clone();
    buffer.select_all();

    if let Some(marks) = state.document.marks_mut(node) {
        marks.editing = true;
    }
    feedback::show_format_toolbar(
        &mut state.feedback,
        node,
        state.layout.rect_or_zero(node),
        buffer.active_formats(),
    );
    state.text_edit = TextEditSession::Active(Box::new(ActiveEdit {
        node,
        original_markup,
        original_buffer,
        buffer,
    }));
    log::info!("Textbearbeitung gestartet: {}", node);
    true
}

/// Beendet die Session ohne Commit. Gibt `true` zurück, wenn sich der
/// Inhalt gegenüber dem Start geändert hat.
pub fn finish_edit(state: &mut EditorState, reason: EditEndReason) -> bool {
    let Some(edit) = state.text_edit.take() else {
        return false;
    };
    feedback::clear_format_toolbar(&mut state.feedback);

    let node = edit.node;
    if !state.document.is_attached(node) {
        log::warn!("Bearbeiteter Node {} nicht mehr im Dokument", node);
        return false;
    }

    if reason == EditEndReason::Escape && state.options.escape_reverts_text_edit {
        edit.original_buffer.write_to(&mut state.document, node);
        log::debug!("Textbearbeitung von {} verworfen", node);
    }
    // Beim Bearbeiten gelöschte Teilbäume wurden nur abgehängt
    for opaque in edit.original_buffer.opaque_nodes() {
        if !state.document.is_attached(opaque) {
            state.document.remove(opaque);
        }
    }
    if let Some(marks) = state.document.marks_mut(node) {
        marks.editing = false;
    }
    // Während der Bearbeitung neu klassifiziert: Rolle fehlt noch
    if state.classification.is_editable(node) {
        relayout(state);
    } else {
        refresh_structure(state);
    }

    let changed = write_children(&state.document, node) != edit.original_markup;
    log::info!(
        "Textbearbeitung beendet: {} ({:?}, geändert: {})",
        node,
        reason,
        changed
    );
    changed
}

/// Beendet die Session und reiht bei Änderungen den Text-Commit ein.
pub fn end_edit(state: &mut EditorState, reason: EditEndReason) {
    if finish_edit(state, reason) {
        state.tasks.push(DeferredTask::CommitText);
    }
}

/// Wendet eine Puffer-Operation an; bei `write` wird der Node neu geschrieben.
fn edit_buffer(state: &mut EditorState, write: bool, op: impl FnOnce(&mut RichTextBuffer)) {
    let Some(edit) = state.text_edit.active_mut() else {
        return;
    };
    let node = edit.node;
    if !state.document.is_attached(node) {
        log::warn!("Bearbeiteter Node {} verschwunden, Session beendet", node);
        state.text_edit = TextEditSession::Inactive;
        feedback::clear_format_toolbar(&mut state.feedback);
        return;
    }

    op(&mut edit.buffer);
    let active = edit.buffer.active_formats();
    if write {
        let preserve = edit.original_buffer.opaque_nodes();
        edit.buffer
            .write_to_preserving(&mut state.document, node, &preserve);
        relayout(state);
    }
    feedback::show_format_toolbar(
        &mut state.feedback,
        node,
        state.layout.rect_or_zero(node),
        active,
    );
}

pub fn insert_text(state: &mut EditorState, text: &str) {
    edit_buffer(state, true, |buffer| buffer.insert_text(text));
}

pub fn insert_line_break(state: &mut EditorState) {
    edit_buffer(state, true, RichTextBuffer::insert_line_break);
}

pub fn delete_backward(state: &mut EditorState) {
    edit_buffer(state, true, RichTextBuffer::delete_backward);
}

pub fn delete_forward(state: &mut EditorState) {
    edit_buffer(state, true, RichTextBuffer::delete_forward);
}

pub fn apply_format(state: &mut EditorState, format: FormatCommand) {
    edit_buffer(state, true, |buffer| buffer.apply_format(format));
}

pub fn move_caret(state: &mut EditorState, motion: CaretMotion, extend: bool) {
    edit_buffer(state, false, |buffer| buffer.move_caret(motion, extend));
}

pub fn set_selection(state: &mut EditorState, anchor: usize, caret: usize) {
    edit_buffer(state, false, |buffer| buffer.set_selection(anchor, caret));
}

pub fn select_all(state: &mut EditorState) {
    edit_buffer(state, false, RichTextBuffer::select_all);
}

/// Release vor der Drag-Schwelle: Klick auf editierbares Element oder daneben.
pub fn click(state: &mut EditorState, pos: Vec2) {
    state.interaction = InteractionPhase::Idle;
    let hits = state.layout.hits_at(pos);

    if let Some(active) = state.editing_node() {
        if hits.contains(&active) {
            return;
        }
    }

    let editable = hits
        .iter()
        .copied()
        .find(|&id| state.classification.is_editable(id));
    match editable {
        Some(node) => {
            activate(state, node);
        }
        None if state.text_edit.is_active() => end_edit(state, EditEndReason::ClickOutside),
        None => {}
    }
}
