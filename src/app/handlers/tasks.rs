//! Handler für aufgeschobene Aufgaben aus der Task-Queue.

use crate::app::task_queue::DeferredTask;
use crate::app::use_cases;
use crate::app::EditorState;

/// Führt eine aufgeschobene Aufgabe aus.
pub fn run(state: &mut EditorState, task: DeferredTask) {
    match task {
        DeferredTask::CommitStructure => use_cases::serialization::commit_structure(state),
        DeferredTask::CommitText => use_cases::serialization::commit_text(state),
        DeferredTask::ActivateTextEdit { node } => {
            use_cases::text_edit::activate(state, node);
        }
        DeferredTask::SettleComplete => use_cases::drag::settle_complete(state),
        DeferredTask::ArrangeStep {
            node,
            pos,
            delay_ms,
        } => use_cases::arrange::apply_step(state, node, pos, delay_ms),
    }
}
