//! Application-Layer: Controller, State, Events und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod drag_registry;
pub mod events;
pub mod feedback;
pub mod handlers;
mod intent_mapping;
pub mod output;
pub mod semantics;
/// Editor-State
///
/// Dieses Modul verwaltet den Zustand des Editors (Dokument, Sessions, Optionen).
pub mod state;
pub mod task_queue;
pub mod text_buffer;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::EditorController;
pub use drag_registry::DragRegistry;
pub use events::{EditorCommand, EditorIntent};
pub use output::{ContentSink, EditorOutput, OrderingNode, Outbox};
pub use state::{EditEndReason, EditorState, InteractionPhase, TextEditSession};
pub use task_queue::{DeferredTask, TaskQueue};
