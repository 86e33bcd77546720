//! Editor-Zustand: Dokument, Sessions, Optionen und Ausgaben.

mod editor_state;
mod session;
mod text_session;

pub use editor_state::EditorState;
pub use session::{
    DragSession, EngineSession, FreeformSession, InsertionPoint, InsertionSide,
    InteractionPhase, ReorderSession,
};
pub use text_session::{ActiveEdit, EditEndReason, TextEditSession};
