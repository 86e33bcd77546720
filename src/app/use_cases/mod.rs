//! Use-Cases der Application-Layer-Orchestrierung.

pub mod arrange;
pub mod clock;
pub mod debug_dump;
pub mod document;
pub mod drag;
pub mod freeform;
pub mod layout;
pub mod mode;
pub mod reorder;
pub mod segmentation;
pub mod serialization;
pub mod snapping;
pub mod text_edit;
