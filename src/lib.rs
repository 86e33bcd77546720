//! Markup Canvas Editor Library.
//! Headless Direct-Manipulation-Engine als Library exportiert für Hosts, Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod input;
pub mod markup;
pub mod shared;

pub use app::{
    ContentSink, EditorCommand, EditorController, EditorIntent, EditorOutput, EditorState,
    OrderingNode,
};
pub use core::{
    Classification, DocumentTree, Granularity, LayoutSnapshot, NodeClass, NodeId, PlacementMode,
    Rect, SnapIndex, SnapKind, SnapMatch, SnapPoint,
};
pub use markup::{parse_markup, sanitize_markup, write_markup};
pub use shared::{EditorOptions, FeedbackScene};
