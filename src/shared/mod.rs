//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen und die Feedback-Szene, die `app` baut
//! und ein Host zur Darstellung konsumiert.

mod feedback_scene;
pub mod options;

pub use feedback_scene::{
    DimmedNode, FeedbackScene, FormatState, FormatToolbar, GhostFeedback,
    InsertionMarkerFeedback, Particle, Ripple, SnapIndicator, Transition,
};
pub use options::EditorOptions;
