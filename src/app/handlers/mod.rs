//! Feature-Handler für EditorCommand-Verarbeitung.
//!
//! Jeder Handler gruppiert die Command-Ausführung eines Feature-Bereichs.
//! Der Controller dispatcht an die passende Handler-Funktion.

pub mod document;
pub mod mode;
pub mod pointer;
pub mod tasks;
pub mod text_edit;
pub mod view;
