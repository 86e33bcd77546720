//! Markup Import/Export: Bereinigung, Parser und Writer.
//!
//! Eingaben werden bereinigt, tolerant in den lebenden Dokument-Baum
//! geparst und nach jeder Änderung wieder als Markup geschrieben.

pub mod parser;
pub mod sanitize;
pub mod writer;

pub use parser::parse_markup;
pub use sanitize::{sanitize_markup, SanitizedMarkup, FALLBACK_MARKUP};
pub use writer::{write_children, write_markup, write_node_markup};
