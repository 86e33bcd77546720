//! Content-Serializer: Markup und Ordnungs-Metadaten aus dem lebenden Baum.

use crate::app::output::{EditorOutput, OrderingNode};
use crate::app::use_cases::layout::invalidate_measurements;
use crate::app::use_cases::segmentation::refresh_structure;
use crate::app::EditorState;
use crate::core::tags::is_hidden;
use crate::core::text::{collapse_whitespace, truncate_chars};
use crate::core::{DocumentTree, NodeId};
use crate::markup::write_markup;

/// Maximale Länge des Text-Ausschnitts in den Metadaten.
const TEXT_SNIPPET_CHARS: usize = 50;

/// Aktuelles Markup des Dokuments.
pub fn serialize(state: &EditorState) -> String {
    write_markup(&state.document)
}

/// Ordnungs-Metadaten der Element-Kinder der Wurzel (rekursiv).
pub fn ordering_metadata(tree: &DocumentTree) -> Vec<OrderingNode> {
    ordering_children(tree, tree.root())
}

fn ordering_children(tree: &DocumentTree, id: NodeId) -> Vec<OrderingNode> {
    tree.element_children(id)
        .into_iter()
        .filter(|&child| tree.tag(child).is_some_and(|tag| !is_hidden(tag)))
        .map(|child| ordering_node(tree, child))
        .collect()
}

fn ordering_node(tree: &DocumentTree, id: NodeId) -> OrderingNode {
    let tag = tree.tag(id).unwrap_or_default().to_string();
    let ordering_id = match tree.attr(id, "id") {
        Some(existing) if !existing.is_empty() => existing.to_string(),
        _ => format!("{}-{}", tag, id.0),
    };
    OrderingNode {
        id: ordering_id,
        class_name: tree.attr(id, "class").unwrap_or_default().to_string(),
        text: truncate_chars(&collapse_whitespace(&tree.text_content(id)), TEXT_SNIPPET_CHARS),
        children: ordering_children(tree, id),
        tag,
    }
}

/// Struktur-Commit: neu segmentieren, Markup und Metadaten melden.
pub fn commit_structure(state: &mut EditorState) {
    invalidate_measurements(state);
    refresh_structure(state);

    let markup = serialize(state);
    let ordering = ordering_metadata(&state.document);
    log::info!(
        "Struktur-Commit: {} Zeichen, {} Top-Level-Elemente",
        markup.len(),
        ordering.len()
    );
    state.outbox.push(EditorOutput::ContentUpdated(markup.clone()));
    state.outbox.push(EditorOutput::OrderingChanged(ordering));
    state.last_markup = markup;
}

/// Text-Commit: meldet das Markup nur bei tatsächlicher Änderung.
pub fn commit_text(state: &mut EditorState) {
    refresh_structure(state);
    let markup = serialize(state);
    if markup == state.last_markup {
        log::debug!("Text-Commit ohne Änderung");
        return;
    }
    log::info!("Text-Commit: {} Zeichen", markup.len());
    state.outbox.push(EditorOutput::ContentUpdated(markup.clone()));
    state.last_markup = markup;
}
