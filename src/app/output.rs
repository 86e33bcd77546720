//! Ausgaben an den Host: aktualisiertes Markup und Ordnungs-Metadaten.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Ein Element der Ordnungs-Metadaten (rekursiv).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingNode {
    /// `id`-Attribut oder `{tag}-{node}`
    pub id: String,
    pub tag: String,
    pub class_name: String,
    /// Gekürzter Textinhalt
    pub text: String,
    pub children: Vec<OrderingNode>,
}

/// Nachricht an den Host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum EditorOutput {
    ContentUpdated(String),
    OrderingChanged(Vec<OrderingNode>),
}

/// Empfänger für Editor-Ausgaben.
pub trait ContentSink {
    fn on_update_content(&mut self, markup: &str);

    fn on_ordering_change(&mut self, ordering: &[OrderingNode]);
}

/// Gepufferte Ausgaben bis zur Abholung durch den Host.
#[derive(Debug, Default)]
pub struct Outbox {
    pending: VecDeque<EditorOutput>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, output: EditorOutput) {
        self.pending.push_back(output);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Entnimmt alle Ausgaben in Erzeugungsreihenfolge.
    pub fn drain(&mut self) -> Vec<EditorOutput> {
        self.pending.drain(..).collect()
    }

    /// Reicht alle Ausgaben an einen Sink weiter.
    pub fn forward_to(&mut self, sink: &mut dyn ContentSink) {
        for output in self.pending.drain(..) {
            match output {
                EditorOutput::ContentUpdated(markup) => sink.on_update_content(&markup),
                EditorOutput::OrderingChanged(ordering) => sink.on_ordering_change(&ordering),
            }
        }
    }
}
