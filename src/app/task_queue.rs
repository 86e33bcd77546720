//! Aufgeschobene Arbeit nach einem Intent.
//!
//! Drop, Text-Commit und Animationsschritte laufen nicht synchron im
//! auslösenden Command, sondern werden eingereiht und vom Controller
//! nach dem Intent abgearbeitet. Die Queue ist FIFO und begrenzt.

use std::collections::VecDeque;

use crate::core::NodeId;
use glam::Vec2;

/// Eine aufgeschobene Aufgabe.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Struktur nach Drop/Arrange neu einlesen und Ausgaben erzeugen
    CommitStructure,
    /// Text-Änderung übernehmen
    CommitText,
    /// Textbearbeitung nach einem Wechsel aktivieren
    ActivateTextEdit { node: NodeId },
    /// Settling-Phase beenden
    SettleComplete,
    /// Ein Element beim Auto-Arrange auf seine Zielposition setzen
    ArrangeStep {
        node: NodeId,
        pos: Vec2,
        delay_ms: u32,
    },
}

/// Begrenzte FIFO-Queue für [`DeferredTask`]s.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<DeferredTask>,
}

impl TaskQueue {
    const MAX_TASKS: usize = 1024;

    pub fn new() -> Self {
        Self::default()
    }

    /// Reiht eine Aufgabe ein. Doppelte Commits werden zusammengefasst.
    pub fn push(&mut self, task: DeferredTask) {
        let collapsible = matches!(
            task,
            DeferredTask::CommitStructure | DeferredTask::CommitText | DeferredTask::SettleComplete
        );
        if collapsible && self.tasks.contains(&task) {
            return;
        }
        if self.tasks.len() >= Self::MAX_TASKS {
            log::warn!("Task-Queue voll, älteste Aufgabe verworfen");
            self.tasks.pop_front();
        }
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<DeferredTask> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeferredTask> {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commits_are_collapsed_and_order_is_kept() {
        let mut queue = TaskQueue::new();
        queue.push(DeferredTask::CommitText);
        queue.push(DeferredTask::ActivateTextEdit { node: NodeId(3) });
        queue.push(DeferredTask::CommitText);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(DeferredTask::CommitText));
        assert_eq!(
            queue.pop(),
            Some(DeferredTask::ActivateTextEdit { node: NodeId(3) })
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let mut queue = TaskQueue::new();
        for i in 0..(TaskQueue::MAX_TASKS as u32 + 10) {
            queue.push(DeferredTask::ActivateTextEdit { node: NodeId(i) });
        }
        assert_eq!(queue.len(), TaskQueue::MAX_TASKS);
        assert_eq!(
            queue.pop(),
            Some(DeferredTask::ActivateTextEdit { node: NodeId(10) })
        );
    }
}
