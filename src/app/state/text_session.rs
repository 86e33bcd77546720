//! Zustand der Inline-Textbearbeitung.

use crate::app::text_buffer::RichTextBuffer;
use crate::core::NodeId;

/// Anlass für das Beenden einer Textbearbeitung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditEndReason {
    /// Enter ohne Shift
    Enter,
    Escape,
    FocusLost,
    /// Klick außerhalb des bearbeiteten Elements
    ClickOutside,
    /// Wechsel auf ein anderes editierbares Element
    Swap,
    /// Drag-Start erzwingt den Commit
    DragStart,
    /// Neues Markup wird geladen
    Reload,
}

/// Laufende Bearbeitung eines Elements.
#[derive(Debug, Clone)]
pub struct ActiveEdit {
    pub node: NodeId,
    /// Inneres Markup beim Aktivieren
    pub original_markup: String,
    pub original_buffer: RichTextBuffer,
    pub buffer: RichTextBuffer,
}

/// Höchstens eine Textbearbeitung gleichzeitig.
#[derive(Debug, Clone, Default)]
pub enum TextEditSession {
    #[default]
    Inactive,
    Active(Box<ActiveEdit>),
}

impl TextEditSession {
    pub fn is_active(&self) -> bool {
        matches!(self, TextEditSession::Active(_))
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.active().map(|edit| edit.node)
    }

    pub fn active(&self) -> Option<&ActiveEdit> {
        match self {
            TextEditSession::Active(edit) => Some(edit),
            TextEditSession::Inactive => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveEdit> {
        match self {
            TextEditSession::Active(edit) => Some(edit),
            TextEditSession::Inactive => None,
        }
    }

    /// Beendet die Session und gibt sie zurück.
    pub fn take(&mut self) -> Option<Box<ActiveEdit>> {
        match std::mem::take(self) {
            TextEditSession::Active(edit) => Some(edit),
            TextEditSession::Inactive => None,
        }
    }
}
