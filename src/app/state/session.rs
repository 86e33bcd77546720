//! Interaktions-Zustand: Pointer-Phasen und die aktive Drag-Session.

use crate::core::{NodeId, PlacementMode, Rect, SnapIndex, SnapMatch};
use glam::Vec2;

/// Phase der Pointer-Zustandsmaschine.
///
/// `Idle → Armed → Dragging → Settling → Idle`; `Armed → Idle` bei Release
/// vor der Schwelle (Klick), `Dragging → Idle` bei Escape.
#[derive(Debug, Clone, Default)]
pub enum InteractionPhase {
    #[default]
    Idle,
    /// Primär-Button gedrückt. Ohne `target` kann daraus nur ein Klick werden.
    Armed {
        target: Option<NodeId>,
        press: Vec2,
    },
    Dragging(Box<DragSession>),
    /// Drop ausgeführt, Struktur-Commit steht in der Task-Queue
    Settling,
}

impl InteractionPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionPhase::Dragging(_))
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match self {
            InteractionPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn drag_session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            InteractionPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Kurzname für Logs und Debug-Dump.
    pub fn label(&self) -> &'static str {
        match self {
            InteractionPhase::Idle => "idle",
            InteractionPhase::Armed { .. } => "armed",
            InteractionPhase::Dragging(_) => "dragging",
            InteractionPhase::Settling => "settling",
        }
    }
}

/// Transiente Drag-Session eines Nodes.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub target: NodeId,
    /// Abstand Pointer → obere linke Ecke der Ausgangsbox
    pub pointer_offset: Vec2,
    /// Ausgangsbox beim Drag-Start (Dokument-Koordinaten)
    pub origin: Rect,
    pub mode: PlacementMode,
    /// Letzte Pointer-Position
    pub pointer: Vec2,
    pub engine: EngineSession,
}

/// Modus-spezifischer Teil einer Drag-Session.
#[derive(Debug, Clone)]
pub enum EngineSession {
    Reorder(ReorderSession),
    Freeform(FreeformSession),
}

/// Seite des Anker-Geschwisters, an der eingefügt wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertionSide {
    Before,
    After,
}

/// Einfügeposition im Reorder-Modus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsertionPoint {
    pub container: NodeId,
    /// `None` bei leerem Container (Anhängen)
    pub anchor: Option<NodeId>,
    pub side: InsertionSide,
}

/// Reorder-Session: Einfügemarker wandert durch den Baum.
#[derive(Debug, Clone)]
pub struct ReorderSession {
    pub marker: NodeId,
    pub insertion: Option<InsertionPoint>,
}

/// Freiform-Session: absolute Platzierung im Eltern-Container.
#[derive(Debug, Clone)]
pub struct FreeformSession {
    pub container: NodeId,
    /// Container-Box beim Drag-Start
    pub container_rect: Rect,
    pub element_size: Vec2,
    /// Unveränderliche Snap-Punkte der Session (Container-Koordinaten)
    pub snap_index: SnapIndex,
    /// Aktuelle obere linke Ecke (Container-Koordinaten)
    pub current: Vec2,
    pub last_snap: Option<SnapMatch>,
    /// Zustand vor der Konvertierung, für Abbruch
    pub previous_style: Option<String>,
    pub previous_placed: Option<String>,
    pub container_style_before: Option<String>,
}
