use std::collections::BTreeMap;

use glam::Vec2;

use crate::app::state::EditEndReason;
use crate::core::{Granularity, NodeId, PlacementMode, Rect};
use crate::input::{CaretMotion, FormatCommand};

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // === Dokument ===
    /// Markup bereinigen, parsen und segmentieren
    LoadMarkup { markup: String },
    SetViewportSize { size: Vec2 },
    ApplyMeasuredLayout { rects: BTreeMap<NodeId, Rect> },
    AdvanceClock { elapsed_ms: u32 },

    // === Pointer / Drag ===
    /// Primär-Button gedrückt; Ziel wird beim Ausführen bestimmt
    ArmPointer { pos: Vec2 },
    /// Schwelle überschritten: Drag-Session öffnen
    StartDrag { target: NodeId, press: Vec2 },
    UpdateDrag { pos: Vec2 },
    DropDrag { pos: Vec2 },
    /// Laufende Session verwerfen und Ausgangszustand herstellen
    CancelDrag,
    /// Release vor der Schwelle
    ClickAt { pos: Vec2 },
    /// Armed-Zustand ohne Klick verlassen
    Disarm,

    // === Textbearbeitung ===
    ActivateTextEdit { node: NodeId },
    EndTextEdit { reason: EditEndReason },
    InsertText { text: String },
    InsertLineBreak,
    DeleteBackward,
    DeleteForward,
    MoveCaret { motion: CaretMotion, extend: bool },
    SetTextSelection { anchor: usize, caret: usize },
    SelectAllText,
    ApplyFormat { format: FormatCommand },

    // === Modi ===
    SetPlacementMode { mode: PlacementMode },
    TogglePlacementMode,
    SetGranularity { granularity: Granularity },
    AutoArrange,
    DebugDump,
}
