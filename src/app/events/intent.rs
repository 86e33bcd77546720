use std::collections::BTreeMap;

use glam::Vec2;
use serde::Deserialize;

use crate::core::{Granularity, NodeId, PlacementMode, Rect};
use crate::input::{FormatCommand, Key, Modifiers, PointerButton};

/// Editor-Intents.
/// Intents sind Eingaben vom Host ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum EditorIntent {
    /// Neues Markup laden (ersetzt das Dokument)
    LoadMarkupRequested { markup: String },
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: Vec2 },
    /// Host hat Boxen gemessen (Dokument-Koordinaten)
    LayoutMeasured { rects: BTreeMap<NodeId, Rect> },
    PointerDown {
        pos: Vec2,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove { pos: Vec2 },
    PointerUp {
        pos: Vec2,
        #[serde(default)]
        button: PointerButton,
    },
    KeyPressed {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Eingegebener Text (bereits layout-aufgelöst)
    TextInput { text: String },
    /// Host-Auswahl innerhalb des bearbeiteten Elements (Glyph-Indizes)
    TextSelectionChanged { anchor: usize, caret: usize },
    /// Editor hat den Fokus verloren
    FocusLost,
    /// Format-Button in der Toolbar
    FormatRequested { format: FormatCommand },
    SetPlacementModeRequested { mode: PlacementMode },
    SetGranularityRequested { granularity: Granularity },
    AutoArrangeRequested,
    DebugDumpRequested,
    /// Editor-Zeit fortschreiben (Animationen, Feedback)
    FrameAdvanced { elapsed_ms: u32 },
}
