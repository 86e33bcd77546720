use std::collections::BTreeMap;

use glam::Vec2;

use crate::app::drag_registry::DragRegistry;
use crate::app::output::Outbox;
use crate::app::task_queue::TaskQueue;
use crate::app::CommandLog;
use crate::core::{
    Classification, DocumentTree, Granularity, LayoutSnapshot, NodeId, PlacementMode, Rect,
};
use crate::shared::{EditorOptions, FeedbackScene};

use super::{InteractionPhase, TextEditSession};

/// Hauptzustand des Editors
pub struct EditorState {
    /// Lebender Dokument-Baum (Modell und Ansicht zugleich)
    pub document: DocumentTree,
    /// Bereinigtes Eingabe-Markup des letzten Ladevorgangs
    pub source_markup: String,
    /// Abgeleitete Boxen aller Nodes
    pub layout: LayoutSnapshot,
    /// Vom Host gemessene Boxen, gültig bis zur nächsten Strukturänderung
    pub measured_layout: BTreeMap<NodeId, Rect>,
    pub viewport: Vec2,
    /// Ergebnis der letzten Segmentierung
    pub classification: Classification,
    pub registry: DragRegistry,
    pub interaction: InteractionPhase,
    pub text_edit: TextEditSession,
    pub placement_mode: PlacementMode,
    /// Vom Nutzer gewählte Granularität (die effektive steht in der Registry)
    pub granularity: Granularity,
    /// Laufzeit-Optionen (Schwellen, Snap, Animation)
    pub options: EditorOptions,
    pub tasks: TaskQueue,
    pub outbox: Outbox,
    /// Visuelles Feedback für den Host
    pub feedback: FeedbackScene,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Monotone Editor-Zeit für Animationen
    pub clock_ms: u64,
    pub last_debug_dump: Option<String>,
    /// Zuletzt gemeldetes Markup
    pub last_markup: String,
}

impl EditorState {
    /// Erstellt einen leeren Editor mit Standard-Optionen
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            document: DocumentTree::new(),
            source_markup: String::new(),
            layout: LayoutSnapshot::default(),
            measured_layout: BTreeMap::new(),
            viewport: Vec2::from(options.viewport_size),
            classification: Classification::new(),
            registry: DragRegistry::disabled(),
            interaction: InteractionPhase::Idle,
            text_edit: TextEditSession::Inactive,
            placement_mode: options.default_placement_mode,
            granularity: options.default_granularity,
            tasks: TaskQueue::new(),
            outbox: Outbox::new(),
            feedback: FeedbackScene::default(),
            command_log: CommandLog::new(),
            clock_ms: 0,
            last_debug_dump: None,
            last_markup: String::new(),
            options,
        }
    }

    /// Aktuell gezogener Node, falls eine Drag-Session läuft
    pub fn dragged_node(&self) -> Option<NodeId> {
        self.interaction.drag_session().map(|s| s.target)
    }

    /// Aktuell bearbeiteter Node
    pub fn editing_node(&self) -> Option<NodeId> {
        self.text_edit.active_node()
    }

    /// Anzahl der Element-Nodes im Dokument (ohne Wurzel und Marker)
    pub fn element_count(&self) -> usize {
        self.document.element_descendants(self.document.root()).len()
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
