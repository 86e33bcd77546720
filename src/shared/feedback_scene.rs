//! Feedback-Szene als Übergabevertrag zwischen Editor und Host-Darstellung.
//!
//! Reine Anzeige-Daten (Ghost, Einfügemarker, Ripples, Übergänge). Nichts im
//! Editor liest diese Werte zurück; ein Host darf sie jederzeit verwerfen.

use crate::core::{NodeId, Rect, SnapPoint};
use glam::Vec2;
use serde::Serialize;

/// Halbtransparenter Klon des gezogenen Elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostFeedback {
    pub source: NodeId,
    /// Aktuelle Box in Dokument-Koordinaten
    pub rect: Rect,
    pub opacity: f32,
    /// Markup des Klons
    pub markup: String,
}

/// Original-Element während eines Drags (gedimmt, ohne Pointer-Events).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimmedNode {
    pub node: NodeId,
    pub opacity: f32,
    pub pointer_events: bool,
}

/// Sichtbare Einfügelinie im Reorder-Modus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionMarkerFeedback {
    pub container: NodeId,
    pub rect: Rect,
}

/// Aktiver Snap-Punkt in Dokument-Koordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapIndicator {
    pub point: SnapPoint,
    pub absolute: Vec2,
}

/// Ripple-Kreis am Drop-Punkt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ripple {
    pub center: Vec2,
    pub max_radius: f32,
    pub started_at_ms: u64,
    pub duration_ms: u32,
}

/// Einzelnes Partikel einer Drop-Wolke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub origin: Vec2,
    /// Einheiten pro Sekunde
    pub velocity: Vec2,
    pub started_at_ms: u64,
    pub duration_ms: u32,
}

/// Animierter Positionswechsel eines Elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub node: NodeId,
    pub from: Rect,
    pub to: Rect,
    pub started_at_ms: u64,
    pub delay_ms: u32,
    pub duration_ms: u32,
}

impl Transition {
    pub fn ends_at_ms(&self) -> u64 {
        self.started_at_ms + self.delay_ms as u64 + self.duration_ms as u64
    }
}

/// Aktive Formate an der aktuellen Textauswahl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Formatierungs-Toolbar über dem bearbeiteten Element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatToolbar {
    pub node: NodeId,
    pub anchor: Rect,
    pub active: FormatState,
}

/// Gesamter transienter Feedback-Zustand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackScene {
    pub ghost: Option<GhostFeedback>,
    pub dimmed: Option<DimmedNode>,
    pub insertion_marker: Option<InsertionMarkerFeedback>,
    pub snap_indicator: Option<SnapIndicator>,
    pub format_toolbar: Option<FormatToolbar>,
    pub ripples: Vec<Ripple>,
    pub particles: Vec<Particle>,
    pub transitions: Vec<Transition>,
}

impl FeedbackScene {
    /// Gibt `true` zurück, wenn Drag-Feedback sichtbar ist.
    pub fn has_drag_feedback(&self) -> bool {
        self.ghost.is_some() || self.dimmed.is_some() || self.insertion_marker.is_some()
    }

    /// Gibt `true` zurück, wenn noch Animationen laufen.
    pub fn is_animating(&self) -> bool {
        !self.ripples.is_empty() || !self.particles.is_empty() || !self.transitions.is_empty()
    }
}
