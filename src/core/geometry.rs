//! Achsenparallele Rechtecke für Layout, Hit-Tests und Kollisionen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Achsenparalleles Rechteck (min = oben links, max = unten rechts).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Obere linke Ecke
    pub min: Vec2,
    /// Untere rechte Ecke
    pub max: Vec2,
}

impl Rect {
    /// Leeres Rechteck im Ursprung.
    pub const ZERO: Rect = Rect {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Erstellt ein Rechteck aus Position und Größe.
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size.max(Vec2::ZERO),
        }
    }

    /// Erstellt ein Rechteck aus x, y, Breite und Höhe.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_min_size(Vec2::new(x, y), Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Gibt `true` zurück, wenn das Rechteck keine Fläche hat.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Prüft, ob ein Punkt innerhalb liegt (Ränder inklusive).
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Prüft echte Überlappung. Berührende Kanten zählen nicht als Überlappung.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Verschiebt das Rechteck um `delta`.
    pub fn translate(&self, delta: Vec2) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Setzt die obere linke Ecke, Größe bleibt erhalten.
    pub fn with_min(&self, min: Vec2) -> Rect {
        Rect::from_min_size(min, self.size())
    }

    /// Vergrößert das Rechteck in alle Richtungen um `amount`.
    pub fn expand(&self, amount: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Prüft die Mindestgröße (Breite UND Höhe).
    pub fn meets(&self, min_size: [f32; 2]) -> bool {
        self.width() >= min_size[0] && self.height() >= min_size[1]
    }
}

/// Klemmt eine obere linke Position so, dass ein Element der Größe `size`
/// mit `padding` Abstand vollständig in einen Container der Größe `container` passt.
///
/// Ist der Container zu klein, gewinnt die untere Grenze (`padding`).
pub fn clamp_into(pos: Vec2, size: Vec2, container: Vec2, padding: f32) -> Vec2 {
    let max_x = (container.x - size.x - padding).max(padding);
    let max_y = (container.y - size.y - padding).max(padding);
    Vec2::new(pos.x.clamp(padding, max_x), pos.y.clamp(padding, max_y))
}
