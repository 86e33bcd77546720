//! Spatial-Index (KD-Tree) über den Snap-Punkten einer Drag-Session.

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};
use serde::Serialize;

/// Herkunft eines Snap-Punkts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapKind {
    /// Punkt des festen Rasters
    Grid,
    /// Kante oder Mitte eines anderen platzierten Elements
    Element,
    /// Ecke oder Kantenmitte des Containers
    Edge,
}

/// Kandidat für magnetisches Ausrichten (Container-relative Koordinaten).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapPoint {
    pub pos: Vec2,
    pub kind: SnapKind,
}

impl SnapPoint {
    pub fn new(x: f32, y: f32, kind: SnapKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
        }
    }
}

/// Ergebnis einer Snap-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapMatch {
    /// Position in Erzeugungsreihenfolge
    pub index: usize,
    pub point: SnapPoint,
    /// Euklidische Distanz zur Anfrage
    pub distance: f32,
}

/// Unveränderliche Snap-Punkt-Menge einer Session mit KD-Tree-Vorfilter.
#[derive(Debug, Clone)]
pub struct SnapIndex {
    tree: KdTree<f64, 2>,
    points: Vec<SnapPoint>,
}

impl Default for SnapIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl SnapIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            points: Vec::new(),
        }
    }

    /// Baut den Index. Die Reihenfolge von `points` ist die Tie-Break-Reihenfolge.
    pub fn from_points(points: Vec<SnapPoint>) -> Self {
        let entries: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p.pos.x as f64, p.pos.y as f64])
            .collect();
        Self {
            tree: (&entries).into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SnapPoint] {
        &self.points
    }

    /// Findet den nächsten Punkt, der auf beiden Achsen höchstens `threshold`
    /// entfernt liegt. Gleich weite Punkte entscheidet die Erzeugungsreihenfolge.
    pub fn resolve(&self, query: Vec2, threshold: f32) -> Option<SnapMatch> {
        if self.is_empty() || threshold.is_sign_negative() {
            return None;
        }

        // Achsen-Box liegt im Kreis mit Radius threshold * sqrt(2)
        let radius_sq = 2.0 * (threshold as f64) * (threshold as f64);
        self.tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], radius_sq)
            .into_iter()
            .filter_map(|entry| {
                let index = entry.item as usize;
                let point = *self.points.get(index)?;
                let delta = (point.pos - query).abs();
                if delta.x > threshold || delta.y > threshold {
                    return None;
                }
                Some(SnapMatch {
                    index,
                    point,
                    distance: point.pos.distance(query),
                })
            })
            .min_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then_with(|| a.index.cmp(&b.index))
            })
    }
}
