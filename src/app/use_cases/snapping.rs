//! Snap-Engine: Punktmengen für Freiform-Sessions und deren Auflösung.

use glam::Vec2;

use crate::core::{DocumentTree, LayoutSnapshot, NodeId, Rect, SnapIndex, SnapKind, SnapMatch, SnapPoint};
use crate::shared::EditorOptions;

/// Obergrenze für Rasterpunkte pro Session.
const MAX_GRID_POINTS: usize = 40_000;

/// Erzeugt die Snap-Punkte einer Session in Container-Koordinaten.
///
/// Reihenfolge: Raster (zeilenweise), Element-Punkte der Geschwister in
/// Dokumentreihenfolge, danach Ecken und Kantenmitten des Containers.
pub fn collect_snap_points(
    tree: &DocumentTree,
    layout: &LayoutSnapshot,
    container: NodeId,
    container_rect: Rect,
    dragged: NodeId,
    options: &EditorOptions,
) -> Vec<SnapPoint> {
    let size = container_rect.size();
    let mut points = Vec::new();

    if options.grid_snap_enabled && options.grid_size > 0.0 {
        let columns = (size.x / options.grid_size).floor() as usize + 1;
        let rows = (size.y / options.grid_size).floor() as usize + 1;
        if columns.saturating_mul(rows) <= MAX_GRID_POINTS {
            for row in 0..rows {
                for column in 0..columns {
                    points.push(SnapPoint::new(
                        column as f32 * options.grid_size,
                        row as f32 * options.grid_size,
                        SnapKind::Grid,
                    ));
                }
            }
        } else {
            log::debug!("Raster mit {}x{} Punkten übersprungen", columns, rows);
        }
    }

    if options.element_snap_enabled {
        for sibling in tree.element_children(container) {
            if sibling == dragged {
                continue;
            }
            let rect = layout.rect_or_zero(sibling);
            if rect.is_empty() {
                continue;
            }
            let local = rect.translate(-container_rect.min);
            let center = local.center();
            points.extend([
                SnapPoint::new(local.min.x, center.y, SnapKind::Element),
                SnapPoint::new(local.max.x, center.y, SnapKind::Element),
                SnapPoint::new(center.x, local.min.y, SnapKind::Element),
                SnapPoint::new(center.x, local.max.y, SnapKind::Element),
                SnapPoint::new(center.x, center.y, SnapKind::Element),
            ]);
        }

        let (w, h) = (size.x, size.y);
        points.extend([
            SnapPoint::new(0.0, 0.0, SnapKind::Edge),
            SnapPoint::new(w, 0.0, SnapKind::Edge),
            SnapPoint::new(0.0, h, SnapKind::Edge),
            SnapPoint::new(w, h, SnapKind::Edge),
            SnapPoint::new(w / 2.0, 0.0, SnapKind::Edge),
            SnapPoint::new(w, h / 2.0, SnapKind::Edge),
            SnapPoint::new(w / 2.0, h, SnapKind::Edge),
            SnapPoint::new(0.0, h / 2.0, SnapKind::Edge),
        ]);
    }

    points
}

/// Wendet den nächsten Snap-Punkt auf eine Kandidatenposition an.
///
/// `snap_pull_factor` 1.0 ersetzt die Position, kleinere Werte ziehen nur
/// anteilig in Richtung des Punkts.
pub fn apply_snap(
    index: &SnapIndex,
    candidate: Vec2,
    options: &EditorOptions,
) -> (Vec2, Option<SnapMatch>) {
    if !options.snapping_enabled() {
        return (candidate, None);
    }
    match index.resolve(candidate, options.snap_threshold) {
        Some(found) => {
            let pull = options.snap_pull_factor.clamp(0.0, 1.0);
            let pos = if pull >= 1.0 {
                found.point.pos
            } else {
                candidate + (found.point.pos - candidate) * pull
            };
            (pos, Some(found))
        }
        None => (candidate, None),
    }
}
