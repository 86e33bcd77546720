//! Ghost-Renderer: schreibt transientes Drag- und Drop-Feedback in die
//! [`FeedbackScene`]. Nichts außerhalb dieses Moduls liest die Szene zurück.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::core::{DocumentTree, NodeId, Rect};
use crate::markup::write_node_markup;
use crate::shared::{
    DimmedNode, EditorOptions, FeedbackScene, FormatState, FormatToolbar, GhostFeedback,
    InsertionMarkerFeedback, Particle, Ripple, SnapIndicator, Transition,
};

/// Höhe der Einfügelinie.
const INSERTION_MARKER_HEIGHT: f32 = 4.0;

/// Klon des gezogenen Elements anzeigen und das Original dimmen.
pub fn show_drag_ghost(
    scene: &mut FeedbackScene,
    tree: &DocumentTree,
    node: NodeId,
    rect: Rect,
    options: &EditorOptions,
) {
    scene.ghost = Some(GhostFeedback {
        source: node,
        rect,
        opacity: options.ghost_opacity,
        markup: write_node_markup(tree, node),
    });
    scene.dimmed = Some(DimmedNode {
        node,
        opacity: options.dimmed_opacity,
        pointer_events: false,
    });
}

pub fn move_ghost(scene: &mut FeedbackScene, rect: Rect) {
    if let Some(ghost) = scene.ghost.as_mut() {
        ghost.rect = rect;
    }
}

/// Einfügelinie über die Breite des Containers an `y`.
pub fn set_insertion_marker(scene: &mut FeedbackScene, container: NodeId, container_rect: Rect, y: f32) {
    let rect = Rect::from_min_size(
        Vec2::new(container_rect.min.x, y - INSERTION_MARKER_HEIGHT / 2.0),
        Vec2::new(container_rect.width(), INSERTION_MARKER_HEIGHT),
    );
    scene.insertion_marker = Some(InsertionMarkerFeedback { container, rect });
}

pub fn clear_insertion_marker(scene: &mut FeedbackScene) {
    scene.insertion_marker = None;
}

pub fn set_snap_indicator(scene: &mut FeedbackScene, indicator: Option<SnapIndicator>) {
    scene.snap_indicator = indicator;
}

/// Entfernt alles Drag-Feedback (Ghost, Dimmung, Marker, Snap).
pub fn clear_drag(scene: &mut FeedbackScene) {
    scene.ghost = None;
    scene.dimmed = None;
    scene.insertion_marker = None;
    scene.snap_indicator = None;
}

/// Ripple und Partikelwolke am Drop-Punkt.
pub fn spawn_drop_cues(scene: &mut FeedbackScene, center: Vec2, now_ms: u64, options: &EditorOptions) {
    scene.ripples.push(Ripple {
        center,
        max_radius: options.ripple_radius,
        started_at_ms: now_ms,
        duration_ms: options.ripple_duration_ms,
    });

    let count = options.particle_count;
    if count == 0 || options.ripple_duration_ms == 0 {
        return;
    }
    let speed = options.ripple_radius * 1000.0 / options.ripple_duration_ms as f32;
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        scene.particles.push(Particle {
            origin: center,
            velocity: Vec2::from_angle(angle) * speed,
            started_at_ms: now_ms,
            duration_ms: options.ripple_duration_ms,
        });
    }
}

/// Animierten Übergang einreihen. Unveränderte Boxen erzeugen keinen.
pub fn push_transition(
    scene: &mut FeedbackScene,
    node: NodeId,
    from: Rect,
    to: Rect,
    now_ms: u64,
    delay_ms: u32,
    duration_ms: u32,
) {
    if from == to {
        return;
    }
    scene.transitions.retain(|t| t.node != node);
    scene.transitions.push(Transition {
        node,
        from,
        to,
        started_at_ms: now_ms,
        delay_ms,
        duration_ms,
    });
}

/// Entfernt abgelaufene Animationen.
pub fn prune(scene: &mut FeedbackScene, now_ms: u64) {
    scene
        .ripples
        .retain(|r| r.started_at_ms + r.duration_ms as u64 > now_ms);
    scene
        .particles
        .retain(|p| p.started_at_ms + p.duration_ms as u64 > now_ms);
    scene.transitions.retain(|t| t.ends_at_ms() > now_ms);
}

pub fn show_format_toolbar(scene: &mut FeedbackScene, node: NodeId, anchor: Rect, active: FormatState) {
    scene.format_toolbar = Some(FormatToolbar {
        node,
        anchor,
        active,
    });
}

pub fn clear_format_toolbar(scene: &mut FeedbackScene) {
    scene.format_toolbar = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drop_cues_spread_particles_evenly() {
        let mut scene = FeedbackScene::default();
        let options = EditorOptions::default();

        spawn_drop_cues(&mut scene, Vec2::new(50.0, 50.0), 0, &options);

        assert_eq!(scene.ripples.len(), 1);
        assert_eq!(scene.particles.len(), options.particle_count);
        let sum: Vec2 = scene.particles.iter().map(|p| p.velocity).sum();
        assert_relative_eq!(sum.length(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn prune_removes_finished_animations() {
        let mut scene = FeedbackScene::default();
        let options = EditorOptions::default();
        spawn_drop_cues(&mut scene, Vec2::ZERO, 100, &options);
        push_transition(
            &mut scene,
            NodeId(4),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 10.0, 10.0),
            100,
            500,
            200,
        );

        prune(&mut scene, 100 + options.ripple_duration_ms as u64);
        assert!(scene.ripples.is_empty());
        assert!(scene.particles.is_empty());
        assert_eq!(scene.transitions.len(), 1);

        prune(&mut scene, 800);
        assert!(!scene.is_animating());
    }

    #[test]
    fn identical_boxes_produce_no_transition() {
        let mut scene = FeedbackScene::default();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        push_transition(&mut scene, NodeId(1), rect, rect, 0, 0, 200);
        assert!(scene.transitions.is_empty());
    }

    #[test]
    fn clear_drag_keeps_animations() {
        let mut scene = FeedbackScene::default();
        let mut tree = DocumentTree::new();
        let node = tree.create_element(crate::core::ElementData::new("div"));
        let root = tree.root();
        tree.append_child(root, node);
        let options = EditorOptions::default();

        show_drag_ghost(&mut scene, &tree, node, Rect::new(0.0, 0.0, 40.0, 20.0), &options);
        spawn_drop_cues(&mut scene, Vec2::ZERO, 0, &options);
        assert!(scene.has_drag_feedback());

        clear_drag(&mut scene);
        assert!(!scene.has_drag_feedback());
        assert!(scene.is_animating());
        assert_eq!(scene.ghost, None);
    }
}
