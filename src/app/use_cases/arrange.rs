//! Auto-Arrange: ordnet frei platzierte Elemente untereinander an.
//!
//! Jedes Element wird als eigener `ArrangeStep` eingereiht; die Verzögerung
//! wächst pro Element um `arrange_stagger_ms`.

use glam::Vec2;

use crate::app::feedback;
use crate::app::task_queue::DeferredTask;
use crate::app::use_cases::freeform::{is_user_placed, write_position};
use crate::app::use_cases::layout::relayout;
use crate::app::EditorState;
use crate::core::tags::is_interactive;
use crate::core::{format_px, DocumentTree, LayoutSnapshot, NodeId};
use crate::shared::EditorOptions;

/// Rang beim Sortieren: kleiner kommt zuerst.
fn priority(tree: &DocumentTree, id: NodeId) -> u8 {
    let Some(element) = tree.element(id) else {
        return 2;
    };
    if is_interactive(&element.tag) {
        0
    } else if element.tag == "article" || element.classes().any(|c| c.contains("card")) {
        1
    } else {
        2
    }
}

/// Zielpositionen (Container-Koordinaten) der frei platzierten Kinder.
pub fn plan_arrangement(
    tree: &DocumentTree,
    layout: &LayoutSnapshot,
    container: NodeId,
    options: &EditorOptions,
) -> Vec<(NodeId, Vec2)> {
    let mut placed: Vec<(usize, NodeId)> = tree
        .element_children(container)
        .into_iter()
        .filter(|&id| is_user_placed(tree, id))
        .enumerate()
        .collect();
    placed.sort_by(|(order_a, a), (order_b, b)| {
        priority(tree, *a)
            .cmp(&priority(tree, *b))
            .then_with(|| {
                layout
                    .rect_or_zero(*a)
                    .min
                    .y
                    .total_cmp(&layout.rect_or_zero(*b).min.y)
            })
            .then_with(|| order_a.cmp(order_b))
    });

    let padding = options.boundary_padding;
    let mut y = padding;
    placed
        .into_iter()
        .map(|(_, id)| {
            let target = Vec2::new(padding, y);
            y += layout.rect_or_zero(id).height() + options.arrange_spacing;
            (id, target)
        })
        .collect()
}

/// Container mit mindestens einem frei platzierten Kind, in Dokumentreihenfolge.
fn arrange_containers(tree: &DocumentTree) -> Vec<NodeId> {
    let mut containers = Vec::new();
    for id in tree.element_descendants(tree.root()) {
        if !is_user_placed(tree, id) {
            continue;
        }
        if let Some(parent) = tree.parent(id) {
            if !containers.contains(&parent) {
                containers.push(parent);
            }
        }
    }
    containers
}

/// Reiht die Arrange-Schritte aller Container ein. Gibt die Anzahl zurück.
pub fn auto_arrange(state: &mut EditorState) -> usize {
    let mut steps = 0;
    for container in arrange_containers(&state.document) {
        let plan = plan_arrangement(&state.document, &state.layout, container, &state.options);
        for (index, (node, pos)) in plan.into_iter().enumerate() {
            state.tasks.push(DeferredTask::ArrangeStep {
                node,
                pos,
                delay_ms: u32::try_from(index)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(state.options.arrange_stagger_ms),
            });
            steps += 1;
        }
    }

    if steps > 0 {
        state.tasks.push(DeferredTask::CommitStructure);
        log::info!("Auto-Arrange: {} Elemente eingereiht", steps);
    } else {
        log::debug!("Auto-Arrange: keine frei platzierten Elemente");
    }
    steps
}

/// Setzt ein Element auf seine Arrange-Position.
pub fn apply_step(state: &mut EditorState, node: NodeId, pos: Vec2, delay_ms: u32) {
    if !state.document.is_attached(node) {
        log::debug!("Arrange-Schritt für entfernten Node {} übersprungen", node);
        return;
    }
    let Some(container) = state.document.parent(node) else {
        return;
    };
    let from = state.layout.rect_or_zero(node);
    let size = from.size();
    write_position(&mut state.document, node, pos, size);

    // Container wächst mit, damit das letzte Element nicht herausragt
    let needed = pos.y + size.y + state.options.boundary_padding;
    if container != state.document.root() {
        let mut style = state.document.style(container);
        if style.px("height").is_none() && style.px("min-height").unwrap_or(0.0) < needed {
            let current = state.layout.rect_or_zero(container).height();
            if current < needed {
                style.set("min-height", format_px(needed));
                state.document.set_style(container, &style);
            }
        }
    }

    relayout(state);
    let to = state.layout.rect_or_zero(node);
    feedback::push_transition(
        &mut state.feedback,
        node,
        from,
        to,
        state.clock_ms,
        delay_ms,
        state.options.transition_duration_ms,
    );
}
