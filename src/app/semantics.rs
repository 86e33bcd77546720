//! Bewegungs-Semantik der beiden Platzierungsmodi.
//!
//! Der Pointer-Zustandsautomat kennt nur dieses Trait; welche Nodes gezogen
//! werden dürfen und welche Container Drops annehmen, entscheidet die
//! Implementierung des aktiven Modus.

use crate::app::drag_registry::DragRegistry;
use crate::app::EditorState;
use crate::core::tags::is_interactive;
use crate::core::{DocumentTree, Granularity, LayoutSnapshot, NodeId, PlacementMode};
use crate::shared::EditorOptions;

/// Read-only Sicht auf den Zustand, die die Prädikate brauchen.
pub struct MoveContext<'a> {
    pub tree: &'a DocumentTree,
    pub layout: &'a LayoutSnapshot,
    pub registry: &'a DragRegistry,
    pub options: &'a EditorOptions,
    pub mode: PlacementMode,
    pub edit_node: Option<NodeId>,
}

impl<'a> MoveContext<'a> {
    pub fn from_state(state: &'a EditorState) -> Self {
        Self {
            tree: &state.document,
            layout: &state.layout,
            registry: &state.registry,
            options: &state.options,
            mode: state.placement_mode,
            edit_node: state.text_edit.active_node(),
        }
    }

    fn is_movable_shape(&self, candidate: NodeId) -> bool {
        candidate != self.tree.root()
            && !self.tree.is_marker(candidate)
            && self.tree.is_attached(candidate)
            && self
                .layout
                .rect_or_zero(candidate)
                .meets(self.options.min_draggable_size)
    }

    fn is_blocked(&self, candidate: NodeId) -> bool {
        if candidate == self.tree.root() || self.tree.is_marker(candidate) {
            return true;
        }
        if self.tree.style(candidate).is_fixed_or_sticky() {
            return true;
        }
        if self.tree.tag(candidate).is_some_and(is_interactive) {
            return true;
        }
        self.edit_node
            .is_some_and(|edit| edit == candidate || self.tree.is_ancestor_of(edit, candidate))
    }
}

/// Vertrag zwischen Pointer-Automat und Platzierungs-Engine.
pub trait MoveSemantics {
    fn mode(&self) -> PlacementMode;

    /// Kandidat darf in diesem Modus bewegt werden.
    fn moves(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool;

    /// Ziel nimmt Drops an.
    fn accepts(&self, ctx: &MoveContext<'_>, target: NodeId) -> bool;

    /// Kandidat ist grundsätzlich gesperrt.
    fn invalid(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool;

    /// Alle Gates zusammen, wie sie beim Pointer-Down geprüft werden.
    fn can_drag(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool {
        ctx.registry.is_enabled()
            && ctx.registry.is_draggable(candidate)
            && self.moves(ctx, candidate)
            && !self.invalid(ctx, candidate)
    }
}

/// Listen-Semantik: Umsortieren zwischen registrierten Containern.
pub struct ReorderSemantics;

impl MoveSemantics for ReorderSemantics {
    fn mode(&self) -> PlacementMode {
        PlacementMode::Reorder
    }

    fn moves(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool {
        ctx.mode == PlacementMode::Reorder && ctx.is_movable_shape(candidate)
    }

    fn accepts(&self, ctx: &MoveContext<'_>, target: NodeId) -> bool {
        if !ctx.registry.is_container(target) || ctx.tree.is_marker(target) {
            return false;
        }
        match ctx.registry.effective_granularity() {
            Granularity::Simple => target == ctx.tree.root(),
            Granularity::Normal => true,
        }
    }

    fn invalid(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool {
        ctx.is_blocked(candidate)
    }
}

/// Koordinaten-Semantik: absolute Platzierung im Eltern-Element.
pub struct FreeformSemantics;

impl MoveSemantics for FreeformSemantics {
    fn mode(&self) -> PlacementMode {
        PlacementMode::Freeform
    }

    fn moves(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool {
        ctx.mode == PlacementMode::Freeform && ctx.is_movable_shape(candidate)
    }

    fn accepts(&self, ctx: &MoveContext<'_>, target: NodeId) -> bool {
        ctx.tree.is_element(target) && !ctx.tree.is_marker(target) && ctx.tree.is_attached(target)
    }

    fn invalid(&self, ctx: &MoveContext<'_>, candidate: NodeId) -> bool {
        ctx.is_blocked(candidate)
    }
}

static REORDER: ReorderSemantics = ReorderSemantics;
static FREEFORM: FreeformSemantics = FreeformSemantics;

/// Semantik des angegebenen Modus.
pub fn semantics_for(mode: PlacementMode) -> &'static dyn MoveSemantics {
    match mode {
        PlacementMode::Reorder => &REORDER,
        PlacementMode::Freeform => &FREEFORM,
    }
}
