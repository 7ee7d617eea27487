use crate::anchor::{AnchoringEngine, Snap, Stack, StackSide};
use crate::display::BoundsProvider;
use crate::dock::{HandleState, PanelState};
use crate::orientation::Orientation;
use crate::{clamp_axis, Offset, Point, COORDINATE_LIMIT};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        /// Pointer position relative to the handle origin at press time.
        grab: Offset,
        /// Side the panel follows on while the drag lasts.
        side: Option<StackSide>,
    },
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settled {
    /// Panel closed: the handle was parked on an edge.
    Snapped(Snap),
    /// Panel open: handle and panel were re-stacked.
    Stacked(Stack),
}

/// Turns pointer events on the handle into window moves.
///
/// While dragging, the handle follows the pointer unclamped and an open
/// panel follows the handle. Bounds are only enforced on release, so the
/// handle never jitters against an edge mid-drag.
#[derive(Debug, Clone)]
pub struct DragTracker {
    state: DragState,
}

fn bounded(pointer: Point) -> Point {
    Point::new(
        clamp_axis(-COORDINATE_LIMIT, pointer.x, COORDINATE_LIMIT),
        clamp_axis(-COORDINATE_LIMIT, pointer.y, COORDINATE_LIMIT),
    )
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DragTracker {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag. `side` is the side of the current stack when the panel
    /// is open; it stays fixed until release so the panel never flips
    /// across the handle mid-drag.
    pub fn press(&mut self, pointer: Point, handle: &HandleState, side: Option<StackSide>) {
        let grab = bounded(pointer) - handle.position;
        debug!(
            "Drag started at ({}, {}), grab offset ({}, {})",
            pointer.x, pointer.y, grab.x, grab.y
        );
        self.state = DragState::Dragging { grab, side };
    }

    /// Follow the pointer. Returns `false` when no drag is in progress.
    pub fn drag_to(
        &mut self,
        pointer: Point,
        handle: &mut HandleState,
        panel: &mut PanelState,
        engine: &AnchoringEngine,
        displays: &dyn BoundsProvider,
    ) -> bool {
        let (grab, side) = match &mut self.state {
            DragState::Idle => return false,
            DragState::Dragging { grab, side } => (*grab, side),
        };

        handle.position = bounded(pointer) - grab;

        if panel.visible {
            let screen = displays.screen_for(handle.position);
            let side = *side.get_or_insert_with(|| {
                StackSide::select(handle.rect(), handle.orientation, screen.usable())
            });
            panel.position = engine.follow_drag(handle.rect(), &screen, panel.size, side);
        }
        true
    }

    /// Finish the drag at `pointer` and settle both windows. Returns `None`
    /// when no drag is in progress.
    pub fn release(
        &mut self,
        pointer: Point,
        handle: &mut HandleState,
        panel: &mut PanelState,
        engine: &AnchoringEngine,
        displays: &dyn BoundsProvider,
    ) -> Option<Settled> {
        if !self.drag_to(pointer, handle, panel, engine, displays) {
            return None;
        }
        self.state = DragState::Idle;

        let screen = displays.screen_for(handle.position);
        if !panel.visible {
            let snap = engine.edge_snap(handle.rect(), &screen);
            handle.position = snap.handle.origin;
            handle.size = snap.handle.size;
            handle.orientation = snap.orientation;
            return Some(Settled::Snapped(snap));
        }

        let orientation = Orientation::for_release_position(
            handle.rect(),
            screen.usable(),
            engine.dock_config().orientation_margin,
        );
        handle.orientation = orientation;
        handle.size = engine.handle_size(orientation);

        let stack = engine.stacked_layout(handle.rect(), orientation, &screen, panel.size);
        handle.position = stack.handle.origin;
        panel.position = stack.panel;
        Some(Settled::Stacked(stack))
    }
}
