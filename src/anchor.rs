//! Placement of the handle and the note panel.
//!
//! Three operations cover every situation the dock can be in:
//!
//! * [`AnchoringEngine::edge_snap`] parks a lone handle against the nearest
//!   edge of the usable screen area once a drag ends.
//! * [`AnchoringEngine::stacked_layout`] places panel and handle as one
//!   visual stack when the panel opens or a drag with the panel open ends.
//! * [`AnchoringEngine::follow_drag`] keeps the panel glued to the handle
//!   on every pointer move while the panel is open.
//!
//! All three are pure functions of their inputs. Positions they return are
//! always contained in the usable bounds they were given.

use crate::config::{Config, DockConfig};
use crate::display::ScreenBounds;
use crate::orientation::Orientation;
use crate::{clamp_axis, Point, Rect, Size};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Order in which edges win ties in [`AnchoringEngine::edge_snap`].
    pub const PRECEDENCE: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Vertical,
            Self::Top | Self::Bottom => Orientation::Horizontal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Where the panel sits relative to the handle in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackSide {
    /// Panel against the left screen edge, handle on its right.
    Left,
    /// Panel against the right screen edge, handle on its left.
    Right,
    /// Panel against the top screen edge, handle below it.
    Top,
    /// Panel against the bottom screen edge, handle above it.
    Bottom,
}

impl StackSide {
    /// The side with more room: a vertical handle stacks towards the half
    /// of the screen it is in horizontally, a horizontal one towards the
    /// half it is in vertically.
    pub fn select(handle: Rect, orientation: Orientation, usable: Rect) -> Self {
        match orientation {
            Orientation::Vertical => {
                let center_x = usable.min_x() + usable.width() / 2;
                if handle.min_x() < center_x {
                    Self::Left
                } else {
                    Self::Right
                }
            }
            Orientation::Horizontal => {
                let center_y = usable.min_y() + usable.height() / 2;
                if handle.min_y() > center_y {
                    Self::Bottom
                } else {
                    Self::Top
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub handle: Rect,
    pub orientation: Orientation,
    pub edge: Edge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stack {
    pub handle: Rect,
    pub panel: Point,
    pub side: StackSide,
}

#[derive(Debug, Clone)]
pub struct AnchoringEngine {
    dock: DockConfig,
    gap: i32,
    edge_margin: i32,
}

impl AnchoringEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            dock: config.dock.clone(),
            gap: config.stack.gap,
            edge_margin: config.stack.edge_margin,
        }
    }

    pub fn dock_config(&self) -> &DockConfig {
        &self.dock
    }

    pub fn gap(&self) -> i32 {
        self.gap
    }

    pub fn handle_size(&self, orientation: Orientation) -> Size {
        orientation.preferred_size(&self.dock)
    }

    /// Pull the handle onto the nearest usable edge and orient it along
    /// that edge.
    pub fn edge_snap(&self, handle: Rect, screen: &ScreenBounds) -> Snap {
        let usable = screen.usable();
        let distances = [
            handle.min_x() - usable.min_x(),
            usable.max_x() - handle.max_x(),
            handle.min_y() - usable.min_y(),
            usable.max_y() - handle.max_y(),
        ];

        // A handle dragged past an edge is as close to it as it gets.
        let mut edge = Edge::PRECEDENCE[0];
        let mut best = distances[0].max(0);
        for (candidate, distance) in Edge::PRECEDENCE.iter().zip(distances).skip(1) {
            let distance = distance.max(0);
            if distance < best {
                best = distance;
                edge = *candidate;
            }
        }

        let orientation = edge.orientation();
        let size = self.handle_size(orientation);
        let snap = self.dock.snap_margin;
        let margin = self.dock.clamp_margin;

        let (x, y) = match edge {
            Edge::Left | Edge::Right => {
                let x = if edge == Edge::Left {
                    usable.min_x() + snap
                } else {
                    usable.max_x() - size.width - snap
                };
                let y = clamp_axis(
                    usable.min_y() + margin,
                    handle.min_y(),
                    usable.max_y() - size.height - margin,
                );
                (x, y)
            }
            Edge::Top | Edge::Bottom => {
                let y = if edge == Edge::Top {
                    usable.min_y() + snap
                } else {
                    usable.max_y() - size.height - snap
                };
                let x = clamp_axis(
                    usable.min_x() + margin,
                    handle.min_x(),
                    usable.max_x() - size.width - margin,
                );
                (x, y)
            }
        };

        let placed = contain(Rect::new(Point::new(x, y), size), usable);
        debug!(
            "Edge snap: {:?} -> {} edge (distance {}), {} at ({}, {})",
            handle.origin,
            edge.name(),
            best,
            orientation,
            placed.origin.x,
            placed.origin.y
        );

        Snap {
            handle: placed,
            orientation,
            edge,
        }
    }

    /// Lay out handle and panel as one stack on the side of the handle with
    /// more room. The panel lands against the screen edge and the handle is
    /// moved next to it.
    pub fn stacked_layout(
        &self,
        handle: Rect,
        orientation: Orientation,
        screen: &ScreenBounds,
        panel_size: Size,
    ) -> Stack {
        let usable = screen.usable();
        let side = StackSide::select(handle, orientation, usable);
        let hs = handle.size;
        let margin = self.dock.clamp_margin;
        let edge = self.edge_margin;
        let gap = self.gap;

        let (panel, handle_origin) = match side {
            StackSide::Left | StackSide::Right => {
                let panel_x = if side == StackSide::Left {
                    usable.min_x() + edge
                } else {
                    usable.max_x() - panel_size.width - edge
                };
                let handle_x = if side == StackSide::Left {
                    panel_x + panel_size.width + gap
                } else {
                    panel_x - hs.width - gap
                };
                let panel_y = clamp_axis(
                    usable.min_y() + margin,
                    handle.min_y(),
                    usable.max_y() - panel_size.height - margin,
                );
                let handle_y = clamp_axis(
                    usable.min_y() + margin,
                    handle.min_y(),
                    usable.max_y() - hs.height - margin,
                );
                (Point::new(panel_x, panel_y), Point::new(handle_x, handle_y))
            }
            StackSide::Top | StackSide::Bottom => {
                let panel_y = if side == StackSide::Bottom {
                    usable.max_y() - panel_size.height - edge
                } else {
                    usable.min_y() + edge
                };
                let handle_y = if side == StackSide::Bottom {
                    panel_y - hs.height - gap
                } else {
                    panel_y + panel_size.height + gap
                };
                let panel_x = clamp_axis(
                    usable.min_x() + margin,
                    handle.min_x() + hs.width / 2 - panel_size.width / 2,
                    usable.max_x() - panel_size.width - margin,
                );
                let handle_x = clamp_axis(
                    usable.min_x() + margin,
                    handle.min_x(),
                    usable.max_x() - hs.width - margin,
                );
                (Point::new(panel_x, panel_y), Point::new(handle_x, handle_y))
            }
        };

        let panel = contain(Rect::new(panel, panel_size), usable).origin;
        let handle = contain(Rect::new(handle_origin, hs), usable);
        debug!(
            "Stacked layout on {:?}: panel at ({}, {}), handle at ({}, {})",
            side, panel.x, panel.y, handle.origin.x, handle.origin.y
        );

        Stack {
            handle,
            panel,
            side,
        }
    }

    /// Panel position that keeps it glued to a handle being dragged. The
    /// handle itself is not touched.
    pub fn follow_drag(
        &self,
        handle: Rect,
        screen: &ScreenBounds,
        panel_size: Size,
        side: StackSide,
    ) -> Point {
        let usable = screen.usable();
        let margin = self.dock.clamp_margin;
        let gap = self.gap;

        let origin = match side {
            StackSide::Left | StackSide::Right => {
                let x = if side == StackSide::Left {
                    handle.min_x() - gap - panel_size.width
                } else {
                    handle.max_x() + gap
                };
                let y = clamp_axis(
                    usable.min_y() + margin,
                    handle.min_y(),
                    usable.max_y() - panel_size.height - margin,
                );
                Point::new(x, y)
            }
            StackSide::Top | StackSide::Bottom => {
                let y = if side == StackSide::Top {
                    handle.min_y() - gap - panel_size.height
                } else {
                    handle.max_y() + gap
                };
                let x = clamp_axis(
                    usable.min_x() + margin,
                    handle.min_x() + handle.width() / 2 - panel_size.width / 2,
                    usable.max_x() - panel_size.width - margin,
                );
                Point::new(x, y)
            }
        };

        contain(Rect::new(origin, panel_size), usable).origin
    }

    /// Move `handle` the least distance needed to lie within the usable
    /// bounds.
    pub fn fit(&self, handle: Rect, screen: &ScreenBounds) -> Rect {
        contain(handle, screen.usable())
    }
}

/// Clamp each coordinate of `r` into `[min, max - extent]` of `bounds`.
pub fn contain(r: Rect, bounds: Rect) -> Rect {
    let x = clamp_axis(bounds.min_x(), r.min_x(), bounds.max_x() - r.width());
    let y = clamp_axis(bounds.min_y(), r.min_y(), bounds.max_y() - r.height());
    Rect::new(Point::new(x, y), r.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rect, size, Insets};

    fn engine() -> AnchoringEngine {
        AnchoringEngine::new(&Config::default())
    }

    fn full_hd() -> ScreenBounds {
        ScreenBounds::new(rect(0, 0, 1920, 1080), Insets::zero())
    }

    #[test]
    fn snap_near_top_edge() {
        let snap = engine().edge_snap(rect(960, 5, 90, 28), &full_hd());
        assert_eq!(snap.edge, Edge::Top);
        assert_eq!(snap.orientation, Orientation::Horizontal);
        assert_eq!(snap.handle, rect(960, 4, 90, 28));
    }

    #[test]
    fn snap_near_left_edge_turns_vertical() {
        let snap = engine().edge_snap(rect(4, 500, 90, 28), &full_hd());
        assert_eq!(snap.edge, Edge::Left);
        assert_eq!(snap.orientation, Orientation::Vertical);
        assert_eq!(snap.handle.origin.x, 4);
        assert_eq!(snap.handle.size, size(28, 90));
    }

    #[test]
    fn snap_to_right_uses_new_width() {
        let snap = engine().edge_snap(rect(1820, 500, 90, 28), &full_hd());
        assert_eq!(snap.edge, Edge::Right);
        assert_eq!(snap.handle.origin.x, 1920 - 28 - 4);
    }

    #[test]
    fn snap_to_bottom_respects_insets() {
        let screen = ScreenBounds::new(rect(0, 0, 1920, 1080), Insets::new(0, 0, 40, 0));
        let snap = engine().edge_snap(rect(700, 1000, 90, 28), &screen);
        assert_eq!(snap.edge, Edge::Bottom);
        assert_eq!(snap.handle.origin.y, 1040 - 28 - 4);
    }

    #[test]
    fn equal_distances_prefer_left_then_right_then_top() {
        // 100 from left, right, top and bottom on a 290x228 screen.
        let screen = ScreenBounds::new(rect(0, 0, 290, 228), Insets::zero());
        let snap = engine().edge_snap(rect(100, 100, 90, 28), &screen);
        assert_eq!(snap.edge, Edge::Left);

        // Right and top tie, left is farther.
        let tall = ScreenBounds::new(rect(0, 0, 290, 400), Insets::zero());
        let snap = engine().edge_snap(rect(150, 50, 90, 28), &tall);
        assert_eq!(snap.edge, Edge::Right);
    }

    #[test]
    fn handle_past_an_edge_snaps_back_to_it() {
        let snap = engine().edge_snap(rect(-300, 500, 90, 28), &full_hd());
        assert_eq!(snap.edge, Edge::Left);
        assert_eq!(snap.handle.origin.x, 4);
    }

    #[test]
    fn stacked_vertical_left_is_adjacent() {
        let e = engine();
        let stack = e.stacked_layout(
            rect(300, 400, 28, 90),
            Orientation::Vertical,
            &full_hd(),
            size(200, 300),
        );
        assert_eq!(stack.side, StackSide::Left);
        assert_eq!(stack.panel.x, 6);
        assert_eq!(stack.panel.x + 200 + e.gap(), stack.handle.origin.x);
        assert_eq!(stack.panel.y, 400);
        assert_eq!(stack.handle.origin.y, 400);
    }

    #[test]
    fn stacked_vertical_right_hugs_right_edge() {
        let e = engine();
        let stack = e.stacked_layout(
            rect(1500, 900, 28, 90),
            Orientation::Vertical,
            &full_hd(),
            size(200, 300),
        );
        assert_eq!(stack.side, StackSide::Right);
        assert_eq!(stack.panel.x, 1920 - 200 - 6);
        assert_eq!(stack.handle.origin.x, stack.panel.x - 28 - 6);
        // Panel clamped above the bottom margin, handle stays where it was.
        assert_eq!(stack.panel.y, 1080 - 300 - 8);
        assert_eq!(stack.handle.origin.y, 900);
    }

    #[test]
    fn stacked_horizontal_top_centres_panel() {
        let stack = engine().stacked_layout(
            rect(960, 4, 90, 28),
            Orientation::Horizontal,
            &full_hd(),
            size(200, 300),
        );
        assert_eq!(stack.side, StackSide::Top);
        assert_eq!(stack.panel, Point::new(960 + 45 - 100, 6));
        assert_eq!(stack.handle.origin, Point::new(960, 6 + 300 + 6));
    }

    #[test]
    fn stacked_horizontal_bottom_puts_handle_above_panel() {
        let stack = engine().stacked_layout(
            rect(20, 1048, 90, 28),
            Orientation::Horizontal,
            &full_hd(),
            size(200, 300),
        );
        assert_eq!(stack.side, StackSide::Bottom);
        assert_eq!(stack.panel, Point::new(8, 1080 - 300 - 6));
        assert_eq!(stack.handle.origin.y, stack.panel.y - 28 - 6);
        assert_eq!(stack.handle.origin.x, 20);
    }

    #[test]
    fn follow_drag_does_not_jump_between_sides() {
        let e = engine();
        let screen = full_hd();
        let mut last = None;
        for x in (0..1900).step_by(7) {
            let handle = rect(x, 400, 28, 90);
            let panel = e.follow_drag(handle, &screen, size(200, 300), StackSide::Left);
            if let Some(prev) = last {
                let step: i32 = panel.x - prev;
                assert!((0..=7).contains(&step), "step {} at x {}", step, x);
            }
            last = Some(panel.x);
        }
    }

    #[test]
    fn follow_drag_horizontal_below_handle() {
        let panel = engine().follow_drag(
            rect(900, 200, 90, 28),
            &full_hd(),
            size(200, 300),
            StackSide::Bottom,
        );
        assert_eq!(panel, Point::new(900 + 45 - 100, 200 + 28 + 6));
    }

    #[test]
    fn contain_prefers_lower_bound_when_too_big() {
        let placed = contain(rect(50, 50, 500, 500), rect(0, 0, 300, 300));
        assert_eq!(placed.origin, Point::new(0, 0));
    }
}
