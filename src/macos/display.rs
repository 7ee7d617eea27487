use crate::display::{BoundsProvider, ScreenBounds};
use crate::{rect, Insets, Point};
use core_graphics::display::CGDisplay;
use log::{debug, warn};

/// Live monitor layout read from CoreGraphics on every query.
///
/// CoreGraphics reports display rectangles but not the space taken by the
/// menu bar and the Dock, so the configured insets are applied to every
/// display.
pub struct CoreGraphicsDisplays {
    insets: Insets,
}

impl CoreGraphicsDisplays {
    pub fn new(insets: Insets) -> Self {
        Self { insets }
    }

    fn screen_of(&self, display: CGDisplay) -> ScreenBounds {
        let bounds = display.bounds();
        ScreenBounds::new(
            rect(
                bounds.origin.x.round() as i32,
                bounds.origin.y.round() as i32,
                bounds.size.width.round() as i32,
                bounds.size.height.round() as i32,
            ),
            self.insets,
        )
    }
}

impl BoundsProvider for CoreGraphicsDisplays {
    fn screen_at(&self, point: Point) -> Option<ScreenBounds> {
        let ids = match CGDisplay::active_displays() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Failed to list active displays: {}", e);
                return None;
            }
        };

        ids.into_iter()
            .map(|id| self.screen_of(CGDisplay::new(id)))
            .find(|screen| screen.bounds.contains(point))
    }

    fn primary(&self) -> ScreenBounds {
        let screen = self.screen_of(CGDisplay::main());
        debug!("Main display bounds: {:?}", screen.bounds);
        screen
    }
}
