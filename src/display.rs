use crate::config::{DisplayConfig, InsetsConfig};
use crate::{rect, Insets, Point, Rect};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A monitor's full rectangle together with the chrome the OS reserves on
/// it (menu bars, docks, taskbars).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub bounds: Rect,
    pub insets: Insets,
}

impl ScreenBounds {
    pub fn new(bounds: Rect, insets: Insets) -> Self {
        Self { bounds, insets }
    }

    /// The rectangle windows may occupy.
    pub fn usable(&self) -> Rect {
        self.bounds.inner_rect(self.insets)
    }
}

/// Source of monitor geometry. Queried before every anchoring computation,
/// so implementations must not cache across calls if the monitor layout can
/// change.
pub trait BoundsProvider {
    /// Screen containing `point`, if any monitor does.
    fn screen_at(&self, point: Point) -> Option<ScreenBounds>;

    /// The primary monitor. Always available.
    fn primary(&self) -> ScreenBounds;

    fn screen_for(&self, point: Point) -> ScreenBounds {
        match self.screen_at(point) {
            Some(screen) => screen,
            None => {
                warn!(
                    "No monitor contains ({}, {}), falling back to the primary monitor",
                    point.x, point.y
                );
                self.primary()
            }
        }
    }
}

/// Monitor entry as written in the `[display]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monitor {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub insets: InsetsConfig,
}

impl Monitor {
    pub fn screen(&self) -> ScreenBounds {
        ScreenBounds::new(
            rect(self.x, self.y, self.width, self.height),
            self.insets.into(),
        )
    }
}

/// Fixed monitor layout, taken from configuration.
#[derive(Debug, Clone)]
pub struct StaticDisplays {
    screens: Vec<ScreenBounds>,
    primary: usize,
}

impl StaticDisplays {
    pub fn new(screens: Vec<ScreenBounds>, primary: usize) -> Self {
        let screens = if screens.is_empty() {
            vec![ScreenBounds::new(rect(0, 0, 1920, 1080), Insets::zero())]
        } else {
            screens
        };
        let primary = primary.min(screens.len() - 1);
        Self { screens, primary }
    }

    pub fn single(screen: ScreenBounds) -> Self {
        Self::new(vec![screen], 0)
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        if config.monitors.is_empty() {
            debug!(
                "No monitors configured, using a single {}x{} display",
                config.fallback_width, config.fallback_height
            );
            return Self::single(ScreenBounds::new(
                rect(0, 0, config.fallback_width, config.fallback_height),
                config.insets.into(),
            ));
        }

        let primary = config
            .monitors
            .iter()
            .position(|m| m.primary)
            .unwrap_or(0);
        Self::new(config.monitors.iter().map(Monitor::screen).collect(), primary)
    }

    pub fn screens(&self) -> &[ScreenBounds] {
        &self.screens
    }
}

impl BoundsProvider for StaticDisplays {
    fn screen_at(&self, point: Point) -> Option<ScreenBounds> {
        self.screens
            .iter()
            .find(|screen| screen.bounds.contains(point))
            .copied()
    }

    fn primary(&self) -> ScreenBounds {
        self.screens[self.primary]
    }
}

/// Displays for the running system. Configured monitors take precedence;
/// otherwise macOS is asked directly and other platforms use the fallback
/// size.
pub fn system_displays(config: &DisplayConfig) -> Box<dyn BoundsProvider + Send> {
    #[cfg(target_os = "macos")]
    if config.monitors.is_empty() {
        return Box::new(crate::macos::CoreGraphicsDisplays::new(config.insets.into()));
    }
    Box::new(StaticDisplays::from_config(config))
}
