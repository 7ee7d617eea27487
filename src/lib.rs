pub mod anchor;
pub mod app;
pub mod config;
pub mod display;
pub mod dock;
pub mod drag;
pub mod ipc;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod notes;
pub mod orientation;
pub mod preferences;
pub mod store;
pub mod window;

pub use app::DockApp;
pub use config::Config;
pub use dock::{Dock, DockCommand, Effects};
pub use orientation::Orientation;
pub use preferences::Preferences;

pub type Result<T> = anyhow::Result<T>;

/// Coordinate space of the desktop, in the units the windowing system uses
/// for window origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenSpace;

pub type Point = euclid::Point2D<i32, ScreenSpace>;
pub type Size = euclid::Size2D<i32, ScreenSpace>;
pub type Rect = euclid::Rect<i32, ScreenSpace>;
pub type Offset = euclid::Vector2D<i32, ScreenSpace>;
pub type Insets = euclid::SideOffsets2D<i32, ScreenSpace>;

pub fn point(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

pub fn size(width: i32, height: i32) -> Size {
    Size::new(width, height)
}

pub fn rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
    Rect::new(point(x, y), size(width, height))
}

/// Largest coordinate magnitude accepted from pointer input. Keeps every
/// sum of a coordinate and a window extent well inside `i32`.
pub const COORDINATE_LIMIT: i32 = 1_000_000;

/// Clamp `value` into `[min, max]`. Unlike `Ord::clamp` this never panics:
/// when the range is inverted (an extent larger than the space it must fit
/// in) the lower bound wins.
pub fn clamp_axis(min: i32, value: i32, max: i32) -> i32 {
    value.min(max).max(min)
}
