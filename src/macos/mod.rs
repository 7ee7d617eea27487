pub mod display;

pub use display::CoreGraphicsDisplays;
