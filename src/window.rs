use crate::{Point, Size};

/// The handle's native window. Painting is the implementor's business.
pub trait HandleWindow {
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);
    fn size(&self) -> Size;
    fn set_size(&mut self, size: Size);
    fn set_always_on_top(&mut self, on_top: bool);
    fn set_visible(&mut self, visible: bool);
}

/// The note panel's native window. Its contents are never inspected.
pub trait PanelWindow {
    fn size(&self) -> Size;
    fn set_position(&mut self, position: Point);
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
    fn set_always_on_top(&mut self, on_top: bool);
}

/// Window that only records what it was told. Backs the daemon when no UI
/// shell is attached, and the tests.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindow {
    pub position: Point,
    pub size: Size,
    pub visible: bool,
    pub always_on_top: bool,
}

impl HeadlessWindow {
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            visible: false,
            always_on_top: false,
        }
    }
}

impl HandleWindow for HeadlessWindow {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.always_on_top = on_top;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl PanelWindow for HeadlessWindow {
    fn size(&self) -> Size {
        self.size
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.always_on_top = on_top;
    }
}
