use crate::anchor::{AnchoringEngine, StackSide};
use crate::config::{Config, PanelConfig};
use crate::display::{BoundsProvider, ScreenBounds};
use crate::drag::{DragTracker, Settled};
use crate::orientation::Orientation;
use crate::preferences::{PreferenceError, Preferences};
use crate::store::SettingsStore;
use crate::window::{HandleWindow, PanelWindow};
use crate::{Point, Rect, Size};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleState {
    pub position: Point,
    pub size: Size,
    pub orientation: Orientation,
    pub always_on_top: bool,
}

impl HandleState {
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelState {
    pub position: Point,
    pub size: Size,
    pub visible: bool,
}

impl PanelState {
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DockCommand {
    /// Show the handle and lay out according to `start_minimized`.
    Start,
    Press(Point),
    Drag(Point),
    Release(Point),
    TogglePanel,
    ToggleOrientation,
    SetAlwaysOnTop(bool),
    ResizePanel(Size),
    /// Re-apply configuration: lay everything out again in place.
    Relayout,
    Shutdown,
}

impl DockCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Press(_) => "press",
            Self::Drag(_) => "drag",
            Self::Release(_) => "release",
            Self::TogglePanel => "toggle_panel",
            Self::ToggleOrientation => "toggle_orientation",
            Self::SetAlwaysOnTop(_) => "set_always_on_top",
            Self::ResizePanel(_) => "resize_panel",
            Self::Relayout => "relayout",
            Self::Shutdown => "shutdown",
        }
    }
}

/// What the UI layer has to change after a command. Only fields that
/// changed are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Effects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    /// A save was handed to the settings store and accepted.
    pub saved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    handle: HandleState,
    panel: PanelState,
    handle_visible: bool,
}

fn changed<T: PartialEq + Copy>(before: T, after: T) -> Option<T> {
    (before != after).then_some(after)
}

impl Effects {
    fn between(before: &Snapshot, after: &Snapshot) -> Self {
        Self {
            handle_position: changed(before.handle.position, after.handle.position),
            handle_size: changed(before.handle.size, after.handle.size),
            orientation: changed(before.handle.orientation, after.handle.orientation),
            handle_visible: changed(before.handle_visible, after.handle_visible),
            panel_position: changed(before.panel.position, after.panel.position),
            panel_visible: changed(before.panel.visible, after.panel.visible),
            always_on_top: changed(before.handle.always_on_top, after.handle.always_on_top),
            saved: false,
        }
    }

    fn full(state: &Snapshot) -> Self {
        Self {
            handle_position: Some(state.handle.position),
            handle_size: Some(state.handle.size),
            orientation: Some(state.handle.orientation),
            handle_visible: Some(state.handle_visible),
            panel_position: Some(state.panel.position),
            panel_visible: Some(state.panel.visible),
            always_on_top: Some(state.handle.always_on_top),
            saved: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handle_position.is_none()
            && self.handle_size.is_none()
            && self.orientation.is_none()
            && self.handle_visible.is_none()
            && self.panel_position.is_none()
            && self.panel_visible.is_none()
            && self.always_on_top.is_none()
    }

    /// Push the changes to real windows. The panel is moved before it is
    /// shown so it never flashes at a stale position.
    pub fn apply(&self, handle: &mut dyn HandleWindow, panel: &mut dyn PanelWindow) {
        if let Some(size) = self.handle_size {
            handle.set_size(size);
        }
        if let Some(position) = self.handle_position {
            handle.set_position(position);
        }
        if let Some(visible) = self.handle_visible {
            handle.set_visible(visible);
        }
        if let Some(on_top) = self.always_on_top {
            handle.set_always_on_top(on_top);
            panel.set_always_on_top(on_top);
        }
        if let Some(position) = self.panel_position {
            panel.set_position(position);
        }
        if let Some(visible) = self.panel_visible {
            panel.set_visible(visible);
        }
    }
}

/// Owner of the handle and panel geometry.
///
/// Every change goes through [`Dock::dispatch`], which runs the anchoring
/// engine against freshly queried screen bounds and persists the settled
/// result. Positions mid-drag are never persisted.
pub struct Dock {
    panel_config: PanelConfig,
    engine: AnchoringEngine,
    tracker: DragTracker,
    displays: Box<dyn BoundsProvider + Send>,
    store: Arc<dyn SettingsStore>,
    prefs: Preferences,
    handle: HandleState,
    panel: PanelState,
    handle_visible: bool,
    stack_side: Option<StackSide>,
}

impl Dock {
    pub fn new(
        config: &Config,
        displays: Box<dyn BoundsProvider + Send>,
        store: Arc<dyn SettingsStore>,
    ) -> Self {
        let mut prefs = store.load().unwrap_or_else(|e| {
            warn!("Failed to load preferences, using defaults: {}", e);
            Preferences::default()
        });
        prefs.normalize(&config.panel);

        let engine = AnchoringEngine::new(config);
        let orientation = prefs.orientation;
        let size = engine.handle_size(orientation);

        let position = match prefs.handle_location {
            Some(location) => {
                let screen = displays.screen_for(location);
                engine.fit(Rect::new(location, size), &screen).origin
            }
            None => {
                // Centred on the horizontal width whatever the saved orientation.
                let usable = displays.primary().usable();
                let width = engine.handle_size(Orientation::Horizontal).width;
                Point::new(
                    usable.min_x() + (usable.width() - width) / 2,
                    usable.min_y() + config.stack.edge_margin,
                )
            }
        };
        info!(
            "Dock seeded at ({}, {}), {}, panel {}x{}",
            position.x, position.y, orientation, prefs.panel_size.width, prefs.panel_size.height
        );

        Self {
            panel_config: config.panel.clone(),
            tracker: DragTracker::new(),
            displays,
            store,
            handle: HandleState {
                position,
                size,
                orientation,
                always_on_top: prefs.always_on_top,
            },
            panel: PanelState {
                position,
                size: prefs.panel_size,
                visible: false,
            },
            handle_visible: false,
            stack_side: None,
            prefs,
            engine,
        }
    }

    pub fn handle(&self) -> &HandleState {
        &self.handle
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    pub fn dispatch(&mut self, command: DockCommand) -> Effects {
        debug!("Dispatching {:?}", command);
        let before = self.snapshot();

        let settled = match command {
            DockCommand::Start => {
                self.handle_visible = true;
                if self.prefs.start_minimized {
                    self.snap_handle();
                } else {
                    self.open_panel();
                }
                true
            }
            DockCommand::Press(pointer) => {
                let side = if self.panel.visible {
                    self.stack_side
                } else {
                    None
                };
                self.tracker.press(pointer, &self.handle, side);
                false
            }
            DockCommand::Drag(pointer) => {
                self.tracker.drag_to(
                    pointer,
                    &mut self.handle,
                    &mut self.panel,
                    &self.engine,
                    self.displays.as_ref(),
                );
                false
            }
            DockCommand::Release(pointer) => {
                match self.tracker.release(
                    pointer,
                    &mut self.handle,
                    &mut self.panel,
                    &self.engine,
                    self.displays.as_ref(),
                ) {
                    Some(Settled::Stacked(stack)) => {
                        self.stack_side = Some(stack.side);
                        true
                    }
                    Some(Settled::Snapped(_)) => true,
                    None => false,
                }
            }
            DockCommand::TogglePanel => {
                if self.panel.visible {
                    self.panel.visible = false;
                    self.stack_side = None;
                    self.snap_handle();
                } else {
                    self.open_panel();
                }
                true
            }
            DockCommand::ToggleOrientation => {
                self.set_orientation(self.handle.orientation.toggled());
                self.relayout();
                true
            }
            DockCommand::SetAlwaysOnTop(on_top) => {
                self.handle.always_on_top = on_top;
                true
            }
            DockCommand::ResizePanel(size) => {
                self.panel.size = self.panel_config.enforce_min(size);
                self.relayout();
                true
            }
            DockCommand::Relayout => {
                self.relayout();
                true
            }
            DockCommand::Shutdown => {
                info!("Dock shutting down");
                true
            }
        };

        let after = self.snapshot();
        let mut effects = if command == DockCommand::Start {
            Effects::full(&after)
        } else {
            Effects::between(&before, &after)
        };
        if settled {
            effects.saved = self.persist();
        }
        effects
    }

    /// Change an appearance preference and persist it.
    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<Effects, PreferenceError> {
        self.prefs.set(key, value)?;
        Ok(Effects {
            saved: self.persist(),
            ..Effects::default()
        })
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            handle: self.handle,
            panel: self.panel,
            handle_visible: self.handle_visible,
        }
    }

    fn screen(&self) -> ScreenBounds {
        self.displays.screen_for(self.handle.position)
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.handle.orientation = orientation;
        self.handle.size = self.engine.handle_size(orientation);
    }

    fn snap_handle(&mut self) {
        let screen = self.screen();
        let snap = self.engine.edge_snap(self.handle.rect(), &screen);
        self.handle.position = snap.handle.origin;
        self.set_orientation(snap.orientation);
    }

    fn open_panel(&mut self) {
        self.stack();
        self.panel.visible = true;
    }

    fn stack(&mut self) {
        let screen = self.screen();
        let stack = self.engine.stacked_layout(
            self.handle.rect(),
            self.handle.orientation,
            &screen,
            self.panel.size,
        );
        self.handle.position = stack.handle.origin;
        self.panel.position = stack.panel;
        self.stack_side = Some(stack.side);
    }

    /// Lay out again in place: re-stack an open panel, otherwise just pull
    /// the handle back inside the usable bounds.
    fn relayout(&mut self) {
        if self.panel.visible {
            self.stack();
        } else {
            let screen = self.screen();
            self.handle.position = self.engine.fit(self.handle.rect(), &screen).origin;
        }
    }

    fn persist(&mut self) -> bool {
        self.prefs.handle_location = Some(self.handle.position);
        self.prefs.orientation = self.handle.orientation;
        self.prefs.always_on_top = self.handle.always_on_top;
        self.prefs.panel_size = self.panel.size;

        match self.store.save(&self.prefs) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save preferences, keeping in-memory state: {}", e);
                false
            }
        }
    }
}
