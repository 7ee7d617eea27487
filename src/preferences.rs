use crate::config::PanelConfig;
use crate::orientation::Orientation;
use crate::{Point, Size};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const MIN_FONT_SIZE: u32 = 10;
const MAX_FONT_SIZE: u32 = 36;
const MIN_LINE_SPACING: u32 = 12;
const MAX_LINE_SPACING: u32 = 40;
const MIN_ZOOM: u32 = 50;
const MAX_ZOOM: u32 = 200;
const MIN_COLOR_STRENGTH: u32 = 40;
const MAX_COLOR_STRENGTH: u32 = 100;

const DEFAULT_THEME: &str = "dark";
const DEFAULT_PRIORITY_COLOR: &str = "cinza";

#[derive(Debug, Error, PartialEq)]
pub enum PreferenceError {
    #[error("unknown preference '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Everything that survives a restart.
///
/// The positional fields seed the dock; the appearance fields are carried
/// for the panel's editor and are only normalised here. Setters clamp to the
/// supported ranges so a hand-edited file can never push a value out of
/// range. Fields decode independently: a missing or unreadable one keeps
/// its default and the rest still load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preferences {
    /// Last settled handle origin. `None` until the handle has been placed.
    pub handle_location: Option<Point>,
    pub orientation: Orientation,
    pub always_on_top: bool,
    pub start_minimized: bool,
    pub panel_size: Size,

    theme: String,
    font_size: u32,
    line_spacing: u32,
    zoom_percent: u32,
    color_strength_percent: u32,
    priority_color: String,
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Ignoring unreadable preference '{}': {}", key, e);
            None
        }
    }
}

/// Whole numbers of any sign or size, saturated into `u32` for the
/// clamping setters.
fn number(fields: &Map<String, Value>, key: &str) -> Option<u32> {
    field::<i64>(fields, key).map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
}

impl<'de> Deserialize<'de> for Preferences {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut prefs = Preferences::default();

        if let Some(location) = field(&fields, "handle_location") {
            prefs.handle_location = location;
        }
        if let Some(orientation) = field::<String>(&fields, "orientation") {
            prefs.orientation = Orientation::from_lenient(&orientation);
        }
        if let Some(on_top) = field(&fields, "always_on_top") {
            prefs.always_on_top = on_top;
        }
        if let Some(minimized) = field(&fields, "start_minimized") {
            prefs.start_minimized = minimized;
        }
        if let Some(size) = field(&fields, "panel_size") {
            prefs.panel_size = size;
        }
        if let Some(theme) = field::<String>(&fields, "theme") {
            prefs.set_theme(&theme);
        }
        if let Some(size) = number(&fields, "font_size") {
            prefs.set_font_size(size);
        }
        if let Some(spacing) = number(&fields, "line_spacing") {
            prefs.set_line_spacing(spacing);
        }
        if let Some(zoom) = number(&fields, "zoom_percent") {
            prefs.set_zoom_percent(zoom);
        }
        if let Some(strength) = number(&fields, "color_strength_percent") {
            prefs.set_color_strength_percent(strength);
        }
        if let Some(color) = field::<String>(&fields, "priority_color") {
            prefs.set_priority_color(&color);
        }
        Ok(prefs)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            handle_location: None,
            orientation: Orientation::Horizontal,
            always_on_top: true,
            start_minimized: true,
            panel_size: Size::new(200, 300),
            theme: DEFAULT_THEME.to_string(),
            font_size: 14,
            line_spacing: 20,
            zoom_percent: 100,
            color_strength_percent: 100,
            priority_color: DEFAULT_PRIORITY_COLOR.to_string(),
        }
    }
}

impl Preferences {
    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: &str) {
        let theme = theme.trim();
        self.theme = if theme.is_empty() {
            DEFAULT_THEME.to_string()
        } else {
            theme.to_lowercase()
        };
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    pub fn line_spacing(&self) -> u32 {
        self.line_spacing
    }

    pub fn set_line_spacing(&mut self, spacing: u32) {
        self.line_spacing = spacing.clamp(MIN_LINE_SPACING, MAX_LINE_SPACING);
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom_percent
    }

    pub fn set_zoom_percent(&mut self, zoom: u32) {
        self.zoom_percent = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn color_strength_percent(&self) -> u32 {
        self.color_strength_percent
    }

    pub fn set_color_strength_percent(&mut self, strength: u32) {
        self.color_strength_percent = strength.clamp(MIN_COLOR_STRENGTH, MAX_COLOR_STRENGTH);
    }

    pub fn priority_color(&self) -> &str {
        &self.priority_color
    }

    pub fn set_priority_color(&mut self, color: &str) {
        let color = color.trim();
        self.priority_color = if color.is_empty() {
            DEFAULT_PRIORITY_COLOR.to_string()
        } else {
            color.to_lowercase()
        };
    }

    /// Font size the editor renders with once zoom is applied.
    pub fn effective_font_size(&self) -> f32 {
        self.font_size as f32 * self.zoom_percent as f32 / 100.0
    }

    /// Bring every field back into range. Applied after loading.
    pub fn normalize(&mut self, panel: &PanelConfig) {
        self.panel_size = panel.enforce_min(self.panel_size);
        let theme = self.theme.clone();
        self.set_theme(&theme);
        self.set_font_size(self.font_size);
        self.set_line_spacing(self.line_spacing);
        self.set_zoom_percent(self.zoom_percent);
        self.set_color_strength_percent(self.color_strength_percent);
        let color = self.priority_color.clone();
        self.set_priority_color(&color);
    }

    /// Update an appearance preference by name, as sent over IPC.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let invalid = || PreferenceError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let number = || value.trim().parse::<u32>().map_err(|_| invalid());

        match key {
            "theme" => self.set_theme(value),
            "priority_color" => self.set_priority_color(value),
            "font_size" => self.set_font_size(number()?),
            "line_spacing" => self.set_line_spacing(number()?),
            "zoom_percent" => self.set_zoom_percent(number()?),
            "color_strength_percent" => self.set_color_strength_percent(number()?),
            "start_minimized" => {
                self.start_minimized = value.trim().parse::<bool>().map_err(|_| invalid())?
            }
            _ => return Err(PreferenceError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
