use crate::config::DockConfig;
use crate::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which way the handle lies. A horizontal handle is wide and short, a
/// vertical one tall and narrow; the two share the same pair of dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }

    /// Lenient decoding used for stored preferences: anything that is not
    /// `vertical` (in any case) is horizontal.
    pub fn from_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("vertical") {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    pub fn preferred_size(self, config: &DockConfig) -> Size {
        match self {
            Self::Horizontal => Size::new(config.handle_length, config.handle_thickness),
            Self::Vertical => Size::new(config.handle_thickness, config.handle_length),
        }
    }

    /// Orientation implied by where a drag with the panel open was released:
    /// vertical near the left or right edge, horizontal anywhere else.
    pub fn for_release_position(handle: Rect, usable: Rect, margin: i32) -> Self {
        let near_left = handle.min_x() <= usable.min_x() + margin;
        let near_right = handle.max_x() >= usable.max_x() - margin;
        if near_left || near_right {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(format!("unknown orientation '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect;

    #[test]
    fn preferred_sizes_are_swapped() {
        let config = DockConfig::default();
        let h = Orientation::Horizontal.preferred_size(&config);
        let v = Orientation::Vertical.preferred_size(&config);
        assert_eq!((h.width, h.height), (90, 28));
        assert_eq!((v.width, v.height), (28, 90));
    }

    #[test]
    fn lenient_decoding_defaults_to_horizontal() {
        assert_eq!(Orientation::from_lenient("VERTICAL"), Orientation::Vertical);
        assert_eq!(Orientation::from_lenient("horizontal"), Orientation::Horizontal);
        assert_eq!(Orientation::from_lenient("invalid"), Orientation::Horizontal);
        assert_eq!(Orientation::from_lenient(""), Orientation::Horizontal);
    }

    #[test]
    fn release_position_rule() {
        let usable = rect(0, 0, 1920, 1080);
        let near_left = rect(80, 500, 90, 28);
        let near_right = rect(1920 - 80 - 90, 500, 90, 28);
        let middle = rect(900, 500, 90, 28);
        assert_eq!(Orientation::for_release_position(near_left, usable, 80), Orientation::Vertical);
        assert_eq!(Orientation::for_release_position(near_right, usable, 80), Orientation::Vertical);
        assert_eq!(Orientation::for_release_position(middle, usable, 80), Orientation::Horizontal);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Orientation::Horizontal.toggled(), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.toggled().toggled(), Orientation::Vertical);
    }
}
