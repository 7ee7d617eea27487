use crate::display::Monitor;
use crate::{clamp_axis, Insets, Result, Size, COORDINATE_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dock: DockConfig,
    #[serde(default)]
    pub stack: StackConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ipc: IpcConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockConfig {
    #[serde(default = "default_handle_length")]
    pub handle_length: i32,
    #[serde(default = "default_handle_thickness")]
    pub handle_thickness: i32,
    /// Distance kept between a snapped handle and the edge it snapped to.
    #[serde(default = "default_snap_margin")]
    pub snap_margin: i32,
    /// Distance kept from the edges along the axis a window slides on.
    #[serde(default = "default_clamp_margin")]
    pub clamp_margin: i32,
    #[serde(default = "default_orientation_margin")]
    pub orientation_margin: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default = "default_stack_gap")]
    pub gap: i32,
    #[serde(default = "default_stack_edge_margin")]
    pub edge_margin: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_panel_min_width")]
    pub min_width: i32,
    #[serde(default = "default_panel_min_height")]
    pub min_height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Monitors used by the static bounds provider. Empty means a single
    /// monitor of `fallback_width` x `fallback_height`.
    #[serde(default)]
    pub monitors: Vec<Monitor>,
    #[serde(default = "default_fallback_width")]
    pub fallback_width: i32,
    #[serde(default = "default_fallback_height")]
    pub fallback_height: i32,
    /// Reserved chrome applied to monitors the OS reports without insets.
    #[serde(default)]
    pub insets: InsetsConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InsetsConfig {
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
    #[serde(default)]
    pub left: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
    #[serde(default = "default_notes_file")]
    pub notes_file: String,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcConfig {
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
}

fn default_handle_length() -> i32 {
    90
}
fn default_handle_thickness() -> i32 {
    28
}
fn default_snap_margin() -> i32 {
    4
}
fn default_clamp_margin() -> i32 {
    8
}
fn default_orientation_margin() -> i32 {
    80
}
fn default_stack_gap() -> i32 {
    6
}
fn default_stack_edge_margin() -> i32 {
    6
}
fn default_panel_min_width() -> i32 {
    200
}
fn default_panel_min_height() -> i32 {
    160
}
fn default_fallback_width() -> i32 {
    1920
}
fn default_fallback_height() -> i32 {
    1080
}
fn default_data_dir() -> PathBuf {
    home_dir().join(".docknotes")
}
fn default_settings_file() -> String {
    "settings.json".to_string()
}
fn default_notes_file() -> String {
    "notes.txt".to_string()
}
fn default_backup_dir() -> String {
    "backups".to_string()
}
fn default_socket_path() -> String {
    "/tmp/docknotes.sock".to_string()
}

pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

pub fn default_config_path() -> PathBuf {
    home_dir().join(".config").join("docknotes").join("config.toml")
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            handle_length: default_handle_length(),
            handle_thickness: default_handle_thickness(),
            snap_margin: default_snap_margin(),
            clamp_margin: default_clamp_margin(),
            orientation_margin: default_orientation_margin(),
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            gap: default_stack_gap(),
            edge_margin: default_stack_edge_margin(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_width: default_panel_min_width(),
            min_height: default_panel_min_height(),
        }
    }
}

impl PanelConfig {
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// Raise either dimension of `size` to the minimum editing area.
    /// Dimensions are also capped at [`COORDINATE_LIMIT`].
    pub fn enforce_min(&self, size: Size) -> Size {
        Size::new(
            clamp_axis(self.min_width, size.width, COORDINATE_LIMIT),
            clamp_axis(self.min_height, size.height, COORDINATE_LIMIT),
        )
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            monitors: Vec::new(),
            fallback_width: default_fallback_width(),
            fallback_height: default_fallback_height(),
            insets: InsetsConfig::default(),
        }
    }
}

impl From<InsetsConfig> for Insets {
    fn from(insets: InsetsConfig) -> Self {
        Insets::new(insets.top, insets.right, insets.bottom, insets.left)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            settings_file: default_settings_file(),
            notes_file: default_notes_file(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl StorageConfig {
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.settings_file)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(&self.notes_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(&self.backup_dir)
    }
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
