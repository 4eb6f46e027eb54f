//! Persisted tool settings.
//!
//! The engine persists its tool and style selection (never shape data)
//! between sessions: the snapshot is read once at startup and written once at
//! shutdown, as TOML under `~/.config/overmark/settings.toml`. A missing or
//! corrupt file falls back to built-in defaults with a logged warning; no
//! settings problem is ever surfaced to the caller as a failure.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::draw::{Color, FontDescriptor, color};
use crate::input::state::Style;
use crate::input::Tool;

/// Persistable subset of the session: active tool plus style fields.
///
/// # Example TOML
/// ```toml
/// tool = "pen"
/// width = 4.0
/// fill = false
/// highlight = false
/// font_family = "Sans"
/// font_size = 24.0
///
/// [color]
/// r = 1.0
/// g = 0.2
/// b = 0.2
/// a = 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Primary tool restored at startup
    #[serde(default)]
    pub tool: Tool,

    /// Drawing color
    #[serde(default = "default_color")]
    pub color: Color,

    /// Stroke thickness in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_width")]
    pub width: f64,

    /// Fill closed shapes before stroking the outline
    #[serde(default)]
    pub fill: bool,

    /// Draw new shapes at highlighter opacity
    #[serde(default)]
    pub highlight: bool,

    /// Font family name for text annotations
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font size for text annotations in points (valid range: 8.0 - 72.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: default_color(),
            width: default_width(),
            fill: false,
            highlight: false,
            font_family: default_font_family(),
            font_size: default_font_size(),
        }
    }
}

impl Settings {
    /// Builds the style the session should start with.
    pub fn to_style(&self) -> Style {
        Style {
            color: self.color,
            thickness: self.width,
            fill: self.fill,
            highlight: self.highlight,
            font: FontDescriptor::with_family(&self.font_family),
            font_size: self.font_size,
        }
        .clamped()
    }

    /// Captures a snapshot from the live tool/style state.
    pub fn capture(tool: Tool, style: &Style) -> Self {
        Self {
            tool,
            color: style.color,
            width: style.thickness,
            fill: style.fill,
            highlight: style.highlight,
            font_family: style.font.family.clone(),
            font_size: style.font_size,
        }
    }

    /// Validates and clamps all values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged, so a hand-edited file cannot push the engine out of range.
    fn validate_and_clamp(&mut self) {
        if !(1.0..=20.0).contains(&self.width) {
            warn!("Invalid width {:.1}, clamping to 1.0-20.0 range", self.width);
            self.width = self.width.clamp(1.0, 20.0);
        }

        if !(8.0..=72.0).contains(&self.font_size) {
            warn!(
                "Invalid font_size {:.1}, clamping to 8.0-72.0 range",
                self.font_size
            );
            self.font_size = self.font_size.clamp(8.0, 72.0);
        }

        let clamped = self.color.clamped();
        if clamped != self.color {
            warn!("Color components out of 0.0-1.0 range, clamping");
            self.color = clamped;
        }

        if self.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Sans'");
            self.font_family = default_font_family();
        }
    }

    /// Returns the path to the settings file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// (e.g., HOME not set).
    pub fn settings_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("overmark");

        Ok(config_dir.join("settings.toml"))
    }

    /// Loads the persisted snapshot, or defaults when it is absent or
    /// corrupt.
    ///
    /// This never fails: a malformed file is logged and replaced by defaults
    /// in memory, so corrupt input cannot crash the engine.
    pub fn load() -> Self {
        let path = match Self::settings_path() {
            Ok(path) => path,
            Err(err) => {
                warn!("Cannot resolve settings path ({err}); using defaults");
                return Self::default();
            }
        };
        Self::load_from(&path)
    }

    /// Loads from an explicit path with the same recovery semantics as
    /// [`load`](Settings::load).
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("Settings file not found, using defaults");
            debug!("Expected settings at: {}", path.display());
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                warn!(
                    "Settings file {} is corrupt ({err:#}); using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let mut settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate_and_clamp();
        Ok(settings)
    }

    /// Saves the snapshot to the default settings path.
    ///
    /// Creates the parent directory if it doesn't exist. Called once at
    /// shutdown.
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path()?;
        self.save_to(&path)
    }

    /// Saves the snapshot to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn default_color() -> Color {
    color::RED
}

fn default_width() -> f64 {
    3.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_size() -> f64 {
    32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");

        let mut settings = Settings::default();
        settings.tool = Tool::Ellipse;
        settings.color = color::BLUE;
        settings.width = 7.0;
        settings.fill = true;
        settings.highlight = true;
        settings.font_family = "Monospace".to_string();
        settings.font_size = 24.0;

        settings.save_to(&path).expect("save");
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        fs::write(&path, "tool = \"pen\"\nwidth = [not toml").expect("write");

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Settings::load_from(&dir.path().join("nope.toml"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn out_of_range_values_clamp_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "tool = \"rect\"\nwidth = 999.0\nfont_size = 1.0\n",
        )
        .expect("write");

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.tool, Tool::Rect);
        assert_eq!(loaded.width, 20.0);
        assert_eq!(loaded.font_size, 8.0);
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        fs::write(&path, "tool = \"arrow\"\n").expect("write");

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.tool, Tool::Arrow);
        assert_eq!(loaded.width, 3.0);
        assert_eq!(loaded.font_family, "Sans");
    }

    #[test]
    fn capture_and_to_style_round_trip() {
        let style = Style {
            color: color::GREEN,
            thickness: 5.0,
            fill: true,
            highlight: false,
            font: FontDescriptor::with_family("Serif"),
            font_size: 18.0,
        };

        let snapshot = Settings::capture(Tool::Line, &style);
        assert_eq!(snapshot.tool, Tool::Line);
        assert_eq!(snapshot.font_family, "Serif");

        let restored = snapshot.to_style();
        assert_eq!(restored.color, color::GREEN);
        assert_eq!(restored.thickness, 5.0);
        assert!(restored.fill);
        assert_eq!(restored.font.family, "Serif");
    }
}
