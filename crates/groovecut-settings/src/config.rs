//! Configuration and settings management for groovecut
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Surface settings (part dimensions, groove geometry, reading speed)
//! - G-code settings (pass depths, feeds, tool, file boilerplate)
//! - Raster settings (depth-map resolution and antialiasing)
//! - Output settings (destination folder, file naming, CSV splitting)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use crate::surface::SurfaceConfig;
use groovecut_core::SurfaceKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Surface and groove geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSettings {
    /// Cylinder or disc
    pub kind: SurfaceKind,
    /// Outer radius of the part (mm)
    pub radius: f64,
    /// Cylinder length, or disc thickness (mm)
    pub length: f64,
    /// Groove depth (mm)
    pub depth: f64,
    /// Included angle of the tool tip (degrees)
    pub angle: f64,
    /// Advance of the spiral per turn (mm)
    pub pitch: f64,
    /// Peak-to-peak groove displacement at full scale (mm)
    pub max_amplitude: f64,
    /// Linear reading speed (mm/s); derived from `speed_angular` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Angular reading speed (rad/s); derived from `speed` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_angular: Option<f64>,
    /// Offset of the first groove from the start margin (mm)
    pub start_position: f64,
    /// Unused band at each end of the surface (mm)
    pub end_margin: f64,
    /// Constant offset applied to the groove centreline (mm)
    pub centerline_offset: f64,
    /// Right-hand thread (angle decreases)
    pub right_thread: bool,
    /// Extra clearance required between adjacent turns (mm)
    pub intersection_margin: f64,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::Cylinder,
            radius: 27.0,
            length: 120.0,
            depth: 0.2,
            angle: 90.0,
            pitch: 3.0,
            max_amplitude: 1.0,
            speed: None,
            speed_angular: None,
            start_position: 0.0,
            end_margin: 1.0,
            centerline_offset: 0.0,
            right_thread: false,
            intersection_margin: 0.05,
        }
    }
}

/// G-code output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    /// Maximum depth removed in a single pass (mm)
    pub depth_of_cut: f64,
    /// Depth already cut before the first pass (mm)
    pub start_depth: f64,
    /// Engraving feed rate (mm/min)
    pub feed_rate: f64,
    /// Retract height between passes (mm)
    pub clearance_height: f64,
    /// Axis letter that moves the tool into the material
    pub depth_axis: String,
    /// Tool number
    pub tool_id: u32,
    /// Tool corrector (offset register) number
    pub corrector_id: u32,
    /// Boilerplate written at the top of every file; `{file}` is the 1-based
    /// file number
    pub header: String,
    /// Boilerplate written at the end of every file
    pub footer: String,
    /// Maximum number of characters of path text per file
    pub max_chunk_chars: usize,
    /// Extension of the written files
    pub file_extension: String,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            depth_of_cut: 0.045,
            start_depth: 0.0,
            feed_rate: 600.0,
            clearance_height: 2.0,
            depth_axis: "Z".to_string(),
            tool_id: 1,
            corrector_id: 1,
            header: "; groovecut part {part} file {file}\n; Generated: {date}\nG21 ; Set units to millimeters\nG90 ; Absolute positioning\nT{tool} D{corrector}\n".to_string(),
            footer: "\n; End of part {part}\n".to_string(),
            max_chunk_chars: 2_000_000,
            file_extension: "nc".to_string(),
        }
    }
}

/// Depth-map raster settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Size of one pixel (mm)
    pub pixel_size: f64,
    /// Antialias the groove by distance to its centreline
    pub interpolate: bool,
    /// Intensity of the untouched surface
    pub white: u8,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            pixel_size: 0.01,
            interpolate: true,
            white: 255,
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Folder receiving generated files
    pub output_directory: PathBuf,
    /// Base name of generated files, without extension
    pub output_name: String,
    /// Split CSV output into several files per turn
    pub split_files: bool,
    /// Number of CSV files per turn when splitting
    pub files_per_turn: f64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            output_name: "engraving".to_string(),
            split_files: false,
            files_per_turn: 4.0,
        }
    }
}

/// Complete engraving configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingSettings {
    /// Surface and groove geometry
    pub surface: SurfaceSettings,
    /// G-code output
    pub gcode: GcodeSettings,
    /// Depth-map output
    pub raster: RasterSettings,
    /// File output
    pub output: OutputSettings,
}

impl EngravingSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let settings: Self = match extension_of(path).as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension_of(path).as_deref() {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(format!("Failed to serialize: {}", e)))?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                )
                .into())
            }
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> SettingsResult<()> {
        // Surface rules live in the smart constructor
        SurfaceConfig::new(&self.surface)?;

        let g = &self.gcode;
        if !(g.depth_of_cut.is_finite() && g.depth_of_cut > 0.0) {
            return Err(SettingsError::invalid("gcode.depth_of_cut", "must be > 0"));
        }
        if !(g.start_depth.is_finite() && g.start_depth >= 0.0) {
            return Err(SettingsError::invalid("gcode.start_depth", "must be >= 0"));
        }
        if !(g.feed_rate.is_finite() && g.feed_rate > 0.0) {
            return Err(SettingsError::invalid("gcode.feed_rate", "must be > 0"));
        }
        if !g.clearance_height.is_finite() {
            return Err(SettingsError::invalid(
                "gcode.clearance_height",
                "must be finite",
            ));
        }
        let axis_ok = g.depth_axis.len() == 1
            && g.depth_axis.chars().all(|c| c.is_ascii_alphabetic())
            && !matches!(g.depth_axis.to_ascii_uppercase().as_str(), "X" | "A");
        if !axis_ok {
            return Err(SettingsError::invalid(
                "gcode.depth_axis",
                "must be a single axis letter other than X and A",
            ));
        }
        if g.max_chunk_chars == 0 {
            return Err(SettingsError::invalid("gcode.max_chunk_chars", "must be > 0"));
        }

        if !(self.raster.pixel_size.is_finite() && self.raster.pixel_size > 0.0) {
            return Err(SettingsError::invalid("raster.pixel_size", "must be > 0"));
        }

        if !(self.output.files_per_turn.is_finite() && self.output.files_per_turn > 0.0) {
            return Err(SettingsError::invalid("output.files_per_turn", "must be > 0"));
        }
        if self.output.output_name.trim().is_empty() {
            return Err(SettingsError::invalid("output.output_name", "must not be empty"));
        }

        Ok(())
    }

    /// Build the immutable surface configuration
    pub fn surface_config(&self) -> SettingsResult<SurfaceConfig> {
        SurfaceConfig::new(&self.surface)
    }
}

/// Default location of the settings file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("groovecut").join("config.toml"))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("No configuration directory on this platform".into())
        })
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
