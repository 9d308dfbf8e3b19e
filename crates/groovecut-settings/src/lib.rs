//! groovecut Settings Crate
//!
//! Handles engraving configuration files and builds the immutable
//! [`SurfaceConfig`] consumed by the toolpath engine.

pub mod config;
pub mod error;
pub mod surface;

pub use config::{
    default_config_path, EngravingSettings, GcodeSettings, OutputSettings, RasterSettings,
    SurfaceSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use surface::{SurfaceConfig, DEFAULT_SPEED};
