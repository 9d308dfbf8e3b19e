//! # groovecut
//!
//! Turns an audio recording into a phonograph groove that can be cut into a
//! cylinder (wax-cylinder style, lathe with rotary `A` axis) or a flat disc.
//!
//! ## Architecture
//!
//! groovecut is organized as a workspace with multiple crates:
//!
//! 1. **groovecut-core** - Coordinate conversions, path types, errors
//! 2. **groovecut-settings** - Configuration files and the validated surface configuration
//! 3. **groovecut-camtools** - Path generation, intersection check, G-code, depth maps, export
//! 4. **groovecut** - Command-line binary that integrates all crates
//!
//! ## Outputs
//!
//! - **Points**: CSV point lists in metres, optionally split per fraction of a turn
//! - **G-code**: Multi-pass programs with `X` along the axis and `A` in degrees
//! - **Depth map**: Grayscale image of the groove at a given pixel size

pub mod audio;
pub mod pipeline;

pub use audio::AmplitudeSeries;
pub use pipeline::{Pipeline, RunSummary};

pub use groovecut_camtools::{Advisory, CamToolError, ConsumptionStats, IntersectionReport};
pub use groovecut_core::{EngravingPath, PathPoint, SurfaceKind};
pub use groovecut_settings::{EngravingSettings, SurfaceConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
