//! Path Sequencer / Boundary Guard
//!
//! Drives a [`SurfaceEngine`] over a whole amplitude series and assembles the
//! resulting [`EngravingPath`]. Running off the usable surface is not an
//! error: the path is truncated before the offending point and an advisory
//! is recorded together with consumption statistics.

use crate::diagnostics::Advisory;
use crate::error::CamToolResult;
use crate::surface_mapping::SurfaceEngine;
use groovecut_core::{EngravingPath, InputError, SurfaceKind};
use groovecut_settings::SurfaceConfig;
use tracing::{debug, info, warn};

/// How much of the input and of the surface the path consumed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionStats {
    pub points_used: usize,
    pub points_available: usize,
    /// Physical extent covered by the path (mm)
    pub extent_used: f64,
    /// Physical extent available on the surface (mm)
    pub extent_available: f64,
    pub stopped_at_boundary: bool,
}

impl ConsumptionStats {
    /// Share of input samples turned into path points, in percent
    pub fn consumption_percent(&self) -> f64 {
        if self.points_available == 0 {
            return 0.0;
        }
        self.points_used as f64 / self.points_available as f64 * 100.0
    }

    /// Share of the usable surface covered, in percent
    pub fn extent_percent(&self) -> f64 {
        if self.extent_available <= 0.0 {
            return 0.0;
        }
        self.extent_used / self.extent_available * 100.0
    }
}

/// Result of sequencing one amplitude series
#[derive(Debug, Clone)]
pub struct SequencedPath {
    pub path: EngravingPath,
    pub stats: ConsumptionStats,
    pub advisories: Vec<Advisory>,
    /// Samples outside [-1, 1]; they are mapped unclamped
    pub out_of_range: usize,
}

/// Builds engraving paths for one surface at one frame rate.
#[derive(Debug, Clone)]
pub struct PathSequencer {
    config: SurfaceConfig,
    frame_rate: f64,
}

impl PathSequencer {
    pub fn new(config: SurfaceConfig, frame_rate: f64) -> CamToolResult<Self> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(InputError::InvalidFrameRate { frame_rate }.into());
        }
        Ok(Self { config, frame_rate })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Sequence a complete amplitude series held in memory.
    pub fn sequence(&self, amplitudes: &[f64]) -> CamToolResult<SequencedPath> {
        if amplitudes.is_empty() {
            return Err(InputError::EmptyAmplitudes.into());
        }
        self.sequence_iter(amplitudes.iter().copied())
    }

    /// Sequence a stream of samples. Gives the same result as
    /// [`sequence`](Self::sequence) on the collected stream.
    pub fn sequence_iter<I>(&self, samples: I) -> CamToolResult<SequencedPath>
    where
        I: IntoIterator<Item = f64>,
    {
        let engine = SurfaceEngine::new(&self.config, self.frame_rate)?;
        let kind = engine.kind();
        let mut points = engine.points(samples);

        let mut path = EngravingPath::new();
        for point in points.by_ref() {
            path.push(point);
        }

        let boundary = points.boundary().copied();
        let remaining = if boundary.is_some() {
            1 + points.skip_remaining()
        } else {
            0
        };

        if let Some(err) = points.error() {
            return Err(err.clone().into());
        }

        let points_used = path.len();
        let points_available = points_used + remaining;
        if points_available == 0 {
            return Err(InputError::EmptyAmplitudes.into());
        }

        let out_of_range = points.out_of_range();
        if out_of_range > 0 {
            debug!(
                "{} amplitude samples outside [-1, 1] mapped unclamped",
                out_of_range
            );
        }

        let (extent_used, extent_available) = self.extent(kind, &path);
        let stats = ConsumptionStats {
            points_used,
            points_available,
            extent_used,
            extent_available,
            stopped_at_boundary: boundary.is_some(),
        };

        let mut advisories = Vec::new();
        if boundary.is_some() {
            let advisory = Advisory::BoundaryReached {
                surface: kind,
                points_used,
                points_available,
            };
            warn!("{}", advisory);
            advisories.push(advisory);
        }

        info!(
            "Sequenced {}/{} points ({:.1}%), {:.3} of {:.3} mm used",
            points_used,
            points_available,
            stats.consumption_percent(),
            extent_used,
            extent_available
        );

        Ok(SequencedPath {
            path,
            stats,
            advisories,
            out_of_range,
        })
    }

    fn extent(&self, kind: SurfaceKind, path: &EngravingPath) -> (f64, f64) {
        let c = &self.config;
        match kind {
            SurfaceKind::Cylinder => {
                let available = c.length() - 2.0 * c.end_margin();
                let used = path
                    .last()
                    .map(|p| p.elevation - c.start_position() - c.end_margin())
                    .unwrap_or(0.0);
                (used, available)
            }
            SurfaceKind::Disc => {
                let available = c.disc_outer_radius() - c.disc_inner_radius();
                let used = path
                    .last()
                    .map(|p| c.disc_outer_radius() - p.radius)
                    .unwrap_or(0.0);
                (used, available)
            }
        }
    }
}
