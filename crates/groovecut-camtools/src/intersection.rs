//! Self-Intersection Checker
//!
//! Samples the path once per turn at every angular offset and compares the
//! elevation of vertically adjacent turns. Turns closer than the groove
//! width plus the configured margin would cut into each other.
//!
//! The column index is clamped to the last point, so a partial final turn
//! can be under-counted.

use crate::diagnostics::Advisory;
use crate::error::{CamToolError, CamToolResult};
use groovecut_core::{EngravingPath, InputError, SurfaceKind};
use groovecut_settings::SurfaceConfig;
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// Outcome of a self-intersection check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionReport {
    pub count: usize,
    pub points_per_turn: f64,
    pub turns: usize,
    pub locations: Vec<Advisory>,
}

impl IntersectionReport {
    pub fn is_clear(&self) -> bool {
        self.count == 0
    }
}

pub struct IntersectionChecker<'a> {
    config: &'a SurfaceConfig,
    frame_rate: f64,
}

impl<'a> IntersectionChecker<'a> {
    pub fn new(config: &'a SurfaceConfig, frame_rate: f64) -> CamToolResult<Self> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(InputError::InvalidFrameRate { frame_rate }.into());
        }
        Ok(Self { config, frame_rate })
    }

    /// Check a cylinder path. Disc paths are not supported.
    pub fn check(&self, path: &EngravingPath) -> CamToolResult<IntersectionReport> {
        if self.config.kind() == SurfaceKind::Disc {
            return Err(CamToolError::Unsupported(
                "self-intersection check is only available for cylinders".to_string(),
            ));
        }

        let points = path.points();
        let n = points.len();
        let points_per_turn = TAU * self.config.radius() / self.config.speed() * self.frame_rate;
        let Some(last) = points.last() else {
            return Ok(IntersectionReport {
                points_per_turn,
                ..IntersectionReport::default()
            });
        };

        let turns = (last.angle.abs() / TAU).floor() as usize;
        let threshold = self.config.width() + self.config.intersection_margin();
        let offsets = points_per_turn.floor() as usize;

        let mut report = IntersectionReport {
            count: 0,
            points_per_turn,
            turns,
            locations: Vec::new(),
        };

        let mut column = Vec::with_capacity(turns);
        for i in 0..offsets {
            column.clear();
            column.extend((0..turns).map(|j| {
                let idx = ((j as f64 * points_per_turn + i as f64).floor() as usize).min(n - 1);
                points[idx].elevation
            }));

            for (k, pair) in column.windows(2).enumerate() {
                if pair[1] - pair[0] <= threshold {
                    let angle_deg = points[i.min(n - 1)].angle.to_degrees().rem_euclid(360.0);
                    let advisory = Advisory::SelfIntersection {
                        angle_deg,
                        turn_a: k + 1,
                        turn_b: k + 2,
                    };
                    debug!("{}", advisory);
                    report.locations.push(advisory);
                    report.count += 1;
                }
            }
        }

        if report.count > 0 {
            warn!(
                "Engraving path intersects itself {} times over {} turns",
                report.count, report.turns
            );
        }
        Ok(report)
    }
}
