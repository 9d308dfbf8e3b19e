//! Advisory diagnostics
//!
//! Conditions that are reported to the operator but never stop generation.
//! They are collected next to the primary result and also logged.

use groovecut_core::SurfaceKind;
use std::fmt;

/// Non-fatal condition found while generating or checking a path
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// The path ran out of surface before the samples ran out
    BoundaryReached {
        surface: SurfaceKind,
        points_used: usize,
        points_available: usize,
    },
    /// Two adjacent turns are closer than the groove width plus margin
    SelfIntersection {
        /// Angle of the offending column, in [0, 360)
        angle_deg: f64,
        /// 1-based index of the lower turn
        turn_a: usize,
        /// 1-based index of the upper turn
        turn_b: usize,
    },
}

impl Advisory {
    pub fn is_intersection(&self) -> bool {
        matches!(self, Advisory::SelfIntersection { .. })
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::BoundaryReached {
                surface,
                points_used,
                points_available,
            } => {
                let reason = match surface {
                    SurfaceKind::Cylinder => "end of cylinder",
                    SurfaceKind::Disc => "centre of disc",
                };
                write!(
                    f,
                    "Engraving stopped by {} after {}/{} points",
                    reason, points_used, points_available
                )
            }
            Advisory::SelfIntersection {
                angle_deg,
                turn_a,
                turn_b,
            } => write!(
                f,
                "Engraving path intersects itself at angle {:.2}°, loop {}&{}",
                angle_deg, turn_a, turn_b
            ),
        }
    }
}
