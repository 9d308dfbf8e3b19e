//! Immutable surface configuration
//!
//! [`SurfaceConfig`] is built once from [`SurfaceSettings`] and never changes
//! afterwards. Derived quantities (groove width, the missing speed) are
//! computed in the constructor.

use crate::config::SurfaceSettings;
use crate::error::{ConfigError, SettingsError, SettingsResult};
use groovecut_core::{InputError, SurfaceKind};

const SPEED_TOLERANCE: f64 = 1e-9;

/// Linear speed used when neither speed is given (mm/s): outer edge of a
/// 12" record at 33 1/3 rpm
pub const DEFAULT_SPEED: f64 = 526.2;

/// Validated, read-only surface configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    kind: SurfaceKind,
    radius: f64,
    length: f64,
    depth: f64,
    angle: f64,
    pitch: f64,
    max_amplitude: f64,
    speed: f64,
    speed_angular: f64,
    start_position: f64,
    end_margin: f64,
    centerline_offset: f64,
    right_thread: bool,
    intersection_margin: f64,
    width: f64,
}

impl SurfaceConfig {
    /// Validate settings and derive the dependent values.
    pub fn new(s: &SurfaceSettings) -> SettingsResult<Self> {
        let named = [
            ("surface.radius", s.radius),
            ("surface.length", s.length),
            ("surface.depth", s.depth),
            ("surface.angle", s.angle),
            ("surface.pitch", s.pitch),
            ("surface.max_amplitude", s.max_amplitude),
            ("surface.start_position", s.start_position),
            ("surface.end_margin", s.end_margin),
            ("surface.centerline_offset", s.centerline_offset),
            ("surface.intersection_margin", s.intersection_margin),
        ];
        for (key, value) in named {
            if !value.is_finite() {
                return Err(SettingsError::invalid(key, format!("{} is not finite", value)));
            }
        }

        if s.radius <= 0.0 {
            return Err(SettingsError::invalid("surface.radius", "must be > 0"));
        }
        if s.length <= 0.0 {
            return Err(SettingsError::invalid("surface.length", "must be > 0"));
        }
        if s.depth <= 0.0 {
            return Err(SettingsError::invalid("surface.depth", "must be > 0"));
        }
        if s.radius <= s.depth {
            return Err(InputError::RadiusNotGreaterThanDepth {
                radius: s.radius,
                depth: s.depth,
            }
            .into());
        }
        if s.angle <= 0.0 || s.angle >= 180.0 {
            return Err(SettingsError::invalid(
                "surface.angle",
                "tool angle must be between 0 and 180 degrees",
            ));
        }
        if s.pitch <= 0.0 {
            return Err(SettingsError::invalid("surface.pitch", "must be > 0"));
        }
        if s.max_amplitude < 0.0 {
            return Err(SettingsError::invalid("surface.max_amplitude", "must be >= 0"));
        }
        if s.start_position < 0.0 || s.end_margin < 0.0 || s.intersection_margin < 0.0 {
            return Err(SettingsError::invalid(
                "surface",
                "start_position, end_margin and intersection_margin must be >= 0",
            ));
        }

        let (speed, speed_angular) = resolve_speeds(s.radius, s.speed, s.speed_angular)?;

        match s.kind {
            SurfaceKind::Cylinder => {
                if s.length - 2.0 * s.end_margin <= 0.0 {
                    return Err(SettingsError::invalid(
                        "surface.end_margin",
                        "margins leave no usable cylinder length",
                    ));
                }
            }
            SurfaceKind::Disc => {
                let r_max = s.radius - s.end_margin - s.start_position;
                if r_max <= s.end_margin {
                    return Err(SettingsError::invalid(
                        "surface.end_margin",
                        "margins leave no usable disc radius",
                    ));
                }
                if s.length <= s.depth {
                    return Err(SettingsError::invalid(
                        "surface.length",
                        "disc thickness must exceed the engraving depth",
                    ));
                }
            }
        }

        let width = 2.0 * s.depth * (s.angle.to_radians() / 2.0).tan();

        Ok(Self {
            kind: s.kind,
            radius: s.radius,
            length: s.length,
            depth: s.depth,
            angle: s.angle,
            pitch: s.pitch,
            max_amplitude: s.max_amplitude,
            speed,
            speed_angular,
            start_position: s.start_position,
            end_margin: s.end_margin,
            centerline_offset: s.centerline_offset,
            right_thread: s.right_thread,
            intersection_margin: s.intersection_margin,
            width,
        })
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Outer radius `R` (mm)
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Cylinder length or disc thickness `L` (mm)
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Tool included angle (degrees)
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Linear speed (mm/s)
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Angular speed (rad/s)
    pub fn speed_angular(&self) -> f64 {
        self.speed_angular
    }

    pub fn start_position(&self) -> f64 {
        self.start_position
    }

    pub fn end_margin(&self) -> f64 {
        self.end_margin
    }

    pub fn centerline_offset(&self) -> f64 {
        self.centerline_offset
    }

    pub fn right_thread(&self) -> bool {
        self.right_thread
    }

    pub fn intersection_margin(&self) -> f64 {
        self.intersection_margin
    }

    /// Groove width at the surface, `2·depth·tan(angle/2)` (mm)
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Radius of the first disc turn (mm)
    pub fn disc_outer_radius(&self) -> f64 {
        self.radius - self.end_margin - self.start_position
    }

    /// Innermost radius a disc groove may reach (mm)
    pub fn disc_inner_radius(&self) -> f64 {
        self.end_margin
    }

    /// Highest elevation a cylinder groove may reach (mm)
    pub fn cylinder_end(&self) -> f64 {
        self.length - self.end_margin
    }
}

fn resolve_speeds(
    radius: f64,
    speed: Option<f64>,
    speed_angular: Option<f64>,
) -> SettingsResult<(f64, f64)> {
    let (speed, speed_angular) = match (speed, speed_angular) {
        (Some(v), Some(w)) => {
            let expected = v / radius;
            if (w - expected).abs() > SPEED_TOLERANCE * expected.abs().max(1.0) {
                return Err(ConfigError::Inconsistent(format!(
                    "speed_angular {} rad/s does not match speed / radius = {} rad/s",
                    w, expected
                ))
                .into());
            }
            (v, w)
        }
        (Some(v), None) => (v, v / radius),
        (None, Some(w)) => (w * radius, w),
        (None, None) => (DEFAULT_SPEED, DEFAULT_SPEED / radius),
    };

    if !(speed.is_finite() && speed > 0.0) {
        return Err(SettingsError::invalid("surface.speed", "must be > 0"));
    }
    Ok((speed, speed_angular))
}
