//! Surface Mapping Engine
//!
//! Maps one amplitude sample to one tool-tip position on the surface. The
//! groove is a regular spiral (helix on a cylinder, inward spiral on a disc)
//! displaced by the amplitude, exactly as in mechanical sound recording.
//!
//! The disc variant carries the previous angle from one sample to the next;
//! that state lives in the engine value and is reset only by building a new
//! engine.

use groovecut_core::{InputError, PathPoint, SurfaceKind};
use groovecut_settings::SurfaceConfig;
use std::f64::consts::TAU;

/// Outcome of mapping a single sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MappingStep {
    /// The point lies on the usable surface
    Point(PathPoint),
    /// The point would leave the usable surface; it must not be cut
    BoundaryReached(PathPoint),
}

/// Helical groove on the outside of a cylinder.
#[derive(Debug, Clone)]
pub struct CylinderMapper {
    tip_radius: f64,
    angle_per_sample: f64,
    pitch: f64,
    half_amplitude: f64,
    base_elevation: f64,
    max_elevation: f64,
    right_thread: bool,
}

impl CylinderMapper {
    pub fn new(config: &SurfaceConfig, frame_rate: f64) -> Result<Self, InputError> {
        validate_frame_rate(frame_rate)?;
        Ok(Self {
            tip_radius: config.radius() - config.depth(),
            angle_per_sample: config.speed_angular() / frame_rate,
            pitch: config.pitch(),
            half_amplitude: config.max_amplitude() / 2.0,
            base_elevation: config.end_margin()
                + config.start_position()
                + config.centerline_offset(),
            max_elevation: config.cylinder_end(),
            right_thread: config.right_thread(),
        })
    }

    /// Position of sample `index`. Stateless: any index may be requested.
    pub fn map(&self, index: usize, amplitude: f64) -> MappingStep {
        let phase = index as f64 * self.angle_per_sample;
        let elevation =
            phase * self.pitch / TAU + amplitude * self.half_amplitude + self.base_elevation;
        let angle = if self.right_thread { -phase } else { phase };

        let point = PathPoint::new(self.tip_radius, angle, elevation);
        if elevation > self.max_elevation {
            MappingStep::BoundaryReached(point)
        } else {
            MappingStep::Point(point)
        }
    }
}

/// Inward spiral on the face of a disc.
#[derive(Debug, Clone)]
pub struct DiscMapper {
    outer_radius: f64,
    inner_radius: f64,
    angle_step: f64,
    pitch: f64,
    half_amplitude: f64,
    centerline_offset: f64,
    elevation: f64,
    right_thread: bool,
    previous_angle: Option<f64>,
}

impl DiscMapper {
    pub fn new(config: &SurfaceConfig, frame_rate: f64) -> Result<Self, InputError> {
        validate_frame_rate(frame_rate)?;

        // Chord relation: the step that keeps the tool speed at `speed`
        let ratio = config.speed_angular() / (2.0 * frame_rate);
        if ratio > 1.0 {
            return Err(InputError::OutOfRange {
                name: "speed_angular / (2 * frame_rate)".to_string(),
                value: ratio,
                reason: "angular step is undefined above 1; raise the frame rate".to_string(),
            });
        }

        Ok(Self {
            outer_radius: config.disc_outer_radius(),
            inner_radius: config.disc_inner_radius(),
            angle_step: 2.0 * ratio.asin(),
            pitch: config.pitch(),
            half_amplitude: config.max_amplitude() / 2.0,
            centerline_offset: config.centerline_offset(),
            elevation: config.length() - config.depth(),
            right_thread: config.right_thread(),
            previous_angle: None,
        })
    }

    /// Angle added between two consecutive samples (rad)
    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    /// Position of the next sample. Samples must be supplied in order.
    pub fn map(&mut self, amplitude: f64) -> MappingStep {
        let phase = match self.previous_angle {
            None => 0.0,
            Some(prev) => prev + self.angle_step,
        };
        self.previous_angle = Some(phase);

        let radius = self.outer_radius - phase * self.pitch / TAU
            + amplitude * self.half_amplitude
            + self.centerline_offset;
        let angle = if self.right_thread { -phase } else { phase };

        let point = PathPoint::new(radius, angle, self.elevation);
        if radius < self.inner_radius {
            MappingStep::BoundaryReached(point)
        } else {
            MappingStep::Point(point)
        }
    }
}

/// Mapping engine for either surface variant.
#[derive(Debug, Clone)]
pub enum SurfaceEngine {
    Cylinder(CylinderMapper),
    Disc(DiscMapper),
}

impl SurfaceEngine {
    /// Build a fresh engine for the configured surface.
    pub fn new(config: &SurfaceConfig, frame_rate: f64) -> Result<Self, InputError> {
        match config.kind() {
            SurfaceKind::Cylinder => Ok(Self::Cylinder(CylinderMapper::new(config, frame_rate)?)),
            SurfaceKind::Disc => Ok(Self::Disc(DiscMapper::new(config, frame_rate)?)),
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        match self {
            Self::Cylinder(_) => SurfaceKind::Cylinder,
            Self::Disc(_) => SurfaceKind::Disc,
        }
    }

    /// Map the sample at `index`. Indices must arrive in increasing order,
    /// starting at 0.
    pub fn map(&mut self, index: usize, amplitude: f64) -> MappingStep {
        match self {
            Self::Cylinder(m) => m.map(index, amplitude),
            Self::Disc(m) => m.map(amplitude),
        }
    }

    /// Lazily map a sample stream, stopping at the first boundary.
    pub fn points<I>(self, samples: I) -> PathPoints<I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        PathPoints::new(self, samples.into_iter())
    }
}

/// Where generation stopped because the surface ran out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    /// Index of the first sample that did not fit
    pub index: usize,
    /// The rejected point
    pub point: PathPoint,
}

/// Streaming path generator.
///
/// Yields points until the samples run out, a boundary is hit, or a
/// non-finite sample is found. The stop reason can be queried afterwards.
#[derive(Debug)]
pub struct PathPoints<I> {
    engine: SurfaceEngine,
    samples: std::iter::Enumerate<I>,
    boundary: Option<BoundaryHit>,
    error: Option<InputError>,
    out_of_range: usize,
    done: bool,
}

impl<I: Iterator<Item = f64>> PathPoints<I> {
    fn new(engine: SurfaceEngine, samples: I) -> Self {
        Self {
            engine,
            samples: samples.enumerate(),
            boundary: None,
            error: None,
            out_of_range: 0,
            done: false,
        }
    }

    pub fn boundary(&self) -> Option<&BoundaryHit> {
        self.boundary.as_ref()
    }

    pub fn error(&self) -> Option<&InputError> {
        self.error.as_ref()
    }

    /// Number of samples seen so far outside [-1, 1]
    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    /// Consume the samples that were not mapped and return how many there
    /// were. Unmapped samples are still checked for finiteness.
    pub fn skip_remaining(&mut self) -> usize {
        self.done = true;
        let mut count = 0;
        for (index, value) in self.samples.by_ref() {
            count += 1;
            if self.error.is_none() && !value.is_finite() {
                self.error = Some(InputError::NonFiniteAmplitude { index, value });
            }
        }
        count
    }
}

impl<I: Iterator<Item = f64>> Iterator for PathPoints<I> {
    type Item = PathPoint;

    fn next(&mut self) -> Option<PathPoint> {
        if self.done {
            return None;
        }

        let Some((index, amplitude)) = self.samples.next() else {
            self.done = true;
            return None;
        };

        if !amplitude.is_finite() {
            self.error = Some(InputError::NonFiniteAmplitude {
                index,
                value: amplitude,
            });
            self.done = true;
            return None;
        }
        if amplitude.abs() > 1.0 {
            self.out_of_range += 1;
        }

        match self.engine.map(index, amplitude) {
            MappingStep::Point(point) => Some(point),
            MappingStep::BoundaryReached(point) => {
                self.boundary = Some(BoundaryHit { index, point });
                self.done = true;
                None
            }
        }
    }
}

fn validate_frame_rate(frame_rate: f64) -> Result<(), InputError> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidFrameRate { frame_rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groovecut_settings::SurfaceSettings;

    fn cylinder(settings: SurfaceSettings) -> SurfaceConfig {
        SurfaceConfig::new(&settings).unwrap()
    }

    fn base() -> SurfaceSettings {
        SurfaceSettings {
            radius: 10.0,
            length: 50.0,
            depth: 0.2,
            pitch: 2.0,
            max_amplitude: 1.0,
            speed: Some(10.0),
            speed_angular: None,
            start_position: 0.5,
            end_margin: 1.0,
            centerline_offset: 0.25,
            ..SurfaceSettings::default()
        }
    }

    #[test]
    fn test_cylinder_first_point() {
        let config = cylinder(base());
        let mapper = CylinderMapper::new(&config, 100.0).unwrap();

        let MappingStep::Point(p) = mapper.map(0, 0.5) else {
            panic!("first point must fit");
        };
        assert!((p.radius - 9.8).abs() < 1e-12);
        assert_eq!(p.angle, 0.0);
        // 0.5 * 1.0 / 2 + 1.0 + 0.5 + 0.25
        assert!((p.elevation - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cylinder_one_turn_advances_one_pitch() {
        let config = cylinder(base());
        // speed_angular = 1 rad/s, frame rate 1 Hz: index 2π would be one turn
        let mapper = CylinderMapper::new(&config, 1.0).unwrap();
        let MappingStep::Point(a) = mapper.map(0, 0.0) else {
            panic!()
        };
        let MappingStep::Point(b) = mapper.map(10, 0.0) else {
            panic!()
        };
        let expected = 10.0 * 2.0 / TAU;
        assert!((b.elevation - a.elevation - expected).abs() < 1e-12);
        assert!((b.angle - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_right_thread_negates_angle_only() {
        let left = cylinder(base());
        let right = cylinder(SurfaceSettings {
            right_thread: true,
            ..base()
        });
        let l = CylinderMapper::new(&left, 50.0).unwrap().map(7, 0.1);
        let r = CylinderMapper::new(&right, 50.0).unwrap().map(7, 0.1);
        match (l, r) {
            (MappingStep::Point(l), MappingStep::Point(r)) => {
                assert_eq!(l.angle, -r.angle);
                assert_eq!(l.elevation, r.elevation);
            }
            _ => panic!("both points must fit"),
        }
    }

    #[test]
    fn test_cylinder_boundary() {
        let config = cylinder(SurfaceSettings {
            length: 10.0,
            end_margin: 0.0,
            start_position: 0.0,
            centerline_offset: 0.0,
            max_amplitude: 0.0,
            pitch: TAU,
            ..base()
        });
        // elevation = index * speed_angular / frame_rate = index
        let mapper = CylinderMapper::new(&config, 1.0).unwrap();
        assert!(matches!(mapper.map(9, 0.0), MappingStep::Point(_)));
        assert!(matches!(mapper.map(11, 0.0), MappingStep::BoundaryReached(_)));
    }

    #[test]
    fn test_invalid_frame_rate() {
        let config = cylinder(base());
        assert_eq!(
            CylinderMapper::new(&config, 0.0).unwrap_err(),
            InputError::InvalidFrameRate { frame_rate: 0.0 }
        );
        assert!(SurfaceEngine::new(&config, f64::NAN).is_err());
    }

    #[test]
    fn test_disc_step_uses_chord_relation() {
        let config = cylinder(SurfaceSettings {
            kind: SurfaceKind::Disc,
            ..base()
        });
        let mut mapper = DiscMapper::new(&config, 100.0).unwrap();
        let expected = 2.0 * (1.0f64 / 200.0).asin();
        assert!((mapper.angle_step() - expected).abs() < 1e-15);

        let MappingStep::Point(first) = mapper.map(0.0) else {
            panic!()
        };
        let MappingStep::Point(second) = mapper.map(0.0) else {
            panic!()
        };
        // outer radius = 10 - 1 - 0.5, plus centreline offset
        assert!((first.radius - 8.75).abs() < 1e-12);
        assert_eq!(first.angle, 0.0);
        assert!((second.angle - expected).abs() < 1e-15);
        assert!(second.radius < first.radius);
        assert!((first.elevation - 49.8).abs() < 1e-12);
    }

    #[test]
    fn test_disc_rejects_step_outside_asin_domain() {
        let config = cylinder(SurfaceSettings {
            kind: SurfaceKind::Disc,
            speed: Some(1000.0),
            ..base()
        });
        // speed_angular = 100 rad/s, frame rate 10 Hz -> ratio 5
        assert!(matches!(
            DiscMapper::new(&config, 10.0),
            Err(InputError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_disc_stops_at_inner_radius() {
        let config = cylinder(SurfaceSettings {
            kind: SurfaceKind::Disc,
            max_amplitude: 0.0,
            centerline_offset: 0.0,
            pitch: 5.0,
            ..base()
        });
        let engine = SurfaceEngine::new(&config, 2.0).unwrap();
        let mut points = engine.points(std::iter::repeat(0.0).take(100_000));
        let collected: Vec<_> = points.by_ref().collect();

        assert!(!collected.is_empty());
        let hit = points.boundary().copied().expect("boundary must be reached");
        assert!(hit.point.radius < config.disc_inner_radius());
        assert!(collected.iter().all(|p| p.radius >= config.disc_inner_radius()));
        assert_eq!(hit.index, collected.len());
    }

    #[test]
    fn test_streaming_reports_non_finite_sample() {
        let config = cylinder(base());
        let engine = SurfaceEngine::new(&config, 100.0).unwrap();
        let mut points = engine.points(vec![0.0, 2.0, f64::NAN, 0.0]);
        let collected: Vec<_> = points.by_ref().collect();

        assert_eq!(collected.len(), 2);
        assert_eq!(points.out_of_range(), 1);
        assert!(matches!(
            points.error(),
            Some(InputError::NonFiniteAmplitude { index: 2, .. })
        ));
    }
}
