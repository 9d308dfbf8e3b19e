use groovecut_camtools::{Advisory, PathSequencer};
use groovecut_core::{cart_to_cyl, cyl_to_cart, SurfaceKind};
use groovecut_settings::{SurfaceConfig, SurfaceSettings};
use std::f64::consts::TAU;

fn settings(kind: SurfaceKind, right_thread: bool) -> SurfaceSettings {
    SurfaceSettings {
        kind,
        radius: 10.0,
        length: 100.0,
        depth: 0.2,
        angle: 90.0,
        pitch: 1.0,
        max_amplitude: 0.5,
        speed: Some(10.0),
        speed_angular: None,
        start_position: 0.0,
        end_margin: 1.0,
        centerline_offset: 0.0,
        right_thread,
        ..SurfaceSettings::default()
    }
}

fn sequencer(kind: SurfaceKind, right_thread: bool, frame_rate: f64) -> PathSequencer {
    let config = SurfaceConfig::new(&settings(kind, right_thread)).unwrap();
    PathSequencer::new(config, frame_rate).unwrap()
}

fn tone(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.05).sin() * 0.8).collect()
}

#[test]
fn test_every_sample_becomes_a_point_when_surface_is_large() {
    let seq = sequencer(SurfaceKind::Cylinder, false, 1000.0);
    let amplitudes = tone(5000);
    let result = seq.sequence(&amplitudes).unwrap();

    assert_eq!(result.path.len(), amplitudes.len());
    assert_eq!(result.stats.points_used, 5000);
    assert_eq!(result.stats.points_available, 5000);
    assert!((result.stats.consumption_percent() - 100.0).abs() < 1e-12);
    assert!(result.advisories.is_empty());
}

#[test]
fn test_coordinate_round_trip() {
    let samples = [
        (9.8, 0.0, 1.0),
        (9.8, 1.25, 2.5),
        (3.0, -2.0, 0.0),
        (0.5, 7.0, 120.0),
        (25.0, -13.0, 3.3),
    ];
    for (r, a, z) in samples {
        let (x, y, z2) = cyl_to_cart(r, a, z);
        let (r2, a2, z3) = cart_to_cyl(x, y, z2);
        assert!((r - r2).abs() < 1e-9);
        assert!((a.rem_euclid(TAU) - a2.rem_euclid(TAU)).abs() < 1e-9);
        assert_eq!(z, z3);
    }
}

#[test]
fn test_cylinder_angles_are_monotonic() {
    let amplitudes = tone(2000);

    let left = sequencer(SurfaceKind::Cylinder, false, 500.0)
        .sequence(&amplitudes)
        .unwrap();
    assert!(left.path.points().windows(2).all(|w| w[1].angle > w[0].angle));

    let right = sequencer(SurfaceKind::Cylinder, true, 500.0)
        .sequence(&amplitudes)
        .unwrap();
    assert!(right.path.points().windows(2).all(|w| w[1].angle < w[0].angle));
}

#[test]
fn test_disc_angles_are_monotonic_and_radius_shrinks() {
    let result = sequencer(SurfaceKind::Disc, false, 500.0)
        .sequence(&vec![0.0; 3000])
        .unwrap();
    let points = result.path.points();
    assert!(points.windows(2).all(|w| w[1].angle > w[0].angle));
    assert!(points.windows(2).all(|w| w[1].radius < w[0].radius));
    assert!(points.iter().all(|p| (p.elevation - 99.8).abs() < 1e-12));
}

#[test]
fn test_boundary_truncation() {
    // one radian per sample rises ~0.16 mm: 98 mm lasts about 615 samples
    let seq = sequencer(SurfaceKind::Cylinder, false, 1.0);
    let amplitudes = tone(1000);
    let result = seq.sequence(&amplitudes).unwrap();

    let limit = seq.config().cylinder_end();
    assert!(result.path.len() < amplitudes.len());
    assert!(result.path.iter().all(|p| p.elevation <= limit));
    assert!(result.stats.stopped_at_boundary);
    assert!(result.stats.consumption_percent() < 100.0);
    assert!(matches!(
        result.advisories.as_slice(),
        [Advisory::BoundaryReached { points_available: 1000, .. }]
    ));
}

#[test]
fn test_short_cylinder_stops_at_its_length() {
    // one millimetre of elevation per sample on a 10 mm cylinder
    let config = SurfaceConfig::new(&SurfaceSettings {
        length: 10.0,
        pitch: TAU,
        max_amplitude: 0.0,
        end_margin: 0.0,
        ..settings(SurfaceKind::Cylinder, false)
    })
    .unwrap();
    let seq = PathSequencer::new(config, 1.0).unwrap();
    let result = seq.sequence(&vec![0.0; 20]).unwrap();

    assert!((10..=11).contains(&result.path.len()));
    assert!((result.path.points()[9].elevation - 9.0).abs() < 1e-9);
    assert!(result.path.iter().all(|p| p.elevation <= 10.0));
    assert!(result.stats.stopped_at_boundary);
    assert!(matches!(
        result.advisories.as_slice(),
        [Advisory::BoundaryReached { points_available: 20, .. }]
    ));
}

#[test]
fn test_disc_boundary_keeps_inner_radius() {
    let seq = sequencer(SurfaceKind::Disc, false, 2.0);
    let result = seq.sequence(&vec![0.0; 10_000]).unwrap();

    assert!(result.stats.stopped_at_boundary);
    let inner = seq.config().disc_inner_radius();
    assert!(result.path.iter().all(|p| p.radius >= inner));
}

#[test]
fn test_streaming_matches_slice() {
    let seq = sequencer(SurfaceKind::Disc, true, 300.0);
    let amplitudes = tone(4000);

    let from_slice = seq.sequence(&amplitudes).unwrap();
    let from_stream = seq
        .sequence_iter((0..4000).map(|i| (i as f64 * 0.05).sin() * 0.8))
        .unwrap();

    assert_eq!(from_slice.path, from_stream.path);
    assert_eq!(from_slice.stats, from_stream.stats);
}
