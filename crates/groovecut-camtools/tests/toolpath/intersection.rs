use groovecut_camtools::{Advisory, IntersectionChecker, PathSequencer};
use groovecut_core::{EngravingPath, PathPoint};
use groovecut_settings::{SurfaceConfig, SurfaceSettings};

const FRAME_RATE: f64 = 20.0;

fn config(pitch: f64, max_amplitude: f64) -> SurfaceConfig {
    SurfaceConfig::new(&SurfaceSettings {
        radius: 10.0,
        length: 80.0,
        depth: 0.1,
        angle: 90.0,
        pitch,
        max_amplitude,
        speed: Some(10.0),
        speed_angular: None,
        intersection_margin: 0.05,
        ..SurfaceSettings::default()
    })
    .unwrap()
}

fn check(config: &SurfaceConfig, samples: usize) -> groovecut_camtools::IntersectionReport {
    let amplitudes: Vec<f64> = (0..samples).map(|i| (i as f64 * 0.7).sin()).collect();
    let path = PathSequencer::new(config.clone(), FRAME_RATE)
        .unwrap()
        .sequence(&amplitudes)
        .unwrap()
        .path;
    IntersectionChecker::new(config, FRAME_RATE)
        .unwrap()
        .check(&path)
        .unwrap()
}

#[test]
fn test_loud_signal_on_tight_pitch_intersects() {
    // width 0.2 + margin 0.05; amplitude swing of 2 mm overlaps 1 mm turns
    let report = check(&config(1.0, 2.0), 1000);
    assert!(report.count > 0);
    assert_eq!(report.count, report.locations.len());
    assert!(report.locations.iter().all(Advisory::is_intersection));
}

#[test]
fn test_quiet_signal_on_wide_pitch_is_clear() {
    let report = check(&config(2.0, 0.5), 1000);
    assert!(report.is_clear());
    // 2π·10 / 10 · 20 points per turn
    assert!((report.points_per_turn - 125.66370614359172).abs() < 1e-9);
    assert!(report.turns >= 7);
}

#[test]
fn test_turn_numbers_are_adjacent() {
    let report = check(&config(1.0, 2.0), 1000);
    for location in &report.locations {
        if let Advisory::SelfIntersection { turn_a, turn_b, .. } = location {
            assert_eq!(turn_b - turn_a, 1);
            assert!(*turn_a >= 1 && *turn_b <= report.turns);
        }
    }
}

#[test]
fn test_turns_at_equal_elevation_intersect_everywhere() {
    // 0.05 rad per point, ~125.7 points per turn, three full turns at 5 mm
    let config = config(1.0, 2.0);
    let path: EngravingPath = (0..400)
        .map(|i| PathPoint::new(10.0, i as f64 * 0.05, 5.0))
        .collect();
    let report = IntersectionChecker::new(&config, FRAME_RATE)
        .unwrap()
        .check(&path)
        .unwrap();

    assert_eq!(report.turns, 3);
    // every one of the 125 offsets flags both adjacent pairs
    assert_eq!(report.count, 125 * 2);
    assert_eq!(report.locations.len(), report.count);
}
