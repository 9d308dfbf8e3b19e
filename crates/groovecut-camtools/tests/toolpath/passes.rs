use groovecut_camtools::{
    CamToolError, GcodeFileWriter, PassScheduler, PathSequencer, SinglePassRenderer,
};
use groovecut_settings::{GcodeSettings, SurfaceConfig, SurfaceSettings};

fn config(depth: f64) -> SurfaceConfig {
    SurfaceConfig::new(&SurfaceSettings {
        radius: 10.0,
        length: 60.0,
        depth,
        pitch: 2.0,
        speed: Some(10.0),
        speed_angular: None,
        ..SurfaceSettings::default()
    })
    .unwrap()
}

#[test]
fn test_pass_plan_for_tenth_of_a_millimetre() {
    let settings = GcodeSettings {
        depth_of_cut: 0.045,
        start_depth: 0.0,
        ..GcodeSettings::default()
    };
    let plan = PassScheduler::new(&settings, 0.1).unwrap().plan();

    assert_eq!(plan.len(), 3);
    for (got, want) in plan.increments.iter().zip([0.045, 0.045, 0.01]) {
        assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
    }
    for (got, want) in plan.cumulative.iter().zip([0.045, 0.09, 0.1]) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn test_plan_terminates_for_awkward_ratios() {
    for (step, depth) in [(0.03, 0.1), (0.07, 0.2), (0.001, 0.0105), (0.3, 0.1)] {
        let settings = GcodeSettings {
            depth_of_cut: step,
            ..GcodeSettings::default()
        };
        let plan = PassScheduler::new(&settings, depth).unwrap().plan();
        assert!(!plan.is_empty());
        assert!(plan.increments.iter().all(|inc| *inc <= step + 1e-12));
        assert!((plan.final_depth().unwrap() - depth).abs() < step);
    }
}

#[test]
fn test_end_to_end_program() {
    let config = config(0.1);
    let sequenced = PathSequencer::new(config.clone(), 100.0)
        .unwrap()
        .sequence(&[0.0, 0.5, -0.5, 0.25, 0.0])
        .unwrap();
    let pass = SinglePassRenderer::new(&config)
        .render(&sequenced.path)
        .unwrap();
    assert_eq!(pass.text.lines().count(), 5);

    let settings = GcodeSettings::default();
    let scheduled = PassScheduler::new(&settings, config.depth())
        .unwrap()
        .schedule(&pass)
        .unwrap();

    assert_eq!(scheduled.pass_count(), 3);
    // three passes of five lines plus two four-line transitions
    assert_eq!(scheduled.text.lines().count(), 3 * 5 + 2 * 4);
    assert!((scheduled.total_length - 3.0 * pass.length).abs() < 1e-12);
    assert!(scheduled.text.contains("G1 Z-0.100 F600.0"));

    let writer = GcodeFileWriter::new(
        &settings,
        "tone",
        pass.x0,
        pass.a0,
        scheduled.plan.cumulative[0],
        config.depth(),
    );
    let files = writer.files(&scheduled.text);
    assert_eq!(files.len(), 1);
    assert!(files[0].contains("G1 Z-0.045 F600.0"));
    assert!(files[0].contains("M30"));
}

#[test]
fn test_disc_gcode_is_unsupported() {
    let config = SurfaceConfig::new(&SurfaceSettings {
        kind: groovecut_core::SurfaceKind::Disc,
        ..SurfaceSettings::default()
    })
    .unwrap();
    let path = PathSequencer::new(config.clone(), 44_100.0)
        .unwrap()
        .sequence(&[0.0; 16])
        .unwrap()
        .path;
    assert!(matches!(
        SinglePassRenderer::new(&config).render(&path),
        Err(CamToolError::Unsupported(_))
    ));
}
