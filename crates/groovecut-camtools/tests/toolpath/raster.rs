use groovecut_camtools::{CamToolError, DepthMapRasterizer, PathSequencer};
use groovecut_core::SurfaceKind;
use groovecut_settings::{RasterSettings, SurfaceConfig, SurfaceSettings};

fn config(kind: SurfaceKind) -> SurfaceConfig {
    SurfaceConfig::new(&SurfaceSettings {
        kind,
        radius: 8.0,
        length: 12.0,
        depth: 0.15,
        pitch: 1.0,
        speed: Some(8.0),
        speed_angular: None,
        ..SurfaceSettings::default()
    })
    .unwrap()
}

fn raster(interpolate: bool) -> RasterSettings {
    RasterSettings {
        pixel_size: 0.05,
        interpolate,
        white: 255,
    }
}

#[test]
fn test_rendering_twice_gives_identical_pixels() {
    for (kind, interpolate) in [
        (SurfaceKind::Cylinder, true),
        (SurfaceKind::Cylinder, false),
        (SurfaceKind::Disc, true),
    ] {
        let config = config(kind);
        let amplitudes: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.02).sin()).collect();
        let path = PathSequencer::new(config.clone(), 50.0)
            .unwrap()
            .sequence(&amplitudes)
            .unwrap()
            .path;

        let rasterizer = DepthMapRasterizer::new(&config, &raster(interpolate)).unwrap();
        let a = rasterizer.render(&path).unwrap();
        let b = rasterizer.render(&path).unwrap();
        assert_eq!(a.image, b.image);
        assert!((a.dpi - 508.0).abs() < 1e-9);
        assert!(a.image.pixels().any(|p| p.0[0] < 255));
    }
}

#[test]
fn test_disc_without_interpolation_is_rejected_before_drawing() {
    let result = DepthMapRasterizer::new(&config(SurfaceKind::Disc), &raster(false));
    assert!(matches!(result, Err(CamToolError::Unsupported(_))));
}

#[test]
fn test_disc_image_is_square() {
    let rasterizer =
        DepthMapRasterizer::new(&config(SurfaceKind::Disc), &raster(true)).unwrap();
    let (w, h) = rasterizer.dimensions().unwrap();
    assert_eq!(w, h);
    // 2·8 mm / 0.05 mm
    assert!((319..=320).contains(&w));
}
