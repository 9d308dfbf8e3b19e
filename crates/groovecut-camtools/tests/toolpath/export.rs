use groovecut_camtools::{
    csv_chunk_ranges, save_depth_map, write_csv, write_split_csv, DepthMapRasterizer,
    GcodeFileWriter, PathSequencer,
};
use groovecut_core::EngravingPath;
use groovecut_settings::{GcodeSettings, RasterSettings, SurfaceConfig, SurfaceSettings};
use std::fs;
use tempfile::tempdir;
use tiff::decoder::{ifd::Value, Decoder};
use tiff::tags::Tag;

fn config() -> SurfaceConfig {
    SurfaceConfig::new(&SurfaceSettings {
        radius: 5.0,
        length: 20.0,
        pitch: 1.0,
        speed: Some(5.0),
        speed_angular: None,
        ..SurfaceSettings::default()
    })
    .unwrap()
}

fn path(samples: usize) -> EngravingPath {
    // one radian per 10 samples
    PathSequencer::new(config(), 10.0)
        .unwrap()
        .sequence(&vec![0.0; samples])
        .unwrap()
        .path
}

#[test]
fn test_single_csv_has_one_line_per_point() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("out").join("groove.csv");
    let path = path(50);

    write_csv(&path, &file).unwrap();
    let text = fs::read_to_string(&file).unwrap();
    assert_eq!(text.lines().count(), 50);
    assert!(text.lines().all(|l| l.split(", ").count() == 3));
}

#[test]
fn test_split_csv_files_overlap() {
    let dir = tempdir().unwrap();
    let path = path(200);

    let files = write_split_csv(&path, dir.path(), "groove", 4.0).unwrap();
    let ranges = csv_chunk_ranges(&path, 4.0);
    assert_eq!(files.len(), ranges.len());
    assert!(files.len() >= 12);
    assert!(files[0].ends_with("groove_files/groove_000.csv"));

    let first = fs::read_to_string(&files[0]).unwrap();
    let second = fs::read_to_string(&files[1]).unwrap();
    let first_tail: Vec<_> = first.lines().rev().take(2).collect();
    let second_head: Vec<_> = second.lines().take(2).collect();
    assert_eq!(first_tail[1], second_head[0]);
    assert_eq!(first_tail[0], second_head[1]);

    let total: usize = files
        .iter()
        .map(|f| fs::read_to_string(f).unwrap().lines().count())
        .sum();
    assert_eq!(total, 200 + 2 * (files.len() - 1));
}

#[test]
fn test_gcode_files_are_numbered() {
    let dir = tempdir().unwrap();
    let settings = GcodeSettings {
        max_chunk_chars: 40,
        ..GcodeSettings::default()
    };
    let body = "X1.000A0.000\n".repeat(10);
    let writer = GcodeFileWriter::new(&settings, "part", 1.0, 0.0, 0.045, 0.2);

    let files = writer.write(&body, dir.path(), "part").unwrap();
    assert_eq!(files.len(), 4);
    assert!(files[0].ends_with("part_1.nc"));
    assert!(files[3].ends_with("part_4.nc"));
    let last = fs::read_to_string(&files[3]).unwrap();
    assert!(last.contains("M30"));

    let first = fs::read_to_string(&files[0]).unwrap();
    let second = fs::read_to_string(&files[1]).unwrap();
    assert_eq!(first.lines().next(), Some("; groovecut part part file 1"));
    assert_eq!(second.lines().next(), Some("; groovecut part part file 2"));
}

#[test]
fn test_depth_map_defaults_to_tiff() {
    let dir = tempdir().unwrap();
    let config = config();
    let rasterizer = DepthMapRasterizer::new(
        &config,
        &RasterSettings {
            pixel_size: 0.1,
            ..RasterSettings::default()
        },
    )
    .unwrap();
    let map = rasterizer.render(&path(100)).unwrap();

    let saved = save_depth_map(&map, &dir.path().join("depth")).unwrap();
    assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("tiff"));
    let loaded = image::open(&saved).unwrap().to_luma8();
    assert_eq!(loaded, map.image);

    // 0.1 mm pixels: 254 DPI
    let mut decoder = Decoder::new(fs::File::open(&saved).unwrap()).unwrap();
    for tag in [Tag::XResolution, Tag::YResolution] {
        match decoder.get_tag(tag).unwrap() {
            Value::Rational(n, d) => assert!((n as f64 / d as f64 - 254.0).abs() < 1e-3),
            other => panic!("unexpected resolution {:?}", other),
        }
    }
    assert_eq!(decoder.get_tag_u32(Tag::ResolutionUnit).unwrap(), 2);
}
