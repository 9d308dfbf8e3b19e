//! Output writers
//!
//! - CSV point lists in metres, optionally split per fraction of a turn
//! - G-code files split at line boundaries and wrapped in header/footer
//!   templates
//! - Depth-map images; TIFF files carry the pixel size as their resolution

use crate::error::{CamToolError, CamToolResult};
use crate::gcode::{move_to_start, program_end};
use crate::rasterizer::DepthMap;
use groovecut_core::{EngravingPath, PathPoint};
use groovecut_settings::GcodeSettings;
use std::f64::consts::TAU;
use std::fmt::Write as _;
use std::fs;
use std::io::BufWriter;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::ResolutionUnit;
use tracing::{debug, info};

/// Points shared between consecutive CSV chunks
const CSV_CHUNK_OVERLAP: usize = 2;

/// One CSV line: cartesian coordinates in metres
pub fn csv_line(point: &PathPoint) -> String {
    let c = point.to_cartesian();
    format!("{}, {}, {}", c.x / 1000.0, c.y / 1000.0, c.z / 1000.0)
}

fn csv_text(points: &[PathPoint]) -> String {
    let mut text = String::with_capacity(points.len() * 64);
    for point in points {
        // Writing to a String cannot fail
        let _ = writeln!(text, "{}", csv_line(point));
    }
    text
}

/// Index ranges of the split CSV files.
///
/// A new chunk begins every `1 / files_per_turn` of a turn, measured on the
/// absolute angle, and starts two points before the previous one ended.
pub fn csv_chunk_ranges(path: &EngravingPath, files_per_turn: f64) -> Vec<Range<usize>> {
    let points = path.points();
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    if !(files_per_turn.is_finite() && files_per_turn > 0.0) {
        return vec![0..n];
    }

    let segment = TAU / files_per_turn;
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut limit = segment;

    for (i, point) in points.iter().enumerate() {
        let angle = point.angle.abs();
        if angle < limit {
            continue;
        }
        if i > start {
            ranges.push(start..i);
            start = i.saturating_sub(CSV_CHUNK_OVERLAP);
        }
        limit = ((angle / segment).floor() + 1.0) * segment;
    }
    if start < n {
        ranges.push(start..n);
    }
    ranges
}

/// Write the whole path to one CSV file.
pub fn write_csv(path: &EngravingPath, file: &Path) -> CamToolResult<()> {
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file, csv_text(path.points()))?;
    info!("Wrote {} points to {}", path.len(), file.display());
    Ok(())
}

/// Write `<name>_files/<name>_NNN.csv` under `dir`.
pub fn write_split_csv(
    path: &EngravingPath,
    dir: &Path,
    name: &str,
    files_per_turn: f64,
) -> CamToolResult<Vec<PathBuf>> {
    let folder = dir.join(format!("{}_files", name));
    fs::create_dir_all(&folder)?;

    let points = path.points();
    let mut written = Vec::new();
    for (k, range) in csv_chunk_ranges(path, files_per_turn).into_iter().enumerate() {
        let file = folder.join(format!("{}_{:03}.csv", name, k));
        fs::write(&file, csv_text(&points[range]))?;
        written.push(file);
    }
    info!(
        "Wrote {} points to {} files in {}",
        path.len(),
        written.len(),
        folder.display()
    );
    Ok(written)
}

/// Split `text` into chunks of at most `max_chars` bytes, cutting only after
/// a newline. A single line longer than `max_chars` forms its own chunk.
pub fn gcode_text_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut end = 0;

    for line in text.split_inclusive('\n') {
        let next = end + line.len();
        if next - start > max_chars && end > start {
            chunks.push(&text[start..end]);
            start = end;
        }
        end = next;
    }
    if end > start {
        chunks.push(&text[start..end]);
    }
    chunks
}

/// Writes a scheduled program to one or more G-code files.
///
/// The first file gets the lead-in move to the path start, the last one the
/// retract and program end. Every file gets the header and footer, rendered
/// with its own 1-based `{file}` number.
pub struct GcodeFileWriter<'a> {
    settings: &'a GcodeSettings,
    part: String,
    date: String,
    x0: f64,
    a0: f64,
    first_depth: f64,
    depth: f64,
}

impl<'a> GcodeFileWriter<'a> {
    pub fn new(
        settings: &'a GcodeSettings,
        part: impl Into<String>,
        x0: f64,
        a0: f64,
        first_depth: f64,
        depth: f64,
    ) -> Self {
        Self {
            settings,
            part: part.into(),
            date: chrono::Utc::now()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            x0,
            a0,
            first_depth,
            depth,
        }
    }

    /// Override the generation timestamp
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Substitute the placeholders of a header/footer template for file
    /// number `file` (1-based)
    pub fn render_template(&self, template: &str, file: usize) -> String {
        let s = self.settings;
        template
            .replace("{part}", &self.part)
            .replace("{file}", &file.to_string())
            .replace("{date}", &self.date)
            .replace("{tool}", &s.tool_id.to_string())
            .replace("{corrector}", &s.corrector_id.to_string())
            .replace("{feed}", &format!("{:.1}", s.feed_rate))
            .replace("{clearance}", &format!("{:.3}", s.clearance_height))
            .replace("{axis}", &s.depth_axis)
            .replace("{x0}", &format!("{:.3}", self.x0))
            .replace("{a0}", &format!("{:.3}", self.a0))
            .replace("{depth}", &format!("{:.3}", self.depth))
    }

    /// File contents for `body`, one entry per output file
    pub fn files(&self, body: &str) -> Vec<String> {
        let chunks = gcode_text_chunks(body, self.settings.max_chunk_chars);
        let last = chunks.len().saturating_sub(1);

        chunks
            .iter()
            .enumerate()
            .map(|(k, chunk)| {
                let header = self.render_template(&self.settings.header, k + 1);
                let footer = self.render_template(&self.settings.footer, k + 1);
                let mut gcode = String::with_capacity(header.len() + chunk.len() + 256);
                gcode.push_str(&header);
                if k == 0 {
                    gcode.push_str(&move_to_start(
                        self.settings,
                        self.x0,
                        self.a0,
                        self.first_depth,
                    ));
                }
                gcode.push_str(chunk);
                if k == last {
                    gcode.push_str(&program_end(self.settings));
                }
                gcode.push_str(&footer);
                gcode
            })
            .collect()
    }

    /// Write `<name>_<k>.<ext>` files under `dir`, numbered from 1.
    pub fn write(&self, body: &str, dir: &Path, name: &str) -> CamToolResult<Vec<PathBuf>> {
        let files = self.files(body);
        if files.is_empty() {
            return Err(CamToolError::GenerationFailed(
                "no G-code to write".to_string(),
            ));
        }

        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(files.len());
        for (k, content) in files.iter().enumerate() {
            let file = dir.join(format!("{}_{}.{}", name, k + 1, self.settings.file_extension));
            fs::write(&file, content)?;
            written.push(file);
        }
        info!("Wrote {} G-code file(s) to {}", written.len(), dir.display());
        Ok(written)
    }
}

/// TIFF resolution for `dpi`, kept to three decimals while it fits a `u32`
fn dpi_rational(dpi: f64) -> Rational {
    let scaled = (dpi * 1000.0).round();
    if (1.0..=u32::MAX as f64).contains(&scaled) {
        Rational {
            n: scaled as u32,
            d: 1000,
        }
    } else {
        Rational {
            n: dpi.round().clamp(1.0, u32::MAX as f64) as u32,
            d: 1,
        }
    }
}

fn is_tiff(file: &Path) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

fn write_tiff(map: &DepthMap, file: &Path) -> CamToolResult<()> {
    let tiff_error = |e: tiff::TiffError| CamToolError::ImageError(e.to_string());

    let writer = BufWriter::new(fs::File::create(file)?);
    let mut encoder = TiffEncoder::new(writer).map_err(tiff_error)?;
    let mut image = encoder
        .new_image::<colortype::Gray8>(map.image.width(), map.image.height())
        .map_err(tiff_error)?;
    image.resolution(ResolutionUnit::Inch, dpi_rational(map.dpi));
    image.write_data(map.image.as_raw()).map_err(tiff_error)?;
    Ok(())
}

/// Save a depth map; files without an extension are written as TIFF.
///
/// TIFF output records `dpi` as its X/Y resolution. Other formats are
/// written by the `image` crate without resolution metadata.
pub fn save_depth_map(map: &DepthMap, file: &Path) -> CamToolResult<PathBuf> {
    let file = if file.extension().is_none() {
        file.with_extension("tiff")
    } else {
        file.to_path_buf()
    };
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if is_tiff(&file) {
        write_tiff(map, &file)?;
    } else {
        debug!("{} does not store resolution; DPI is not recorded", file.display());
        map.image
            .save(&file)
            .map_err(|e| CamToolError::ImageError(e.to_string()))?;
    }
    info!(
        "Saved {}x{} depth map at {:.0} DPI to {}",
        map.image.width(),
        map.image.height(),
        map.dpi,
        file.display()
    );
    Ok(file)
}
