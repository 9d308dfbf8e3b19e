//! Single-pass G-code renderer
//!
//! A cylinder groove is cut on a lathe-style setup: `X` moves along the axis
//! and `A` rotates the part. One pass is one line per path point; the depth
//! axis is driven only between passes.

use crate::error::{CamToolError, CamToolResult};
use groovecut_core::{distance_cyl, EngravingPath, SurfaceKind};
use groovecut_settings::{GcodeSettings, SurfaceConfig};

/// G-code for one pass over the path at a fixed depth
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePassProgram {
    pub text: String,
    /// Path length of one pass (mm)
    pub length: f64,
    /// Axial coordinate of the first point, as written
    pub x0: f64,
    /// Rotary coordinate of the first point in degrees, as written
    pub a0: f64,
    pub point_count: usize,
}

/// Renders a path into single-pass G-code.
pub struct SinglePassRenderer<'a> {
    config: &'a SurfaceConfig,
}

impl<'a> SinglePassRenderer<'a> {
    pub fn new(config: &'a SurfaceConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, path: &EngravingPath) -> CamToolResult<SinglePassProgram> {
        if self.config.kind() == SurfaceKind::Disc {
            return Err(CamToolError::Unsupported(
                "G-code output is only available for cylinders".to_string(),
            ));
        }
        let first = path
            .first()
            .ok_or_else(|| CamToolError::GenerationFailed("empty toolpath".to_string()))?;

        // "X-12.345A-123.456\n" is at most ~24 bytes for realistic parts
        let mut text = String::with_capacity(path.len() * 24);
        let mut length = 0.0;
        let mut previous = *first;
        for point in path.iter() {
            text.push_str(&format!(
                "X{:.3}A{:.3}\n",
                point.elevation,
                point.angle.to_degrees()
            ));
            length += distance_cyl(previous, *point);
            previous = *point;
        }

        Ok(SinglePassProgram {
            text,
            length,
            x0: round3(first.elevation),
            a0: round3(first.angle.to_degrees()),
            point_count: path.len(),
        })
    }
}

/// Retract, rapid to the path start and plunge to `depth`
pub fn move_to_start(settings: &GcodeSettings, x0: f64, a0: f64, depth: f64) -> String {
    let axis = &settings.depth_axis;
    let mut gcode = String::new();
    gcode.push_str(&format!("G0 {}{:.3}\n", axis, settings.clearance_height));
    gcode.push_str(&format!("G0 X{:.3} A{:.3}\n", x0, a0));
    gcode.push_str(&format!(
        "G1 {}-{:.3} F{:.1}\n",
        axis, depth, settings.feed_rate
    ));
    gcode
}

/// Transition emitted before every pass after the first
pub fn depth_change(
    settings: &GcodeSettings,
    pass: usize,
    pass_count: usize,
    x0: f64,
    a0: f64,
    depth: f64,
) -> String {
    let mut gcode = format!(
        "; Pass {} of {}: depth {:.3} mm\n",
        pass, pass_count, depth
    );
    gcode.push_str(&move_to_start(settings, x0, a0, depth));
    gcode
}

/// Retract and end the program
pub fn program_end(settings: &GcodeSettings) -> String {
    format!(
        "G0 {}{:.3} ; Retract to clearance height\nM30 ; End program\n",
        settings.depth_axis, settings.clearance_height
    )
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
