//! Depth-Map Rasterizer
//!
//! Renders the groove as a grayscale depth map: white is untouched surface,
//! darker pixels are deeper. A cylinder is unrolled (`x = R·θ`, `y = z`) and
//! wraps around horizontally; a disc is drawn top-down around a centre
//! cross-hair, with `y` growing downwards in image rows.
//!
//! Every write keeps the darker of the old and new value, so painting the
//! same path twice gives the same image.

use crate::error::{CamToolError, CamToolResult, ParameterError};
use groovecut_core::{EngravingPath, SurfaceKind};
use groovecut_settings::{RasterSettings, SurfaceConfig};
use image::{GrayImage, Luma};
use std::f64::consts::TAU;
use tracing::debug;

const MM_PER_INCH: f64 = 25.4;

/// A rendered depth map and its physical resolution
#[derive(Debug, Clone)]
pub struct DepthMap {
    pub image: GrayImage,
    pub dpi: f64,
}

#[derive(Debug, Clone)]
pub struct DepthMapRasterizer {
    kind: SurfaceKind,
    radius: f64,
    length: f64,
    half_width: f64,
    pixel_size: f64,
    interpolate: bool,
    white: u8,
    half_band: i64,
}

impl DepthMapRasterizer {
    pub fn new(config: &SurfaceConfig, raster: &RasterSettings) -> CamToolResult<Self> {
        let pixel_size = raster.pixel_size;
        if !(pixel_size.is_finite() && pixel_size > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "pixel_size".to_string(),
                reason: format!("{} must be finite and > 0", pixel_size),
            }
            .into());
        }
        if config.kind() == SurfaceKind::Disc && !raster.interpolate {
            return Err(CamToolError::Unsupported(
                "disc depth maps require interpolation".to_string(),
            ));
        }

        let half_band = (config.width() / (2.0 * pixel_size)).ceil() as i64;
        Ok(Self {
            kind: config.kind(),
            radius: config.radius(),
            length: config.length(),
            half_width: config.width() / 2.0,
            pixel_size,
            interpolate: raster.interpolate,
            white: raster.white,
            half_band,
        })
    }

    /// Rows (or columns) touched around each groove centre
    pub fn band_pixels(&self) -> u32 {
        (2 * self.half_band + 1) as u32
    }

    pub fn dpi(&self) -> f64 {
        MM_PER_INCH / self.pixel_size
    }

    /// Image size in pixels for the configured surface
    pub fn dimensions(&self) -> CamToolResult<(u32, u32)> {
        let (w, h) = match self.kind {
            SurfaceKind::Cylinder => (
                (TAU * self.radius / self.pixel_size).floor(),
                (self.length / self.pixel_size).floor(),
            ),
            SurfaceKind::Disc => {
                let side = (2.0 * self.radius / self.pixel_size).floor();
                (side, side)
            }
        };
        if w < 1.0 || h < 1.0 || w > u32::MAX as f64 || h > u32::MAX as f64 {
            return Err(
                ParameterError::InvalidDimensions(format!("{} x {} pixels", w, h)).into(),
            );
        }
        Ok((w as u32, h as u32))
    }

    /// A blank (all white) buffer of the right size
    pub fn new_buffer(&self) -> CamToolResult<GrayImage> {
        let (w, h) = self.dimensions()?;
        Ok(GrayImage::from_pixel(w, h, Luma([self.white])))
    }

    pub fn render(&self, path: &EngravingPath) -> CamToolResult<DepthMap> {
        let mut image = self.new_buffer()?;
        self.paint(&mut image, path);
        debug!(
            "Rendered {} points into {}x{} depth map",
            path.len(),
            image.width(),
            image.height()
        );
        Ok(DepthMap {
            image,
            dpi: self.dpi(),
        })
    }

    /// Paint `path` onto an existing buffer of [`dimensions`](Self::dimensions).
    pub fn paint(&self, image: &mut GrayImage, path: &EngravingPath) {
        match self.kind {
            SurfaceKind::Cylinder => self.paint_cylinder(image, path),
            SurfaceKind::Disc => {
                self.burn_crosshair(image);
                self.paint_disc(image, path);
            }
        }
    }

    fn paint_cylinder(&self, image: &mut GrayImage, path: &EngravingPath) {
        let width = image.width() as i64;
        let height = image.height() as i64;
        let ps = self.pixel_size;

        for point in path.iter() {
            let x = self.radius * point.angle;
            let y = point.elevation;
            let col = ((x / ps).floor() as i64).rem_euclid(width);
            let row = (y / ps).floor() as i64;

            if self.interpolate {
                for r in (row - self.half_band)..=(row + self.half_band) {
                    if r < 0 || r >= height {
                        continue;
                    }
                    let centre = (r as f64 + 0.5) * ps;
                    let value = self.shade((centre - y).abs());
                    darken(image, col, r, value);
                }
            } else {
                let tiers = [
                    (2, self.fraction_of_white(2.0 / 3.0)),
                    (1, self.fraction_of_white(1.0 / 3.0)),
                    (0, 0),
                ];
                for (offset, value) in tiers {
                    for r in [row - offset, row + offset] {
                        if r >= 0 && r < height {
                            darken(image, col, r, value);
                        }
                    }
                }
            }
        }
    }

    fn paint_disc(&self, image: &mut GrayImage, path: &EngravingPath) {
        let ps = self.pixel_size;
        let centre = (image.width() / 2) as f64;

        for point in path.iter() {
            let cart = point.to_cartesian();
            let px = centre + cart.x / ps;
            let py = centre + cart.y / ps;
            let col = px.floor() as i64;
            let row = py.floor() as i64;

            for r in (row - self.half_band)..=(row + self.half_band) {
                for c in (col - self.half_band)..=(col + self.half_band) {
                    let dx = c as f64 + 0.5 - px;
                    let dy = r as f64 + 0.5 - py;
                    let value = self.shade(dx.hypot(dy) * ps);
                    darken(image, c, r, value);
                }
            }
        }
    }

    fn burn_crosshair(&self, image: &mut GrayImage) {
        let centre = (image.width() / 2) as i64;
        let half_length = (1.0 / self.pixel_size).floor() as i64;
        let half_width = (0.1 / self.pixel_size).floor() as i64;

        for a in -half_length..half_length {
            for b in -half_width..half_width {
                darken(image, centre + a, centre + b, 0);
                darken(image, centre + b, centre + a, 0);
            }
        }
    }

    /// Gray level at `distance` mm from the groove centre
    fn shade(&self, distance: f64) -> u8 {
        let white = self.white as f64;
        if self.half_width <= 0.0 {
            return self.white;
        }
        (white * distance / self.half_width).min(white).round() as u8
    }

    fn fraction_of_white(&self, fraction: f64) -> u8 {
        (self.white as f64 * fraction).round() as u8
    }
}

fn darken(image: &mut GrayImage, col: i64, row: i64, value: u8) {
    if col < 0 || row < 0 || col >= image.width() as i64 || row >= image.height() as i64 {
        return;
    }
    let pixel = image.get_pixel_mut(col as u32, row as u32);
    pixel.0[0] = pixel.0[0].min(value);
}
