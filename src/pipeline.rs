//! End-to-end operations behind the command line
//!
//! Each operation sequences the amplitude series once and writes one kind of
//! output into the configured output directory.

use crate::audio::AmplitudeSeries;
use anyhow::{Context, Result};
use groovecut_camtools::{
    save_depth_map, write_csv, write_split_csv, Advisory, ConsumptionStats, DepthMapRasterizer,
    GcodeFileWriter, IntersectionChecker, IntersectionReport, PassScheduler, PathSequencer,
    SequencedPath, SinglePassRenderer,
};
use groovecut_settings::{EngravingSettings, SurfaceConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What an operation produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub files: Vec<PathBuf>,
    pub stats: ConsumptionStats,
    pub advisories: Vec<Advisory>,
    /// Estimated machining time, G-code runs only
    pub machining_minutes: Option<f64>,
}

pub struct Pipeline {
    settings: EngravingSettings,
    config: SurfaceConfig,
    output_dir: PathBuf,
}

impl Pipeline {
    /// Validate `settings`; `output_dir` overrides the configured directory.
    pub fn new(settings: EngravingSettings, output_dir: Option<&Path>) -> Result<Self> {
        settings.validate().context("Invalid settings")?;
        let config = settings.surface_config()?;
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| settings.output.output_directory.clone());
        Ok(Self {
            settings,
            config,
            output_dir,
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    fn name(&self) -> &str {
        &self.settings.output.output_name
    }

    fn sequence(&self, series: &AmplitudeSeries) -> Result<SequencedPath> {
        let sequencer = PathSequencer::new(self.config.clone(), series.frame_rate)?;
        let sequenced = sequencer
            .sequence(&series.samples)
            .context("Failed to generate engraving path")?;
        info!(
            "{} surface: {:.1}% of samples used, {:.1}% of surface used",
            self.config.kind(),
            sequenced.stats.consumption_percent(),
            sequenced.stats.extent_percent()
        );
        Ok(sequenced)
    }

    /// Write the path as CSV point lists.
    pub fn points(&self, series: &AmplitudeSeries) -> Result<RunSummary> {
        let sequenced = self.sequence(series)?;
        let output = &self.settings.output;

        let files = if output.split_files {
            write_split_csv(
                &sequenced.path,
                &self.output_dir,
                self.name(),
                output.files_per_turn,
            )?
        } else {
            let file = self.output_dir.join(format!("{}.csv", self.name()));
            write_csv(&sequenced.path, &file)?;
            vec![file]
        };

        Ok(RunSummary {
            files,
            stats: sequenced.stats,
            advisories: sequenced.advisories,
            machining_minutes: None,
        })
    }

    /// Write multi-pass G-code for a cylinder.
    pub fn gcode(&self, series: &AmplitudeSeries) -> Result<RunSummary> {
        let sequenced = self.sequence(series)?;
        let mut advisories = sequenced.advisories;

        let report = self.check_path(&sequenced.path, series.frame_rate)?;
        advisories.extend(report.locations);

        let pass = SinglePassRenderer::new(&self.config).render(&sequenced.path)?;
        let gcode = &self.settings.gcode;
        let scheduled = PassScheduler::new(gcode, self.config.depth())?.schedule(&pass)?;
        let first_depth = scheduled
            .plan
            .cumulative
            .first()
            .copied()
            .unwrap_or(self.config.depth());

        let writer = GcodeFileWriter::new(
            gcode,
            self.name(),
            pass.x0,
            pass.a0,
            first_depth,
            self.config.depth(),
        );
        let files = writer.write(&scheduled.text, &self.output_dir, self.name())?;
        info!(
            "{} passes over {:.1} mm, estimated {:.1} min",
            scheduled.pass_count(),
            scheduled.total_length,
            scheduled.machining_minutes
        );

        Ok(RunSummary {
            files,
            stats: sequenced.stats,
            advisories,
            machining_minutes: Some(scheduled.machining_minutes),
        })
    }

    /// Render and save the depth map.
    pub fn image(&self, series: &AmplitudeSeries, file: Option<&Path>) -> Result<RunSummary> {
        let rasterizer = DepthMapRasterizer::new(&self.config, &self.settings.raster)?;
        let sequenced = self.sequence(series)?;
        let map = rasterizer.render(&sequenced.path)?;

        let target = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.join(format!("{}.tiff", self.name())));
        let saved = save_depth_map(&map, &target)?;

        Ok(RunSummary {
            files: vec![saved],
            stats: sequenced.stats,
            advisories: sequenced.advisories,
            machining_minutes: None,
        })
    }

    /// Only report self-intersections.
    pub fn check(&self, series: &AmplitudeSeries) -> Result<(RunSummary, IntersectionReport)> {
        let sequenced = self.sequence(series)?;
        let report = self.check_path(&sequenced.path, series.frame_rate)?;
        let summary = RunSummary {
            files: Vec::new(),
            stats: sequenced.stats,
            advisories: sequenced.advisories,
            machining_minutes: None,
        };
        Ok((summary, report))
    }

    fn check_path(
        &self,
        path: &groovecut_core::EngravingPath,
        frame_rate: f64,
    ) -> Result<IntersectionReport> {
        let report = IntersectionChecker::new(&self.config, frame_rate)?.check(path)?;
        if !report.is_clear() {
            warn!(
                "{} self-intersections across {} turns; consider a larger pitch",
                report.count, report.turns
            );
        }
        Ok(report)
    }
}
