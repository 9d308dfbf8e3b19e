use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use groovecut::{audio, init_logging, EngravingSettings, Pipeline, RunSummary};
use groovecut_settings::default_config_path;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Turn audio into phonograph groove toolpaths for cylinders and discs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the groove as CSV point lists
    Points(RunArgs),

    /// Write multi-pass G-code (cylinders only)
    Gcode(RunArgs),

    /// Render the groove as a grayscale depth map
    Image {
        #[command(flatten)]
        run: RunArgs,

        /// Image file; the format follows the extension
        #[arg(long, value_hint = ValueHint::FilePath)]
        image: Option<PathBuf>,
    },

    /// Report self-intersections without writing anything
    Check(RunArgs),

    /// Write a settings file with default values
    InitConfig {
        /// Target file (.toml or .json); defaults to the user config directory
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Settings file (.toml or .json); defaults to the user config directory
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Audio input: WAV, or text with one sample per line
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Sample rate in Hz; required for text input, overrides WAV headers
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Output directory; overrides the settings file
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output: Option<PathBuf>,
}

impl RunArgs {
    fn pipeline(&self) -> Result<Pipeline> {
        let settings = load_settings(self.config.as_deref())?;
        Pipeline::new(settings, self.output.as_deref())
    }

    fn series(&self) -> Result<audio::AmplitudeSeries> {
        audio::load(&self.input, self.sample_rate)
    }
}

fn load_settings(path: Option<&Path>) -> Result<EngravingSettings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = default_config_path()?;
            if !default.exists() {
                info!("No settings file at {}, using defaults", default.display());
                return Ok(EngravingSettings::default());
            }
            default
        }
    };
    EngravingSettings::load_from_file(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn report(summary: &RunSummary) {
    println!(
        "Points: {}/{} ({:.1}%)",
        summary.stats.points_used,
        summary.stats.points_available,
        summary.stats.consumption_percent()
    );
    println!(
        "Surface: {:.3}/{:.3} mm ({:.1}%)",
        summary.stats.extent_used,
        summary.stats.extent_available,
        summary.stats.extent_percent()
    );
    if let Some(minutes) = summary.machining_minutes {
        println!("Estimated machining time: {:.1} min", minutes);
    }
    for advisory in &summary.advisories {
        println!("Warning: {}", advisory);
    }
    for file in &summary.files {
        println!("Wrote {}", file.display());
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Points(args) => report(&args.pipeline()?.points(&args.series()?)?),
        Command::Gcode(args) => report(&args.pipeline()?.gcode(&args.series()?)?),
        Command::Image { run, image } => {
            report(&run.pipeline()?.image(&run.series()?, image.as_deref())?)
        }
        Command::Check(args) => {
            let (summary, intersections) = args.pipeline()?.check(&args.series()?)?;
            report(&summary);
            println!(
                "Self-intersections: {} over {} turns",
                intersections.count, intersections.turns
            );
        }
        Command::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => default_config_path()?,
            };
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            EngravingSettings::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }

    Ok(())
}
