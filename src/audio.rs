//! Amplitude input
//!
//! Loads a mono amplitude series normalised to [-1, 1] from a WAV file or
//! from a plain text file with one sample per line. Multi-channel audio is
//! reduced to its first channel.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Samples and the rate they were recorded at
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeSeries {
    pub samples: Vec<f64>,
    pub frame_rate: f64,
}

impl AmplitudeSeries {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.frame_rate
    }
}

/// Load `path`, choosing the reader by extension.
///
/// WAV files carry their own sample rate; `sample_rate` overrides it. Text
/// files require `sample_rate`.
pub fn load(path: &Path, sample_rate: Option<f64>) -> Result<AmplitudeSeries> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    let series = if is_wav {
        let mut series = load_wav(path)?;
        if let Some(rate) = sample_rate {
            series.frame_rate = rate;
        }
        series
    } else {
        let rate = sample_rate.with_context(|| {
            format!(
                "--sample-rate is required for text input {}",
                path.display()
            )
        })?;
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        AmplitudeSeries {
            samples: parse_text(&text)?,
            frame_rate: rate,
        }
    };

    info!(
        "Loaded {} samples at {} Hz ({:.2} s) from {}",
        series.samples.len(),
        series.frame_rate,
        series.duration_seconds(),
        path.display()
    );
    Ok(series)
}

/// Read the first channel of a WAV file.
pub fn load_wav(path: &Path) -> Result<AmplitudeSeries> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    debug!(
        "WAV: {} channel(s), {} Hz, {} bit {:?}",
        spec.channels, spec.sample_rate, spec.bits_per_sample, spec.sample_format
    );

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(channels)
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f64;
            reader
                .samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(AmplitudeSeries {
        samples,
        frame_rate: spec.sample_rate as f64,
    })
}

/// One sample per line; blank lines and `#` comments are skipped.
pub fn parse_text(text: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let value: f64 = line
            .parse()
            .with_context(|| format!("Line {}: '{}' is not a number", n + 1, line))?;
        samples.push(value);
    }
    if samples.is_empty() {
        bail!("No samples found");
    }
    Ok(samples)
}
