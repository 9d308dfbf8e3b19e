//! Depth-of-Cut Pass Scheduler
//!
//! Splits the target engraving depth into passes no deeper than the
//! configured depth of cut and repeats the single-pass program once per
//! pass, with a retract/reposition/plunge transition in between.

use crate::error::{CamToolError, CamToolResult, ParameterError};
use crate::gcode::{depth_change, SinglePassProgram};
use groovecut_settings::GcodeSettings;
use tracing::info;

/// Remainders at or below this share of the depth of cut are dropped
const MIN_PASS_FRACTION: f64 = 0.01;

/// Depth increments and the cumulative depth reached after each pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassPlan {
    pub increments: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl PassPlan {
    pub fn len(&self) -> usize {
        self.increments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.increments.is_empty()
    }

    /// Depth reached after the last pass
    pub fn final_depth(&self) -> Option<f64> {
        self.cumulative.last().copied()
    }
}

/// Full multi-pass program body
#[derive(Debug, Clone)]
pub struct ScheduledProgram {
    pub text: String,
    pub plan: PassPlan,
    /// Length cut over all passes (mm)
    pub total_length: f64,
    /// Estimated time at the configured feed rate (min)
    pub machining_minutes: f64,
}

impl ScheduledProgram {
    pub fn pass_count(&self) -> usize {
        self.plan.len()
    }
}

pub struct PassScheduler<'a> {
    settings: &'a GcodeSettings,
    target_depth: f64,
}

impl<'a> PassScheduler<'a> {
    pub fn new(settings: &'a GcodeSettings, target_depth: f64) -> CamToolResult<Self> {
        if !(settings.depth_of_cut.is_finite() && settings.depth_of_cut > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "depth_of_cut".to_string(),
                reason: format!("{} must be finite and > 0", settings.depth_of_cut),
            }
            .into());
        }
        if !(settings.feed_rate.is_finite() && settings.feed_rate > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "feed_rate".to_string(),
                reason: format!("{} must be finite and > 0", settings.feed_rate),
            }
            .into());
        }
        if !(target_depth.is_finite() && target_depth > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "depth".to_string(),
                reason: format!("{} must be finite and > 0", target_depth),
            }
            .into());
        }
        Ok(Self {
            settings,
            target_depth,
        })
    }

    pub fn plan(&self) -> PassPlan {
        let step = self.settings.depth_of_cut;
        let mut plan = PassPlan::default();
        let mut cut = self.settings.start_depth;

        while cut < self.target_depth {
            let increment = (self.target_depth - cut).min(step);
            if increment <= MIN_PASS_FRACTION * step {
                break;
            }
            cut += increment;
            plan.increments.push(increment);
            plan.cumulative.push(cut);
        }
        plan
    }

    /// Repeat `pass` for every planned depth.
    pub fn schedule(&self, pass: &SinglePassProgram) -> CamToolResult<ScheduledProgram> {
        let plan = self.plan();
        if plan.is_empty() {
            return Err(CamToolError::GenerationFailed(format!(
                "start depth {} leaves nothing to cut down to {}",
                self.settings.start_depth, self.target_depth
            )));
        }

        let count = plan.len();
        let mut text = String::with_capacity((pass.text.len() + 128) * count);
        for (i, depth) in plan.cumulative.iter().enumerate() {
            if i > 0 {
                text.push_str(&depth_change(
                    self.settings,
                    i + 1,
                    count,
                    pass.x0,
                    pass.a0,
                    *depth,
                ));
            }
            text.push_str(&pass.text);
        }

        let total_length = pass.length * count as f64;
        let machining_minutes = total_length / self.settings.feed_rate;
        info!(
            "Scheduled {} passes, {:.1} mm total, about {:.1} min",
            count, total_length, machining_minutes
        );

        Ok(ScheduledProgram {
            text,
            plan,
            total_length,
            machining_minutes,
        })
    }
}
