//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use irisflow_common::config::PipelineDefaults;
use irisflow_common::error::{IrisflowError, IrisflowResult};

/// How fixation and saccade state is kept across the two eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeStateMode {
    /// Each eye drives its own fixation and saccade detectors.
    #[default]
    PerEye,
    /// Both eyes feed one detector pair in turn, so the eye processed last
    /// in a frame decides the state. Reproduces legacy exports.
    Shared,
}

/// Configuration for a kinematics session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Capture rate used for velocity and duration scaling (Hz).
    pub frame_rate: f64,

    /// Eyelid gap below which an eye counts as closed. A blink needs both.
    pub blink_threshold: f64,

    /// Iris speed below which an eye counts as fixating (units/sec).
    pub fixation_threshold: f64,

    /// Iris speed above which an eye counts as saccading (units/sec).
    pub saccade_threshold: f64,

    pub eye_state_mode: EyeStateMode,

    /// Subtract head translation on z as well as x/y.
    pub compensate_depth: bool,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self::from_defaults(&PipelineDefaults::default())
    }
}

impl KinematicsConfig {
    /// Build from the application-level pipeline defaults.
    pub fn from_defaults(defaults: &PipelineDefaults) -> Self {
        Self {
            frame_rate: defaults.frame_rate,
            blink_threshold: defaults.blink_threshold,
            fixation_threshold: defaults.fixation_threshold,
            saccade_threshold: defaults.saccade_threshold,
            eye_state_mode: if defaults.per_eye_classifiers {
                EyeStateMode::PerEye
            } else {
                EyeStateMode::Shared
            },
            compensate_depth: defaults.compensate_depth,
        }
    }

    /// Shortest fixation (seconds) that is counted when it ends.
    ///
    /// Derived as `fixation_threshold / frame_rate`, which at the nominal
    /// settings means any fixation sustained past its entry frame.
    pub fn min_fixation_secs(&self) -> f64 {
        self.fixation_threshold / self.frame_rate
    }

    /// Reject non-finite or non-positive rates and thresholds.
    pub fn validate(&self) -> IrisflowResult<()> {
        let checks = [
            ("frame_rate", self.frame_rate),
            ("blink_threshold", self.blink_threshold),
            ("fixation_threshold", self.fixation_threshold),
            ("saccade_threshold", self.saccade_threshold),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(IrisflowError::config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
