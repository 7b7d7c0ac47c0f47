//! Fixation detection from iris speed.
//!
//! An eye fixates while its speed stays strictly below the threshold. The
//! run's duration is measured from its entry frame; a run is counted only
//! when it ends and only if it lasted at least the configured minimum.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mutable fixation state of one classifier slot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixationState {
    pub is_fixating: bool,
    pub fixation_start_frame: Option<u64>,
    /// Length of the current (or most recent) run in seconds.
    pub fixation_duration: f64,
    pub fixation_count: u32,
}

/// Transition produced by one speed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixationTransition {
    Started,
    Sustained,
    /// A run ended; `counted` tells whether it was long enough to count.
    Ended { counted: bool },
    Idle,
}

#[derive(Debug, Clone)]
pub struct FixationDetector {
    threshold: f64,
    frame_rate: f64,
    min_duration_secs: f64,
    state: FixationState,
}

impl FixationDetector {
    pub fn new(threshold: f64, frame_rate: f64, min_duration_secs: f64) -> Self {
        Self {
            threshold,
            frame_rate,
            min_duration_secs,
            state: FixationState::default(),
        }
    }

    pub fn state(&self) -> &FixationState {
        &self.state
    }

    pub fn update(&mut self, frame: u64, speed: f64) -> FixationTransition {
        let state = &mut self.state;

        if speed < self.threshold {
            match (state.is_fixating, state.fixation_start_frame) {
                (true, Some(start)) => {
                    state.fixation_duration = frame.saturating_sub(start) as f64 / self.frame_rate;
                    FixationTransition::Sustained
                }
                _ => {
                    state.is_fixating = true;
                    state.fixation_start_frame = Some(frame);
                    state.fixation_duration = 0.0;
                    FixationTransition::Started
                }
            }
        } else if state.is_fixating {
            let counted = state.fixation_duration >= self.min_duration_secs;
            if counted {
                state.fixation_count += 1;
            }
            state.is_fixating = false;
            debug!(
                frame,
                duration = state.fixation_duration,
                counted,
                count = state.fixation_count,
                "fixation ended"
            );
            FixationTransition::Ended { counted }
        } else {
            FixationTransition::Idle
        }
    }
}
