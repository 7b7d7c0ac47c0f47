//! Saccade onset detection.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mutable saccade state of one classifier slot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SaccadeState {
    pub is_saccading: bool,
    pub last_saccade_frame: Option<u64>,
    pub saccade_count: u32,
}

/// Counts rising edges of `speed > threshold`. No duration is tracked.
#[derive(Debug, Clone)]
pub struct SaccadeDetector {
    threshold: f64,
    state: SaccadeState,
}

impl SaccadeDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            state: SaccadeState::default(),
        }
    }

    pub fn state(&self) -> &SaccadeState {
        &self.state
    }

    /// Feed one speed sample. Returns true when a saccade starts on this frame.
    pub fn update(&mut self, frame: u64, speed: f64) -> bool {
        if speed <= self.threshold {
            self.state.is_saccading = false;
            return false;
        }
        if self.state.is_saccading {
            return false;
        }

        self.state.is_saccading = true;
        self.state.saccade_count += 1;
        self.state.last_saccade_frame = Some(frame);
        debug!(frame, speed, count = self.state.saccade_count, "saccade");
        true
    }
}
