//! Bilateral blink detection.
//!
//! A frame is "closed" when both eyelid gaps fall below the threshold. The
//! detector reacts only to the open → closed edge:
//!
//! - on the edge, `blink_count` increments, and if an earlier blink exists
//!   the interval `(frame − last_blink_frame) / frame_rate` is appended to
//!   `blink_durations`;
//! - while closed, `last_blink_frame` tracks the current frame;
//! - closed → open does nothing.
//!
//! Durations are therefore credited retrospectively, when the *next* blink
//! starts, and measure the gap from the last closed frame of the previous
//! blink.

use serde::{Deserialize, Serialize};
use tracing::debug;

use irisflow_landmark_model::landmarks::EyelidGaps;

/// Mutable blink state of one session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlinkState {
    pub is_blinking: bool,
    /// Last frame observed closed, if any.
    pub last_blink_frame: Option<u64>,
    pub blink_count: u32,
    pub blink_durations: Vec<f64>,
}

/// What a single frame did to the blink state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlinkUpdate {
    /// A new blink began on this frame.
    pub started: bool,
    /// Interval credited on this frame, if a new blink followed an older one.
    pub duration: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BlinkDetector {
    threshold: f64,
    frame_rate: f64,
    state: BlinkState,
}

impl BlinkDetector {
    pub fn new(threshold: f64, frame_rate: f64) -> Self {
        Self {
            threshold,
            frame_rate,
            state: BlinkState::default(),
        }
    }

    pub fn state(&self) -> &BlinkState {
        &self.state
    }

    /// Whether both eyes count as closed for these gaps.
    pub fn is_closed(&self, gaps: EyelidGaps) -> bool {
        gaps.left < self.threshold && gaps.right < self.threshold
    }

    pub fn update(&mut self, frame: u64, gaps: EyelidGaps) -> BlinkUpdate {
        if !self.is_closed(gaps) {
            self.state.is_blinking = false;
            return BlinkUpdate::default();
        }

        let mut update = BlinkUpdate::default();
        if !self.state.is_blinking {
            if let Some(last) = self.state.last_blink_frame {
                let duration = frame.saturating_sub(last) as f64 / self.frame_rate;
                self.state.blink_durations.push(duration);
                update.duration = Some(duration);
            }
            self.state.blink_count += 1;
            self.state.is_blinking = true;
            update.started = true;
            debug!(
                frame,
                count = self.state.blink_count,
                duration = ?update.duration,
                "blink started"
            );
        }
        self.state.last_blink_frame = Some(frame);
        update
    }

    /// Mean of the credited blink intervals.
    pub fn mean_duration(&self) -> Option<f64> {
        let durations = &self.state.blink_durations;
        if durations.is_empty() {
            return None;
        }
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    }
}
