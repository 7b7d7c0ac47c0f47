//! Session-level summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frame::IngestSource;

/// Scores and counters for one finished (or in-progress) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// When the session was summarized.
    pub created_at: DateTime<Utc>,

    pub source: IngestSource,

    /// Frames that advanced the session.
    pub frames_processed: u64,

    /// Frames dropped for having no face or degenerate geometry.
    pub frames_skipped: u64,

    pub blink_count: u32,

    /// Mean of the recorded inter-blink intervals, when any exist.
    pub mean_blink_duration_secs: Option<f64>,

    /// Completed fixations, indexed by eye slot (left, right).
    pub fixation_counts: [u32; 2],

    /// Saccade onsets, indexed by eye slot (left, right).
    pub saccade_counts: [u32; 2],

    /// Vertical/horizontal gaze-asymmetry score.
    pub ratio: Option<f64>,
}

impl SessionSummary {
    /// Human-readable score, `"undefined"` when no horizontal motion was seen.
    pub fn ratio_label(&self) -> String {
        match self.ratio {
            Some(r) => format!("{r:.3}"),
            None => "undefined".to_string(),
        }
    }
}
