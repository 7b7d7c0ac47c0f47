//! Deterministic synthetic landmark sets for tests and demos.
//!
//! The neutral face lies in the `z = 0` plane, so its head-plane normal is
//! the depth axis and projected iris positions equal their raw x/y.

use irisflow_common::error::IrisflowResult;

use crate::frame::LandmarkFrame;
use crate::landmarks::{anchors, LandmarkSet, LANDMARK_COUNT};
use crate::point::Point3;

/// Eyelid gap of a relaxed open eye.
pub const OPEN_LID_GAP: f64 = 0.03;
/// Eyelid gap of a closed eye.
pub const CLOSED_LID_GAP: f64 = 0.008;

const EYE_LINE_Y: f64 = 0.45;
const LEFT_IRIS_X: f64 = 0.42;
const RIGHT_IRIS_X: f64 = 0.58;

/// Builder for a single synthetic face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFace {
    /// Gaze offset applied to both iris centers.
    pub gaze: (f64, f64),
    /// Rigid translation applied to every landmark.
    pub head_offset: Point3,
    /// Depth of the iris centers relative to the face plane.
    pub iris_depth: f64,
    pub left_lid_gap: f64,
    pub right_lid_gap: f64,
    /// Collapse the face-width anchors onto one point.
    pub degenerate: bool,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            gaze: (0.0, 0.0),
            head_offset: Point3::ZERO,
            iris_depth: 0.0,
            left_lid_gap: OPEN_LID_GAP,
            right_lid_gap: OPEN_LID_GAP,
            degenerate: false,
        }
    }
}

impl SyntheticFace {
    pub fn with_gaze(mut self, dx: f64, dy: f64) -> Self {
        self.gaze = (dx, dy);
        self
    }

    pub fn with_head_offset(mut self, offset: Point3) -> Self {
        self.head_offset = offset;
        self
    }

    /// Set both eyelid gaps.
    pub fn with_lid_gap(mut self, gap: f64) -> Self {
        self.left_lid_gap = gap;
        self.right_lid_gap = gap;
        self
    }

    pub fn degenerate(mut self) -> Self {
        self.degenerate = true;
        self
    }

    pub fn build(&self) -> IrisflowResult<LandmarkSet> {
        let mut points: Vec<Point3> = (0..LANDMARK_COUNT)
            .map(|i| {
                let col = (i % 20) as f64 / 19.0;
                let row = (i / 20) as f64 / 23.0;
                Point3::new(0.3 + 0.4 * col, 0.3 + 0.4 * row, 0.0)
            })
            .collect();

        points[anchors::FACE_EDGE_LEFT] = Point3::new(0.30, 0.50, 0.0);
        points[anchors::FACE_EDGE_RIGHT] = if self.degenerate {
            points[anchors::FACE_EDGE_LEFT]
        } else {
            Point3::new(0.70, 0.50, 0.0)
        };
        points[anchors::MID_FACE] = Point3::new(0.50, 0.42, 0.0);
        points[anchors::NOSE_TIP] = Point3::new(0.50, 0.55, -0.05);

        let (gx, gy) = self.gaze;
        points[anchors::LEFT_IRIS] = Point3::new(LEFT_IRIS_X + gx, EYE_LINE_Y + gy, self.iris_depth);
        points[anchors::RIGHT_IRIS] =
            Point3::new(RIGHT_IRIS_X + gx, EYE_LINE_Y + gy, self.iris_depth);

        points[anchors::LEFT_LID_UPPER].y = EYE_LINE_Y - self.left_lid_gap / 2.0;
        points[anchors::LEFT_LID_LOWER].y = EYE_LINE_Y + self.left_lid_gap / 2.0;
        points[anchors::RIGHT_LID_UPPER].y = EYE_LINE_Y - self.right_lid_gap / 2.0;
        points[anchors::RIGHT_LID_LOWER].y = EYE_LINE_Y + self.right_lid_gap / 2.0;

        for p in &mut points {
            *p = *p + self.head_offset;
        }

        LandmarkSet::new(points)
    }
}

/// Parameters for a generated multi-frame stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticStream {
    pub frames: usize,
    pub frame_rate: f64,
    /// Start a 3-frame blink every N frames (0 disables blinks).
    pub blink_every: usize,
    /// Jump to the next gaze target every N frames (0 disables saccades).
    pub saccade_every: usize,
    /// Drop the face from every N-th frame (0 keeps every frame).
    pub dropout_every: usize,
}

impl Default for SyntheticStream {
    fn default() -> Self {
        Self {
            frames: 300,
            frame_rate: 30.0,
            blink_every: 90,
            saccade_every: 45,
            dropout_every: 0,
        }
    }
}

const GAZE_TARGETS: [(f64, f64); 4] = [(0.0, 0.0), (0.04, 0.0), (0.0, 0.03), (-0.04, 0.01)];

impl SyntheticStream {
    /// Generate the frames. Output depends only on the parameters.
    pub fn generate(&self) -> IrisflowResult<Vec<LandmarkFrame>> {
        let frame_rate = if self.frame_rate > 0.0 {
            self.frame_rate
        } else {
            30.0
        };

        (0..self.frames)
            .map(|k| {
                let t_ms = (k as f64 * 1000.0 / frame_rate).round() as u64;
                if self.dropout_every > 0 && k > 0 && k % self.dropout_every == 0 {
                    return Ok(LandmarkFrame::new(t_ms, vec![]));
                }

                let target = if self.saccade_every > 0 {
                    GAZE_TARGETS[(k / self.saccade_every) % GAZE_TARGETS.len()]
                } else {
                    GAZE_TARGETS[0]
                };
                let phase = k as f64;
                let drift = (0.0005 * (phase * 0.3).sin(), 0.0004 * (phase * 0.2).cos());

                let blinking = self.blink_every > 0 && (1..=3).contains(&(k % self.blink_every));
                let lid_gap = if blinking { CLOSED_LID_GAP } else { OPEN_LID_GAP };

                let sway = Point3::new(
                    0.002 * (phase * 0.05).sin(),
                    0.001 * (phase * 0.05).cos(),
                    0.0,
                );

                let face = SyntheticFace::default()
                    .with_gaze(target.0 + drift.0, target.1 + drift.1)
                    .with_head_offset(sway)
                    .with_lid_gap(lid_gap)
                    .build()?;
                Ok(LandmarkFrame::new(t_ms, vec![face]))
            })
            .collect()
    }
}
