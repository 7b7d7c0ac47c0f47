//! Head-compensated iris velocity and the cumulative axis sums.

use serde::{Deserialize, Serialize};

use irisflow_landmark_model::point::Point3;
use irisflow_landmark_model::record::{round3, Eye};

use crate::geometry::ProjectedIrisPair;

/// Velocity of both irises for one frame (units per second).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityPair {
    pub left: Point3,
    pub right: Point3,
}

impl VelocityPair {
    pub fn get(&self, eye: Eye) -> Point3 {
        match eye {
            Eye::Left => self.left,
            Eye::Right => self.right,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    irises: ProjectedIrisPair,
    anchor: Point3,
}

/// Differentiates projected iris positions across consecutive frames.
///
/// `v = frame_rate · ((iris_now − iris_prev) − (anchor_now − anchor_prev))`
///
/// The head anchor's displacement is removed before scaling, so both terms
/// share one frame-rate constant.
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    frame_rate: f64,
    compensate_depth: bool,
    previous: Option<Snapshot>,
}

impl VelocityEstimator {
    pub fn new(frame_rate: f64, compensate_depth: bool) -> Self {
        Self {
            frame_rate,
            compensate_depth,
            previous: None,
        }
    }

    /// Whether a frame's points are small enough that differentiating them
    /// against any other accepted frame stays finite.
    ///
    /// Both snapshots are bounded by `f64::MAX / (4 · frame_rate)`, so each
    /// difference term is at most `MAX / (2 · frame_rate)` and the scaled
    /// velocity at most `MAX`.
    pub fn accepts(&self, irises: ProjectedIrisPair, anchor: Point3) -> bool {
        let scale = 4.0 * self.frame_rate;
        [irises.left, irises.right, anchor]
            .iter()
            .all(|p| (*p * scale).is_finite())
    }

    /// Velocity of this frame against the stored snapshot, without storing it.
    pub fn estimate(&self, irises: ProjectedIrisPair, anchor: Point3) -> Option<VelocityPair> {
        let previous = self.previous?;

        let mut head_delta = anchor - previous.anchor;
        if !self.compensate_depth {
            head_delta.z = 0.0;
        }

        let eye_velocity = |now: Point3, before: Point3| (now - before - head_delta) * self.frame_rate;
        Some(VelocityPair {
            left: eye_velocity(irises.left, previous.irises.left),
            right: eye_velocity(irises.right, previous.irises.right),
        })
    }

    /// Store this frame as the reference for the next one.
    pub fn record(&mut self, irises: ProjectedIrisPair, anchor: Point3) {
        self.previous = Some(Snapshot { irises, anchor });
    }

    /// Estimate, then record. Returns `None` on the first frame of a session.
    pub fn update(&mut self, irises: ProjectedIrisPair, anchor: Point3) -> Option<VelocityPair> {
        let velocity = self.estimate(irises, anchor);
        self.record(irises, anchor);
        velocity
    }

    /// Whether a previous frame is available to differentiate against.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Running sums of absolute horizontal and vertical iris speed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisAccumulator {
    pub sum_x: f64,
    pub sum_y: f64,
}

impl AxisAccumulator {
    /// Accumulate one eye's velocity.
    pub fn add(&mut self, velocity: Point3) {
        self.sum_x += velocity.x.abs();
        self.sum_y += velocity.y.abs();
    }

    pub fn is_finite(&self) -> bool {
        self.sum_x.is_finite() && self.sum_y.is_finite()
    }

    /// `round3(sum_y / sum_x)`, undefined while no horizontal motion has been seen.
    pub fn ratio(&self) -> Option<f64> {
        if self.sum_x == 0.0 {
            return None;
        }
        Some(round3(self.sum_y / self.sum_x))
    }
}
