//! Fixed-schema face landmark sets.
//!
//! The external face-landmark model emits 478 points per detected face:
//! 468 mesh points followed by two 5-point iris rings. Only a handful of
//! them drive the kinematics pipeline; they are named in [`anchors`].

use serde::{Deserialize, Serialize};

use irisflow_common::error::{IrisflowError, IrisflowResult};

use crate::point::Point3;

/// Number of points in one face landmark set.
pub const LANDMARK_COUNT: usize = 478;

/// Named landmark indices used by the pipeline.
pub mod anchors {
    /// Outer face contour, subject's left cheek edge.
    pub const FACE_EDGE_RIGHT: usize = 454;
    /// Outer face contour, subject's right cheek edge. Origin of the head plane.
    pub const FACE_EDGE_LEFT: usize = 234;
    /// Bridge of the nose, between the eyes.
    pub const MID_FACE: usize = 6;
    /// Nose tip, the head-translation reference.
    pub const NOSE_TIP: usize = 1;

    /// Iris center reported first by the model (eye index 1).
    pub const LEFT_IRIS: usize = 468;
    /// Iris center reported second by the model (eye index 2).
    pub const RIGHT_IRIS: usize = 473;

    pub const LEFT_LID_UPPER: usize = 386;
    pub const LEFT_LID_LOWER: usize = 374;
    pub const RIGHT_LID_UPPER: usize = 157;
    /// Lower point of the first iris ring; stands in for the lower lid.
    pub const RIGHT_LID_LOWER: usize = 472;
}

/// One detected face in one frame. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3>", into = "Vec<Point3>")]
pub struct LandmarkSet {
    points: Vec<Point3>,
}

/// Vertical eyelid apertures for both eyes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyelidGaps {
    pub left: f64,
    pub right: f64,
}

impl LandmarkSet {
    /// Validate and wrap a raw point list.
    ///
    /// Rejects sets that do not have exactly [`LANDMARK_COUNT`] points or
    /// that contain non-finite coordinates.
    pub fn new(points: Vec<Point3>) -> IrisflowResult<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(IrisflowError::invalid_input(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                points.len()
            )));
        }
        if let Some(idx) = points.iter().position(|p| !p.is_finite()) {
            return Err(IrisflowError::invalid_input(format!(
                "landmark {idx} has a non-finite coordinate"
            )));
        }
        Ok(Self { points })
    }

    /// Point at `index`, or `None` past the end of the mesh.
    pub fn point(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    // Anchor indices are all below LANDMARK_COUNT, which `new` guarantees.
    fn anchor(&self, index: usize) -> Point3 {
        self.points[index]
    }

    pub fn face_edge_left(&self) -> Point3 {
        self.anchor(anchors::FACE_EDGE_LEFT)
    }

    pub fn face_edge_right(&self) -> Point3 {
        self.anchor(anchors::FACE_EDGE_RIGHT)
    }

    pub fn mid_face(&self) -> Point3 {
        self.anchor(anchors::MID_FACE)
    }

    pub fn left_iris(&self) -> Point3 {
        self.anchor(anchors::LEFT_IRIS)
    }

    pub fn right_iris(&self) -> Point3 {
        self.anchor(anchors::RIGHT_IRIS)
    }

    pub fn nose_tip(&self) -> Point3 {
        self.anchor(anchors::NOSE_TIP)
    }

    /// Absolute vertical distance between each eye's lid landmarks.
    pub fn eyelid_gaps(&self) -> EyelidGaps {
        let gap = |upper: usize, lower: usize| (self.anchor(upper).y - self.anchor(lower).y).abs();
        EyelidGaps {
            left: gap(anchors::LEFT_LID_UPPER, anchors::LEFT_LID_LOWER),
            right: gap(anchors::RIGHT_LID_UPPER, anchors::RIGHT_LID_LOWER),
        }
    }
}

impl TryFrom<Vec<Point3>> for LandmarkSet {
    type Error = IrisflowError;

    fn try_from(points: Vec<Point3>) -> IrisflowResult<Self> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Point3> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}
