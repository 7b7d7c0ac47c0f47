//! Head-plane projection of the iris centers.
//!
//! Three face anchors span a plane that moves with the head. Removing each
//! iris point's component along that plane's normal cancels the apparent
//! iris displacement caused by head yaw, pitch, and roll.
//!
//! # Algorithm
//!
//! 1. `v1 = FACE_EDGE_RIGHT − FACE_EDGE_LEFT`, `v2 = MID_FACE − FACE_EDGE_LEFT`.
//! 2. `n = normalize(v1 × v2)`; collinear anchors have no normal.
//! 3. `d = n · left_iris` (signed distance along `n`).
//! 4. Both irises are shifted by the same `−d·n`.

use irisflow_landmark_model::landmarks::LandmarkSet;
use irisflow_landmark_model::point::Point3;
use irisflow_landmark_model::record::Eye;

/// Per-frame geometry failures. The frame should be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("degenerate face geometry: head-plane anchors are collinear")]
    Degenerate,
}

/// Unit normal of the head plane for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPlane {
    pub normal: Point3,
}

impl HeadPlane {
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Result<Self, GeometryError> {
        let origin = landmarks.face_edge_left();
        let v1 = landmarks.face_edge_right() - origin;
        let v2 = landmarks.mid_face() - origin;
        let normal = v1.cross(&v2).normalized().ok_or(GeometryError::Degenerate)?;
        Ok(Self { normal })
    }

    /// Signed distance of `point` along the normal.
    pub fn distance(&self, point: &Point3) -> f64 {
        self.normal.dot(point)
    }
}

/// Iris centers after head-plane projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedIrisPair {
    pub left: Point3,
    pub right: Point3,
}

impl ProjectedIrisPair {
    pub fn get(&self, eye: Eye) -> Point3 {
        match eye {
            Eye::Left => self.left,
            Eye::Right => self.right,
        }
    }
}

/// Project both iris centers of one frame onto its head plane.
pub fn project_irises(landmarks: &LandmarkSet) -> Result<ProjectedIrisPair, GeometryError> {
    let plane = HeadPlane::from_landmarks(landmarks)?;
    let left_raw = landmarks.left_iris();
    let right_raw = landmarks.right_iris();

    let shift = plane.normal * plane.distance(&left_raw);
    let pair = ProjectedIrisPair {
        left: left_raw - shift,
        right: right_raw - shift,
    };

    if !pair.left.is_finite() || !pair.right.is_finite() {
        return Err(GeometryError::Degenerate);
    }
    Ok(pair)
}
