//! Irisflow Landmark Model
//!
//! Defines the data contracts shared by the kinematics core and its consumers:
//! - **Points:** 3D vectors with the handful of operations the geometry needs
//! - **Landmarks:** Fixed-schema 478-point face meshes and their named anchors
//! - **Frames:** Timestamped landmark frames in append-only JSONL streams
//! - **Records:** One output row per (frame, eye), with the CSV row contract
//! - **Summary:** Session-level scores
//!
//! Landmark coordinates are normalized image coordinates as produced by the
//! external face-landmark model; depth shares the x scale.

pub mod frame;
pub mod landmarks;
pub mod point;
pub mod record;
pub mod summary;
pub mod synthetic;

pub use frame::*;
pub use landmarks::*;
pub use point::*;
pub use record::*;
pub use summary::*;
