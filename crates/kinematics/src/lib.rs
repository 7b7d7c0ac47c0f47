//! Irisflow Kinematics: the oculomotor pipeline
//!
//! Turns per-frame face landmark sets into kinematic and event records:
//! - **Geometry:** Project iris centers onto the head plane to cancel head pose
//! - **Velocity:** Frame-to-frame iris velocity, compensated for head translation
//! - **Blink / Fixation / Saccade:** Hysteresis state machines over lid gaps and iris speed
//! - **Session:** Frame counter, cumulative axis ratio, and record assembly
//!
//! Frames must be fed in arrival order, one at a time. Every [`Session`] owns
//! all of its state; run independent sessions for independent sources.
//!
//! This crate is pure computation with no I/O.

pub mod blink;
pub mod config;
pub mod fixation;
pub mod geometry;
pub mod saccade;
pub mod session;
pub mod velocity;

pub use config::{EyeStateMode, KinematicsConfig};
pub use session::{replay, FrameOutcome, Session};
