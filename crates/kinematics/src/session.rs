//! Session aggregation: one exclusively-owned state container per source.
//!
//! A [`Session`] advances only on frames with a usable face. For each such
//! frame it:
//!
//! 1. projects both irises onto the head plane,
//! 2. runs the blink detector on the eyelid gaps,
//! 3. differentiates iris positions against the previous frame,
//! 4. per eye, in order left then right: folds the velocity into the axis
//!    sums, recomputes the ratio, runs the fixation and saccade detectors,
//!    and emits one [`EventRecord`].
//!
//! Frames without a face, with degenerate geometry, or with coordinates too
//! large to differentiate leave every piece of state untouched apart from the
//! skip counter.

use chrono::{DateTime, Utc};
use tracing::warn;

use irisflow_common::error::IrisflowResult;
use irisflow_landmark_model::frame::{IngestSource, LandmarkFrame};
use irisflow_landmark_model::landmarks::LandmarkSet;
use irisflow_landmark_model::point::Point3;
use irisflow_landmark_model::record::{round3, EventRecord, Eye};
use irisflow_landmark_model::summary::SessionSummary;

use crate::blink::{BlinkDetector, BlinkState};
use crate::config::{EyeStateMode, KinematicsConfig};
use crate::fixation::{FixationDetector, FixationState};
use crate::geometry::{project_irises, GeometryError};
use crate::saccade::{SaccadeDetector, SaccadeState};
use crate::velocity::{AxisAccumulator, VelocityEstimator};

/// Result of feeding one frame to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No face was detected; nothing changed.
    NoFace,
    /// The head-plane anchors were collinear, or a coordinate was non-finite
    /// or too large to differentiate; nothing changed.
    Degenerate,
    /// The frame advanced the session and produced one record per eye.
    Processed {
        frame: u64,
        records: [EventRecord; 2],
    },
}

impl FrameOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }
}

/// All mutable state of one session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Frames processed so far; the last processed frame's number.
    pub frame_index: u64,
    pub frames_skipped: u64,
    pub axes: AxisAccumulator,
    velocity: VelocityEstimator,
    blink: BlinkDetector,
    /// One slot per eye, or a single shared slot.
    fixation: Vec<FixationDetector>,
    saccade: Vec<SaccadeDetector>,
}

impl SessionState {
    fn new(config: &KinematicsConfig) -> Self {
        let slots = match config.eye_state_mode {
            EyeStateMode::PerEye => 2,
            EyeStateMode::Shared => 1,
        };
        let fixation = (0..slots)
            .map(|_| {
                FixationDetector::new(
                    config.fixation_threshold,
                    config.frame_rate,
                    config.min_fixation_secs(),
                )
            })
            .collect();
        let saccade = (0..slots)
            .map(|_| SaccadeDetector::new(config.saccade_threshold))
            .collect();

        Self {
            frame_index: 0,
            frames_skipped: 0,
            axes: AxisAccumulator::default(),
            velocity: VelocityEstimator::new(config.frame_rate, config.compensate_depth),
            blink: BlinkDetector::new(config.blink_threshold, config.frame_rate),
            fixation,
            saccade,
        }
    }

    fn slot(&self, eye: Eye) -> usize {
        eye.slot().min(self.fixation.len() - 1)
    }

    pub fn blink(&self) -> &BlinkState {
        self.blink.state()
    }

    /// Fixation state driving records for `eye`.
    pub fn fixation(&self, eye: Eye) -> &FixationState {
        self.fixation[self.slot(eye)].state()
    }

    /// Saccade state driving records for `eye`.
    pub fn saccade(&self, eye: Eye) -> &SaccadeState {
        self.saccade[self.slot(eye)].state()
    }

    /// Current session-level ratio.
    pub fn ratio(&self) -> Option<f64> {
        self.axes.ratio()
    }
}

/// A single-subject kinematics session.
#[derive(Debug, Clone)]
pub struct Session {
    config: KinematicsConfig,
    source: IngestSource,
    state: SessionState,
    records: Vec<EventRecord>,
}

impl Session {
    /// Create a session after validating the configuration.
    pub fn new(config: KinematicsConfig) -> IrisflowResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Create a session with the default configuration.
    pub fn with_defaults() -> Self {
        Self::from_config(KinematicsConfig::default())
    }

    fn from_config(config: KinematicsConfig) -> Self {
        let state = SessionState::new(&config);
        Self {
            config,
            source: IngestSource::default(),
            state,
            records: Vec::new(),
        }
    }

    /// Tag the session with its ingestion source.
    pub fn with_source(mut self, source: IngestSource) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &KinematicsConfig {
        &self.config
    }

    pub fn source(&self) -> IngestSource {
        self.source
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Records emitted so far, in frame order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }

    /// Session-level ratio score.
    pub fn ratio(&self) -> Option<f64> {
        self.state.ratio()
    }

    /// Drop all state and records, as if freshly constructed.
    pub fn reset(&mut self) {
        self.state = SessionState::new(&self.config);
        self.records.clear();
    }

    /// Validate a raw point list and process it.
    pub fn process_points(&mut self, points: Vec<Point3>) -> IrisflowResult<FrameOutcome> {
        let landmarks = LandmarkSet::new(points)?;
        Ok(self.process(Some(&landmarks)))
    }

    /// Process the primary face of a stream frame.
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> FrameOutcome {
        self.process(frame.primary_face())
    }

    /// Feed one frame's landmarks (or `None` when no face was detected).
    pub fn process(&mut self, landmarks: Option<&LandmarkSet>) -> FrameOutcome {
        let Some(landmarks) = landmarks else {
            self.state.frames_skipped += 1;
            return FrameOutcome::NoFace;
        };

        let irises = match project_irises(landmarks) {
            Ok(irises) => irises,
            Err(GeometryError::Degenerate) => {
                self.state.frames_skipped += 1;
                warn!(
                    after_frame = self.state.frame_index,
                    "skipping frame with degenerate face geometry"
                );
                return FrameOutcome::Degenerate;
            }
        };

        let anchor = landmarks.nose_tip();
        let velocity = self.state.velocity.estimate(irises, anchor);
        let mut axes = self.state.axes;
        if let Some(v) = velocity {
            axes.add(v.left);
            axes.add(v.right);
        }
        if !self.state.velocity.accepts(irises, anchor)
            || velocity.is_some_and(|v| !v.is_finite())
            || !axes.is_finite()
        {
            self.state.frames_skipped += 1;
            warn!(
                after_frame = self.state.frame_index,
                "skipping frame with out-of-range landmark coordinates"
            );
            return FrameOutcome::Degenerate;
        }

        self.state.velocity.record(irises, anchor);
        self.state.frame_index += 1;
        let frame = self.state.frame_index;

        let blink = self.state.blink.update(frame, landmarks.eyelid_gaps());
        let blink_duration = blink.duration.unwrap_or(0.0);

        let records = Eye::BOTH.map(|eye| {
            self.eye_record(
                frame,
                eye,
                irises.get(eye),
                velocity.map(|v| v.get(eye)),
                blink_duration,
            )
        });
        self.records.extend(records.iter().cloned());

        FrameOutcome::Processed { frame, records }
    }

    fn eye_record(
        &mut self,
        frame: u64,
        eye: Eye,
        position: Point3,
        velocity: Option<Point3>,
        blink_duration: f64,
    ) -> EventRecord {
        let slot = self.state.slot(eye);
        let mut ratio = None;

        if let Some(v) = velocity {
            self.state.axes.add(v);
            ratio = self.state.axes.ratio();
            let speed = v.norm();
            self.state.fixation[slot].update(frame, speed);
            self.state.saccade[slot].update(frame, speed);
        }

        let blink = self.state.blink.state();
        let fixation = self.state.fixation[slot].state();
        let saccade = self.state.saccade[slot].state();

        EventRecord {
            frame,
            eye,
            x: round3(position.x),
            y: round3(position.y),
            z: round3(position.z),
            vx: velocity.map(|v| round3(v.x)),
            vy: velocity.map(|v| round3(v.y)),
            vz: velocity.map(|v| round3(v.z)),
            ratio,
            blink_count: blink.blink_count,
            blink_duration: round3(blink_duration),
            fixation_count: fixation.fixation_count,
            fixation_duration: round3(fixation.fixation_duration),
            saccade_count: saccade.saccade_count,
        }
    }

    /// Summarize the session so far.
    pub fn summary(&self, created_at: DateTime<Utc>) -> SessionSummary {
        SessionSummary {
            created_at,
            source: self.source,
            frames_processed: self.state.frame_index,
            frames_skipped: self.state.frames_skipped,
            blink_count: self.state.blink().blink_count,
            mean_blink_duration_secs: self.state.blink.mean_duration().map(round3),
            fixation_counts: Eye::BOTH.map(|eye| self.state.fixation(eye).fixation_count),
            saccade_counts: Eye::BOTH.map(|eye| self.state.saccade(eye).saccade_count),
            ratio: self.ratio(),
        }
    }
}

/// Replay a recorded stream into a fresh session.
pub fn replay(config: KinematicsConfig, frames: &[LandmarkFrame]) -> IrisflowResult<Session> {
    let mut session = Session::new(config)?.with_source(IngestSource::Recorded);
    for frame in frames {
        session.process_frame(frame);
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use irisflow_landmark_model::synthetic::{SyntheticFace, CLOSED_LID_GAP};

    fn face(dx: f64, dy: f64) -> LandmarkSet {
        SyntheticFace::default().with_gaze(dx, dy).build().unwrap()
    }

    #[test]
    fn test_single_frame_yields_two_position_only_records() {
        let mut session = Session::with_defaults();
        let outcome = session.process(Some(&face(0.0, 0.0)));

        let FrameOutcome::Processed { frame, records } = outcome else {
            panic!("frame should be processed");
        };
        assert_eq!(frame, 1);
        assert_eq!(records[0].eye, Eye::Left);
        assert_eq!(records[1].eye, Eye::Right);
        for record in &records {
            assert_eq!(record.velocity(), None);
            assert_eq!(record.ratio, None);
            assert_eq!(record.blink_count, 0);
            assert_eq!(record.fixation_count, 0);
            assert_eq!(record.saccade_count, 0);
            assert_eq!(record.blink_duration, 0.0);
            assert_eq!(record.fixation_duration, 0.0);
        }
        assert_eq!((records[0].x, records[0].y, records[0].z), (0.42, 0.45, 0.0));
        assert_eq!(session.records().len(), 2);
    }

    #[test]
    fn test_no_face_leaves_state_untouched() {
        let mut session = Session::with_defaults();
        session.process(Some(&face(0.0, 0.0)));
        assert_eq!(session.process(None), FrameOutcome::NoFace);
        assert_eq!(session.state().frame_index, 1);
        assert_eq!(session.state().frames_skipped, 1);
        assert_eq!(session.records().len(), 2);
    }

    #[test]
    fn test_degenerate_frame_is_skipped() {
        let mut session = Session::with_defaults();
        session.process(Some(&face(0.0, 0.0)));
        let degenerate = SyntheticFace::default().degenerate().build().unwrap();
        assert_eq!(session.process(Some(&degenerate)), FrameOutcome::Degenerate);
        assert_eq!(session.state().frame_index, 1);
        assert_eq!(session.state().axes, AxisAccumulator::default());

        // the next good frame differentiates against frame 1
        let FrameOutcome::Processed { frame, records } = session.process(Some(&face(0.01, 0.0)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(frame, 2);
        assert_eq!(records[0].vx, Some(0.3));
    }

    fn with_left_iris_x(x: f64) -> LandmarkSet {
        let mut points = face(0.0, 0.0).points().to_vec();
        points[irisflow_landmark_model::anchors::LEFT_IRIS].x = x;
        LandmarkSet::new(points).unwrap()
    }

    #[test]
    fn test_huge_coordinate_is_skipped_without_touching_state() {
        let mut session = Session::with_defaults();
        session.process(Some(&face(0.0, 0.0)));
        let before = session.state().clone();

        assert_eq!(
            session.process(Some(&with_left_iris_x(1e308))),
            FrameOutcome::Degenerate
        );
        assert_eq!(session.state().frame_index, before.frame_index);
        assert_eq!(session.state().axes, before.axes);
        assert_eq!(session.state().frames_skipped, 1);
        assert_eq!(session.records().len(), 2);

        let FrameOutcome::Processed { frame, records } = session.process(Some(&face(0.01, 0.0)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(frame, 2);
        assert_eq!(records[0].vx, Some(0.3));
        assert!(session.state().axes.is_finite());
        assert_eq!(session.ratio(), Some(0.0));
    }

    #[test]
    fn test_non_finite_points_are_rejected_before_processing() {
        let mut session = Session::with_defaults();
        session.process(Some(&face(0.0, 0.0)));
        for x in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut points = face(0.0, 0.0).points().to_vec();
            points[irisflow_landmark_model::anchors::LEFT_IRIS].x = x;
            assert!(session.process_points(points).is_err());
        }
        assert_eq!(session.state().frame_index, 1);
        assert_eq!(session.state().frames_skipped, 0);
        assert_eq!(session.state().axes, AxisAccumulator::default());
    }

    #[test]
    fn test_huge_first_frame_does_not_become_the_reference() {
        let mut session = Session::with_defaults();
        assert_eq!(
            session.process(Some(&with_left_iris_x(1e308))),
            FrameOutcome::Degenerate
        );
        assert_eq!(session.state().frame_index, 0);

        let FrameOutcome::Processed { frame, records } = session.process(Some(&face(0.0, 0.0)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(frame, 1);
        assert_eq!(records[0].velocity(), None);

        let FrameOutcome::Processed { records, .. } = session.process(Some(&face(0.01, 0.0)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(records[0].vx, Some(0.3));
    }

    #[test]
    fn test_default_and_validated_constructors_agree() {
        let mut defaults = Session::with_defaults();
        let mut validated = Session::new(KinematicsConfig::default()).unwrap();
        assert_eq!(defaults.config(), validated.config());
        for dx in [0.0, 0.01, 0.06] {
            defaults.process(Some(&face(dx, 0.0)));
            validated.process(Some(&face(dx, 0.0)));
        }
        assert_eq!(defaults.records(), validated.records());
        assert_eq!(defaults.source(), validated.source());
    }

    #[test]
    fn test_ratio_updates_per_eye() {
        let mut session = Session::with_defaults();
        session.process(Some(&face(0.0, 0.0)));
        let FrameOutcome::Processed { records, .. } = session.process(Some(&face(0.01, 0.005)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(records[0].vx, Some(0.3));
        assert_eq!(records[0].vy, Some(0.15));
        assert_eq!(records[0].ratio, Some(0.5));
        assert_eq!(records[1].ratio, Some(0.5));
        assert!((session.state().axes.sum_x - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_only_motion_has_undefined_ratio() {
        let mut session = Session::with_defaults();
        session.process(Some(&face(0.0, 0.0)));
        let FrameOutcome::Processed { records, .. } = session.process(Some(&face(0.0, 0.01)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(records[0].ratio, None);
        assert_eq!(records[0].vy, Some(0.3));
        assert_eq!(session.ratio(), None);
    }

    #[test]
    fn test_blink_duration_only_on_start_frame() {
        let mut session = Session::with_defaults();
        let open = face(0.0, 0.0);
        let closed = SyntheticFace::default()
            .with_lid_gap(CLOSED_LID_GAP)
            .build()
            .unwrap();

        session.process(Some(&closed)); // frame 1: blink 1
        session.process(Some(&open)); // frame 2
        session.process(Some(&open)); // frame 3
        let FrameOutcome::Processed { records, .. } = session.process(Some(&closed)) else {
            panic!("frame should be processed");
        };
        // frame 4 starts blink 2, three frames after the last closed frame
        assert_eq!(records[0].blink_count, 2);
        assert_eq!(records[0].blink_duration, 0.1);
        assert_eq!(records[1].blink_duration, 0.1);

        let FrameOutcome::Processed { records, .. } = session.process(Some(&closed)) else {
            panic!("frame should be processed");
        };
        assert_eq!(records[0].blink_duration, 0.0);
        assert_eq!(records[0].blink_count, 2);
    }

    #[test]
    fn test_per_eye_and_shared_modes_differ() {
        // left eye sits still while the right eye moves fast
        let build = |right_dx: f64| {
            let mut points = face(0.0, 0.0).points().to_vec();
            points[irisflow_landmark_model::anchors::RIGHT_IRIS].x += right_dx;
            LandmarkSet::new(points).unwrap()
        };
        let frames = [build(0.0), build(0.05), build(0.0)];

        let mut per_eye = Session::with_defaults();
        let mut shared = Session::new(KinematicsConfig {
            eye_state_mode: EyeStateMode::Shared,
            ..Default::default()
        })
        .unwrap();
        for f in &frames {
            per_eye.process(Some(f));
            shared.process(Some(f));
        }

        assert_eq!(per_eye.state().saccade(Eye::Left).saccade_count, 0);
        assert_eq!(per_eye.state().saccade(Eye::Right).saccade_count, 1);
        assert!(per_eye.state().fixation(Eye::Left).is_fixating);

        // shared slot: the right eye's speed overwrites the left eye's
        assert_eq!(shared.state().saccade(Eye::Left).saccade_count, 2);
        assert!(!shared.state().fixation(Eye::Left).is_fixating);
    }

    #[test]
    fn test_reset_is_all_or_nothing() {
        let mut session = Session::with_defaults();
        for dx in [0.0, 0.01, 0.05, 0.0] {
            session.process(Some(&face(dx, 0.0)));
        }
        session.process(None);
        session.reset();

        assert_eq!(session.state().frame_index, 0);
        assert_eq!(session.state().frames_skipped, 0);
        assert_eq!(session.ratio(), None);
        assert!(session.records().is_empty());
        assert_eq!(session.state().blink(), &BlinkState::default());

        let FrameOutcome::Processed { frame, records } = session.process(Some(&face(0.0, 0.0)))
        else {
            panic!("frame should be processed");
        };
        assert_eq!(frame, 1);
        assert_eq!(records[0].velocity(), None);
    }

    #[test]
    fn test_process_points_rejects_short_sets() {
        let mut session = Session::with_defaults();
        assert!(session.process_points(vec![Point3::ZERO; 10]).is_err());
        assert_eq!(session.state().frame_index, 0);
        assert_eq!(session.state().frames_skipped, 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = KinematicsConfig {
            frame_rate: -30.0,
            ..Default::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_summary_reports_counts() {
        let mut session = Session::with_defaults().with_source(IngestSource::Live);
        session.process(None);
        for dx in [0.0, 0.0, 0.0, 0.06] {
            session.process(Some(&face(dx, 0.0)));
        }
        let created_at = "2026-03-01T12:00:00Z".parse().unwrap();
        let summary = session.summary(created_at);
        assert_eq!(summary.source, IngestSource::Live);
        assert_eq!(summary.frames_processed, 4);
        assert_eq!(summary.frames_skipped, 1);
        assert_eq!(summary.fixation_counts, [1, 1]);
        assert_eq!(summary.saccade_counts, [1, 1]);
        assert_eq!(summary.ratio, Some(0.0));
        assert_eq!(summary.created_at, created_at);
    }
}
