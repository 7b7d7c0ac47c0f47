use irisflow_kinematics::{replay, FrameOutcome, KinematicsConfig, Session};
use irisflow_landmark_model::frame::{parse_frames, serialize_frames, LandmarkFrame};
use irisflow_landmark_model::landmarks::LandmarkSet;
use irisflow_landmark_model::point::Point3;
use irisflow_landmark_model::record::{write_csv, EventRecord, Eye, CSV_HEADER};
use irisflow_landmark_model::synthetic::SyntheticFace;

fn face_at(dx: f64) -> LandmarkSet {
    SyntheticFace::default()
        .with_gaze(dx, 0.0)
        .build()
        .expect("synthetic face should be valid")
}

fn face_with_gap(gap: f64) -> LandmarkSet {
    SyntheticFace::default()
        .with_lid_gap(gap)
        .build()
        .expect("synthetic face should be valid")
}

fn processed(outcome: FrameOutcome) -> [EventRecord; 2] {
    match outcome {
        FrameOutcome::Processed { records, .. } => records,
        other => panic!("expected a processed frame, got {other:?}"),
    }
}

#[test]
fn one_frame_yields_two_zeroed_records() {
    let mut session = Session::with_defaults();
    let records = processed(session.process(Some(&face_at(0.0))));

    assert_eq!(session.records().len(), 2);
    assert_eq!(records[0].eye, Eye::Left);
    assert_eq!(records[1].eye, Eye::Right);
    for record in &records {
        assert_eq!(record.frame, 1);
        assert_eq!(record.blink_count, 0);
        assert_eq!(record.fixation_count, 0);
        assert_eq!(record.saccade_count, 0);
    }
}

#[test]
fn sub_threshold_motion_starts_and_sustains_fixation() {
    // 0.05 / 30 per frame along x gives a speed of 0.05 at 30 Hz
    let step = 0.05 / 30.0;
    let mut session = Session::with_defaults();

    session.process(Some(&face_at(0.0)));
    let second = processed(session.process(Some(&face_at(step))));
    assert_eq!(second[0].vx, Some(0.05));
    let fixation = session.state().fixation(Eye::Left);
    assert!(fixation.is_fixating);
    assert_eq!(fixation.fixation_duration, 0.0);
    assert_eq!(second[0].fixation_duration, 0.0);

    let third = processed(session.process(Some(&face_at(2.0 * step))));
    let fixation = session.state().fixation(Eye::Left);
    assert!((fixation.fixation_duration - 1.0 / 30.0).abs() < 1e-12);
    assert_eq!(third[0].fixation_duration, 0.033);
    assert_eq!(third[0].fixation_count, 0);
    assert_eq!(third[1].fixation_count, 0);
}

#[test]
fn lid_gap_sequence_yields_one_blink() {
    let mut session = Session::with_defaults();
    for gap in [0.02, 0.01, 0.01, 0.02] {
        session.process(Some(&face_with_gap(gap)));
    }

    let blink = session.state().blink();
    assert_eq!(blink.blink_count, 1);
    assert_eq!(blink.last_blink_frame, Some(3));
    assert!(!blink.is_blinking);
    assert!(blink.blink_durations.is_empty());

    let counts: Vec<u32> = session.records().iter().map(|r| r.blink_count).collect();
    assert_eq!(counts, vec![0, 0, 1, 1, 1, 1, 1, 1]);
}

#[test]
fn one_closed_eye_is_not_a_blink() {
    let mut points = face_with_gap(0.03).points().to_vec();
    let lower = irisflow_landmark_model::anchors::LEFT_LID_LOWER;
    let upper = irisflow_landmark_model::anchors::LEFT_LID_UPPER;
    points[lower].y = points[upper].y + 0.005;
    let winking = LandmarkSet::new(points).expect("points should be valid");

    let mut session = Session::with_defaults();
    session.process(Some(&winking));
    assert_eq!(session.state().blink().blink_count, 0);
}

#[test]
fn skipped_frames_do_not_advance_the_session() {
    let mut session = Session::with_defaults();
    session.process(Some(&face_at(0.0)));
    let before = session.state().clone();

    let degenerate = SyntheticFace::default()
        .degenerate()
        .build()
        .expect("synthetic face should be valid");
    assert_eq!(session.process(None), FrameOutcome::NoFace);
    assert_eq!(session.process(Some(&degenerate)), FrameOutcome::Degenerate);

    let after = session.state();
    assert_eq!(after.frame_index, before.frame_index);
    assert_eq!(after.axes, before.axes);
    assert_eq!(after.blink(), before.blink());
    assert_eq!(after.frames_skipped, 2);
    assert_eq!(session.records().len(), 2);
}

#[test]
fn head_translation_does_not_register_as_eye_motion() {
    let mut session = Session::with_defaults();
    for offset in [0.0, 0.01, 0.03, 0.02] {
        let face = SyntheticFace::default()
            .with_head_offset(Point3::new(offset, -offset, 0.0))
            .build()
            .expect("synthetic face should be valid");
        session.process(Some(&face));
    }

    for record in session.records().iter().skip(2) {
        assert_eq!(record.vx, Some(0.0));
        assert_eq!(record.vy, Some(0.0));
        assert_eq!(record.vz, Some(0.0));
    }
    assert_eq!(session.state().saccade(Eye::Left).saccade_count, 0);
    assert!(session.state().fixation(Eye::Left).is_fixating);
}

#[test]
fn csv_export_has_header_and_one_row_per_record() {
    let mut session = Session::with_defaults();
    for dx in [0.0, 0.01, 0.02] {
        session.process(Some(&face_at(dx)));
    }
    let csv = write_csv(session.records());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 1 + 6);
    assert!(lines[1].starts_with("1,1,0.420,0.450,0.000,,,,"));
    assert!(lines[3].starts_with("2,1,0.430,0.450,0.000,0.300,0.000,0.000,0.000,"));
}

#[test]
fn replay_matches_recorded_stream_round_trip() {
    let frames: Vec<LandmarkFrame> = [0.0, 0.002, 0.05, 0.051]
        .iter()
        .enumerate()
        .map(|(k, dx)| LandmarkFrame::new(k as u64 * 33, vec![face_at(*dx)]))
        .chain(std::iter::once(LandmarkFrame::new(200, vec![])))
        .collect();

    let jsonl = serialize_frames(None, &frames).expect("frames should serialize");
    let parsed = parse_frames(&jsonl).expect("frames should parse");

    let direct = replay(KinematicsConfig::default(), &frames).expect("replay should run");
    let reparsed = replay(KinematicsConfig::default(), &parsed).expect("replay should run");

    assert_eq!(direct.records(), reparsed.records());
    assert_eq!(direct.state().frames_skipped, 1);
    assert_eq!(direct.state().saccade(Eye::Right).saccade_count, 1);
}
