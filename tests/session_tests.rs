use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use teapick::analyzer::{Achievement, PickingAnalyzer};
use teapick::config::AnalyzerConfig;
use teapick::geometry::Landmark;
use teapick::landmarks::{HandJoint, HandLandmarkSet, HAND_LANDMARK_COUNT};
use teapick::provider::{SyntheticParams, SyntheticProvider};
use teapick::session::{run_provider, SessionRegistry, SharedAnalyzer};

fn relaxed(gap: f32) -> HandLandmarkSet {
    let mut points = [Landmark::planar(0.0, 0.0); HAND_LANDMARK_COUNT];
    points[HandJoint::ThumbTip.index()] = Landmark::planar(0.5, 0.5);
    points[HandJoint::IndexTip.index()] = Landmark::planar(0.5 + gap, 0.5);
    points[HandJoint::MiddleTip.index()] = Landmark::planar(0.25, 0.0);
    points[HandJoint::RingTip.index()] = Landmark::planar(0.0, 0.25);
    points[HandJoint::PinkyTip.index()] = Landmark::planar(0.15, 0.2);
    HandLandmarkSet::new(points)
}

#[test]
fn test_reader_sees_consistent_statistics() {
    let session = Arc::new(SharedAnalyzer::new(PickingAnalyzer::new()));
    let done = Arc::new(AtomicBool::new(false));

    let capture = {
        let session = Arc::clone(&session);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..500 {
                let gap = if (i / 10) % 2 == 0 { 0.0 } else { 0.2 };
                session.analyze(Some(&relaxed(gap)), None);
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let mut last_actions = 0;
    let mut last_picks = 0;
    while !done.load(Ordering::SeqCst) {
        let stats = session.get_statistics();
        assert!(stats.total_actions >= last_actions);
        assert!(stats.total_actions <= 100);
        assert!(stats.pick_count >= last_picks);
        assert!(stats.current_score <= 100);
        assert!(stats.average_score <= 100);
        last_actions = stats.total_actions;
        last_picks = stats.pick_count;
    }
    capture.join().unwrap();

    let stats = session.get_statistics();
    assert_eq!(stats.total_actions, 100);
    assert_eq!(stats.pick_count, 25);
}

#[test]
fn test_snapshot_is_detached() {
    let session = SharedAnalyzer::new(PickingAnalyzer::new());
    session.analyze(Some(&relaxed(0.0)), None);
    let snapshot = session.snapshot();

    session.analyze(Some(&relaxed(0.0)), None);
    assert_eq!(snapshot.get_statistics().total_actions, 1);
    assert_eq!(session.get_statistics().total_actions, 2);
}

#[test]
fn test_reset_clears_shared_state() {
    let session = SharedAnalyzer::new(PickingAnalyzer::new());
    session.analyze(Some(&relaxed(0.0)), None);
    session.reset();
    assert_eq!(session.get_statistics().total_actions, 0);
    assert_eq!(session.summary().statistics.pick_count, 0);
}

#[test]
fn test_sessions_are_isolated_across_threads() {
    let registry = SessionRegistry::new(AnalyzerConfig::default()).unwrap();

    thread::scope(|s| {
        for (id, frames) in [("row-a", 10), ("row-b", 40)] {
            let session = registry.open(id);
            s.spawn(move || {
                for _ in 0..frames {
                    session.analyze(Some(&relaxed(0.0)), None);
                }
            });
        }
    });

    assert_eq!(registry.get("row-a").unwrap().get_statistics().total_actions, 10);
    assert_eq!(registry.get("row-b").unwrap().get_statistics().total_actions, 40);
    assert_eq!(registry.session_ids(), vec!["row-a", "row-b"]);
}

#[test]
fn test_registry_rejects_bad_config() {
    let config = AnalyzerConfig {
        score_alpha: 0.0,
        ..Default::default()
    };
    assert!(SessionRegistry::new(config).is_err());
}

#[test]
fn test_synthetic_run_counts_every_cycle() {
    let session = SharedAnalyzer::new(PickingAnalyzer::new());
    let mut provider = SyntheticProvider::new(SyntheticParams::default());
    let report = run_provider(&mut provider, &session, None);

    assert_eq!(report.frames, 300);
    assert_eq!(report.detected_frames, 300);
    assert_eq!(report.summary.statistics.pick_count, 10);
    assert!(report.summary.achievements.contains(&Achievement::Rookie));
    assert!(!report.summary.achievements.contains(&Achievement::Expert));
    assert!(report.summary.statistics.current_score > 0);
    assert_eq!(report.mean_posture_score, Some(90.0));
    // 10 picks over 299 frame intervals at 30 fps.
    assert!((report.summary.picks_per_minute - 10.0 / (299.0 / 30.0) * 60.0).abs() < 1e-6);
}
