//! Thread-safe access to analyzers for hosts that capture and render on
//! different threads.
//!
//! Every operation on a [`SharedAnalyzer`] holds its lock for the whole
//! read-modify-write, so a reader polling statistics always sees a frame
//! either fully applied or not at all.

use crate::analyzer::{
    Achievement, AnalysisResult, Feedback, PickingAnalyzer, PostureResult, ScoreLevel,
    Statistics,
};
use crate::config::AnalyzerConfig;
use crate::error::TpResult;
use crate::landmarks::{HandLandmarkSet, Handedness, PoseLandmarkSet};
use crate::provider::LandmarkProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Aggregates plus pace for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub statistics: Statistics,
    pub elapsed_secs: f64,
    pub picks_per_minute: f64,
    pub level: ScoreLevel,
    pub achievements: Vec<Achievement>,
}

impl SessionSummary {
    pub fn new(statistics: Statistics, elapsed_secs: f64) -> Self {
        let picks_per_minute = if elapsed_secs > 0.0 {
            statistics.pick_count as f64 / (elapsed_secs / 60.0)
        } else {
            0.0
        };
        Self {
            statistics,
            elapsed_secs,
            picks_per_minute,
            level: ScoreLevel::from_score(statistics.current_score),
            achievements: Achievement::unlocked(&statistics),
        }
    }
}

struct SessionInner {
    analyzer: PickingAnalyzer,
    started: Instant,
}

/// A [`PickingAnalyzer`] behind a mutex.
pub struct SharedAnalyzer {
    inner: Mutex<SessionInner>,
}

impl SharedAnalyzer {
    pub fn new(analyzer: PickingAnalyzer) -> Self {
        Self {
            inner: Mutex::new(SessionInner {
                analyzer,
                started: Instant::now(),
            }),
        }
    }

    pub fn with_config(config: AnalyzerConfig) -> TpResult<Self> {
        Ok(Self::new(PickingAnalyzer::with_config(config)?))
    }

    // Analyzer calls never panic between field updates; a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn analyze(
        &self,
        hand: Option<&HandLandmarkSet>,
        handedness: Option<Handedness>,
    ) -> AnalysisResult {
        self.lock().analyzer.analyze(hand, handedness)
    }

    pub fn analyze_posture(&self, pose: Option<&PoseLandmarkSet>) -> PostureResult {
        self.lock().analyzer.analyze_posture(pose)
    }

    pub fn get_statistics(&self) -> Statistics {
        self.lock().analyzer.get_statistics()
    }

    pub fn summary(&self) -> SessionSummary {
        let guard = self.lock();
        SessionSummary::new(
            guard.analyzer.get_statistics(),
            guard.started.elapsed().as_secs_f64(),
        )
    }

    /// Copy of the analyzer as of the last completed call.
    pub fn snapshot(&self) -> PickingAnalyzer {
        self.lock().analyzer.clone()
    }

    /// Clears all counters and restarts the session clock.
    pub fn reset(&self) {
        let mut guard = self.lock();
        guard.analyzer.reset();
        guard.started = Instant::now();
    }
}

/// Totals from driving a provider through a session.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub frames: usize,
    pub detected_frames: usize,
    /// Mean posture score over frames that carried a body pose.
    pub mean_posture_score: Option<f32>,
    /// Feedback of the last frame with a detected hand.
    pub last_feedback: Vec<Feedback>,
    /// Pace is measured on stream timestamps, not wall time.
    pub summary: SessionSummary,
}

/// Feeds frames into `session` until the provider ends or `max_frames` is reached.
pub fn run_provider<P: LandmarkProvider + ?Sized>(
    provider: &mut P,
    session: &SharedAnalyzer,
    max_frames: Option<usize>,
) -> RunReport {
    let limit = max_frames.unwrap_or(usize::MAX);
    let mut frames = 0;
    let mut detected_frames = 0;
    let mut posture_total = 0u64;
    let mut posture_frames = 0u32;
    let mut last_feedback = Vec::new();
    let mut span: Option<(f64, f64)> = None;

    if !provider.is_available() {
        warn!("⚠️  Provider has no perception backend; scores will stay at zero");
    }

    while frames < limit {
        let Some(frame) = provider.next_frame() else {
            break;
        };
        frames += 1;
        span = Some(match span {
            Some((first, _)) => (first, frame.timestamp),
            None => (frame.timestamp, frame.timestamp),
        });

        if let Some(obs) = frame.primary_hand() {
            let result = session.analyze(Some(&obs.landmarks), obs.handedness);
            detected_frames += 1;
            last_feedback = result.feedback;
        }

        if let Some(pose) = frame.pose.as_ref() {
            posture_total += session.analyze_posture(Some(pose)).posture_score as u64;
            posture_frames += 1;
        }
    }

    let elapsed = span.map(|(first, last)| (last - first).max(0.0)).unwrap_or(0.0);
    debug!(
        "Drove {} frames ({} with a hand) over {:.2}s",
        frames, detected_frames, elapsed
    );

    RunReport {
        frames,
        detected_frames,
        mean_posture_score: (posture_frames > 0)
            .then(|| posture_total as f32 / posture_frames as f32),
        last_feedback,
        summary: SessionSummary::new(session.get_statistics(), elapsed),
    }
}

/// One analyzer per session id. Sessions never share state.
pub struct SessionRegistry {
    config: AnalyzerConfig,
    sessions: RwLock<HashMap<String, Arc<SharedAnalyzer>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl SessionRegistry {
    pub fn new(config: AnalyzerConfig) -> TpResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the session's analyzer, creating it on first use.
    pub fn open(&self, session_id: &str) -> Arc<SharedAnalyzer> {
        if let Some(existing) = self.get(session_id) {
            return existing;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!("Opening session '{}'", session_id);
                // Config was validated when the registry was built.
                Arc::new(SharedAnalyzer::new(
                    PickingAnalyzer::with_config(self.config.clone()).unwrap_or_default(),
                ))
            })
            .clone()
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<SharedAnalyzer>> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned()
    }

    /// Removes the session. Outstanding handles keep working but are no longer tracked.
    pub fn close(&self, session_id: &str) -> Option<Arc<SharedAnalyzer>> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let removed = sessions.remove(session_id);
        if removed.is_some() {
            debug!("Closed session '{}'", session_id);
        }
        removed
    }

    pub fn session_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
