pub mod pinch;
pub mod posture;
pub mod scoring;
pub mod types;

use self::pinch::PinchTracker;
use self::scoring::ScoreTracker;
pub use self::types::{
    Achievement, AnalysisResult, Feedback, FeedbackTag, PickState, PostureResult, ScoreBand, ScoreLevel,
    Statistics,
};
use crate::config::AnalyzerConfig;
use crate::error::TpResult;
use crate::geometry::{angle_at_vertex, distance};
use crate::landmarks::{HandJoint, HandLandmarkSet, Handedness, PoseLandmarkSet};
use tracing::debug;

/// Per-session picking engine. One instance per tracked user.
#[derive(Debug, Clone, PartialEq)]
pub struct PickingAnalyzer {
    config: AnalyzerConfig,
    pinch: PinchTracker,
    score: ScoreTracker,
}

impl Default for PickingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PickingAnalyzer {
    pub fn new() -> Self {
        let config = AnalyzerConfig::default();
        Self {
            score: ScoreTracker::new(config.history_capacity),
            pinch: PinchTracker::new(),
            config,
        }
    }

    pub fn with_config(config: AnalyzerConfig) -> TpResult<Self> {
        config.validate()?;
        Ok(Self {
            score: ScoreTracker::new(config.history_capacity),
            pinch: PinchTracker::new(),
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one frame. An absent hand returns a zeroed result and leaves state untouched.
    pub fn analyze(
        &mut self,
        hand: Option<&HandLandmarkSet>,
        handedness: Option<Handedness>,
    ) -> AnalysisResult {
        let Some(hand) = hand else {
            return AnalysisResult::default();
        };

        let raw_pinch = distance(hand.get(HandJoint::ThumbTip), hand.get(HandJoint::IndexTip));
        let pinch = self.pinch.update(
            raw_pinch,
            self.config.pinch_alpha,
            self.config.pinch_threshold,
            self.config.release_threshold,
        );

        let hand_angle = angle_at_vertex(
            hand.get(HandJoint::Wrist),
            hand.get(HandJoint::MiddleMcp),
            hand.get(HandJoint::MiddleTip),
        );

        let (raw_score, feedback) = scoring::score_frame(hand, pinch.distance, pinch.is_pinching);
        let smoothed = self.score.push(
            raw_score,
            self.config.score_alpha,
            self.config.score_warm_start,
        );

        AnalysisResult {
            pinch_distance: pinch.distance,
            is_pinching: pinch.is_pinching,
            hand_angle,
            score: smoothed as u32,
            feedback,
            handedness,
        }
    }

    /// Arm-posture check on a body pose. Independent of the pinch pipeline.
    pub fn analyze_posture(&self, pose: Option<&PoseLandmarkSet>) -> PostureResult {
        posture::analyze_posture(pose)
    }

    pub fn get_statistics(&self) -> Statistics {
        Statistics {
            pick_count: self.pinch.pick_count(),
            current_score: self.score.current() as u32,
            average_score: self.score.average() as u32,
            total_actions: self.score.history().len(),
        }
    }

    pub fn pick_count(&self) -> u32 {
        self.pinch.pick_count()
    }

    pub fn is_picking(&self) -> bool {
        self.pinch.is_picking()
    }

    pub fn last_pinch_distance(&self) -> Option<f32> {
        self.pinch.last_distance()
    }

    /// Unrounded smoothed score.
    pub fn current_score(&self) -> f32 {
        self.score.current()
    }

    pub fn state_label(&self) -> PickState {
        if self.pinch.is_picking() {
            PickState::Picking
        } else {
            PickState::Ready
        }
    }

    pub fn reset(&mut self) {
        debug!(
            "Resetting analyzer after {} picks / {} scored frames",
            self.pinch.pick_count(),
            self.score.history().len()
        );
        self.pinch.reset();
        self.score.reset();
    }
}
