use crate::landmarks::Handedness;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Severity marker printed in front of every feedback sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum FeedbackTag {
    #[strum(to_string = "✓")]
    Good,
    #[strum(to_string = "△")]
    Caution,
    #[strum(to_string = "✗")]
    Problem,
    #[strum(to_string = "○")]
    Waiting,
}

/// Fixed-category feedback. Display renders the tagged sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    // Pinch quality
    #[strum(to_string = "✓ Good pinch posture")]
    PinchGood,
    #[strum(to_string = "△ Pinch could be tighter")]
    PinchLoose,
    #[strum(to_string = "✗ Pinch posture needs adjustment")]
    PinchNeedsAdjustment,
    #[strum(to_string = "○ Waiting for pick motion...")]
    WaitingForPick,

    // Finger relaxation
    #[strum(to_string = "✓ Natural finger posture")]
    FingersNatural,
    #[strum(to_string = "△ Fingers could relax more")]
    FingersCouldRelax,
    #[strum(to_string = "✗ Finger posture needs adjustment")]
    FingersNeedAdjustment,

    // Stability
    #[strum(to_string = "✓ Motion fairly stable")]
    MotionStable,

    // Arm posture
    #[strum(to_string = "✓ Good arm posture")]
    ArmGood,
    #[strum(to_string = "△ Arm angle could be adjusted")]
    ArmCouldAdjust,
    #[strum(to_string = "✗ Arm angle not quite right")]
    ArmAngleOff,
}

impl Feedback {
    pub fn tag(self) -> FeedbackTag {
        match self {
            Self::PinchGood | Self::FingersNatural | Self::MotionStable | Self::ArmGood => {
                FeedbackTag::Good
            }
            Self::PinchLoose | Self::FingersCouldRelax | Self::ArmCouldAdjust => {
                FeedbackTag::Caution
            }
            Self::PinchNeedsAdjustment | Self::FingersNeedAdjustment | Self::ArmAngleOff => {
                FeedbackTag::Problem
            }
            Self::WaitingForPick => FeedbackTag::Waiting,
        }
    }
}

/// Per-frame output of [`PickingAnalyzer::analyze`](super::PickingAnalyzer::analyze).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Smoothed thumb-index distance.
    pub pinch_distance: f32,
    pub is_pinching: bool,
    /// Angle at the middle-finger MCP between wrist and middle tip, degrees.
    pub hand_angle: f32,
    pub score: u32,
    pub feedback: Vec<Feedback>,
    pub handedness: Option<Handedness>,
}

impl AnalysisResult {
    pub fn feedback_lines(&self) -> Vec<String> {
        self.feedback.iter().map(|f| f.to_string()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostureResult {
    pub posture_score: u32,
    pub arm_angle: f32,
    pub feedback: Vec<Feedback>,
}

/// Session aggregates. Reading them never touches analyzer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub pick_count: u32,
    pub current_score: u32,
    pub average_score: u32,
    pub total_actions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum PickState {
    #[strum(to_string = "Picking 🍃")]
    Picking,
    #[strum(to_string = "Ready ⏳")]
    Ready,
}

/// Title ladder shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter, Display, Serialize, Deserialize)]
pub enum ScoreLevel {
    #[strum(to_string = "Beginner 👶")]
    Beginner,
    #[strum(to_string = "Novice 🌱")]
    Novice,
    #[strum(to_string = "Apprentice 📚")]
    Apprentice,
    #[strum(to_string = "Skilled Picker 👍")]
    Skilled,
    #[strum(to_string = "Expert Picker ⭐")]
    Expert,
    #[strum(to_string = "Tea Master 🏆")]
    Master,
}

impl ScoreLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::Master,
            80..=89 => Self::Expert,
            70..=79 => Self::Skilled,
            60..=69 => Self::Apprentice,
            40..=59 => Self::Novice,
            _ => Self::Beginner,
        }
    }
}

/// Experience-mode badges, unlocked from session aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    #[strum(to_string = "🌱 First Pick")]
    FirstPick,
    #[strum(to_string = "🍃 Rising Picker")]
    Rookie,
    #[strum(to_string = "🌿 Picking Expert")]
    Expert,
    #[strum(to_string = "⭐ High Scorer")]
    HighScorer,
}

impl Achievement {
    pub fn is_unlocked(self, stats: &Statistics) -> bool {
        match self {
            Self::FirstPick => stats.pick_count >= 1,
            Self::Rookie => stats.pick_count >= 10,
            Self::Expert => stats.pick_count >= 50,
            Self::HighScorer => stats.average_score >= 80,
        }
    }

    /// Badges earned so far, in ladder order.
    pub fn unlocked(stats: &Statistics) -> Vec<Achievement> {
        Self::iter().filter(|a| a.is_unlocked(stats)).collect()
    }
}

/// Coarse colour class used by displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsWork,
        }
    }
}
