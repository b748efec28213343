use super::types::Feedback;
use crate::geometry::{distance, smooth};
use crate::landmarks::{HandJoint, HandLandmarkSet, RELAXED_FINGER_TIPS};
use std::collections::VecDeque;

// === SUB-SCORE CEILINGS ===
pub const PINCH_MAX: f32 = 40.0;
pub const PINCH_IDLE: f32 = 20.0;
pub const FINGER_NATURAL: f32 = 30.0;
pub const FINGER_TOLERABLE: f32 = 20.0;
pub const FINGER_POOR: f32 = 10.0;
pub const STABILITY_BASE: f32 = 25.0;

/// Points lost per unit of pinch distance while pinching.
const PINCH_DISTANCE_SLOPE: f32 = 400.0;

/// Wrist-to-fingertip mean distance bands (exclusive bounds).
const FINGER_NATURAL_BAND: (f32, f32) = (0.15, 0.35);
const FINGER_TOLERABLE_BAND: (f32, f32) = (0.10, 0.40);

pub fn pinch_quality(distance: f32, is_pinching: bool) -> (f32, Feedback) {
    if !is_pinching {
        return (PINCH_IDLE, Feedback::WaitingForPick);
    }

    let score = (PINCH_MAX - distance * PINCH_DISTANCE_SLOPE).max(0.0);
    let feedback = if score >= 35.0 {
        Feedback::PinchGood
    } else if score >= 25.0 {
        Feedback::PinchLoose
    } else {
        Feedback::PinchNeedsAdjustment
    };
    (score, feedback)
}

/// Mean planar distance from the wrist to the middle, ring and pinky tips.
pub fn relaxed_finger_spread(hand: &HandLandmarkSet) -> f32 {
    let wrist = hand.get(HandJoint::Wrist);
    let total: f32 = RELAXED_FINGER_TIPS
        .iter()
        .map(|&tip| distance(hand.get(tip), wrist))
        .sum();
    total / RELAXED_FINGER_TIPS.len() as f32
}

pub fn finger_relaxation(spread: f32) -> (f32, Feedback) {
    let within = |band: (f32, f32)| band.0 < spread && spread < band.1;

    if within(FINGER_NATURAL_BAND) {
        (FINGER_NATURAL, Feedback::FingersNatural)
    } else if within(FINGER_TOLERABLE_BAND) {
        (FINGER_TOLERABLE, Feedback::FingersCouldRelax)
    } else {
        (FINGER_POOR, Feedback::FingersNeedAdjustment)
    }
}

/// No jitter analysis yet; every frame earns the base score.
pub fn stability() -> (f32, Feedback) {
    (STABILITY_BASE, Feedback::MotionStable)
}

/// Raw total plus feedback in evaluation order.
pub fn score_frame(
    hand: &HandLandmarkSet,
    pinch_distance: f32,
    is_pinching: bool,
) -> (f32, Vec<Feedback>) {
    let (pinch, pinch_fb) = pinch_quality(pinch_distance, is_pinching);
    let (fingers, finger_fb) = finger_relaxation(relaxed_finger_spread(hand));
    let (stable, stable_fb) = stability();

    let total = (pinch + fingers + stable).clamp(0.0, 100.0);
    (total, vec![pinch_fb, finger_fb, stable_fb])
}

/// Smoothed running score with a bounded FIFO history.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTracker {
    current: f32,
    history: VecDeque<f32>,
    capacity: usize,
}

impl ScoreTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            current: 0.0,
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn history(&self) -> &VecDeque<f32> {
        &self.history
    }

    /// Blends `raw` into the running score and records it.
    ///
    /// `warm_start` lets the first sample after construction or reset pass
    /// through unsmoothed; otherwise the smoother starts from 0.
    pub fn push(&mut self, raw: f32, alpha: f32, warm_start: bool) -> f32 {
        let previous = if warm_start && self.history.is_empty() {
            None
        } else {
            Some(self.current)
        };
        self.current = smooth(raw, previous, alpha).clamp(0.0, 100.0);

        self.history.push_back(self.current);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        self.current
    }

    /// Mean of the retained history, kept in `f64` so truncation sees the exact value.
    pub fn average(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.history.iter().map(|&s| s as f64).sum();
        sum / self.history.len() as f64
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.history.clear();
    }
}
