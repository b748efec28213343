//! Thumb-index pinch detection with a hysteresis band.
//!
//! ```text
//!            d < pinch_threshold   (pick_count += 1)
//!   Released ───────────────────────────────────────▶ Picking
//!      ▲                                                 │
//!      └──────────────── d > release_threshold ──────────┘
//! ```
//!
//! Distances inside `[pinch_threshold, release_threshold]` hold the state.

use crate::geometry::smooth;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchUpdate {
    /// Smoothed distance used for this frame's decision.
    pub distance: f32,
    /// Whether this frame alone is below the pinch threshold.
    pub is_pinching: bool,
    /// True on the frame a pick event was counted.
    pub rising_edge: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinchTracker {
    last_distance: Option<f32>,
    is_picking: bool,
    pick_count: u32,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_picking(&self) -> bool {
        self.is_picking
    }

    pub fn pick_count(&self) -> u32 {
        self.pick_count
    }

    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    /// Smooths `raw_distance` and advances the state machine by one frame.
    pub fn update(
        &mut self,
        raw_distance: f32,
        alpha: f32,
        pinch_threshold: f32,
        release_threshold: f32,
    ) -> PinchUpdate {
        let distance = smooth(raw_distance, self.last_distance, alpha);
        self.last_distance = Some(distance);

        let mut rising_edge = false;
        let is_pinching = distance < pinch_threshold;

        if is_pinching {
            if !self.is_picking {
                self.is_picking = true;
                self.pick_count += 1;
                rising_edge = true;
                debug!(
                    "🍃 Pick #{} (distance {:.4})",
                    self.pick_count, distance
                );
            }
        } else if distance > release_threshold {
            self.is_picking = false;
        }

        PinchUpdate {
            distance,
            is_pinching,
            rising_edge,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
