//! Planar geometry over normalized landmark coordinates.
//!
//! All measurements use the (x, y) projection only. Depth (`z`) is carried
//! through for callers and never enters a measurement.

use serde::{Deserialize, Serialize};

/// Added to the norm product so coincident points resolve to a defined angle.
pub const ANGLE_EPSILON: f32 = 1e-6;

/// A single tracked point in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn planar(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// Angle at `vertex` between the rays towards `a` and `c`, in degrees `[0, 180]`.
///
/// cos(θ) = (ba · bc) / (|ba| |bc| + ε), clamped to [-1, 1] before `acos`.
/// A zero-length ray yields a cosine of 0 and therefore 90°.
pub fn angle_at_vertex(a: &Landmark, vertex: &Landmark, c: &Landmark) -> f32 {
    let ba = (a.x - vertex.x, a.y - vertex.y);
    let bc = (c.x - vertex.x, c.y - vertex.y);

    let dot = ba.0 * bc.0 + ba.1 * bc.1;
    let mag_ba = (ba.0 * ba.0 + ba.1 * ba.1).sqrt();
    let mag_bc = (bc.0 * bc.0 + bc.1 * bc.1).sqrt();

    let cos_angle = (dot / (mag_ba * mag_bc + ANGLE_EPSILON)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Planar Euclidean distance.
#[inline]
pub fn distance(p1: &Landmark, p2: &Landmark) -> f32 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// Single-pole exponential smoother.
///
/// With no previous value the current sample passes through unchanged.
#[inline]
pub fn smooth(current: f32, previous: Option<f32>, alpha: f32) -> f32 {
    match previous {
        Some(prev) => alpha * current + (1.0 - alpha) * prev,
        None => current,
    }
}
