//! Fixed-index landmark containers delivered by the perception model.
//!
//! Index meaning is a contract with the upstream model. Scoring code refers to
//! points only through [`HandJoint`] and [`PoseJoint`], never raw indices.

use crate::error::{TeaPickError, TpResult};
use crate::geometry::Landmark;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use strum_macros::{Display, EnumIter, EnumString};

pub const HAND_LANDMARK_COUNT: usize = 21;
pub const POSE_LANDMARK_COUNT: usize = 33;

// ============================================================================
// HAND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(usize)]
pub enum HandJoint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandJoint {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Fingertips that should stay loosely curled while the thumb and index pinch.
pub const RELAXED_FINGER_TIPS: [HandJoint; 3] =
    [HandJoint::MiddleTip, HandJoint::RingTip, HandJoint::PinkyTip];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize)]
pub enum Handedness {
    #[strum(to_string = "Left", serialize = "left", serialize = "L")]
    Left,
    #[strum(to_string = "Right", serialize = "right", serialize = "R")]
    Right,
}

/// One hand's 21 landmarks in model order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarkSet {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandLandmarkSet {
    pub fn new(points: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Builds a set from `[x0, y0, z0, x1, ...]`, the layout most bindings hand over.
    pub fn from_flat(flat: &[f32]) -> TpResult<Self> {
        let points = parse_flat::<HAND_LANDMARK_COUNT>(flat, "hand")?;
        Ok(Self { points })
    }

    pub fn from_points(points: &[Landmark]) -> TpResult<Self> {
        Ok(Self {
            points: collect_points::<HAND_LANDMARK_COUNT>(points, "hand")?,
        })
    }

    #[inline(always)]
    pub fn get(&self, joint: HandJoint) -> &Landmark {
        &self.points[joint.index()]
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }
}

impl Index<HandJoint> for HandLandmarkSet {
    type Output = Landmark;

    fn index(&self, joint: HandJoint) -> &Landmark {
        self.get(joint)
    }
}

// ============================================================================
// POSE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(usize)]
pub enum PoseJoint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseJoint {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Shoulder, elbow and wrist of the picking arm.
pub const PICKING_ARM: (PoseJoint, PoseJoint, PoseJoint) = (
    PoseJoint::RightShoulder,
    PoseJoint::RightElbow,
    PoseJoint::RightWrist,
);

/// Full-body landmarks in model order.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarkSet {
    points: Box<[Landmark; POSE_LANDMARK_COUNT]>,
}

impl PoseLandmarkSet {
    pub fn new(points: [Landmark; POSE_LANDMARK_COUNT]) -> Self {
        Self {
            points: Box::new(points),
        }
    }

    pub fn from_flat(flat: &[f32]) -> TpResult<Self> {
        Ok(Self::new(parse_flat::<POSE_LANDMARK_COUNT>(flat, "pose")?))
    }

    pub fn from_points(points: &[Landmark]) -> TpResult<Self> {
        Ok(Self::new(collect_points::<POSE_LANDMARK_COUNT>(points, "pose")?))
    }

    #[inline(always)]
    pub fn get(&self, joint: PoseJoint) -> &Landmark {
        &self.points[joint.index()]
    }

    pub fn points(&self) -> &[Landmark; POSE_LANDMARK_COUNT] {
        &self.points
    }
}

impl Index<PoseJoint> for PoseLandmarkSet {
    type Output = Landmark;

    fn index(&self, joint: PoseJoint) -> &Landmark {
        self.get(joint)
    }
}

// ============================================================================
// BOUNDARY PARSING
// ============================================================================

fn parse_flat<const N: usize>(flat: &[f32], kind: &str) -> TpResult<[Landmark; N]> {
    if flat.len() != N * 3 {
        return Err(TeaPickError::Validation(format!(
            "{} landmarks require {} values ({} points), got {}",
            kind,
            N * 3,
            N,
            flat.len()
        )));
    }

    let mut points = [Landmark::default(); N];
    for (i, chunk) in flat.chunks_exact(3).enumerate() {
        points[i] = Landmark::new(chunk[0], chunk[1], chunk[2]);
    }
    check_finite(&points, kind)?;
    Ok(points)
}

fn collect_points<const N: usize>(points: &[Landmark], kind: &str) -> TpResult<[Landmark; N]> {
    let arr: [Landmark; N] = points.try_into().map_err(|_| {
        TeaPickError::Validation(format!(
            "{} landmarks require {} points, got {}",
            kind,
            N,
            points.len()
        ))
    })?;
    check_finite(&arr, kind)?;
    Ok(arr)
}

fn check_finite(points: &[Landmark], kind: &str) -> TpResult<()> {
    if let Some(i) = points.iter().position(|p| !p.is_finite()) {
        return Err(TeaPickError::Validation(format!(
            "{} landmark {} has a non-finite coordinate",
            kind, i
        )));
    }
    Ok(())
}
