//! Stateless arm-posture classification from body-pose landmarks.

use super::types::{Feedback, PostureResult};
use crate::geometry::angle_at_vertex;
use crate::landmarks::{PoseLandmarkSet, PICKING_ARM};

/// Elbow angle bands in degrees (exclusive bounds), inner band checked first.
const ARM_GOOD_BAND: (f32, f32) = (60.0, 150.0);
const ARM_TOLERABLE_BAND: (f32, f32) = (45.0, 165.0);

pub const ARM_GOOD: u32 = 90;
pub const ARM_TOLERABLE: u32 = 70;
pub const ARM_POOR: u32 = 50;

pub fn classify_arm_angle(angle: f32) -> (u32, Feedback) {
    let within = |band: (f32, f32)| band.0 < angle && angle < band.1;

    if within(ARM_GOOD_BAND) {
        (ARM_GOOD, Feedback::ArmGood)
    } else if within(ARM_TOLERABLE_BAND) {
        (ARM_TOLERABLE, Feedback::ArmCouldAdjust)
    } else {
        (ARM_POOR, Feedback::ArmAngleOff)
    }
}

/// Shoulder → elbow → wrist angle of the picking arm. `None` yields a zeroed result.
pub fn analyze_posture(pose: Option<&PoseLandmarkSet>) -> PostureResult {
    let Some(pose) = pose else {
        return PostureResult::default();
    };

    let (shoulder, elbow, wrist) = PICKING_ARM;
    let arm_angle = angle_at_vertex(&pose[shoulder], &pose[elbow], &pose[wrist]);
    let (posture_score, feedback) = classify_arm_angle(arm_angle);

    PostureResult {
        posture_score,
        arm_angle,
        feedback: vec![feedback],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Landmark;
    use crate::landmarks::{PoseJoint, POSE_LANDMARK_COUNT};
    use rstest::rstest;

    fn pose_with_arm(shoulder: Landmark, elbow: Landmark, wrist: Landmark) -> PoseLandmarkSet {
        let mut points = [Landmark::planar(0.5, 0.5); POSE_LANDMARK_COUNT];
        points[PoseJoint::RightShoulder.index()] = shoulder;
        points[PoseJoint::RightElbow.index()] = elbow;
        points[PoseJoint::RightWrist.index()] = wrist;
        PoseLandmarkSet::new(points)
    }

    #[rstest]
    #[case(90.0, ARM_GOOD)]
    #[case(149.0, ARM_GOOD)]
    #[case(60.0, ARM_TOLERABLE)]
    #[case(150.0, ARM_TOLERABLE)]
    #[case(50.0, ARM_TOLERABLE)]
    #[case(45.0, ARM_POOR)]
    #[case(170.0, ARM_POOR)]
    #[case(10.0, ARM_POOR)]
    fn test_arm_bands(#[case] angle: f32, #[case] expected: u32) {
        assert_eq!(classify_arm_angle(angle).0, expected);
    }

    #[test]
    fn test_right_angle_arm_is_good() {
        let pose = pose_with_arm(
            Landmark::planar(0.5, 0.3),
            Landmark::planar(0.5, 0.5),
            Landmark::planar(0.7, 0.5),
        );
        let result = analyze_posture(Some(&pose));
        assert!((result.arm_angle - 90.0).abs() < 0.1);
        assert_eq!(result.posture_score, ARM_GOOD);
        assert_eq!(result.feedback, vec![Feedback::ArmGood]);
    }

    #[test]
    fn test_straight_arm_is_poor() {
        let pose = pose_with_arm(
            Landmark::planar(0.5, 0.1),
            Landmark::planar(0.5, 0.3),
            Landmark::planar(0.5, 0.5),
        );
        let result = analyze_posture(Some(&pose));
        assert_eq!(result.posture_score, ARM_POOR);
        assert_eq!(result.feedback, vec![Feedback::ArmAngleOff]);
    }

    #[test]
    fn test_missing_pose_is_zeroed() {
        let result = analyze_posture(None);
        assert_eq!(result, PostureResult::default());
        assert!(result.feedback.is_empty());
    }
}
