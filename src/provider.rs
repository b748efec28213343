//! Landmark sources feeding the analyzer.
//!
//! A provider reports whether a real perception backend sits behind it. Hosts
//! without one use [`NullProvider`], which never detects anything, instead of
//! branching on availability throughout the pipeline.

use crate::error::{TeaPickError, TpResult};
use crate::geometry::Landmark;
use crate::landmarks::{
    HandJoint, HandLandmarkSet, Handedness, PoseJoint, PoseLandmarkSet, HAND_LANDMARK_COUNT,
    POSE_LANDMARK_COUNT,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub landmarks: HandLandmarkSet,
    pub handedness: Option<Handedness>,
}

/// Everything the perception model reported for one captured image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Seconds since the stream started.
    pub timestamp: f64,
    pub hands: Vec<HandObservation>,
    pub pose: Option<PoseLandmarkSet>,
}

impl Frame {
    pub fn empty(timestamp: f64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// The hand the analyzer scores. Additional hands are ignored.
    pub fn primary_hand(&self) -> Option<&HandObservation> {
        self.hands.first()
    }
}

pub trait LandmarkProvider {
    /// Whether a perception backend is actually producing detections.
    fn is_available(&self) -> bool;

    /// Next frame, or `None` once the stream has ended.
    fn next_frame(&mut self) -> Option<Frame>;
}

// ============================================================================
// NULL
// ============================================================================

/// Stand-in used when no perception backend is present. Never ends, never detects.
#[derive(Debug, Clone)]
pub struct NullProvider {
    frame_interval: f64,
    frames_emitted: u64,
}

impl NullProvider {
    pub fn new(fps: f64) -> Self {
        info!("Landmark provider unavailable; frames will carry no detections");
        Self {
            frame_interval: if fps > 0.0 { 1.0 / fps } else { 0.0 },
            frames_emitted: 0,
        }
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl LandmarkProvider for NullProvider {
    fn is_available(&self) -> bool {
        false
    }

    fn next_frame(&mut self) -> Option<Frame> {
        let t = self.frames_emitted as f64 * self.frame_interval;
        self.frames_emitted += 1;
        Some(Frame::empty(t))
    }
}

// ============================================================================
// REPLAY
// ============================================================================

// Landmark payloads are decoded per hand in `convert_recorded_frame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordedHand {
    #[serde(default)]
    handedness: Option<Value>,
    #[serde(default)]
    landmarks: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    timestamp: f64,
    #[serde(default)]
    hands: Vec<RecordedHand>,
    #[serde(default)]
    pose: Option<Value>,
}

/// Plays back frames captured earlier.
///
/// JSON recordings are an array of `{timestamp, hands: [{handedness, landmarks}], pose}`
/// objects with `[x, y, z]` triples. CSV recordings hold one frame per row:
/// `timestamp,handedness,x0,y0,z0,...,x20,y20,z20`, with the coordinate columns
/// left empty when no hand was seen. Malformed hands are dropped with a warning
/// and the frame is kept as a frame without detection.
#[derive(Debug, Clone, Default)]
pub struct ReplayProvider {
    frames: VecDeque<Frame>,
}

impl ReplayProvider {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> TpResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let reader = BufReader::new(File::open(path)?);
        let provider = match ext.as_deref() {
            Some("json") => Self::from_json_reader(reader)?,
            Some("csv") => Self::from_csv_reader(reader)?,
            other => {
                return Err(TeaPickError::Config(format!(
                    "Unsupported recording format '{}' for {:?} (expected .json or .csv)",
                    other.unwrap_or(""),
                    path
                )))
            }
        };

        info!(
            "📼 Loaded {} frames from {:?}",
            provider.remaining(),
            path
        );
        Ok(provider)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> TpResult<Self> {
        let recorded: Vec<RecordedFrame> = serde_json::from_reader(reader)?;
        let frames = recorded
            .into_iter()
            .enumerate()
            .map(|(i, rec)| convert_recorded_frame(i, rec))
            .collect();
        Ok(Self::from_frames(frames))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> TpResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut frames = Vec::new();
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            frames.push(parse_csv_row(i, &row)?);
        }
        Ok(Self::from_frames(frames))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for ReplayProvider {
    fn is_available(&self) -> bool {
        true
    }

    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }
}

fn recorded_points(raw: Value) -> TpResult<Vec<Landmark>> {
    let triples: Vec<[f32; 3]> = serde_json::from_value(raw)?;
    Ok(triples.into_iter().map(Landmark::from).collect())
}

fn convert_recorded_frame(index: usize, rec: RecordedFrame) -> Frame {
    let mut hands = Vec::with_capacity(rec.hands.len());
    for hand in rec.hands {
        let landmarks = recorded_points(hand.landmarks)
            .and_then(|points| HandLandmarkSet::from_points(&points));
        match landmarks {
            Ok(landmarks) => {
                let label = match hand.handedness {
                    Some(Value::String(s)) => Some(s),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                };
                hands.push(HandObservation {
                    landmarks,
                    handedness: parse_handedness(index, label.as_deref()),
                })
            }
            Err(e) => warn!("Frame {}: dropping hand ({})", index, e),
        }
    }

    let pose = rec.pose.filter(|raw| !raw.is_null()).and_then(|raw| {
        recorded_points(raw)
            .and_then(|points| PoseLandmarkSet::from_points(&points))
            .map_err(|e| warn!("Frame {}: dropping pose ({})", index, e))
            .ok()
    });

    Frame {
        timestamp: rec.timestamp,
        hands,
        pose,
    }
}

fn parse_handedness(index: usize, label: Option<&str>) -> Option<Handedness> {
    let label = label?.trim();
    if label.is_empty() {
        return None;
    }
    match Handedness::from_str(label) {
        Ok(h) => Some(h),
        Err(_) => {
            warn!("Frame {}: unknown handedness '{}'", index, label);
            None
        }
    }
}

fn parse_csv_row(index: usize, row: &csv::StringRecord) -> TpResult<Frame> {
    let timestamp: f64 = row
        .get(0)
        .unwrap_or("")
        .parse()
        .map_err(|_| TeaPickError::Validation(format!("Row {}: invalid timestamp", index)))?;

    let coords: Vec<&str> = row.iter().skip(2).filter(|s| !s.is_empty()).collect();
    if coords.is_empty() {
        return Ok(Frame::empty(timestamp));
    }

    let parsed: Result<Vec<f32>, _> = coords.iter().map(|s| s.parse::<f32>()).collect();
    let hand = parsed
        .map_err(|e| TeaPickError::Validation(e.to_string()))
        .and_then(|flat| HandLandmarkSet::from_flat(&flat));

    let hands = match hand {
        Ok(landmarks) => vec![HandObservation {
            landmarks,
            handedness: parse_handedness(index, row.get(1)),
        }],
        Err(e) => {
            warn!("Row {}: dropping hand ({})", index, e);
            Vec::new()
        }
    };

    Ok(Frame {
        timestamp,
        hands,
        pose: None,
    })
}

// ============================================================================
// SYNTHETIC
// ============================================================================

#[derive(Debug, Clone)]
pub struct SyntheticParams {
    pub seed: u64,
    pub cycles: usize,
    /// Frames per open+close cycle. The second half of each cycle is closed.
    pub cycle_frames: usize,
    pub fps: f64,
    pub open_gap: f32,
    pub closed_gap: f32,
    /// Uniform noise amplitude applied to every coordinate.
    pub jitter: f32,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            seed: 42,
            cycles: 10,
            cycle_frames: 30,
            fps: 30.0,
            open_gap: 0.12,
            closed_gap: 0.01,
            jitter: 0.002,
        }
    }
}

/// Scripted pinch cycles with seeded jitter, standing in for a live camera.
pub struct SyntheticProvider {
    params: SyntheticParams,
    rng: fastrand::Rng,
    frame: usize,
}

impl SyntheticProvider {
    pub fn new(params: SyntheticParams) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(params.seed),
            params,
            frame: 0,
        }
    }

    pub fn total_frames(&self) -> usize {
        self.params.cycles * self.params.cycle_frames
    }

    fn noise(&mut self) -> f32 {
        (self.rng.f32() * 2.0 - 1.0) * self.params.jitter
    }

    fn point(&mut self, x: f32, y: f32) -> Landmark {
        Landmark::planar(x + self.noise(), y + self.noise())
    }

    fn hand(&mut self, gap: f32) -> HandLandmarkSet {
        // Palm-down right hand, wrist at the bottom, fingers pointing up.
        let wrist = (0.50, 0.80);
        let mut points = [Landmark::planar(wrist.0, wrist.1); HAND_LANDMARK_COUNT];

        let layout: [(HandJoint, f32, f32); 8] = [
            (HandJoint::ThumbMcp, 0.44, 0.70),
            (HandJoint::IndexMcp, 0.47, 0.64),
            (HandJoint::MiddleMcp, 0.50, 0.63),
            (HandJoint::RingMcp, 0.53, 0.64),
            (HandJoint::PinkyMcp, 0.56, 0.66),
            (HandJoint::MiddleTip, 0.50, 0.55),
            (HandJoint::RingTip, 0.55, 0.56),
            (HandJoint::PinkyTip, 0.60, 0.58),
        ];
        for (joint, x, y) in layout {
            points[joint.index()] = self.point(x, y);
        }

        let pinch_at = (0.42, 0.52);
        points[HandJoint::ThumbTip.index()] = self.point(pinch_at.0 - gap / 2.0, pinch_at.1);
        points[HandJoint::IndexTip.index()] = self.point(pinch_at.0 + gap / 2.0, pinch_at.1);
        points[HandJoint::Wrist.index()] = self.point(wrist.0, wrist.1);

        HandLandmarkSet::new(points)
    }

    fn pose(&mut self) -> PoseLandmarkSet {
        let mut points = [Landmark::planar(0.5, 0.5); POSE_LANDMARK_COUNT];
        points[PoseJoint::RightShoulder.index()] = self.point(0.40, 0.30);
        points[PoseJoint::RightElbow.index()] = self.point(0.40, 0.50);
        points[PoseJoint::RightWrist.index()] = self.point(0.55, 0.45);
        PoseLandmarkSet::new(points)
    }
}

impl LandmarkProvider for SyntheticProvider {
    fn is_available(&self) -> bool {
        true
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if self.frame >= self.total_frames() {
            return None;
        }

        let phase = self.frame % self.params.cycle_frames.max(1);
        let closed = phase >= self.params.cycle_frames / 2;
        let gap = if closed {
            self.params.closed_gap
        } else {
            self.params.open_gap
        };

        let timestamp = if self.params.fps > 0.0 {
            self.frame as f64 / self.params.fps
        } else {
            0.0
        };
        self.frame += 1;

        Some(Frame {
            timestamp,
            hands: vec![HandObservation {
                landmarks: self.hand(gap),
                handedness: Some(Handedness::Right),
            }],
            pose: Some(self.pose()),
        })
    }
}
