pub mod analyzer;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmarks;
pub mod provider;
pub mod session;

pub use analyzer::{AnalysisResult, PickingAnalyzer, PostureResult, Statistics};
pub use config::AnalyzerConfig;
pub use error::{TeaPickError, TpResult};
pub use geometry::Landmark;
pub use landmarks::{HandLandmarkSet, Handedness, PoseLandmarkSet};
