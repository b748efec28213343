use crate::error::{TeaPickError, TpResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tuning for one [`PickingAnalyzer`](crate::analyzer::PickingAnalyzer).
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    // === PINCH STATE MACHINE ===
    /// Smoothed thumb-index distance below which a pinch closes.
    #[arg(long, default_value_t = 0.05)]
    pub pinch_threshold: f32,
    /// Smoothed thumb-index distance above which a pinch releases.
    #[arg(long, default_value_t = 0.08)]
    pub release_threshold: f32,

    // === SMOOTHING ===
    #[arg(long, default_value_t = 0.3)]
    pub pinch_alpha: f32,
    #[arg(long, default_value_t = 0.2)]
    pub score_alpha: f32,

    // === HISTORY ===
    #[arg(long, default_value_t = 100)]
    pub history_capacity: usize,

    /// Seed the score smoother with the first raw score instead of 0.
    #[arg(long, default_value_t = false)]
    pub score_warm_start: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            release_threshold: 0.08,
            pinch_alpha: 0.3,
            score_alpha: 0.2,
            history_capacity: 100,
            score_warm_start: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> TpResult<()> {
        let finite = [
            ("pinch_threshold", self.pinch_threshold),
            ("release_threshold", self.release_threshold),
            ("pinch_alpha", self.pinch_alpha),
            ("score_alpha", self.score_alpha),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(TeaPickError::Config(format!("{} must be finite", name)));
            }
        }

        if self.pinch_threshold <= 0.0 {
            return Err(TeaPickError::Config(format!(
                "pinch_threshold must be positive, got {}",
                self.pinch_threshold
            )));
        }
        if self.release_threshold <= self.pinch_threshold {
            return Err(TeaPickError::Config(format!(
                "release_threshold ({}) must exceed pinch_threshold ({})",
                self.release_threshold, self.pinch_threshold
            )));
        }

        check_alpha("pinch_alpha", self.pinch_alpha)?;
        check_alpha("score_alpha", self.score_alpha)?;

        if self.history_capacity == 0 {
            return Err(TeaPickError::Config(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads a JSON config without validating it, for callers that merge overrides first.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> TpResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TpResult<Self> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Copies every value the user typed on the command line over `self`.
    pub fn merge_from_cli(&mut self, cli: &AnalyzerConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(pinch_threshold);
        update_if_present!(release_threshold);
        update_if_present!(pinch_alpha);
        update_if_present!(score_alpha);
        update_if_present!(history_capacity);
        update_if_present!(score_warm_start);
    }
}

fn check_alpha(name: &str, alpha: f32) -> TpResult<()> {
    if alpha <= 0.0 || alpha > 1.0 {
        return Err(TeaPickError::Config(format!(
            "{} must lie in (0, 1], got {}",
            name, alpha
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_pinch(AnalyzerConfig { pinch_threshold: 0.0, ..Default::default() }, "pinch_threshold")]
    #[case::inverted_band(AnalyzerConfig { release_threshold: 0.04, ..Default::default() }, "release_threshold")]
    #[case::empty_band(AnalyzerConfig { release_threshold: 0.05, ..Default::default() }, "release_threshold")]
    #[case::alpha_zero(AnalyzerConfig { pinch_alpha: 0.0, ..Default::default() }, "pinch_alpha")]
    #[case::alpha_above_one(AnalyzerConfig { score_alpha: 1.5, ..Default::default() }, "score_alpha")]
    #[case::nan(AnalyzerConfig { score_alpha: f32::NAN, ..Default::default() }, "score_alpha")]
    #[case::no_history(AnalyzerConfig { history_capacity: 0, ..Default::default() }, "history_capacity")]
    fn test_validate_rejects(#[case] config: AnalyzerConfig, #[case] field: &str) {
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string().contains(field),
            "expected '{}' in '{}'",
            field,
            err
        );
    }

    #[test]
    fn test_alpha_of_one_is_allowed() {
        let config = AnalyzerConfig {
            pinch_alpha: 1.0,
            score_alpha: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
