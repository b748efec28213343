use crate::reports;
use clap::Args;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use teapick::config::AnalyzerConfig;
use teapick::error::TpResult;
use teapick::provider::ReplayProvider;
use teapick::session::{run_provider, RunReport, SharedAnalyzer};
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub config: AnalyzerConfig,

    /// Recordings to score. Each file is an independent session.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the final feedback of every session
    #[arg(long, default_value_t = false)]
    pub feedback: bool,
}

fn replay_file(path: &Path, config: &AnalyzerConfig) -> TpResult<RunReport> {
    let mut provider = ReplayProvider::load(path)?;
    let session = SharedAnalyzer::with_config(config.clone())?;
    Ok(run_provider(&mut provider, &session, None))
}

fn session_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn run(args: ReplayArgs, config: AnalyzerConfig) -> i32 {
    info!("📼 Replaying {} recording(s)...", args.files.len());

    let outcomes: Vec<(String, TpResult<RunReport>)> = args
        .files
        .par_iter()
        .map(|path| (session_name(path), replay_file(path, &config)))
        .collect();

    let mut reports_ok = Vec::new();
    let mut failures = 0;
    for (name, outcome) in outcomes {
        match outcome {
            Ok(report) => reports_ok.push((name, report)),
            Err(e) => {
                error!("❌ {}: {}", name, e);
                failures += 1;
            }
        }
    }

    if reports_ok.is_empty() {
        error!("❌ No recording could be replayed.");
        return 1;
    }

    reports::print_session_report(&reports_ok);
    if args.feedback {
        for (name, report) in &reports_ok {
            reports::print_feedback(name, &report.last_feedback);
        }
    }

    if failures > 0 {
        2
    } else {
        0
    }
}
