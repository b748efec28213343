use crate::reports;
use clap::Args;
use teapick::config::AnalyzerConfig;
use teapick::provider::{LandmarkProvider, NullProvider, SyntheticParams, SyntheticProvider};
use teapick::session::{run_provider, SharedAnalyzer};
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: AnalyzerConfig,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of open/close pinch cycles
    #[arg(long, default_value_t = 10)]
    pub cycles: usize,

    /// Frames per cycle
    #[arg(long, default_value_t = 30)]
    pub cycle_frames: usize,

    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,

    /// Coordinate noise amplitude
    #[arg(long, default_value_t = 0.002)]
    pub jitter: f32,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<usize>,

    /// Run without a perception backend (every frame is empty)
    #[arg(long, default_value_t = false)]
    pub no_camera: bool,
}

pub fn run(args: SimulateArgs, config: AnalyzerConfig) -> i32 {
    let session = match SharedAnalyzer::with_config(config) {
        Ok(s) => s,
        Err(e) => {
            error!("❌ {}", e);
            return 1;
        }
    };

    let params = SyntheticParams {
        seed: args.seed,
        cycles: args.cycles,
        cycle_frames: args.cycle_frames,
        fps: args.fps,
        jitter: args.jitter,
        ..Default::default()
    };

    let mut provider: Box<dyn LandmarkProvider> = if args.no_camera {
        Box::new(NullProvider::new(args.fps))
    } else {
        let synthetic = SyntheticProvider::new(params);
        info!(
            "🎬 Simulating {} cycles ({} frames, seed {})",
            args.cycles,
            synthetic.total_frames(),
            args.seed
        );
        Box::new(synthetic)
    };

    // The empty stream never ends on its own.
    let limit = match (args.frames, args.no_camera) {
        (Some(n), _) => Some(n),
        (None, true) => Some(args.cycles * args.cycle_frames),
        (None, false) => None,
    };

    let report = run_provider(provider.as_mut(), &session, limit);
    reports::print_session_report(&[("simulated".to_string(), report.clone())]);
    reports::print_feedback("simulated", &report.last_feedback);
    0
}
