use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use teapick::config::AnalyzerConfig;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON analyzer config. Flags given on the command line override it.
    #[arg(global = true, long)]
    config_file: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score recorded landmark streams (.json or .csv)
    Replay(cmd::replay::ReplayArgs),
    /// Score a scripted pinch sequence
    Simulate(cmd::simulate::SimulateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    info!("🍵 Initializing TeaPick analyzer...");

    let (cli_config, sub_matches) = match &cli.command {
        Commands::Replay(args) => (&args.config, matches.subcommand_matches("replay")),
        Commands::Simulate(args) => (&args.config, matches.subcommand_matches("simulate")),
    };

    let config = match &cli.config_file {
        Some(path) => {
            info!("⚙️  Loading analyzer config from: {}", path);
            let mut file_config = AnalyzerConfig::parse_file(path).unwrap_or_else(|e| {
                error!("❌ {}", e);
                process::exit(1);
            });
            if let Some(sub) = sub_matches {
                file_config.merge_from_cli(cli_config, sub);
            }
            file_config
        }
        None => {
            warn!("No config file given. Using command-line values and defaults.");
            cli_config.clone()
        }
    };

    if let Err(e) = config.validate() {
        error!("❌ {}", e);
        process::exit(1);
    }

    let code = match cli.command {
        Commands::Replay(args) => cmd::replay::run(args, config),
        Commands::Simulate(args) => cmd::simulate::run(args, config),
    };
    process::exit(code);
}
