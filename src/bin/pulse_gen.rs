//! pulse-gen - interactive synthetic event generator
//!
//! Usage:
//!   pulse-gen
//!   pulse-gen --min-interval-ms 2000 --max-interval-ms 8000 --level 2
//!   pulse-gen --format json --seed 42 --log-level info

use clap::Parser;
use pulse_gen::{
    CommandConsole, EventGenerator, ExitMode, GeneratorConfig, GeneratorError, OutputFormat,
    TIER_LABELS,
};
use std::io;
use std::process::ExitCode;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "pulse-gen")]
#[command(about = "Synthetic event generator controlled from the console")]
struct Cli {
    /// Lower bound of the initial tick interval
    #[arg(long, default_value = "4000")]
    min_interval_ms: u64,

    /// Upper bound of the initial tick interval
    #[arg(long, default_value = "4000")]
    max_interval_ms: u64,

    /// Initial verbosity level (0, 1 or 2; anything else renders nothing)
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    level: i32,

    /// Event output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// What `exit` does with the generator thread
    #[arg(long, value_enum, default_value = "graceful")]
    exit_mode: ExitMode,

    /// Diagnostics level written to stderr
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

impl From<Cli> for GeneratorConfig {
    fn from(cli: Cli) -> Self {
        Self {
            min_interval_ms: cli.min_interval_ms,
            max_interval_ms: cli.max_interval_ms,
            verbosity_level: cli.level,
            format: cli.format,
            seed: cli.seed,
            exit_mode: cli.exit_mode,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout is the event sink; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(cli.log_level)
        .init();

    let config = GeneratorConfig::from(cli);
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "pulse-gen failed");
            eprintln!("pulse-gen: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &GeneratorConfig) -> Result<(), GeneratorError> {
    info!(
        min_interval_ms = config.min_interval_ms,
        max_interval_ms = config.max_interval_ms,
        verbosity_level = config.verbosity_level,
        format = ?config.format,
        exit_mode = ?config.exit_mode,
        "Starting generator"
    );

    let generator = EventGenerator::new(config, io::stdout())?;
    let control = generator.control();
    let task = generator.spawn()?;

    let console = CommandConsole::new(control, TIER_LABELS[1]);
    let outcome = console.run(io::stdin().lock(), &mut io::stdout());
    if let Ok(reason) = &outcome {
        info!(?reason, "Console finished");
    }

    match config.exit_mode {
        ExitMode::Immediate => std::process::exit(if outcome.is_ok() { 0 } else { 1 }),
        ExitMode::Graceful => {
            task.shutdown()?;
            info!("Generator joined. Goodbye.");
        }
    }

    outcome?;
    Ok(())
}
