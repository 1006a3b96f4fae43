///
/// handoff CLI - Run a producer and a consumer through a single-slot handoff
///
/// Prints one progress line per event on stdout and a final summary.
/// Diagnostics (lock waits, signals, state transitions) go to stderr through
/// `tracing`; raise the level with `-v` or `RUST_LOG`.
///

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use handoff::{Config, Discipline, HandoffError, LineObserver, NullObserver, Observer, Summary, run};

#[derive(Parser)]
#[command(name = "handoff")]
#[command(author, version, about = "Single-slot producer/consumer handoff", long_about = None)]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Locking discipline of the slot
    #[arg(short, long, value_enum)]
    discipline: Option<Discipline>,

    /// Iterations performed by each role
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Random seed for simulated delays
    #[arg(long)]
    seed: Option<u64>,

    /// Length of one simulated time unit in milliseconds
    #[arg(long)]
    unit_ms: Option<u64>,

    /// Suppress the progress stream
    #[arg(short, long)]
    quiet: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<Config, HandoffError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(discipline) = self.discipline {
            config.discipline = discipline;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(unit_ms) = self.unit_ms {
            config.unit_ms = unit_ms;
        }
        Ok(config.validate()?)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_thread_names(true)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<(), HandoffError> {
    let config = cli.load_config()?;

    let observer: Box<dyn Observer> = if cli.quiet {
        Box::new(NullObserver)
    } else {
        Box::new(LineObserver::stdout())
    };

    let summary = run(&config, observer.as_ref())?;

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode summary: {}", e),
        }
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!(
        "main(): joined producer and consumer ({} discipline, {} iterations, seed {}). \
         Final occupancy = {}, puts = {}, takes = {}, elapsed {} ms. Done.",
        summary.discipline,
        summary.iterations,
        summary
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
        summary.slot.occupancy,
        summary.slot.puts,
        summary.slot.takes,
        summary.elapsed_ms
    );
}
