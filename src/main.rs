//! Command-line front-end: runs one simulation, prints and logs each cycle.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use irqsim::report::{self, LogWriter};
use irqsim::{CycleOutcome, DeviceDescriptor, SimulationBuilder, Snapshot};

/// Simulate a single CPU servicing keyboard, printer and disk interrupts.
#[derive(Debug, Parser)]
#[command(name = "irqsim", version, about)]
struct Args {
    /// Cycle budget for the run.
    #[arg(short, long, default_value_t = irqsim::config::DEFAULT_TOTAL_CYCLES)]
    cycles: u64,

    /// Seed for the device generators (random if omitted).
    #[arg(short, long)]
    seed: Option<u64>,

    /// Execution log file.
    #[arg(short, long, default_value = "simulation_log.txt")]
    log_file: PathBuf,

    /// Pause between cycles, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Run without any interrupting devices.
    #[arg(long)]
    no_devices: bool,

    /// Print the final snapshot as JSON instead of the summary.
    #[arg(long)]
    json: bool,

    /// Increase diagnostic logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[cfg(feature = "serialize")]
fn print_json(state: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("serializing final state")?;
    println!("{}", json);
    Ok(())
}

#[cfg(not(feature = "serialize"))]
fn print_json(_state: &Snapshot) -> Result<()> {
    anyhow::bail!("--json requires the `serialize` feature")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut builder = SimulationBuilder::new().cycles(args.cycles);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.no_devices {
        builder = builder.without_devices();
    }
    let mut engine = builder.build().context("invalid simulation configuration")?;

    if !args.no_devices {
        println!("=== I/O DEVICES ===");
        for device in DeviceDescriptor::reference_table() {
            println!("{}", device);
        }
        println!();
    }

    let file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    let mut writer = LogWriter::new(BufWriter::new(file)).context("writing log header")?;

    println!(
        "Simulation started (seed {}). Logging to {}",
        engine.seed(),
        args.log_file.display()
    );

    let delay = Duration::from_millis(args.delay_ms);
    let mut write_error: Option<io::Error> = None;
    let summary = engine.run_with(|engine, outcome| {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if write_error.is_some() {
            return;
        }
        match writer.write_cycle(outcome, &engine.current_state()) {
            Ok(lines) => lines.iter().for_each(|line| println!("{}", line)),
            Err(e) => write_error = Some(e),
        }
        if outcome == CycleOutcome::ProcessFinished {
            log::info!("process finished at {}", engine.clock());
        }
    });
    if let Some(e) = write_error {
        return Err(e).context("writing execution log");
    }
    writer.write_summary(&summary).context("writing run summary")?;

    println!();
    if args.json {
        print_json(&summary.final_state)?;
    } else {
        print!("{}", report::summary(&summary));
    }
    println!("End of simulation.");
    Ok(())
}
