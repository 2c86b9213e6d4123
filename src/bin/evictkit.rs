//! Command-line driver: replays a page trace through ARC, LRU and the
//! offline optimum and prints their hit counts.
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evictkit::builder::PolicyKind;
use evictkit::compare::Comparison;
use evictkit::trace::{DEFAULT_FIXTURES, DEFAULT_SEED, Trace, TraceError, write_fixtures};

const BAD_INPUT_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare page-replacement policies on a reference trace")]
struct Args {
    /// Log level; overrides RUST_LOG (default: warn)
    #[arg(long, global = true)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a trace read from FILE (or stdin) and print hit counts
    Run {
        /// Policy to run; repeat to select several (default: arc, lru, ideal)
        #[arg(short, long = "policy", value_name = "POLICY")]
        policies: Vec<PolicyKind>,

        /// Print "<POLICY> hits: H out of N requests" instead of bare counts
        #[arg(long)]
        verbose: bool,

        /// Trace file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Write the standard trace fixtures as <idx>.dat files
    Gen {
        /// Existing directory to write into
        #[arg(short, long)]
        dir: PathBuf,

        /// Generator seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level);

    match execute(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("evictkit: {err:#}");
            let bad_input = err
                .downcast_ref::<TraceError>()
                .is_some_and(TraceError::is_input_error);
            if bad_input {
                ExitCode::from(BAD_INPUT_EXIT)
            } else {
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing(level: Option<Level>) {
    let filter = match level {
        Some(level) => EnvFilter::default().add_directive(LevelFilter::from_level(level).into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true),
        )
        .with(filter)
        .init();
}

fn execute(command: Command) -> Result<()> {
    match command {
        Command::Run {
            policies,
            verbose,
            file,
        } => run(&policies, verbose, file),
        Command::Gen { dir, seed } => {
            let written = write_fixtures(&dir, &DEFAULT_FIXTURES, seed)
                .with_context(|| format!("writing fixtures to {}", dir.display()))?;
            let mut out = io::stdout().lock();
            for path in written {
                writeln!(out, "{}", path.display())?;
            }
            Ok(())
        },
    }
}

fn run(policies: &[PolicyKind], verbose: bool, file: Option<PathBuf>) -> Result<()> {
    let trace = match &file {
        Some(path) => {
            let reader = File::open(path)
                .map(BufReader::new)
                .with_context(|| format!("opening {}", path.display()))?;
            Trace::read_from(reader).with_context(|| format!("reading {}", path.display()))?
        },
        None => Trace::read_from(io::stdin().lock()).context("reading trace from stdin")?,
    };
    debug!(
        capacity = trace.capacity(),
        requests = trace.len(),
        "trace loaded"
    );

    let mut comparison = Comparison::new(trace.capacity());
    if !policies.is_empty() {
        comparison = comparison.with_policies(policies);
    }
    let report = comparison.run(trace.keys(), |key: &i64| key.wrapping_mul(2))?;

    let rendered = if verbose {
        report.render_verbose()
    } else {
        report.render_compact()
    };
    io::stdout().lock().write_all(rendered.as_bytes())?;
    Ok(())
}
