//! CLI entrypoint for the linebound demo.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use linebound_core::{DEFAULT_CAPACITY, Session};
use linebound_harness::{DemoConfig, HarnessError, LogEmitter, run};
use linebound_membrane::{SafetyLevel, global_registry, safety_level, set_safety_level};

const RUN_ID: &str = "linebound-demo";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Strict,
    Hardened,
}

impl From<Mode> for SafetyLevel {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Strict => SafetyLevel::Strict,
            Mode::Hardened => SafetyLevel::Hardened,
        }
    }
}

/// Reads a name four times, once per buffer ownership model.
#[derive(Debug, Parser)]
#[command(name = "linebound-demo")]
#[command(about = "Bounded-buffer line input across ownership models")]
struct Cli {
    /// Buffer size in bytes for the allocated variants (the stack variant
    /// is capped at its 100-byte array).
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
    /// Release policy; overrides LINEBOUND_MODE.
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Write one JSONL record per step to this file.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Skip the startup banner.
    #[arg(long)]
    no_banner: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("linebound-demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: &Cli) -> Result<(), HarnessError> {
    if let Some(mode) = cli.mode {
        set_safety_level(mode.into());
    }
    let level = safety_level();
    let config = DemoConfig {
        capacity: cli.capacity,
        banner: !cli.no_banner,
    };
    let mut session = Session::stdio();
    let mut diag = io::stderr();

    match &cli.log {
        Some(path) => {
            let mut emitter = LogEmitter::to_file(path, RUN_ID).map_err(HarnessError::Log)?;
            run(&mut session, global_registry(), level, &mut diag, &mut emitter, &config)?;
        }
        None => {
            let mut emitter = LogEmitter::disabled();
            run(&mut session, global_registry(), level, &mut diag, &mut emitter, &config)?;
        }
    }
    Ok(())
}
