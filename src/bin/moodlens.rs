//! moodlens CLI binary.

use anyhow::Context;
use clap::Parser;
use moodlens::cli::{MoodlensArgs, execute_command};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> anyhow::Result<()> {
    let args = MoodlensArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = args.command.name();
    execute_command(args).with_context(|| format!("moodlens {command} failed"))
}
