use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vadi::cli::{Cli, Commands};
use vadi::commands::{batch, resolve, stats};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Resolve(args) => resolve::run(&cli, args),
        Commands::Batch(args) => batch::run(&cli, args),
        Commands::Stats(args) => stats::run(&cli, args),
    }
}
