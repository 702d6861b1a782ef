use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Address resolution CLI
#[derive(Parser, Debug)]
#[command(name = "vadi", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a single address and print the result as JSON
    Resolve(ResolveArgs),

    /// Resolve one address per line of a file, printing one JSON result per line
    Batch(BatchArgs),

    /// Print record counts of a data directory
    Stats(StatsArgs),
}

/// Options shared by every command that resolves addresses.
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Data directory containing manifest.json
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub data: PathBuf,

    /// Resolver configuration (JSON); defaults apply when omitted
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Append an audit entry per resolution to this JSON-lines file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub audit: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Free-text address, e.g. "Av. Mitre 1200"
    pub text: String,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// File with one address per line ("-" reads stdin)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Data directory containing manifest.json
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub data: PathBuf,
}
