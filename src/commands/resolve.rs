use anyhow::Result;

use crate::cli::{Cli, ResolveArgs};
use crate::commands::Engine;

pub fn run(_cli: &Cli, args: &ResolveArgs) -> Result<()> {
    let engine = Engine::open(&args.engine)?;
    let result = engine.resolve(&args.text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
