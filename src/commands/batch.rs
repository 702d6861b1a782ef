use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::info;

use crate::cli::{BatchArgs, Cli};
use crate::commands::Engine;

/// Every line of `reader`, blank ones included, so output rows line up with input rows.
fn read_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    reader.lines().collect()
}

/// Lines of `path`, or of stdin for "-".
fn read_input(path: &Path) -> Result<Vec<String>> {
    let lines = if path == Path::new("-") {
        read_lines(io::stdin().lock())
    } else {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        read_lines(BufReader::new(file))
    };
    lines.with_context(|| format!("Failed to read {}", path.display()))
}

/// One JSON result per input line, in input order.
fn resolve_lines(engine: &Engine, lines: &[String]) -> Result<Vec<String>> {
    let results = lines.par_iter()
        .map(|line| serde_json::to_string(&engine.resolve(line)))
        .collect::<Result<_, _>>()?;
    Ok(results)
}

pub fn run(_cli: &Cli, args: &BatchArgs) -> Result<()> {
    let engine = Engine::open(&args.engine)?;
    let lines = read_input(&args.input)?;
    let results = resolve_lines(&engine, &lines)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for result in &results {
        writeln!(out, "{result}")?;
    }
    out.flush()?;
    info!(resolved = results.len(), "batch done");
    Ok(())
}
