use anyhow::Result;
use geostore::GeoStore;

use crate::cli::{Cli, StatsArgs};

pub fn run(cli: &Cli, args: &StatsArgs) -> Result<()> {
    let store = GeoStore::from_dir(&args.data)?;
    if cli.verbose > 0 {
        eprintln!("[stats] data={}", args.data.display());
    }
    println!("streets   {}", store.streets().len());
    println!("blocks    {}", store.blocks().len());
    println!("buildings {}", store.buildings().len());
    Ok(())
}
