//! `coda cache` - inspect and clear the run cache.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use coda_core::RunCache;

/// Cache management arguments.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List cached annotation runs
    List,
    /// Drop all cache entries (output files are left in place)
    Clear,
}

/// Run cache command.
pub fn run(args: CacheArgs) -> Result<()> {
    let mut cache = RunCache::open_default();
    match args.command {
        CacheCommands::List => {
            if cache.entries().next().is_none() {
                println!("Run cache is empty.");
                return Ok(());
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Input::Model::Pipeline", "Output"]);
            for (key, path) in cache.entries() {
                table.add_row(vec![key.to_string(), path.display().to_string()]);
            }
            println!("{table}");
        }
        CacheCommands::Clear => {
            cache.clear()?;
            println!("Run cache cleared.");
        }
    }
    Ok(())
}
