use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod view;

use crate::cli::{init_tracing, run_scan, run_watch};

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the tree once and print the grouped marker listing
    Scan {
        /// Root directory to scan
        #[arg(long)]
        root: Option<PathBuf>,
        /// Emit the listing as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Scan, then watch for changes and re-render on every update
    Watch {
        /// Root directory to scan and watch
        #[arg(long)]
        root: Option<PathBuf>,
        /// Quiet period for coalescing change events, in milliseconds
        #[arg(long = "debounce-ms", default_value_t = 250)]
        debounce_ms: u64,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "tt",
    about = "todo_tree: file-grouped, live-updating TODO/FIXME listing",
    version,
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    match args.command {
        Command::Scan { root, json } => run_scan(root, json).await?,
        Command::Watch { root, debounce_ms } => run_watch(root, debounce_ms).await?,
    }

    Ok(())
}
