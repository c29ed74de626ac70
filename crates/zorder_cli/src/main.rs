//! zorder CLI
//!
//! Records a scene file and prints the batched replay order.
//!
//! ```text
//! zorder order scene.toml --stats
//! zorder check scene.toml
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG` (e.g. `RUST_LOG=zorder_core=trace`).

mod report;
mod scene_file;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::report::Report;

/// Draw-order planner for recorded scenes
#[derive(Parser, Debug)]
#[command(name = "zorder")]
#[command(about = "Compute batched replay order for recorded draw scenes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a scene and print its replay order
    Order {
        /// Scene file (TOML)
        scene: PathBuf,

        /// Also print per-device finalize statistics
        #[arg(long)]
        stats: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scene without printing the order
    Check {
        /// Scene file (TOML)
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Order { scene, stats, json } => {
            let canvas = scene_file::record_and_finalize(&scene)?;
            let report = Report::new(&canvas, stats)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.to_text());
            }
        }
        Command::Check { scene } => {
            let canvas = scene_file::record_and_finalize(&scene)?;
            println!(
                "{}: ok ({} draws)",
                scene.display(),
                canvas.device().len()
            );
        }
    }

    Ok(())
}
