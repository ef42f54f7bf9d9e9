//! Main entry point for roomgraph.

use clap::Parser;
use roomgraph::{Cli, Pipeline};
use roomgraph_common::init_logging;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the file, so config errors go to stderr.
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("roomgraph: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("roomgraph: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Starting roomgraph {}", env!("CARGO_PKG_VERSION"));

    let pipeline = match Pipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run().await {
        Ok(summary) => {
            for room in summary.missing_rooms() {
                warn!("Room {room} has no data; no charts were written for it");
            }
            for chart in summary.skipped() {
                warn!("Chart {} could not be drawn", chart.display());
            }
            info!(
                "Done: {} chart(s) under {}",
                summary.chart_count(),
                pipeline.config().output.root.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e.chain());
            ExitCode::FAILURE
        }
    }
}
