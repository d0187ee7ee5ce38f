//! Plantview - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use plantview_core::ProcessTopology;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "plantview")]
#[command(about = "Interactive 3D viewer for industrial process diagrams")]
#[command(version)]
struct Args {
    /// Path to the process topology file
    #[arg(default_value = "assets/sample-process.json")]
    topology: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Plantview v{}", env!("CARGO_PKG_VERSION"));

    let topology = ProcessTopology::load(&args.topology)
        .with_context(|| format!("failed to load topology from {}", args.topology.display()))?;

    info!(
        name = %topology.name,
        components = topology.components.len(),
        connections = topology.connections.len(),
        "Topology loaded"
    );

    plantview_viewer::app::run(topology);
    Ok(())
}
