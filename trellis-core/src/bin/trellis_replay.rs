//! Replay a saved project for a number of ticks and print the result.
//!
//! ```text
//! trellis-replay <project.json> [ticks] [config.json]
//! ```

use std::env;
use std::fs;

use anyhow::{bail, Context as _, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trellis_core::nodes::builtin_registry;
use trellis_core::reactive::Context;
use trellis_core::{EngineConfig, Graph, Project};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <project.json> [ticks] [config.json]", args[0]);
        std::process::exit(1);
    }

    let ticks: u64 = match args.get(2) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("tick count must be a number, got {raw:?}"))?,
        None => 1,
    };

    let config = match args.get(3) {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path}"))?;
            EngineConfig::from_json(&json)?
        }
        None => EngineConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = &args[1];
    let json = fs::read_to_string(path).with_context(|| format!("failed to read project {path}"))?;
    let project = Project::from_json(&json).with_context(|| format!("invalid project {path}"))?;
    if project.nodes.is_empty() {
        bail!("project {path} has no nodes");
    }

    let registry = builtin_registry(Context::empty());
    let mut graph = Graph::new();
    graph.load_project(&project, &registry)?;

    for _ in 0..ticks {
        let report = graph.tick();
        info!(
            tick = report.tick,
            committed = report.committed,
            fired = report.triggers_fired,
            forwarded = report.values_forwarded,
            "tick"
        );
    }

    for event in graph.drain_notifications() {
        eprintln!("{}", serde_json::to_string(&event)?);
    }
    println!("{}", graph.to_project()?.to_json()?);
    Ok(())
}
