use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sandtick_engine::Simulation;
use sandtick_sandbox::config::SandboxConfig;
use sandtick_sandbox::generation::FloorGenerator;
use sandtick_sandbox::{materials, rules, scene};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sandtick", about = "Headless falling-sand simulation")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run (overrides the config file)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Decide-phase worker threads, 0 = one per core (overrides the config file)
    #[arg(long)]
    threads: Option<usize>,

    /// Fixed RNG seed for a repeatable run
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = SandboxConfig::load(cli.config.as_deref())?;
    if let Some(ticks) = cli.ticks {
        config.demo.ticks = ticks;
    }
    if let Some(threads) = cli.threads {
        config.engine.worker_threads = threads;
    }
    if let Some(seed) = cli.seed {
        config.engine.rng_seed = Some(seed);
        config.floor.seed = seed;
    }

    let registry = Arc::new(materials::registry().context("invalid material catalog")?);
    let ground = config.floor.height;
    let mut sim = Simulation::new(
        config.engine.clone(),
        registry,
        Box::new(FloorGenerator::new(config.floor.clone())),
        rules::standard(),
    )
    .context("failed to start the simulation")?;

    scene::build(sim.world(), ground, &config.demo).context("failed to build the demo scene")?;
    tracing::info!(
        "Scene ready: {} regions, {} dirty",
        sim.world().region_count(),
        sim.world().dirty_count()
    );

    for _ in 0..config.demo.ticks {
        let report = sim
            .tick()
            .with_context(|| format!("tick {} failed", sim.tick_count()))?;
        let every = config.demo.report_every;
        if every > 0 && sim.tick_count() % every == 0 {
            tracing::info!(
                "Tick {}: {} regions scanned, {} actions, {} retries, {:?}",
                sim.tick_count(),
                report.scanned,
                report.actions_applied,
                report.chances_failed,
                report.elapsed
            );
        }
    }

    let snapshot = sim.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
