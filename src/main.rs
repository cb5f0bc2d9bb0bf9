//! Runs a border scenario headless and logs what listeners would see.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lisiere::border::DamageReport;
use lisiere::config::EngineConfig;
use lisiere::geometry::PointKey;
use lisiere::{init_logging, BoundaryShape, Simulation, TrackerEvent, WorldId};
use log::{debug, info};

/// Headless multi-world border simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON scenario file; the built-in two-world scenario is used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the number of ticks to simulate
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Override surface sampling density (points per unit length)
    #[arg(short, long)]
    density: Option<f64>,
}

fn log_event(event: &TrackerEvent) {
    match event {
        TrackerEvent::RegionComplete(handle) => info!("{handle} settled"),
        TrackerEvent::RegionActive(handle) => info!("{handle} moving again"),
        TrackerEvent::AllComplete(worlds) => {
            let mut names: Vec<_> = worlds.values().map(ToString::to_string).collect();
            names.sort();
            info!("all regions settled: {}", names.join(", "));
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(density) = args.density {
        config.density = density;
    }

    let mut sim = Simulation::new();
    sim.tracker_mut().register_listener(Box::new(log_event));
    for world in &config.worlds {
        let border = world
            .build(config.settings)
            .with_context(|| format!("building border for {}", world.handle()))?;
        sim.add_world(border, world.handle())
            .with_context(|| format!("registering {}", world.handle()))?;
    }

    let occupants = config.occupants();
    let mut frames: Vec<(WorldId, BTreeSet<PointKey>)> = sim
        .borders()
        .map(|b| (b.world(), sample(b.shape(), config.density)))
        .collect();
    let mut damage: Vec<DamageReport> = Vec::new();

    for _ in 0..config.ticks {
        sim.step(&occupants, &mut damage);
        for (world, previous) in &mut frames {
            let Some(border) = sim.border(*world) else {
                continue;
            };
            let current = sample(border.shape(), config.density);
            if current != *previous {
                let added = current.difference(previous).count();
                let removed = previous.difference(&current).count();
                debug!(
                    "tick {}: world {world} size {:.3} (+{added}/-{removed} samples)",
                    sim.ticks(),
                    border.size()
                );
                *previous = current;
            }
        }
    }

    let total: u64 = damage.iter().map(|r| u64::from(r.amount)).sum();
    info!(
        "simulated {} ticks; {} damage events totalling {total}",
        sim.ticks(),
        damage.len()
    );
    for border in sim.borders() {
        info!(
            "world {}: size {:.3}, center {}, {:?}",
            border.world(),
            border.size(),
            border.center(),
            border.status()
        );
    }
    Ok(())
}

fn sample(shape: &impl BoundaryShape, density: f64) -> BTreeSet<PointKey> {
    shape.sample_points(density).map(PointKey::from).collect()
}
