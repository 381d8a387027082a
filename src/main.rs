use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use biosim::{scenario::ScenarioLoader, snapshot::SnapshotWriter};

#[derive(Debug, Parser)]
#[command(author, version, about = "BioSim island ecosystem runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/small_island.yaml")]
    scenario: PathBuf,

    /// Override year count (uses scenario default when omitted)
    #[arg(long)]
    years: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in years (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let years = scenario.years(cli.years);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_years);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    let mut sim = scenario.build_simulation()?;
    sim.set_snapshot_writer(SnapshotWriter::new(snapshot_dir, snapshot_interval));
    sim.simulate(years)?;

    let counts = sim.num_animals_per_species();
    println!(
        "Scenario '{}' completed for {} years. Herbivores: {}, carnivores: {}",
        scenario.name, years, counts.herbivores, counts.carnivores
    );
    Ok(())
}
