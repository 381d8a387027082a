use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::{island::PopulationRecord, simulation::BioSim};

fn default_snapshot_interval_years() -> u64 {
    0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub years: Option<u64>,
    #[serde(default = "default_snapshot_interval_years")]
    pub snapshot_interval_years: u64,
    pub island_map: String,
    #[serde(default)]
    pub population: Vec<PopulationRecord>,
    #[serde(default)]
    pub parameters: ScenarioParameters,
}

/// Overrides applied on top of the default parameter tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioParameters {
    #[serde(default)]
    pub herbivore: BTreeMap<String, f64>,
    #[serde(default)]
    pub carnivore: BTreeMap<String, f64>,
    /// Keyed by landscape code, `L` or `H`.
    #[serde(default)]
    pub landscape: BTreeMap<String, BTreeMap<String, f64>>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(
            scenario = %scenario.name,
            path = %path.display(),
            records = scenario.population.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }
}

impl Scenario {
    /// Builds the simulation with this scenario's map, population and
    /// parameter overrides.
    pub fn build_simulation(&self) -> Result<BioSim> {
        let mut sim = BioSim::new(&self.island_map, &self.population, self.seed)
            .with_context(|| format!("Scenario '{}' has an invalid island", self.name))?
            .with_scenario_name(&self.name);

        let species = [
            ("Herbivore", &self.parameters.herbivore),
            ("Carnivore", &self.parameters.carnivore),
        ];
        for (name, changes) in species {
            if changes.is_empty() {
                continue;
            }
            sim.set_animal_parameters(name, changes)
                .with_context(|| format!("Invalid {name} parameters in '{}'", self.name))?;
        }
        for (code, changes) in &self.parameters.landscape {
            sim.set_landscape_parameters(code, changes)
                .with_context(|| format!("Invalid landscape '{code}' in '{}'", self.name))?;
        }
        Ok(sim)
    }

    pub fn years(&self, override_years: Option<u64>) -> u64 {
        override_years.or(self.years).unwrap_or(100)
    }
}
