use std::collections::BTreeMap;

use anyhow::Result;
use rand::RngCore;
use tracing::info;

use crate::{
    animal::Species,
    engine::{Engine, SystemContext},
    error::BioSimError,
    island::{Island, PopulationRecord},
    params::Parameters,
    rng::RngManager,
    snapshot::{SnapshotWriter, SpeciesCounts, YearSnapshot},
};

/// A seeded island simulation advanced one year at a time.
pub struct BioSim {
    island: Island,
    params: Parameters,
    engine: Engine,
    rng: RngManager,
    year: u64,
    scenario_name: String,
    latest: Option<YearSnapshot>,
    snapshot_writer: Option<SnapshotWriter>,
}

impl BioSim {
    /// Validates `island_map`, seeds the random source and places the
    /// initial population.
    pub fn new(
        island_map: &str,
        initial_population: &[PopulationRecord],
        seed: u64,
    ) -> Result<Self, BioSimError> {
        Self::with_manager(island_map, initial_population, RngManager::new(seed))
    }

    /// Like [`BioSim::new`] but draws from `rng` instead of a seeded stream.
    pub fn with_rng(
        island_map: &str,
        initial_population: &[PopulationRecord],
        rng: impl RngCore + 'static,
    ) -> Result<Self, BioSimError> {
        Self::with_manager(island_map, initial_population, RngManager::from_source(rng))
    }

    fn with_manager(
        island_map: &str,
        initial_population: &[PopulationRecord],
        rng: RngManager,
    ) -> Result<Self, BioSimError> {
        let mut island = Island::parse(island_map)?;
        island.add_fauna(initial_population)?;
        Ok(Self {
            island,
            params: Parameters::default(),
            engine: Engine::annual_cycle(),
            rng,
            year: 0,
            scenario_name: "biosim".to_string(),
            latest: None,
            snapshot_writer: None,
        })
    }

    pub fn with_scenario_name(mut self, name: impl Into<String>) -> Self {
        self.scenario_name = name.into();
        self
    }

    pub fn set_snapshot_writer(&mut self, writer: SnapshotWriter) {
        self.snapshot_writer = Some(writer);
    }

    pub fn set_animal_parameters(
        &mut self,
        species: &str,
        changes: &BTreeMap<String, f64>,
    ) -> Result<(), BioSimError> {
        self.params.set_species_parameters(species, changes)
    }

    pub fn set_landscape_parameters(
        &mut self,
        landscape: &str,
        changes: &BTreeMap<String, f64>,
    ) -> Result<(), BioSimError> {
        self.params.set_landscape_parameters(landscape, changes)
    }

    pub fn add_population(
        &mut self,
        records: &[PopulationRecord],
    ) -> Result<SpeciesCounts, BioSimError> {
        self.island.add_fauna(records)
    }

    /// Runs `years` annual cycles.
    pub fn simulate(&mut self, years: u64) -> Result<()> {
        self.simulate_with_hook(years, |_| {})
    }

    /// Runs `years` annual cycles, handing each year's snapshot to `hook`.
    pub fn simulate_with_hook<F>(&mut self, years: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&YearSnapshot),
    {
        for _ in 0..years {
            let ctx = SystemContext {
                year: self.year,
                params: &self.params,
            };
            let mut rng = self.rng.stream();
            self.engine.run_cycle(&ctx, &mut self.island, &mut rng)?;
            self.year += 1;

            let snapshot = self.snapshot();
            info!(
                scenario = %self.scenario_name,
                year = self.year,
                herbivores = snapshot.counts.herbivores,
                carnivores = snapshot.counts.carnivores,
                "year complete"
            );
            if let Some(writer) = &self.snapshot_writer {
                writer.maybe_write(&snapshot)?;
            }
            hook(&snapshot);
            self.latest = Some(snapshot);
        }
        Ok(())
    }

    /// Number of completed years.
    pub fn year(&self) -> u64 {
        self.year
    }

    pub fn num_animals(&self) -> usize {
        self.island.counts().total()
    }

    pub fn num_animals_per_species(&self) -> SpeciesCounts {
        self.island.counts()
    }

    pub fn num_animals_of(&self, species: Species) -> usize {
        self.island.counts().get(species)
    }

    /// Snapshot taken at the end of the most recent year, if any ran.
    pub fn latest_snapshot(&self) -> Option<&YearSnapshot> {
        self.latest.as_ref()
    }

    /// Snapshot of the island as it is now.
    pub fn snapshot(&self) -> YearSnapshot {
        let (herbivores, carnivores) = self.island.census(&self.params);
        YearSnapshot {
            scenario: self.scenario_name.clone(),
            year: self.year,
            counts: self.island.counts(),
            herbivores,
            carnivores,
            herbivore_density: self.island.herbivore_density(),
            carnivore_density: self.island.carnivore_density(),
        }
    }

    pub fn island(&self) -> &Island {
        &self.island
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }
}
