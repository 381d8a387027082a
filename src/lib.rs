pub mod animal;
pub mod cell;
pub mod engine;
pub mod error;
pub mod island;
pub mod params;
pub mod rng;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod systems;

pub use animal::{Animal, Carnivore, Herbivore, Species};
pub use error::{BioSimError, ErrorKind};
pub use island::{FaunaSpec, Island, PopulationRecord};
pub use params::{AnimalParams, LandscapeParams, Parameters};
pub use scenario::{Scenario, ScenarioLoader};
pub use simulation::BioSim;
pub use snapshot::{SnapshotWriter, SpeciesCounts, YearSnapshot};
