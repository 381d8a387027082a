use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    island::Island,
    params::Parameters,
    rng::SystemRng,
    systems::{
        AgingSystem, BirthSystem, DeathSystem, FeedingSystem, MigrationSystem, MovePermitSystem,
        ProduceFodderSystem, ResetFodderSystem,
    },
};

pub struct SystemContext<'a> {
    /// Year being simulated, starting at 0 for the first cycle.
    pub year: u64,
    pub params: &'a Parameters,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Default)]
pub struct EngineBuilder {
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
        }
    }
}

/// Runs its systems over an island in registration order.
pub struct Engine {
    systems: Vec<Box<dyn System>>,
}

impl Engine {
    /// The full yearly pipeline.
    pub fn annual_cycle() -> Self {
        EngineBuilder::new()
            .with_system(ProduceFodderSystem::new())
            .with_system(BirthSystem::new())
            .with_system(FeedingSystem::new())
            .with_system(MovePermitSystem::new())
            .with_system(MigrationSystem::new())
            .with_system(AgingSystem::new())
            .with_system(ResetFodderSystem::new())
            .with_system(DeathSystem::new())
            .build()
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    pub fn run_cycle(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<Vec<SystemRunReport>> {
        let mut reports = Vec::with_capacity(self.systems.len());
        for system in self.systems.iter_mut() {
            let start = Instant::now();
            system
                .run(ctx, island, rng)
                .with_context(|| format!("{} failed in year {}", system.name(), ctx.year))?;
            let duration_ms = start.elapsed().as_secs_f64() * 1_000.0;
            debug!(system = system.name(), year = ctx.year, duration_ms, "phase finished");
            reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms,
            });
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&mut self, _: &SystemContext, _: &mut Island, _: &mut SystemRng<'_>) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    struct Failing;

    impl System for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn run(&mut self, _: &SystemContext, _: &mut Island, _: &mut SystemRng<'_>) -> Result<()> {
            anyhow::bail!("boom")
        }
    }

    fn run(engine: &mut Engine) -> Result<Vec<SystemRunReport>> {
        let params = Parameters::default();
        let ctx = SystemContext {
            year: 3,
            params: &params,
        };
        let mut island = Island::parse("WWW\nWLW\nWWW").unwrap();
        let mut source = ChaCha8Rng::seed_from_u64(0);
        engine.run_cycle(&ctx, &mut island, &mut SystemRng::new(&mut source))
    }

    #[test]
    fn annual_cycle_has_fixed_phase_order() {
        let engine = Engine::annual_cycle();
        assert_eq!(
            engine.system_names(),
            vec![
                "produce_fodder",
                "birth",
                "feeding",
                "move_permits",
                "migration",
                "aging",
                "reset_fodder",
                "death",
            ]
        );
    }

    #[test]
    fn systems_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = EngineBuilder::new();
        for name in ["first", "second", "third"] {
            builder.push_system(Recorder {
                name,
                log: Arc::clone(&log),
            });
        }
        let reports = run(&mut builder.build()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn failure_names_the_system_and_stops_the_cycle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new()
            .with_system(Failing)
            .with_system(Recorder {
                name: "after",
                log: Arc::clone(&log),
            })
            .build();
        let err = run(&mut engine).unwrap_err();
        assert!(err.to_string().contains("failing failed in year 3"));
        assert!(log.lock().unwrap().is_empty());
    }
}
