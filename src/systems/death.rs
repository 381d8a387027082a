use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

pub struct DeathSystem;

impl DeathSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeathSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DeathSystem {
    fn name(&self) -> &str {
        "death"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let dead = island.die(ctx.params, rng);
        debug!(
            year = ctx.year,
            herbivores = dead.herbivores,
            carnivores = dead.carnivores,
            "deaths"
        );
        Ok(())
    }
}
