use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

/// Herbivores graze first, then carnivores hunt the survivors.
pub struct FeedingSystem;

impl FeedingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeedingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FeedingSystem {
    fn name(&self) -> &str {
        "feeding"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let tally = island.feed(ctx.params, rng);
        debug!(
            year = ctx.year,
            fed = tally.herbivores_fed,
            eaten = tally.herbivores_eaten,
            "feeding"
        );
        Ok(())
    }
}
