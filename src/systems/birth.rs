use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

pub struct BirthSystem;

impl BirthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BirthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BirthSystem {
    fn name(&self) -> &str {
        "birth"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let born = island.give_birth(ctx.params, rng);
        debug!(
            year = ctx.year,
            herbivores = born.herbivores,
            carnivores = born.carnivores,
            "births"
        );
        Ok(())
    }
}
