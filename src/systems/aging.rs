use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

/// Every animal gets a year older and loses `eta` of its weight.
pub struct AgingSystem;

impl AgingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        island.grow_and_lose_weight(ctx.params);
        Ok(())
    }
}
