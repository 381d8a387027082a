use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

/// Adds `f_max` fodder to every lowland and highland cell.
pub struct ProduceFodderSystem;

impl ProduceFodderSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProduceFodderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ProduceFodderSystem {
    fn name(&self) -> &str {
        "produce_fodder"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        island.produce_fodder(&ctx.params.landscape);
        Ok(())
    }
}

/// Uneaten fodder does not carry over to the next year.
pub struct ResetFodderSystem;

impl ResetFodderSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResetFodderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ResetFodderSystem {
    fn name(&self) -> &str {
        "reset_fodder"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        island.reset_fodder();
        Ok(())
    }
}
