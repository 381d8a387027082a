use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

/// Clears last year's `moved` flags.
pub struct MovePermitSystem;

impl MovePermitSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovePermitSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovePermitSystem {
    fn name(&self) -> &str {
        "move_permits"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        island.grant_move_permits();
        Ok(())
    }
}

pub struct MigrationSystem;

impl MigrationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MigrationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MigrationSystem {
    fn name(&self) -> &str {
        "migration"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let moved = island.migrate(ctx.params, rng);
        debug!(
            year = ctx.year,
            herbivores = moved.herbivores,
            carnivores = moved.carnivores,
            "migration"
        );
        Ok(())
    }
}
