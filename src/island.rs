//! The island grid and its island-wide phase sweeps.

use anyhow::Result;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    animal::{Animal, Carnivore, Herbivore, Species},
    cell::{Cell, Position, Terrain},
    engine::{Engine, SystemContext, SystemRunReport},
    error::BioSimError,
    params::{LandscapeParams, Parameters},
    rng::SystemRng,
    snapshot::{SpeciesCensus, SpeciesCounts},
};

/// One animal (or `count` identical animals) in a population record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaunaSpec {
    pub species: Species,
    pub age: u32,
    pub weight: f64,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

impl FaunaSpec {
    pub fn new(species: Species, age: u32, weight: f64) -> Self {
        Self {
            species,
            age,
            weight,
            count: 1,
        }
    }

    pub fn times(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Animals to place at a 1-indexed `(row, col)` location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub loc: (usize, usize),
    pub pop: Vec<FaunaSpec>,
}

impl PopulationRecord {
    pub fn new(loc: (usize, usize), pop: Vec<FaunaSpec>) -> Self {
        Self { loc, pop }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedingTally {
    pub herbivores_fed: usize,
    pub herbivores_eaten: usize,
}

#[derive(Debug, Clone)]
pub struct Island {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Island {
    /// Builds an island from a multi-line map of `W`, `L`, `H` and `D`.
    ///
    /// Surrounding whitespace of the map and of each line is ignored. The map
    /// must be rectangular and bordered by water.
    pub fn parse(map: &str) -> Result<Self, BioSimError> {
        let lines: Vec<Vec<char>> = map
            .trim()
            .lines()
            .map(|line| line.trim().chars().collect())
            .collect();
        let cols = lines.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(BioSimError::EmptyMap);
        }
        for (row, line) in lines.iter().enumerate() {
            if line.len() != cols {
                return Err(BioSimError::NonRectangularMap {
                    row: row + 1,
                    expected: cols,
                    found: line.len(),
                });
            }
        }

        let rows = lines.len();
        for (row, line) in lines.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                let on_border = row == 0 || row == rows - 1 || col == 0 || col == cols - 1;
                if on_border && code != Terrain::Water.code() {
                    return Err(BioSimError::NonWaterBorder {
                        row: row + 1,
                        col: col + 1,
                        code,
                    });
                }
            }
        }

        let cells = lines
            .iter()
            .flatten()
            .map(|&code| {
                Terrain::from_code(code)
                    .map(Cell::new)
                    .ok_or(BioSimError::UnknownTerrain { code })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, (row, col): Position) -> &Cell {
        &self.cells[row * self.cols + col]
    }

    pub fn cell_mut(&mut self, (row, col): Position) -> &mut Cell {
        &mut self.cells[row * self.cols + col]
    }

    pub fn terrain(&self, position: Position) -> Terrain {
        self.cell(position).terrain()
    }

    fn position(&self, index: usize) -> Position {
        (index / self.cols, index % self.cols)
    }

    /// Non-water cells in row-major order.
    pub fn habitable_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.terrain().is_habitable())
    }

    fn habitable_cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells
            .iter_mut()
            .filter(|cell| cell.terrain().is_habitable())
    }

    /// Non-water cells directly above, below, left and right of `position`.
    pub fn neighbors(&self, (row, col): Position) -> Vec<Position> {
        let mut candidates = Vec::with_capacity(4);
        if row > 0 {
            candidates.push((row - 1, col));
        }
        if row + 1 < self.rows {
            candidates.push((row + 1, col));
        }
        if col > 0 {
            candidates.push((row, col - 1));
        }
        if col + 1 < self.cols {
            candidates.push((row, col + 1));
        }
        candidates.retain(|&position| self.terrain(position).is_habitable());
        candidates
    }

    /// Places the animals of every record. Locations are 1-indexed.
    ///
    /// All records are checked before anything is placed.
    pub fn add_fauna(
        &mut self,
        records: &[PopulationRecord],
    ) -> Result<SpeciesCounts, BioSimError> {
        for record in records {
            self.checked_position(record.loc)?;
            for spec in &record.pop {
                if !(spec.weight >= 0.0 && spec.weight.is_finite()) {
                    return Err(BioSimError::InvalidFauna {
                        row: record.loc.0,
                        col: record.loc.1,
                        reason: format!("weight must be non-negative, got {}", spec.weight),
                    });
                }
            }
        }

        let mut added = SpeciesCounts::default();
        for record in records {
            let position = (record.loc.0 - 1, record.loc.1 - 1);
            let cell = self.cell_mut(position);
            for spec in &record.pop {
                for _ in 0..spec.count {
                    match spec.species {
                        Species::Herbivore => {
                            cell.add_herbivore(Herbivore::new(spec.age, spec.weight))
                        }
                        Species::Carnivore => {
                            cell.add_carnivore(Carnivore::new(spec.age, spec.weight))
                        }
                    }
                }
                added.add(spec.species, spec.count as usize);
            }
        }
        Ok(added)
    }

    fn checked_position(&self, (row, col): (usize, usize)) -> Result<Position, BioSimError> {
        let invalid = BioSimError::InvalidLocation { row, col };
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return Err(invalid);
        }
        let position = (row - 1, col - 1);
        if !self.terrain(position).is_habitable() {
            return Err(invalid);
        }
        Ok(position)
    }

    pub fn produce_fodder(&mut self, landscape: &LandscapeParams) {
        for cell in self
            .cells
            .iter_mut()
            .filter(|cell| cell.terrain().grows_fodder())
        {
            cell.produce_fodder(landscape);
        }
    }

    /// Herbivores then carnivores give birth in every cell.
    pub fn give_birth<R: Rng + ?Sized>(
        &mut self,
        params: &Parameters,
        rng: &mut R,
    ) -> SpeciesCounts {
        let mut born = SpeciesCounts::default();
        for cell in self.habitable_cells_mut() {
            let herbivores = cell.herbivore_birth(&params.herbivore, rng).len();
            let carnivores = cell.carnivore_birth(&params.carnivore, rng).len();
            born.add(Species::Herbivore, herbivores);
            born.add(Species::Carnivore, carnivores);
        }
        born
    }

    /// Herbivores graze, then carnivores hunt, cell by cell.
    pub fn feed<R: Rng + ?Sized>(&mut self, params: &Parameters, rng: &mut R) -> FeedingTally {
        let mut tally = FeedingTally::default();
        for cell in self.habitable_cells_mut() {
            tally.herbivores_fed += cell.feed_herbivores(&params.herbivore, rng);
            tally.herbivores_eaten += cell.feed_carnivores(params, rng);
        }
        tally
    }

    pub fn grant_move_permits(&mut self) {
        for cell in self.habitable_cells_mut() {
            cell.grant_move_permits();
        }
    }

    /// Sweeps the grid row by row; emigrants land in their destination at
    /// once and are not asked again this year.
    pub fn migrate<R: Rng + ?Sized>(&mut self, params: &Parameters, rng: &mut R) -> SpeciesCounts {
        let mut moved = SpeciesCounts::default();
        for index in 0..self.cells.len() {
            if !self.cells[index].terrain().is_habitable() {
                continue;
            }
            let neighbors = self.neighbors(self.position(index));
            let emigrants = self.cells[index].animal_migration(&neighbors, params, rng);
            moved.add(Species::Herbivore, emigrants.herbivores.len());
            moved.add(Species::Carnivore, emigrants.carnivores.len());
            for (destination, herbivore) in emigrants.herbivores {
                self.cell_mut(destination).add_herbivore(herbivore);
            }
            for (destination, carnivore) in emigrants.carnivores {
                self.cell_mut(destination).add_carnivore(carnivore);
            }
        }
        moved
    }

    pub fn grow_and_lose_weight(&mut self, params: &Parameters) {
        for cell in self.habitable_cells_mut() {
            cell.grow_and_lose_weight_herbivores(&params.herbivore);
            cell.grow_and_lose_weight_carnivores(&params.carnivore);
        }
    }

    pub fn reset_fodder(&mut self) {
        for cell in self.habitable_cells_mut() {
            cell.reset_fodder();
        }
    }

    pub fn die<R: Rng + ?Sized>(&mut self, params: &Parameters, rng: &mut R) -> SpeciesCounts {
        let mut dead = SpeciesCounts::default();
        for cell in self.habitable_cells_mut() {
            let herbivores = cell.herbivore_death(&params.herbivore, rng).len();
            let carnivores = cell.carnivore_death(&params.carnivore, rng).len();
            dead.add(Species::Herbivore, herbivores);
            dead.add(Species::Carnivore, carnivores);
        }
        dead
    }

    /// Runs the eight phases of one year in their fixed order.
    ///
    /// Builds a fresh [`Engine::annual_cycle`] for a bare island. A
    /// [`BioSim`](crate::simulation::BioSim) keeps its own engine and calls
    /// [`Engine::run_cycle`] directly.
    pub fn annual_cycle(
        &mut self,
        ctx: &SystemContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<SystemRunReport>> {
        let mut engine = Engine::annual_cycle();
        engine.run_cycle(ctx, self, &mut SystemRng::new(rng))
    }

    pub fn counts(&self) -> SpeciesCounts {
        self.habitable_cells()
            .fold(SpeciesCounts::default(), |mut counts, cell| {
                counts.add(Species::Herbivore, cell.herbivores().len());
                counts.add(Species::Carnivore, cell.carnivores().len());
                counts
            })
    }

    pub fn herbivore_density(&self) -> Vec<Vec<usize>> {
        self.density(|cell| cell.herbivores().len())
    }

    pub fn carnivore_density(&self) -> Vec<Vec<usize>> {
        self.density(|cell| cell.carnivores().len())
    }

    fn density(&self, count: impl Fn(&Cell) -> usize) -> Vec<Vec<usize>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(&count).collect())
            .collect()
    }

    /// Age, weight and fitness of every herbivore and every carnivore.
    pub fn census(&self, params: &Parameters) -> (SpeciesCensus, SpeciesCensus) {
        let mut herbivores = SpeciesCensus::default();
        let mut carnivores = SpeciesCensus::default();
        for cell in self.habitable_cells() {
            for herbivore in cell.herbivores() {
                herbivores.record(herbivore, &params.herbivore);
            }
            for carnivore in cell.carnivores() {
                carnivores.record(carnivore, &params.carnivore);
            }
        }
        (herbivores, carnivores)
    }
}
