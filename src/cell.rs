use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    animal::{Animal, Carnivore, Herbivore},
    params::{AnimalParams, LandscapeParams, Parameters},
};

/// `(row, col)`, zero-indexed.
pub type Position = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Water,
    Lowland,
    Highland,
    Desert,
}

impl Terrain {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'W' => Some(Terrain::Water),
            'L' => Some(Terrain::Lowland),
            'H' => Some(Terrain::Highland),
            'D' => Some(Terrain::Desert),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Terrain::Water => 'W',
            Terrain::Lowland => 'L',
            Terrain::Highland => 'H',
            Terrain::Desert => 'D',
        }
    }

    pub fn is_habitable(self) -> bool {
        self != Terrain::Water
    }

    pub fn grows_fodder(self) -> bool {
        matches!(self, Terrain::Lowland | Terrain::Highland)
    }
}

/// Animals that chose to leave a cell during migration, with their targets.
#[derive(Debug, Default)]
pub struct Emigrants {
    pub herbivores: Vec<(Position, Herbivore)>,
    pub carnivores: Vec<(Position, Carnivore)>,
}

#[derive(Debug, Clone)]
pub struct Cell {
    terrain: Terrain,
    fodder: f64,
    pub(crate) herbivores: Vec<Herbivore>,
    pub(crate) carnivores: Vec<Carnivore>,
}

impl Cell {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            fodder: 0.0,
            herbivores: Vec::new(),
            carnivores: Vec::new(),
        }
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn fodder(&self) -> f64 {
        self.fodder
    }

    pub fn herbivores(&self) -> &[Herbivore] {
        &self.herbivores
    }

    pub fn carnivores(&self) -> &[Carnivore] {
        &self.carnivores
    }

    pub fn add_herbivore(&mut self, herbivore: Herbivore) {
        self.herbivores.push(herbivore);
    }

    pub fn add_carnivore(&mut self, carnivore: Carnivore) {
        self.carnivores.push(carnivore);
    }

    pub fn produce_fodder(&mut self, landscape: &LandscapeParams) {
        if self.terrain.grows_fodder() {
            self.fodder += landscape.f_max(self.terrain);
        }
    }

    pub fn reset_fodder(&mut self) {
        self.fodder = 0.0;
    }

    pub fn herbivore_birth<R: Rng + ?Sized>(
        &mut self,
        params: &AnimalParams,
        rng: &mut R,
    ) -> &[Herbivore] {
        let born = give_birth(&mut self.herbivores, params, rng);
        &self.herbivores[self.herbivores.len() - born..]
    }

    pub fn carnivore_birth<R: Rng + ?Sized>(
        &mut self,
        params: &AnimalParams,
        rng: &mut R,
    ) -> &[Carnivore] {
        let born = give_birth(&mut self.carnivores, params, rng);
        &self.carnivores[self.carnivores.len() - born..]
    }

    /// Feeds herbivores in random order until the fodder runs short.
    ///
    /// Stops at the first herbivore that cannot get a full ration. Returns
    /// the number of herbivores fed.
    pub fn feed_herbivores<R: Rng + ?Sized>(
        &mut self,
        params: &AnimalParams,
        rng: &mut R,
    ) -> usize {
        self.herbivores.shuffle(rng);
        let mut fed = 0;
        for herbivore in &mut self.herbivores {
            if self.fodder < params.appetite {
                break;
            }
            herbivore.eat(params);
            self.fodder -= params.appetite;
            fed += 1;
        }
        fed
    }

    /// Heaviest carnivores hunt first; each one is offered the remaining
    /// herbivores lightest first. Returns the number of herbivores eaten.
    pub fn feed_carnivores<R: Rng + ?Sized>(
        &mut self,
        params: &Parameters,
        rng: &mut R,
    ) -> usize {
        if self.carnivores.is_empty() {
            return 0;
        }
        self.carnivores.sort_by(|a, b| b.weight().total_cmp(&a.weight()));

        let mut eaten_total = 0;
        for carnivore in &mut self.carnivores {
            self.herbivores.sort_by(|a, b| a.weight().total_cmp(&b.weight()));
            let eaten =
                carnivore.eat(&self.herbivores, &params.carnivore, &params.herbivore, rng);
            if eaten.is_empty() {
                continue;
            }
            eaten_total += eaten.len();
            // `eaten` is ascending, so this walk keeps the survivors in order.
            let mut next = eaten.iter().peekable();
            let mut index = 0;
            self.herbivores.retain(|_| {
                let keep = next.peek() != Some(&&index);
                if !keep {
                    next.next();
                }
                index += 1;
                keep
            });
        }
        eaten_total
    }

    pub fn grow_and_lose_weight_herbivores(&mut self, params: &AnimalParams) {
        age_and_lose_weight(&mut self.herbivores, params);
    }

    pub fn grow_and_lose_weight_carnivores(&mut self, params: &AnimalParams) {
        age_and_lose_weight(&mut self.carnivores, params);
    }

    pub fn herbivore_death<R: Rng + ?Sized>(
        &mut self,
        params: &AnimalParams,
        rng: &mut R,
    ) -> Vec<Herbivore> {
        remove_dead(&mut self.herbivores, params, rng)
    }

    pub fn carnivore_death<R: Rng + ?Sized>(
        &mut self,
        params: &AnimalParams,
        rng: &mut R,
    ) -> Vec<Carnivore> {
        remove_dead(&mut self.carnivores, params, rng)
    }

    pub fn grant_move_permits(&mut self) {
        for herbivore in &mut self.herbivores {
            herbivore.set_moved(false);
        }
        for carnivore in &mut self.carnivores {
            carnivore.set_moved(false);
        }
    }

    /// Asks every resident that has not moved this year whether it leaves.
    ///
    /// Herbivores decide before carnivores. Leavers are flagged as moved and
    /// handed back with their destination; everyone else stays in order.
    pub fn animal_migration<R: Rng + ?Sized>(
        &mut self,
        neighbors: &[Position],
        params: &Parameters,
        rng: &mut R,
    ) -> Emigrants {
        Emigrants {
            herbivores: emigrate(&mut self.herbivores, neighbors, &params.herbivore, rng),
            carnivores: emigrate(&mut self.carnivores, neighbors, &params.carnivore, rng),
        }
    }
}

/// Returns how many offspring were appended to `residents`.
fn give_birth<A: Animal, R: Rng + ?Sized>(
    residents: &mut Vec<A>,
    params: &AnimalParams,
    rng: &mut R,
) -> usize {
    let n = residents.len();
    let offspring: Vec<A> = residents
        .iter_mut()
        .filter_map(|parent| parent.procreate(n, params, rng))
        .collect();
    let born = offspring.len();
    residents.extend(offspring);
    born
}

fn age_and_lose_weight<A: Animal>(residents: &mut [A], params: &AnimalParams) {
    for animal in residents {
        animal.growth_per_year();
        animal.weight_loss_per_year(params);
    }
}

fn remove_dead<A: Animal, R: Rng + ?Sized>(
    residents: &mut Vec<A>,
    params: &AnimalParams,
    rng: &mut R,
) -> Vec<A> {
    let (dead, alive): (Vec<A>, Vec<A>) = std::mem::take(residents)
        .into_iter()
        .partition(|animal| animal.die(params, rng));
    *residents = alive;
    dead
}

fn emigrate<A: Animal, R: Rng + ?Sized>(
    residents: &mut Vec<A>,
    neighbors: &[Position],
    params: &AnimalParams,
    rng: &mut R,
) -> Vec<(Position, A)> {
    let mut leaving = Vec::new();
    let mut staying = Vec::with_capacity(residents.len());
    for mut animal in std::mem::take(residents) {
        if animal.moved() {
            staying.push(animal);
            continue;
        }
        match animal.migrate(neighbors, params, rng).copied() {
            Some(destination) => {
                animal.set_moved(true);
                leaving.push((destination, animal));
            }
            None => staying.push(animal),
        }
    }
    *residents = staying;
    leaving
}
