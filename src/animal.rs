//! Individual herbivores and carnivores.
//!
//! Both species share the [`Animal`] behavior set. Random draws happen at
//! fixed call sites so that a seeded run replays exactly:
//!
//! * [`Animal::procreate`] draws one coin on every call and one lognormal
//!   sample only when a birth is granted.
//! * [`Animal::die`] draws one coin unless the animal is already starved.
//! * [`Animal::migrate`] draws up to two coins plus one slot pick.
//! * [`Carnivore::hunt`] draws one coin per offered prey.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};

use crate::{error::BioSimError, params::AnimalParams, rng::RngExt};

/// Number of neighbor slots a migrating animal chooses from.
const MIGRATION_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Herbivore,
    Carnivore,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Herbivore => f.write_str("Herbivore"),
            Species::Carnivore => f.write_str("Carnivore"),
        }
    }
}

impl FromStr for Species {
    type Err = BioSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Herbivore" => Ok(Species::Herbivore),
            "Carnivore" => Ok(Species::Carnivore),
            other => Err(BioSimError::UnknownSpecies {
                name: other.to_string(),
            }),
        }
    }
}

/// State every animal carries regardless of species.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    pub age: u32,
    pub weight: f64,
    pub moved: bool,
}

impl Vitals {
    pub fn new(age: u32, weight: f64) -> Self {
        Self {
            age,
            weight,
            moved: false,
        }
    }
}

/// Logistic term used by [`fitness`]. `sign` is `+1.0` for age and `-1.0`
/// for weight.
fn logistic(sign: f64, x: f64, x_half: f64, phi: f64) -> f64 {
    1.0 / (1.0 + (sign * phi * (x - x_half)).exp())
}

/// Fitness in `[0, 1]` for the given age and weight.
pub fn fitness(age: u32, weight: f64, params: &AnimalParams) -> f64 {
    if weight <= 0.0 {
        return 0.0;
    }
    logistic(1.0, f64::from(age), params.a_half, params.phi_age)
        * logistic(-1.0, weight, params.w_half, params.phi_weight)
}

/// Lognormal birth-weight distribution whose mean and spread are
/// `w_birth` and `sigma_birth`.
fn birth_weight_distribution(params: &AnimalParams) -> Option<LogNormal<f64>> {
    let mean_sq = params.w_birth * params.w_birth;
    let var = params.sigma_birth * params.sigma_birth;
    let mu = (mean_sq / (mean_sq + var).sqrt()).ln();
    let sigma = (1.0 + var / mean_sq).ln().sqrt();
    LogNormal::new(mu, sigma).ok()
}

pub trait Animal: Sized {
    const SPECIES: Species;

    fn from_vitals(vitals: Vitals) -> Self;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;

    fn new(age: u32, weight: f64) -> Self {
        Self::from_vitals(Vitals::new(age, weight))
    }

    fn age(&self) -> u32 {
        self.vitals().age
    }

    fn weight(&self) -> f64 {
        self.vitals().weight
    }

    fn moved(&self) -> bool {
        self.vitals().moved
    }

    fn set_moved(&mut self, moved: bool) {
        self.vitals_mut().moved = moved;
    }

    fn fitness(&self, params: &AnimalParams) -> f64 {
        fitness(self.age(), self.weight(), params)
    }

    /// Attempts a birth given `n` same-species residents at the start of the
    /// breeding phase.
    fn procreate<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        params: &AnimalParams,
        rng: &mut R,
    ) -> Option<Self> {
        let probability = (params.gamma * self.fitness(params) * n as f64).min(1.0);
        let heavy_enough = self.weight() >= params.birth_weight_threshold();
        let mature = self.age() > 1;
        let lucky = rng.coin_flip(probability);
        if !(heavy_enough && mature && lucky) {
            return None;
        }

        let baby_weight = birth_weight_distribution(params)?.sample(rng);
        let loss = params.xi * baby_weight;
        if self.weight() - loss < 0.0 {
            return None;
        }
        self.vitals_mut().weight -= loss;
        Some(Self::new(0, baby_weight))
    }

    fn growth_per_year(&mut self) {
        self.vitals_mut().age += 1;
    }

    fn weight_loss_per_year(&mut self, params: &AnimalParams) {
        let vitals = self.vitals_mut();
        vitals.weight -= vitals.weight * params.eta;
        if vitals.weight < 0.0 {
            vitals.weight = 0.0;
        }
    }

    fn die<R: Rng + ?Sized>(&self, params: &AnimalParams, rng: &mut R) -> bool {
        if self.weight() == 0.0 {
            return true;
        }
        let probability = params.omega * (1.0 - self.fitness(params));
        rng.coin_flip(probability)
    }

    /// Picks a destination among up to four `neighbors`, or `None` to stay.
    ///
    /// The willingness coin is flipped twice. Missing neighbor slots count as
    /// "stay", so animals on crowded coasts move less often.
    fn migrate<'n, T, R: Rng + ?Sized>(
        &self,
        neighbors: &'n [T],
        params: &AnimalParams,
        rng: &mut R,
    ) -> Option<&'n T> {
        let probability = self.fitness(params) * params.mu;
        if !rng.coin_flip(probability) || !rng.coin_flip(probability) {
            return None;
        }
        if neighbors.is_empty() {
            return None;
        }
        let slots = neighbors.len().max(MIGRATION_SLOTS);
        neighbors.get(rng.gen_range(0..slots))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Herbivore {
    vitals: Vitals,
}

impl Animal for Herbivore {
    const SPECIES: Species = Species::Herbivore;

    fn from_vitals(vitals: Vitals) -> Self {
        Self { vitals }
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }
}

impl Herbivore {
    /// Eats one full ration. The caller checks that enough fodder is left.
    pub fn eat(&mut self, params: &AnimalParams) {
        self.vitals.weight += params.beta * params.appetite;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Carnivore {
    vitals: Vitals,
}

impl Animal for Carnivore {
    const SPECIES: Species = Species::Carnivore;

    fn from_vitals(vitals: Vitals) -> Self {
        Self { vitals }
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }
}

impl Carnivore {
    /// Kill probability against a prey of fitness `prey_fitness`.
    fn kill_probability(own_fitness: f64, prey_fitness: f64, gap: f64) -> f64 {
        let diff = own_fitness - prey_fitness;
        if own_fitness <= prey_fitness {
            0.0
        } else if diff < gap {
            diff / gap
        } else {
            1.0
        }
    }

    /// Returns indices into `prey` of the herbivores this carnivore catches.
    ///
    /// `prey` is expected in ascending weight order; the result keeps that
    /// order.
    pub fn hunt<R: Rng + ?Sized>(
        &self,
        prey: &[Herbivore],
        params: &AnimalParams,
        prey_params: &AnimalParams,
        rng: &mut R,
    ) -> Vec<usize> {
        let own_fitness = self.fitness(params);
        let gap = params.hunt_gap();
        prey.iter()
            .enumerate()
            .filter_map(|(index, herbivore)| {
                let probability =
                    Self::kill_probability(own_fitness, herbivore.fitness(prey_params), gap);
                rng.coin_flip(probability).then_some(index)
            })
            .collect()
    }

    /// Hunts, then eats caught prey in order until the appetite `F` is met.
    ///
    /// The prey that reaches `F` is eaten whole. Returns indices into `prey`
    /// of the herbivores actually eaten.
    pub fn eat<R: Rng + ?Sized>(
        &mut self,
        prey: &[Herbivore],
        params: &AnimalParams,
        prey_params: &AnimalParams,
        rng: &mut R,
    ) -> Vec<usize> {
        let mut caught = self.hunt(prey, params, prey_params, rng);
        let mut eaten_weight = 0.0;
        let mut stop = caught.len();
        for (position, &index) in caught.iter().enumerate() {
            eaten_weight += prey[index].weight();
            if eaten_weight >= params.appetite {
                stop = position + 1;
                break;
            }
        }
        caught.truncate(stop);
        self.vitals.weight += params.beta * eaten_weight;
        caught
    }
}
