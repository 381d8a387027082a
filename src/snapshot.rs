use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    animal::{Animal, Species},
    params::AnimalParams,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCounts {
    pub herbivores: usize,
    pub carnivores: usize,
}

impl SpeciesCounts {
    pub fn total(&self) -> usize {
        self.herbivores + self.carnivores
    }

    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    pub(crate) fn add(&mut self, species: Species, n: usize) {
        match species {
            Species::Herbivore => self.herbivores += n,
            Species::Carnivore => self.carnivores += n,
        }
    }
}

/// Per-animal attributes of one species, in row-major cell order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCensus {
    pub ages: Vec<u32>,
    pub weights: Vec<f64>,
    pub fitness: Vec<f64>,
}

impl SpeciesCensus {
    pub(crate) fn record<A: Animal>(&mut self, animal: &A, params: &AnimalParams) {
        self.ages.push(animal.age());
        self.weights.push(animal.weight());
        self.fitness.push(animal.fitness(params));
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }
}

/// Read-only view of the island at the end of a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSnapshot {
    pub scenario: String,
    pub year: u64,
    pub counts: SpeciesCounts,
    pub herbivores: SpeciesCensus,
    pub carnivores: SpeciesCensus,
    /// Herbivores per cell, indexed `[row][col]`.
    pub herbivore_density: Vec<Vec<usize>>,
    /// Carnivores per cell, indexed `[row][col]`.
    pub carnivore_density: Vec<Vec<usize>>,
}

/// Writes a snapshot as JSON every `interval_years` years.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_years: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_years: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_years,
        }
    }

    pub fn maybe_write(&self, snapshot: &YearSnapshot) -> Result<Option<PathBuf>> {
        if self.interval_years == 0 || snapshot.year % self.interval_years != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(&snapshot.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("year_{:05}.json", snapshot.year));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(year: u64) -> YearSnapshot {
        YearSnapshot {
            scenario: "unit".into(),
            year,
            counts: SpeciesCounts {
                herbivores: 2,
                carnivores: 0,
            },
            herbivores: SpeciesCensus {
                ages: vec![3, 4],
                weights: vec![10.0, 12.5],
                fitness: vec![0.5, 0.6],
            },
            carnivores: SpeciesCensus::default(),
            herbivore_density: vec![vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 0]],
            carnivore_density: vec![vec![0; 3]; 3],
        }
    }

    #[test]
    fn writer_respects_interval() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 5);
        assert!(writer.maybe_write(&snapshot(3)).unwrap().is_none());

        let path = writer.maybe_write(&snapshot(10)).unwrap().unwrap();
        assert_eq!(path, temp.path().join("unit").join("year_00010.json"));
        let data = fs::read_to_string(path).unwrap();
        let parsed: YearSnapshot = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed, snapshot(10));
    }

    #[test]
    fn zero_interval_disables_writing() {
        let temp = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 0);
        assert!(writer.maybe_write(&snapshot(10)).unwrap().is_none());
    }

    #[test]
    fn counts_by_species() {
        let mut counts = SpeciesCounts::default();
        counts.add(Species::Carnivore, 3);
        counts.add(Species::Herbivore, 4);
        assert_eq!(counts.get(Species::Carnivore), 3);
        assert_eq!(counts.total(), 7);
    }
}
