//! Species and landscape parameter tables.
//!
//! Every [`crate::BioSim`] owns its own [`Parameters`], so changing a table in
//! one simulation never leaks into another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{animal::Species, cell::Terrain, error::BioSimError};

/// Behavior coefficients shared by every animal of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalParams {
    pub w_birth: f64,
    pub sigma_birth: f64,
    pub beta: f64,
    pub eta: f64,
    pub a_half: f64,
    pub phi_age: f64,
    pub w_half: f64,
    pub phi_weight: f64,
    pub mu: f64,
    pub gamma: f64,
    pub zeta: f64,
    pub xi: f64,
    pub omega: f64,
    /// Food an animal wants to eat per year.
    #[serde(rename = "F")]
    pub appetite: f64,
    /// Fitness gap above which a hunt always succeeds. Carnivores only.
    #[serde(
        rename = "DeltaPhiMax",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delta_phi_max: Option<f64>,
}

impl AnimalParams {
    pub fn herbivore() -> Self {
        Self {
            w_birth: 8.0,
            sigma_birth: 1.5,
            beta: 0.9,
            eta: 0.05,
            a_half: 40.0,
            phi_age: 0.6,
            w_half: 10.0,
            phi_weight: 0.1,
            mu: 0.25,
            gamma: 0.2,
            zeta: 3.5,
            xi: 1.2,
            omega: 0.4,
            appetite: 10.0,
            delta_phi_max: None,
        }
    }

    pub fn carnivore() -> Self {
        Self {
            w_birth: 6.0,
            sigma_birth: 1.0,
            beta: 0.75,
            eta: 0.125,
            a_half: 40.0,
            phi_age: 0.3,
            w_half: 4.0,
            phi_weight: 0.4,
            mu: 0.4,
            gamma: 0.8,
            zeta: 3.5,
            xi: 1.1,
            omega: 0.8,
            appetite: 50.0,
            delta_phi_max: Some(10.0),
        }
    }

    /// Smallest weight at which a birth may be granted.
    pub fn birth_weight_threshold(&self) -> f64 {
        self.zeta * (self.w_birth + self.sigma_birth)
    }

    /// Hunting is always successful when the fitness gap reaches this value.
    /// Tables without `DeltaPhiMax` never hunt.
    pub fn hunt_gap(&self) -> f64 {
        self.delta_phi_max.unwrap_or(f64::INFINITY)
    }

    /// Applies `changes` keyed by parameter name.
    ///
    /// The whole map is checked first; on error no value is written.
    pub fn update(
        &mut self,
        owner: Species,
        changes: &BTreeMap<String, f64>,
    ) -> Result<(), BioSimError> {
        for (key, &value) in changes {
            if self.slot_mut(key).is_none() {
                return Err(BioSimError::UnknownParameter {
                    owner: owner.to_string(),
                    key: key.clone(),
                });
            }
            check_non_negative(key, value)?;
        }
        for (key, &value) in changes {
            if let Some(slot) = self.slot_mut(key) {
                *slot = value;
                debug!(species = %owner, key = key.as_str(), value, "animal parameter updated");
            }
        }
        Ok(())
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "w_birth" => Some(&mut self.w_birth),
            "sigma_birth" => Some(&mut self.sigma_birth),
            "beta" => Some(&mut self.beta),
            "eta" => Some(&mut self.eta),
            "a_half" => Some(&mut self.a_half),
            "phi_age" => Some(&mut self.phi_age),
            "w_half" => Some(&mut self.w_half),
            "phi_weight" => Some(&mut self.phi_weight),
            "mu" => Some(&mut self.mu),
            "gamma" => Some(&mut self.gamma),
            "zeta" => Some(&mut self.zeta),
            "xi" => Some(&mut self.xi),
            "omega" => Some(&mut self.omega),
            "F" => Some(&mut self.appetite),
            "DeltaPhiMax" => self.delta_phi_max.as_mut(),
            _ => None,
        }
    }
}

/// Maximum fodder per landscape type. Water and desert never grow fodder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeParams {
    pub lowland_f_max: f64,
    pub highland_f_max: f64,
}

impl Default for LandscapeParams {
    fn default() -> Self {
        Self {
            lowland_f_max: 800.0,
            highland_f_max: 300.0,
        }
    }
}

impl LandscapeParams {
    pub fn f_max(&self, terrain: Terrain) -> f64 {
        match terrain {
            Terrain::Lowland => self.lowland_f_max,
            Terrain::Highland => self.highland_f_max,
            Terrain::Water | Terrain::Desert => 0.0,
        }
    }

    pub fn update(
        &mut self,
        terrain: Terrain,
        changes: &BTreeMap<String, f64>,
    ) -> Result<(), BioSimError> {
        if !terrain.grows_fodder() {
            return Err(BioSimError::UnknownLandscape {
                code: terrain.code().to_string(),
            });
        }
        for (key, &value) in changes {
            if key != "f_max" {
                return Err(BioSimError::UnknownParameter {
                    owner: format!("landscape {}", terrain.code()),
                    key: key.clone(),
                });
            }
            check_non_negative(key, value)?;
        }
        if let Some(&value) = changes.get("f_max") {
            match terrain {
                Terrain::Lowland => self.lowland_f_max = value,
                _ => self.highland_f_max = value,
            }
            debug!(landscape = %terrain.code(), value, "landscape parameter updated");
        }
        Ok(())
    }
}

/// All tables one simulation reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub herbivore: AnimalParams,
    pub carnivore: AnimalParams,
    pub landscape: LandscapeParams,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            herbivore: AnimalParams::herbivore(),
            carnivore: AnimalParams::carnivore(),
            landscape: LandscapeParams::default(),
        }
    }
}

impl Parameters {
    pub fn species_mut(&mut self, species: Species) -> &mut AnimalParams {
        match species {
            Species::Herbivore => &mut self.herbivore,
            Species::Carnivore => &mut self.carnivore,
        }
    }

    /// `name` must be `"Herbivore"` or `"Carnivore"`.
    pub fn set_species_parameters(
        &mut self,
        name: &str,
        changes: &BTreeMap<String, f64>,
    ) -> Result<(), BioSimError> {
        let species: Species = name.parse()?;
        self.species_mut(species).update(species, changes)
    }

    /// `code` must be `"L"` or `"H"`.
    pub fn set_landscape_parameters(
        &mut self,
        code: &str,
        changes: &BTreeMap<String, f64>,
    ) -> Result<(), BioSimError> {
        let terrain = match code {
            "L" => Terrain::Lowland,
            "H" => Terrain::Highland,
            _ => {
                return Err(BioSimError::UnknownLandscape {
                    code: code.to_string(),
                })
            }
        };
        self.landscape.update(terrain, changes)
    }
}

fn check_non_negative(key: &str, value: f64) -> Result<(), BioSimError> {
    // NaN fails this comparison as well.
    if value >= 0.0 {
        Ok(())
    } else {
        Err(BioSimError::NegativeParameter {
            key: key.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn changes(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn legal_herbivore_update_is_applied() {
        let mut params = Parameters::default();
        params
            .set_species_parameters("Herbivore", &changes(&[("F", 20.0), ("w_half", 10.0)]))
            .unwrap();
        assert_eq!(params.herbivore.appetite, 20.0);
        assert_eq!(params.herbivore.w_half, 10.0);
        assert_eq!(params.carnivore, AnimalParams::carnivore());
    }

    #[test]
    fn carnivore_accepts_delta_phi_max() {
        let mut params = Parameters::default();
        params
            .set_species_parameters("Carnivore", &changes(&[("DeltaPhiMax", 5.0)]))
            .unwrap();
        assert_eq!(params.carnivore.delta_phi_max, Some(5.0));
    }

    #[test]
    fn herbivore_rejects_delta_phi_max() {
        let mut params = Parameters::default();
        let err = params
            .set_species_parameters("Herbivore", &changes(&[("DeltaPhiMax", 5.0)]))
            .unwrap_err();
        assert!(matches!(err, BioSimError::UnknownParameter { .. }));
    }

    #[test]
    fn rejected_update_leaves_table_untouched() {
        let mut params = Parameters::default();
        let err = params
            .set_species_parameters("Herbivore", &changes(&[("beta", 0.0), ("eta", -1.0)]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(params.herbivore, AnimalParams::herbivore());
    }

    #[test]
    fn unknown_species_is_a_type_error() {
        let mut params = Parameters::default();
        let err = params
            .set_species_parameters("tiger", &changes(&[("beta", 0.0)]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn landscape_codes_are_restricted_to_lowland_and_highland() {
        let mut params = Parameters::default();
        params
            .set_landscape_parameters("H", &changes(&[("f_max", 200.0)]))
            .unwrap();
        assert_eq!(params.landscape.f_max(Terrain::Highland), 200.0);

        for code in ["W", "D", "X"] {
            let err = params
                .set_landscape_parameters(code, &changes(&[("f_max", 10.0)]))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "code {code}");
        }
        let err = params
            .set_landscape_parameters("L", &changes(&[("F_max", 100.0)]))
            .unwrap_err();
        assert!(matches!(err, BioSimError::UnknownParameter { .. }));
        let err = params
            .set_landscape_parameters("L", &changes(&[("f_max", -1.0)]))
            .unwrap_err();
        assert!(matches!(err, BioSimError::NegativeParameter { .. }));
        assert_eq!(params.landscape.f_max(Terrain::Lowland), 800.0);
    }

    #[test]
    fn yaml_keys_match_parameter_names() {
        let yaml = serde_yaml::to_string(&AnimalParams::carnivore()).unwrap();
        assert!(yaml.contains("F: 50.0"));
        assert!(yaml.contains("DeltaPhiMax: 10.0"));
        let herbivore = serde_yaml::to_string(&AnimalParams::herbivore()).unwrap();
        assert!(!herbivore.contains("DeltaPhiMax"));
    }
}
