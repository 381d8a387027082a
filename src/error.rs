use thiserror::Error;

/// Coarse classification of a [`BioSimError`].
///
/// `Type` covers a name that does not denote a known species or landscape,
/// `Value` covers everything else (bad map, bad key, bad number, bad location).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Type,
    Value,
}

/// Validation errors raised while building or configuring a simulation.
///
/// Rows and columns are 1-indexed, matching population locations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BioSimError {
    #[error("island map is empty")]
    EmptyMap,

    #[error("island map must be rectangular: row {row} has length {found}, expected {expected}")]
    NonRectangularMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("island border must be water, found '{code}' at ({row}, {col})")]
    NonWaterBorder { row: usize, col: usize, code: char },

    #[error("'{code}' is not a landscape type, expected one of W, L, H, D")]
    UnknownTerrain { code: char },

    #[error("'{key}' is not a parameter for {owner}")]
    UnknownParameter { owner: String, key: String },

    #[error("parameter '{key}' must be non-negative, got {value}")]
    NegativeParameter { key: String, value: f64 },

    #[error("'{name}' is not a species, expected Herbivore or Carnivore")]
    UnknownSpecies { name: String },

    #[error("'{code}' is not a configurable landscape, expected L or H")]
    UnknownLandscape { code: String },

    #[error("location ({row}, {col}) is not a habitable cell on the island")]
    InvalidLocation { row: usize, col: usize },

    #[error("invalid animal at ({row}, {col}): {reason}")]
    InvalidFauna {
        row: usize,
        col: usize,
        reason: String,
    },
}

impl BioSimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BioSimError::UnknownSpecies { .. } | BioSimError::UnknownLandscape { .. } => {
                ErrorKind::Type
            }
            _ => ErrorKind::Value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_type_errors() {
        let species = BioSimError::UnknownSpecies {
            name: "tiger".into(),
        };
        let landscape = BioSimError::UnknownLandscape { code: "W".into() };
        assert_eq!(species.kind(), ErrorKind::Type);
        assert_eq!(landscape.kind(), ErrorKind::Type);
    }

    #[test]
    fn bad_values_are_value_errors() {
        let err = BioSimError::NegativeParameter {
            key: "beta".into(),
            value: -1.0,
        };
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(
            err.to_string(),
            "parameter 'beta' must be non-negative, got -1"
        );
    }
}
