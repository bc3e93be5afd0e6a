//! run settings for polypaint, persisted as JSON
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PaintError;
use crate::mutation_config::MutateConfig;

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// seed for the Pcg32 stream every stochastic operator draws from
    pub seed: u64,

    // population shape
    pub population_size: usize,
    /// polygons per painting (memory grows with population_size * genes * canvas size)
    pub genes: usize,
    /// vertices per polygon (>= 3)
    pub sides: usize,

    // genetic operators
    pub recreation_chance: f64,
    pub mutation_chance: f64,
    pub mutation_ratio: f32,
    pub crossover_ratio: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let ops = MutateConfig::default();
        Self {
            seed: 0xDEADBEEF,

            population_size: 50,
            genes: 100,
            sides: 3,

            recreation_chance: ops.recreation_chance,
            mutation_chance: ops.mutation_chance,
            mutation_ratio: ops.ratio,
            crossover_ratio: ops.crossover_ratio,
        }
    }
}

impl Settings {
    /// save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PaintError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// load settings from a JSON file, or return defaults if the file doesn't exist or doesn't parse
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("failed to parse {}: {}. using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                // file doesn't exist or can't be read - use defaults
                log::debug!("no settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), PaintError> {
        if self.population_size == 0 {
            return Err(PaintError::InvalidSettings("population_size must be at least 1".into()));
        }
        if self.sides < 3 {
            return Err(PaintError::InvalidSettings(format!("sides must be >= 3, got {}", self.sides)));
        }
        for (name, p) in [
            ("recreation_chance", self.recreation_chance),
            ("mutation_chance", self.mutation_chance),
            ("crossover_ratio", self.crossover_ratio),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(PaintError::InvalidSettings(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if !self.mutation_ratio.is_finite() || self.mutation_ratio < 0.0 {
            return Err(PaintError::InvalidSettings(format!(
                "mutation_ratio must be a finite value >= 0, got {}",
                self.mutation_ratio
            )));
        }
        Ok(())
    }

    /// operator parameters for crossover / mutation
    pub fn to_mutate_config(&self) -> MutateConfig {
        MutateConfig {
            recreation_chance: self.recreation_chance,
            mutation_chance: self.mutation_chance,
            ratio: self.mutation_ratio,
            crossover_ratio: self.crossover_ratio,
        }
    }
}
