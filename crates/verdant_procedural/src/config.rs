//! # Populator Configuration
//!
//! Populators are tuned from TOML files loaded once at startup:
//!
//! ```toml
//! per_chunk = 256                              # bare number = fixed
//! rolls = { range = { min = 0, max = 2 } }     # optional draw count
//!
//! [[variants]]
//! item = "fern"
//! weight = 1.0
//!
//! [[variants]]
//! item = "tall_grass"
//! weight = 3.0
//! ```
//!
//! Amounts accept every `VariableAmount` form; see
//! [`verdant_weighted::amount`].

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use verdant_weighted::{VariableAmount, WeightedEntry, WeightedTable};

use crate::error::ConfigResult;
use crate::populator::{FeaturePopulator, DEFAULT_PER_CHUNK};

/// Tunable part of a [`FeaturePopulator`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PopulatorConfig<V> {
    /// Requested amount per chunk.
    #[serde(default = "default_per_chunk")]
    pub per_chunk: VariableAmount,
    /// Draws per table lookup (one if absent).
    #[serde(default)]
    pub rolls: Option<VariableAmount>,
    /// Weighted variants. Empty keeps the populator's current table.
    #[serde(default = "Vec::new")]
    pub variants: Vec<WeightedEntry<V>>,
}

fn default_per_chunk() -> VariableAmount {
    VariableAmount::fixed(DEFAULT_PER_CHUNK)
}

impl<V: DeserializeOwned + Clone> PopulatorConfig<V> {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed TOML, or a validation error for
    /// negative weights, non-finite amounts and chances outside `[0, 1]`.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        tracing::info!(
            variants = config.variants.len(),
            per_chunk = %config.per_chunk,
            "loaded populator config"
        );
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

impl<V: Clone> PopulatorConfig<V> {
    /// Checks every amount and weight.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.per_chunk.validate()?;
        if let Some(rolls) = &self.rolls {
            rolls.validate()?;
        }
        self.table()?;
        Ok(())
    }

    /// Builds the variant table, or `None` when no variants are listed.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite weights.
    pub fn table(&self) -> ConfigResult<Option<WeightedTable<V>>> {
        if self.variants.is_empty() {
            return Ok(None);
        }
        let mut table = WeightedTable::try_from_entries(
            self.variants.iter().map(|e| (e.item.clone(), e.weight)),
        )?;
        if let Some(rolls) = &self.rolls {
            table.set_rolls(rolls.clone());
        }
        Ok(Some(table))
    }

    /// Applies this config to a populator.
    ///
    /// The count is always replaced. The table is replaced when variants are
    /// listed; otherwise only its draw count is updated (if given). An
    /// override set on the populator stays in place.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid weights; the populator is left untouched.
    pub fn apply<E>(&self, populator: &mut FeaturePopulator<V, E>) -> ConfigResult<()> {
        let table = self.table()?;
        populator.set_count(self.per_chunk.clone());
        match table {
            Some(table) => populator.set_table(table),
            None => {
                if let Some(rolls) = &self.rolls {
                    populator.table_mut().set_rolls(rolls.clone());
                }
            }
        }
        Ok(())
    }
}
