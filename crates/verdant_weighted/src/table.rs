//! # Weighted Tables
//!
//! Multi-outcome sampling with per-entry weights.
//!
//! ## Selection
//!
//! Each draw takes one uniform value `u` in `[0, 1)`, scales it to
//! `draw = u * total_weight` and walks the entries keeping a running sum.
//! The first entry whose cumulative weight is strictly greater than `draw`
//! wins. Because the comparison is strict, an entry of weight zero can never
//! win: its cumulative weight equals its predecessor's.
//!
//! The number of draws per [`WeightedTable::get`] call is itself a
//! [`VariableAmount`] (one by default). Draws are independent, so the same
//! entry can come back more than once.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::amount::VariableAmount;
use crate::error::{check_weight, WeightError, WeightResult};

/// A single weighted item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry<T> {
    /// The item returned when this entry is drawn.
    pub item: T,
    /// Relative weight (higher = more common). Never negative.
    pub weight: f64,
}

/// An ordered table of weighted entries.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedTable<T> {
    /// Entries in insertion order.
    entries: Vec<WeightedEntry<T>>,
    /// Sum of all weights (kept in sync by every mutator).
    total_weight: f64,
    /// How many draws each `get` performs.
    rolls: VariableAmount,
}

impl<T> WeightedTable<T> {
    /// Creates an empty table drawing one entry per call.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_rolls(VariableAmount::fixed(1.0))
    }

    /// Creates an empty table with a custom draw count.
    #[must_use]
    pub const fn with_rolls(rolls: VariableAmount) -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0.0,
            rolls,
        }
    }

    /// Creates a table holding `item` with weight one.
    #[must_use]
    pub fn single(item: T) -> Self {
        Self {
            entries: vec![WeightedEntry { item, weight: 1.0 }],
            total_weight: 1.0,
            rolls: VariableAmount::fixed(1.0),
        }
    }

    /// Builds a table from `(item, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on the first negative or non-finite weight, or when the total
    /// would overflow.
    pub fn try_from_entries<I>(entries: I) -> WeightResult<Self>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut table = Self::new();
        for (item, weight) in entries {
            table.add(item, weight)?;
        }
        Ok(table)
    }

    /// Returns the draw-count policy.
    #[inline]
    #[must_use]
    pub const fn rolls(&self) -> &VariableAmount {
        &self.rolls
    }

    /// Replaces the draw-count policy.
    pub fn set_rolls(&mut self, rolls: VariableAmount) {
        self.rolls = rolls;
    }

    /// Appends an entry.
    ///
    /// A weight of zero is accepted; such an entry is never drawn.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite weights, and for a weight
    /// that would make the table total infinite. The table is unchanged on
    /// error.
    pub fn add(&mut self, item: T, weight: f64) -> WeightResult<()> {
        let weight = check_weight(weight)?;
        let total = self.total_weight + weight;
        if !total.is_finite() {
            return Err(WeightError::TotalWeightOverflow(weight));
        }
        self.entries.push(WeightedEntry { item, weight });
        self.total_weight = total;
        Ok(())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_weight = 0.0;
    }

    /// Number of entries, including zero-weight ones.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry weights.
    #[inline]
    #[must_use]
    pub const fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &WeightedEntry<T>> {
        self.entries.iter()
    }

    /// Recomputes the total from scratch, avoiding drift after removals.
    fn calculate_total_weight(&mut self) {
        self.total_weight = self.entries.iter().map(|e| e.weight).sum();
    }

    /// Finds the entry covering `draw` on the cumulative weight line.
    fn select(&self, draw: f64) -> Option<&WeightedEntry<T>> {
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.weight;
            if draw < cumulative {
                return Some(entry);
            }
        }

        // Only reachable through float rounding at the very top of the line.
        self.entries.iter().rev().find(|e| e.weight > 0.0)
    }
}

impl<T: PartialEq> WeightedTable<T> {
    /// Removes every entry holding `item`. Returns true if any was removed.
    pub fn remove(&mut self, item: &T) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.item != item);
        let removed = self.entries.len() != before;
        if removed {
            self.calculate_total_weight();
        }
        removed
    }

    /// Returns true if any entry holds `item`.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.entries.iter().any(|e| &e.item == item)
    }
}

impl<T: Clone> WeightedTable<T> {
    /// Draws items from the table.
    ///
    /// The draw count is sampled first. An empty table (or one whose weights
    /// are all zero) then returns an empty list without any further draws.
    #[must_use]
    pub fn get<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<T> {
        let rolls = self.rolls.floored_amount(rng);
        if self.entries.is_empty() || self.total_weight <= 0.0 {
            return Vec::new();
        }

        let mut drawn = Vec::new();
        for _ in 0..rolls {
            let draw = rng.gen::<f64>() * self.total_weight;
            if let Some(entry) = self.select(draw) {
                drawn.push(entry.item.clone());
            }
        }
        drawn
    }

    /// Draws like [`get`](Self::get) and keeps only the first item.
    ///
    /// Consumes exactly the randomness `get` would.
    #[must_use]
    pub fn get_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        self.get(rng).into_iter().next()
    }
}

impl<T> Default for WeightedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a WeightedTable<T> {
    type Item = &'a WeightedEntry<T>;
    type IntoIter = std::slice::Iter<'a, WeightedEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
