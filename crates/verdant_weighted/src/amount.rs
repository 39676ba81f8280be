//! # Variable Amounts
//!
//! A `VariableAmount` describes a random, non-negative quantity: how many
//! shrubs per chunk, how many draws per table lookup, and so on.
//!
//! ## Determinism
//!
//! Sampling pulls from the caller's generator only. Every variant consumes a
//! fixed, documented number of draws (nested parameters first, in field
//! order, then the variant's own draws), so two generators in the same state
//! always produce the same value and leave the same state behind.
//!
//! | Variant              | Own draws                           |
//! |----------------------|-------------------------------------|
//! | `Fixed`              | 0                                   |
//! | `Range` (uniform)    | 1                                   |
//! | `Range` (triangular) | 2                                   |
//! | `BaseWithVariance`   | 1                                   |
//! | `BaseWithAddition`   | 1                                   |
//! | `OptionalVariance`   | 1, plus 1 when the chance succeeds  |
//! | `OptionalAddition`   | 1, plus 1 when the chance succeeds  |

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{WeightError, WeightResult};

/// Shape of the unit draw used by [`VariableAmount::Range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Every value in the range is equally likely.
    #[default]
    Uniform,
    /// Mean of two uniform draws; values bunch up around the middle.
    Triangular,
}

impl Distribution {
    /// Samples a value in `[0, 1)`.
    #[inline]
    fn unit<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            Self::Uniform => rng.gen::<f64>(),
            Self::Triangular => (rng.gen::<f64>() + rng.gen::<f64>()) * 0.5,
        }
    }
}

/// A composable random quantity.
///
/// Parameters of every non-fixed variant are themselves `VariableAmount`s, so
/// `range(base_with_variance(4, 1), 10)` is a valid amount.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableAmount {
    /// Always the same value.
    Fixed(f64),
    /// `min + u * (max - min)` with `u` drawn from `distribution`.
    Range {
        /// Lower bound.
        min: Box<VariableAmount>,
        /// Upper bound (exclusive for the uniform draw).
        max: Box<VariableAmount>,
        /// Shape of the unit draw.
        distribution: Distribution,
    },
    /// `base` plus a uniform offset in `[-variance, variance)`.
    BaseWithVariance {
        /// Center value.
        base: Box<VariableAmount>,
        /// Maximum distance from `base`.
        variance: Box<VariableAmount>,
    },
    /// `base` plus a uniform offset in `[0, addition)`.
    BaseWithAddition {
        /// Minimum value.
        base: Box<VariableAmount>,
        /// Width of the random addition.
        addition: Box<VariableAmount>,
    },
    /// `BaseWithVariance` applied only with probability `chance`.
    OptionalVariance {
        /// Value used when the chance fails.
        base: Box<VariableAmount>,
        /// Maximum distance from `base`.
        variance: Box<VariableAmount>,
        /// Probability in `[0, 1]` of applying the variance.
        chance: f64,
    },
    /// `BaseWithAddition` applied only with probability `chance`.
    OptionalAddition {
        /// Value used when the chance fails.
        base: Box<VariableAmount>,
        /// Width of the random addition.
        addition: Box<VariableAmount>,
        /// Probability in `[0, 1]` of applying the addition.
        chance: f64,
    },
}

impl VariableAmount {
    /// An amount that is always `value`.
    #[inline]
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self::Fixed(value)
    }

    /// A uniform amount in `[min, max)`.
    #[must_use]
    pub fn range(min: impl Into<Self>, max: impl Into<Self>) -> Self {
        Self::Range {
            min: Box::new(min.into()),
            max: Box::new(max.into()),
            distribution: Distribution::Uniform,
        }
    }

    /// A triangular amount in `[min, max)`, peaking at the midpoint.
    #[must_use]
    pub fn triangular(min: impl Into<Self>, max: impl Into<Self>) -> Self {
        Self::Range {
            min: Box::new(min.into()),
            max: Box::new(max.into()),
            distribution: Distribution::Triangular,
        }
    }

    /// `base` plus or minus up to `variance`.
    #[must_use]
    pub fn base_with_variance(base: impl Into<Self>, variance: impl Into<Self>) -> Self {
        Self::BaseWithVariance {
            base: Box::new(base.into()),
            variance: Box::new(variance.into()),
        }
    }

    /// `base` plus up to `addition`.
    #[must_use]
    pub fn base_with_addition(base: impl Into<Self>, addition: impl Into<Self>) -> Self {
        Self::BaseWithAddition {
            base: Box::new(base.into()),
            addition: Box::new(addition.into()),
        }
    }

    /// `base`, varied by up to `variance` with probability `chance`.
    #[must_use]
    pub fn optional_variance(base: impl Into<Self>, variance: impl Into<Self>, chance: f64) -> Self {
        Self::OptionalVariance {
            base: Box::new(base.into()),
            variance: Box::new(variance.into()),
            chance,
        }
    }

    /// `base`, increased by up to `addition` with probability `chance`.
    #[must_use]
    pub fn optional_addition(base: impl Into<Self>, addition: impl Into<Self>, chance: f64) -> Self {
        Self::OptionalAddition {
            base: Box::new(base.into()),
            addition: Box::new(addition.into()),
            chance,
        }
    }

    /// Samples the amount, clamped to be non-negative.
    ///
    /// NaN results (e.g. from infinite parameters) are treated as zero.
    #[must_use]
    pub fn amount<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let value = self.sample(rng);
        if value > 0.0 {
            value
        } else {
            0.0
        }
    }

    /// Samples the amount and rounds it down.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn floored_amount<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        // `as` saturates, and `amount` is never negative or NaN.
        self.amount(rng).floor() as u64
    }

    /// Checks that every constant is finite and every chance is a probability.
    ///
    /// # Errors
    ///
    /// Returns the first offending value found in a depth-first walk.
    pub fn validate(&self) -> WeightResult<()> {
        match self {
            Self::Fixed(value) => {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(WeightError::NonFiniteAmount(*value))
                }
            }
            Self::Range { min, max, .. } => {
                min.validate()?;
                max.validate()
            }
            Self::BaseWithVariance { base, variance } => {
                base.validate()?;
                variance.validate()
            }
            Self::BaseWithAddition { base, addition } => {
                base.validate()?;
                addition.validate()
            }
            Self::OptionalVariance { base, variance, chance } => {
                check_chance(*chance)?;
                base.validate()?;
                variance.validate()
            }
            Self::OptionalAddition { base, addition, chance } => {
                check_chance(*chance)?;
                base.validate()?;
                addition.validate()
            }
        }
    }

    /// Raw, unclamped sample. Nested amounts may legitimately go negative
    /// (a negative variance, say) so clamping happens only at the top.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Fixed(value) => *value,
            Self::Range { min, max, distribution } => {
                let min = min.sample(rng);
                let max = max.sample(rng);
                min + distribution.unit(rng) * (max - min)
            }
            Self::BaseWithVariance { base, variance } => {
                let base = base.sample(rng);
                let variance = variance.sample(rng);
                base + signed_unit(rng) * variance
            }
            Self::BaseWithAddition { base, addition } => {
                let base = base.sample(rng);
                let addition = addition.sample(rng);
                base + rng.gen::<f64>() * addition
            }
            Self::OptionalVariance { base, variance, chance } => {
                let base = base.sample(rng);
                let variance = variance.sample(rng);
                if rng.gen::<f64>() < *chance {
                    base + signed_unit(rng) * variance
                } else {
                    base
                }
            }
            Self::OptionalAddition { base, addition, chance } => {
                let base = base.sample(rng);
                let addition = addition.sample(rng);
                if rng.gen::<f64>() < *chance {
                    base + rng.gen::<f64>() * addition
                } else {
                    base
                }
            }
        }
    }
}

/// Uniform draw in `[-1, 1)`.
#[inline]
fn signed_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * 2.0 - 1.0
}

fn check_chance(chance: f64) -> WeightResult<()> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(WeightError::ChanceOutOfRange(chance))
    }
}

impl Default for VariableAmount {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

impl From<f64> for VariableAmount {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl From<u32> for VariableAmount {
    fn from(value: u32) -> Self {
        Self::Fixed(f64::from(value))
    }
}

impl From<i32> for VariableAmount {
    fn from(value: i32) -> Self {
        Self::Fixed(f64::from(value))
    }
}

impl fmt::Display for VariableAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => write!(f, "{value}"),
            Self::Range { min, max, distribution } => match distribution {
                Distribution::Uniform => write!(f, "range({min}, {max})"),
                Distribution::Triangular => write!(f, "triangular({min}, {max})"),
            },
            Self::BaseWithVariance { base, variance } => {
                write!(f, "variance({base}, {variance})")
            }
            Self::BaseWithAddition { base, addition } => {
                write!(f, "addition({base}, {addition})")
            }
            Self::OptionalVariance { base, variance, chance } => {
                write!(f, "optional_variance({base}, {variance}, {chance})")
            }
            Self::OptionalAddition { base, addition, chance } => {
                write!(f, "optional_addition({base}, {addition}, {chance})")
            }
        }
    }
}

/// Config-file form: a bare number, or one tagged table.
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(f64),
    Tagged(TaggedAmount),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TaggedAmount {
    Fixed(f64),
    Range {
        min: VariableAmount,
        max: VariableAmount,
        #[serde(default)]
        distribution: Distribution,
    },
    BaseWithVariance {
        base: VariableAmount,
        variance: VariableAmount,
    },
    BaseWithAddition {
        base: VariableAmount,
        addition: VariableAmount,
    },
    OptionalVariance {
        base: VariableAmount,
        variance: VariableAmount,
        chance: f64,
    },
    OptionalAddition {
        base: VariableAmount,
        addition: VariableAmount,
        chance: f64,
    },
}

impl From<AmountRepr> for VariableAmount {
    fn from(repr: AmountRepr) -> Self {
        match repr {
            AmountRepr::Number(value) => Self::Fixed(value),
            AmountRepr::Tagged(TaggedAmount::Fixed(value)) => Self::Fixed(value),
            AmountRepr::Tagged(TaggedAmount::Range { min, max, distribution }) => Self::Range {
                min: Box::new(min),
                max: Box::new(max),
                distribution,
            },
            AmountRepr::Tagged(TaggedAmount::BaseWithVariance { base, variance }) => {
                Self::base_with_variance(base, variance)
            }
            AmountRepr::Tagged(TaggedAmount::BaseWithAddition { base, addition }) => {
                Self::base_with_addition(base, addition)
            }
            AmountRepr::Tagged(TaggedAmount::OptionalVariance { base, variance, chance }) => {
                Self::optional_variance(base, variance, chance)
            }
            AmountRepr::Tagged(TaggedAmount::OptionalAddition { base, addition, chance }) => {
                Self::optional_addition(base, addition, chance)
            }
        }
    }
}

impl<'de> Deserialize<'de> for VariableAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        AmountRepr::deserialize(deserializer).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Deserialize)]
    struct Holder {
        amount: VariableAmount,
    }

    fn parse(source: &str) -> VariableAmount {
        toml::from_str::<Holder>(source).unwrap().amount
    }

    #[test]
    fn test_fixed_consumes_no_randomness() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut reference = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(VariableAmount::fixed(128.0).floored_amount(&mut rng), 128);
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(VariableAmount::fixed(-5.0).amount(&mut rng), 0.0);
        assert_eq!(VariableAmount::fixed(-5.0).floored_amount(&mut rng), 0);
        assert_eq!(VariableAmount::fixed(f64::NAN).floored_amount(&mut rng), 0);

        let always_negative = VariableAmount::range(-10.0, -1.0);
        for _ in 0..1000 {
            assert_eq!(always_negative.floored_amount(&mut rng), 0);
        }
    }

    #[test]
    fn test_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(VariableAmount::fixed(2.999).floored_amount(&mut rng), 2);
        assert_eq!(VariableAmount::fixed(0.5).floored_amount(&mut rng), 0);
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let uniform = VariableAmount::range(3, 8);
        let triangular = VariableAmount::triangular(3, 8);

        for _ in 0..10_000 {
            let a = uniform.amount(&mut rng);
            let b = triangular.amount(&mut rng);
            assert!((3.0..8.0).contains(&a), "uniform out of range: {a}");
            assert!((3.0..8.0).contains(&b), "triangular out of range: {b}");
        }
    }

    #[test]
    fn test_variance_and_addition_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let variance = VariableAmount::base_with_variance(10, 2);
        let addition = VariableAmount::base_with_addition(10, 2);

        for _ in 0..10_000 {
            let v = variance.amount(&mut rng);
            let a = addition.amount(&mut rng);
            assert!((8.0..12.0).contains(&v));
            assert!((10.0..12.0).contains(&a));
        }
    }

    #[test]
    fn test_optional_chance_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let never = VariableAmount::optional_addition(5, 100, 0.0);
        let always = VariableAmount::optional_addition(5, 100, 1.0);

        for _ in 0..1000 {
            assert_eq!(never.amount(&mut rng), 5.0);
            assert!(always.amount(&mut rng) >= 5.0);
        }

        let mut hits = 0;
        for _ in 0..1000 {
            if always.amount(&mut rng) > 5.0 {
                hits += 1;
            }
        }
        assert!(hits > 990, "addition should almost always raise the value: {hits}");
    }

    #[test]
    fn test_nested_amounts() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let nested = VariableAmount::range(VariableAmount::range(0, 2), VariableAmount::fixed(10.0));

        for _ in 0..10_000 {
            let value = nested.amount(&mut rng);
            assert!((0.0..10.0).contains(&value));
        }
    }

    #[test]
    fn test_determinism() {
        let amount = VariableAmount::optional_variance(VariableAmount::range(4, 9), 3, 0.5);
        let mut a = ChaCha8Rng::seed_from_u64(1234);
        let mut b = ChaCha8Rng::seed_from_u64(1234);

        for _ in 0..1000 {
            assert_eq!(amount.amount(&mut a).to_bits(), amount.amount(&mut b).to_bits());
        }
    }

    #[test]
    fn test_validate() {
        assert!(VariableAmount::range(1, 4).validate().is_ok());
        assert_eq!(
            VariableAmount::optional_addition(1, 4, 1.5).validate(),
            Err(WeightError::ChanceOutOfRange(1.5))
        );
        assert!(matches!(
            VariableAmount::base_with_variance(1.0, f64::INFINITY).validate(),
            Err(WeightError::NonFiniteAmount(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(VariableAmount::fixed(128.0).to_string(), "128");
        assert_eq!(VariableAmount::range(1, 4).to_string(), "range(1, 4)");
        assert_eq!(
            VariableAmount::optional_variance(2, 0.5, 0.25).to_string(),
            "optional_variance(2, 0.5, 0.25)"
        );
    }

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse("amount = 256"), VariableAmount::fixed(256.0));
        assert_eq!(parse("amount = 1.5"), VariableAmount::fixed(1.5));
    }

    #[test]
    fn test_parse_tagged() {
        assert_eq!(
            parse("amount = { range = { min = 1, max = 3 } }"),
            VariableAmount::range(1, 3)
        );
        assert_eq!(
            parse("amount = { range = { min = 1, max = 3, distribution = \"triangular\" } }"),
            VariableAmount::triangular(1, 3)
        );
        assert_eq!(
            parse("amount = { optional_addition = { base = 0, addition = { range = { min = 1, max = 2 } }, chance = 0.1 } }"),
            VariableAmount::optional_addition(0, VariableAmount::range(1, 2), 0.1)
        );
    }
}
