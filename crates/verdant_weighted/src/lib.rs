//! # VERDANT Weighted Sampling
//!
//! Probabilistic building blocks shared by every world-population pass.
//!
//! ## Design Principles
//!
//! 1. **Caller-owned randomness** - Nothing here stores a generator; every
//!    sampling call takes `&mut R` so draw order stays auditable
//! 2. **Documented consumption** - Each sampler consumes a fixed, documented
//!    number of draws, which keeps seeded worlds reproducible
//! 3. **Graceful degradation** - Empty tables and negative amounts sample as
//!    "nothing", never as an error
//!
//! ## Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use verdant_weighted::{VariableAmount, WeightedTable};
//!
//! let mut table = WeightedTable::new();
//! table.add("fern", 1.0).unwrap();
//! table.add("grass", 3.0).unwrap();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let picked = table.get(&mut rng);
//! assert_eq!(picked.len(), 1);
//!
//! let per_chunk = VariableAmount::base_with_variance(128, 16);
//! assert!(per_chunk.floored_amount(&mut rng) <= 144);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod amount;
pub mod error;
pub mod table;

pub use amount::{Distribution, VariableAmount};
pub use error::{WeightError, WeightResult};
pub use table::{WeightedEntry, WeightedTable};
