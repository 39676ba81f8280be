//! # VERDANT Procedural Population
//!
//! Deterministic per-chunk decoration for reproducible worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and chunk always produce the same features
//! 2. **Chunked**: Each chunk is populated independently with its own RNG
//! 3. **Patchy**: The requested count is batched; every placement becomes a
//!    dense patch rather than a single scattered block
//! 4. **Pluggable**: Terrain queries and feature emission are traits, so the
//!    same populator runs against any world storage
//!
//! ## Core Components
//!
//! - `FeaturePopulator`: Count policy, variant table, optional override
//! - `TallGrassPatch`: Emission primitive for shrub patches
//! - `VoxelWorld`: In-memory chunk storage implementing the world traits
//! - `WorldSeed`: Per-chunk generator derivation
//! - `PopulatorConfig`: TOML tuning of count and variants
//!
//! ## Example
//!
//! ```rust
//! use verdant_procedural::{shrub_populator, ChunkCoord, ShrubType, VoxelWorld, WorldSeed};
//!
//! let seed = WorldSeed::new(12345);
//! let mut world = VoxelWorld::flat(2, 64);
//!
//! let mut shrubs = shrub_populator();
//! shrubs.table_mut().add(ShrubType::Fern, 1.0).unwrap();
//!
//! let chunk = ChunkCoord::new(0, 0);
//! shrubs.populate(&mut world, chunk, &mut seed.chunk_rng(chunk));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod populator;
pub mod seed;
pub mod shrub;
pub mod world;

pub use chunk::{Block, BlockPos, Chunk, ChunkCoord, CHUNK_HEIGHT, CHUNK_SIZE};
pub use config::PopulatorConfig;
pub use error::{ConfigError, ConfigResult};
pub use populator::{
    batch_iterations, FeaturePopulator, VariantOverride, VariantSource, BATCH_SIZE,
};
pub use seed::WorldSeed;
pub use shrub::{shrub_populator, ShrubType, TallGrassPatch};
pub use world::{BlockAccess, FeatureEmitter, Location, TerrainSurface, VoxelWorld};

pub use verdant_weighted::{VariableAmount, WeightedTable};
