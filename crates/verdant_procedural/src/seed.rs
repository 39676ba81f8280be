//! # World Seeds
//!
//! Every population pass draws from a generator derived from the world
//! seed and the chunk coordinate alone. Chunks can therefore be populated
//! in any order, on any thread, and still come out identical.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::chunk::ChunkCoord;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., one feature kind).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-style multiply-xorshift mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Seed of the population generator for one chunk.
    ///
    /// `x * a + z * b ^ seed` with odd multipliers derived from the seed, so
    /// neighbouring chunks get unrelated streams.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn chunk_seed(self, coord: ChunkCoord) -> u64 {
        let a = self.derive(1).value() | 1;
        let b = self.derive(2).value() | 1;
        // Sign-extended bit patterns are what we want to mix here.
        let x = coord.x as i64 as u64;
        let z = coord.z as i64 as u64;
        x.wrapping_mul(a).wrapping_add(z.wrapping_mul(b)) ^ self.0
    }

    /// Fresh population generator for one chunk.
    #[must_use]
    pub fn chunk_rng(self, coord: ChunkCoord) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.chunk_seed(coord))
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}
