//! # Shrubs
//!
//! Tall grass, ferns and dead bushes: the default ground cover populator.
//!
//! One placement from the populator becomes a whole patch here. The patch
//! emitter settles onto the ground below its origin and then makes
//! [`PATCH_ATTEMPTS`] scattered attempts around it; each attempt places a
//! plant only into air that sits on a block the plant can grow on.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::chunk::{Block, BlockPos};
use crate::populator::FeaturePopulator;
use crate::world::{BlockAccess, FeatureEmitter};

/// Placement attempts per patch.
pub const PATCH_ATTEMPTS: u32 = 128;

/// Horizontal scatter of a patch (offsets span `-(n-1)..=(n-1)`).
const HORIZONTAL_SPREAD: i32 = 8;

/// Vertical scatter of a patch.
const VERTICAL_SPREAD: i32 = 4;

/// Shrub variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrubType {
    /// Dry desert bush.
    DeadBush,
    /// Common grass tuft.
    TallGrass,
    /// Shade-loving fern.
    Fern,
}

impl ShrubType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 3] = [Self::DeadBush, Self::TallGrass, Self::Fern];

    /// The block placed for this variant.
    #[inline]
    #[must_use]
    pub const fn block(self) -> Block {
        match self {
            Self::DeadBush => Block::DEAD_BUSH,
            Self::TallGrass => Block::TALL_GRASS,
            Self::Fern => Block::FERN,
        }
    }

    /// Returns true if this variant can grow on top of `ground`.
    #[inline]
    #[must_use]
    pub const fn can_grow_on(self, ground: Block) -> bool {
        match self {
            Self::DeadBush => ground.id == Block::SAND.id,
            Self::TallGrass | Self::Fern => {
                ground.id == Block::GRASS.id || ground.id == Block::DIRT.id
            }
        }
    }

    /// Snake-case name, as used in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeadBush => "dead_bush",
            Self::TallGrass => "tall_grass",
            Self::Fern => "fern",
        }
    }
}

impl fmt::Display for ShrubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Emission primitive that grows one placement into a patch of shrubs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TallGrassPatch {
    attempts: u32,
}

impl TallGrassPatch {
    /// Patch emitter with the standard number of attempts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attempts: PATCH_ATTEMPTS,
        }
    }

    /// Patch emitter with a custom number of attempts.
    #[must_use]
    pub const fn with_attempts(attempts: u32) -> Self {
        Self { attempts }
    }

    /// Placement attempts per patch.
    #[inline]
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Grows a patch around `origin`. Returns the number of plants placed.
    ///
    /// Every attempt consumes six draws (two per axis) whether or not it
    /// places anything.
    pub fn place<W: BlockAccess + ?Sized>(
        &self,
        world: &mut W,
        rng: &mut dyn RngCore,
        origin: BlockPos,
        shrub: ShrubType,
    ) -> u32 {
        let mut ground = origin;
        while ground.y > 0 {
            let block = world.block(ground);
            if block.is_air() || block.is_leaves() {
                ground = ground.down();
            } else {
                break;
            }
        }

        let plant = shrub.block();
        let mut placed = 0;
        for _ in 0..self.attempts {
            let dx = rng.gen_range(0..HORIZONTAL_SPREAD) - rng.gen_range(0..HORIZONTAL_SPREAD);
            let dy = rng.gen_range(0..VERTICAL_SPREAD) - rng.gen_range(0..VERTICAL_SPREAD);
            let dz = rng.gen_range(0..HORIZONTAL_SPREAD) - rng.gen_range(0..HORIZONTAL_SPREAD);
            let target = ground.offset(dx, dy, dz);

            if world.block(target).is_air()
                && shrub.can_grow_on(world.block(target.down()))
                && world.set_block(target, plant)
            {
                placed += 1;
            }
        }
        placed
    }
}

impl Default for TallGrassPatch {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: BlockAccess + ?Sized> FeatureEmitter<W, ShrubType> for TallGrassPatch {
    fn emit(&self, world: &mut W, rng: &mut dyn RngCore, pos: BlockPos, variant: &ShrubType) {
        let placed = self.place(world, rng, pos, *variant);
        tracing::trace!(x = pos.x, y = pos.y, z = pos.z, %variant, placed, "grew shrub patch");
    }
}

/// The stock shrub populator: tall grass, 128 per chunk.
#[must_use]
pub fn shrub_populator() -> FeaturePopulator<ShrubType, TallGrassPatch> {
    FeaturePopulator::new("Shrub", ShrubType::TallGrass, TallGrassPatch::new())
}
