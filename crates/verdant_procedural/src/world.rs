//! # World Access
//!
//! Population passes never see concrete storage. They talk to the world
//! through three seams:
//!
//! - [`TerrainSurface`]: where is the ground in this column?
//! - [`BlockAccess`]: read and write single blocks.
//! - [`FeatureEmitter`]: stamp one feature variant at a position.
//!
//! [`VoxelWorld`] implements the first two over an in-memory chunk map.

use std::collections::HashMap;

use rand::RngCore;

use crate::chunk::{Block, BlockPos, Chunk, ChunkCoord, CHUNK_HEIGHT, CHUNK_SIZE};

/// A position tagged with the chunk being populated when it was chosen.
///
/// Placement columns sit up to 23 blocks from the chunk corner, so
/// `position.chunk()` can differ from `chunk`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// The chunk whose population pass chose this position.
    pub chunk: ChunkCoord,
    /// Absolute block position.
    pub position: BlockPos,
}

impl Location {
    /// Creates a new location.
    #[inline]
    #[must_use]
    pub const fn new(chunk: ChunkCoord, position: BlockPos) -> Self {
        Self { chunk, position }
    }
}

/// Terrain-surface queries.
pub trait TerrainSurface {
    /// Returns the topmost solid-or-liquid block of column `(x, z)`.
    ///
    /// Columns with no such block report `y = -1`, so the position above it
    /// is the bottom of the world.
    fn top_solid_or_liquid(&self, x: i32, z: i32) -> BlockPos;
}

/// Single-block reads and writes.
pub trait BlockAccess {
    /// Returns the block at `pos` (air outside loaded storage).
    fn block(&self, pos: BlockPos) -> Block;

    /// Writes a block. Returns false if `pos` is outside loaded storage.
    fn set_block(&mut self, pos: BlockPos, block: Block) -> bool;
}

/// Realizes one feature variant in the world.
///
/// Emitters may write many blocks and may consume randomness from `rng`.
pub trait FeatureEmitter<W: ?Sized, V> {
    /// Emits `variant` at `pos`.
    fn emit(&self, world: &mut W, rng: &mut dyn RngCore, pos: BlockPos, variant: &V);
}

impl<W, V, F> FeatureEmitter<W, V> for F
where
    W: ?Sized,
    F: Fn(&mut W, &mut dyn RngCore, BlockPos, &V),
{
    fn emit(&self, world: &mut W, rng: &mut dyn RngCore, pos: BlockPos, variant: &V) {
        self(world, rng, pos, variant);
    }
}

/// In-memory world made of loaded chunks.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl VoxelWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a square of flat chunks centered on chunk (0, 0).
    ///
    /// Every column is bedrock, stone, three dirt layers and a grass top
    /// at `surface_y` (clamped to the world height).
    #[must_use]
    pub fn flat(radius: i32, surface_y: usize) -> Self {
        let surface_y = surface_y.clamp(4, CHUNK_HEIGHT - 1);
        let mut layers = vec![Block::STONE; surface_y + 1];
        layers[0] = Block::BEDROCK;
        for layer in &mut layers[surface_y - 3..surface_y] {
            *layer = Block::DIRT;
        }
        layers[surface_y] = Block::GRASS;

        let mut world = Self::new();
        for cz in -radius..=radius {
            for cx in -radius..=radius {
                let mut chunk = Chunk::new(ChunkCoord::new(cx, cz));
                for z in 0..CHUNK_SIZE {
                    for x in 0..CHUNK_SIZE {
                        chunk.fill_column(x, z, &layers);
                    }
                }
                chunk.modified = false;
                world.insert_chunk(chunk);
            }
        }
        world
    }

    /// Adds or replaces a chunk.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.coord, chunk);
    }

    /// Returns a loaded chunk.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Returns a loaded chunk mutably.
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Counts blocks equal to `block` across all loaded chunks.
    #[must_use]
    pub fn count_blocks(&self, block: Block) -> usize {
        self.chunks
            .values()
            .map(|chunk| {
                let mut count = 0;
                for y in 0..CHUNK_HEIGHT {
                    for z in 0..CHUNK_SIZE {
                        for x in 0..CHUNK_SIZE {
                            if chunk.get_block(x, y, z) == block {
                                count += 1;
                            }
                        }
                    }
                }
                count
            })
            .sum()
    }
}

impl TerrainSurface for VoxelWorld {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn top_solid_or_liquid(&self, x: i32, z: i32) -> BlockPos {
        let probe = BlockPos::new(x, 0, z);
        let y = probe.local().and_then(|(lx, _, lz)| {
            self.chunk(probe.chunk())
                .and_then(|chunk| chunk.top_solid_or_liquid(lx, lz))
        });
        // Heights are below CHUNK_HEIGHT and fit in i32.
        BlockPos::new(x, y.map_or(-1, |y| y as i32), z)
    }
}

impl BlockAccess for VoxelWorld {
    fn block(&self, pos: BlockPos) -> Block {
        match (pos.local(), self.chunk(pos.chunk())) {
            (Some((x, y, z)), Some(chunk)) => chunk.get_block(x, y, z),
            _ => Block::AIR,
        }
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) -> bool {
        let Some((x, y, z)) = pos.local() else {
            return false;
        };
        match self.chunk_mut(pos.chunk()) {
            Some(chunk) => {
                chunk.set_block(x, y, z, block);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_flat_world_surface() {
        let world = VoxelWorld::flat(1, 64);
        assert_eq!(world.chunk_count(), 9);
        assert_eq!(world.top_solid_or_liquid(5, 5), BlockPos::new(5, 64, 5));
        assert_eq!(world.top_solid_or_liquid(-10, 31), BlockPos::new(-10, 64, 31));
        assert_eq!(world.block(BlockPos::new(0, 64, 0)), Block::GRASS);
        assert_eq!(world.block(BlockPos::new(0, 62, 0)), Block::DIRT);
        assert_eq!(world.block(BlockPos::new(0, 0, 0)), Block::BEDROCK);
        assert_eq!(world.block(BlockPos::new(0, 65, 0)), Block::AIR);
    }

    #[test]
    fn test_unloaded_column_reports_below_world() {
        let world = VoxelWorld::flat(0, 64);
        assert_eq!(world.top_solid_or_liquid(100, 100), BlockPos::new(100, -1, 100));
        assert_eq!(world.block(BlockPos::new(100, 64, 100)), Block::AIR);
    }

    #[test]
    fn test_set_block_bounds() {
        let mut world = VoxelWorld::flat(0, 64);
        assert!(world.set_block(BlockPos::new(3, 70, 3), Block::WOOD));
        assert_eq!(world.block(BlockPos::new(3, 70, 3)), Block::WOOD);
        assert_eq!(world.top_solid_or_liquid(3, 3).y, 70);

        assert!(!world.set_block(BlockPos::new(3, -1, 3), Block::WOOD));
        assert!(!world.set_block(BlockPos::new(64, 70, 3), Block::WOOD));
    }

    #[test]
    fn test_closure_emitter() {
        let mut world = VoxelWorld::flat(0, 64);
        let emitter = |world: &mut VoxelWorld, _rng: &mut dyn RngCore, pos: BlockPos, block: &Block| {
            world.set_block(pos, *block);
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        emitter.emit(&mut world, &mut rng, BlockPos::new(1, 65, 1), &Block::SAND);
        assert_eq!(world.block(BlockPos::new(1, 65, 1)), Block::SAND);
        assert_eq!(world.count_blocks(Block::SAND), 1);
    }
}
