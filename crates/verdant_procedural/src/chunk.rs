//! # Chunk System
//!
//! World data is organized into fixed-size chunks. Population passes work
//! one chunk at a time but read and write across chunk borders, which is why
//! positions here are world-absolute and chunks only own storage.
//!
//! ## Chunk Format
//!
//! Chunks are 16x16x256 blocks (width x depth x height).
//! Each block is a `(id, meta)` pair of u16s.

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: usize = 16;

/// Chunk height in blocks.
pub const CHUNK_HEIGHT: usize = 256;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE as i32),
            z: block_z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    ///
    /// Wraps on overflow, like every other coordinate operation here.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x.wrapping_mul(CHUNK_SIZE as i32)
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z.wrapping_mul(CHUNK_SIZE as i32)
    }

    /// Returns the chunk's minimum corner at the bottom of the world.
    #[inline]
    #[must_use]
    pub const fn min_corner(self) -> BlockPos {
        BlockPos::new(self.world_x(), 0, self.world_z())
    }
}

/// An absolute block position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    /// World X.
    pub x: i32,
    /// Height. Valid storage heights are `0..CHUNK_HEIGHT`.
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position moved by the given deltas (wrapping).
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }

    /// One block higher.
    #[inline]
    #[must_use]
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// One block lower.
    #[inline]
    #[must_use]
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The chunk containing this position.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord::from_block_pos(self.x, self.z)
    }

    /// Local `(x, y, z)` indices inside the owning chunk, or `None` when the
    /// height lies outside chunk storage.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn local(self) -> Option<(usize, usize, usize)> {
        let y = usize::try_from(self.y).ok().filter(|y| *y < CHUNK_HEIGHT)?;
        // rem_euclid of a positive modulus is never negative.
        let x = self.x.rem_euclid(CHUNK_SIZE as i32) as usize;
        let z = self.z.rem_euclid(CHUNK_SIZE as i32) as usize;
        Some((x, y, z))
    }
}

/// A single block in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// Block type ID.
    pub id: u16,
    /// Block metadata (plant variant, rotation, etc.).
    pub meta: u16,
}

impl Block {
    /// Air block (empty).
    pub const AIR: Self = Self { id: 0, meta: 0 };
    /// Grass block.
    pub const GRASS: Self = Self { id: 1, meta: 0 };
    /// Stone block.
    pub const STONE: Self = Self { id: 2, meta: 0 };
    /// Dirt block.
    pub const DIRT: Self = Self { id: 3, meta: 0 };
    /// Wood/Log block.
    pub const WOOD: Self = Self { id: 4, meta: 0 };
    /// Leaves block.
    pub const LEAVES: Self = Self { id: 5, meta: 0 };
    /// Bedrock block.
    pub const BEDROCK: Self = Self { id: 7, meta: 0 };
    /// Water block.
    pub const WATER: Self = Self { id: 10, meta: 0 };
    /// Sand block.
    pub const SAND: Self = Self { id: 11, meta: 0 };
    /// Tall grass plant.
    pub const TALL_GRASS: Self = Self { id: 31, meta: 1 };
    /// Fern plant (tall grass block, fern variant).
    pub const FERN: Self = Self { id: 31, meta: 2 };
    /// Dead bush plant.
    pub const DEAD_BUSH: Self = Self { id: 32, meta: 0 };

    /// Returns true if this is an air block.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }

    /// Returns true for leaf blocks.
    #[inline]
    #[must_use]
    pub const fn is_leaves(self) -> bool {
        self.id == Self::LEAVES.id
    }

    /// Returns true for small plants that never support anything.
    #[inline]
    #[must_use]
    pub const fn is_plant(self) -> bool {
        self.id == Self::TALL_GRASS.id || self.id == Self::DEAD_BUSH.id
    }

    /// Returns true if the surface query stops at this block.
    ///
    /// Leaves and plants are see-through for surface purposes.
    #[inline]
    #[must_use]
    pub const fn is_solid_or_liquid(self) -> bool {
        !self.is_air() && !self.is_leaves() && !self.is_plant()
    }
}

/// A chunk of world data.
///
/// Contains a 16x16x256 grid of blocks plus a height map.
#[derive(Clone)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Block data (indexed as [y][z][x]).
    blocks: Box<[[[Block; CHUNK_SIZE]; CHUNK_SIZE]; CHUNK_HEIGHT]>,
    /// Height map (highest non-air block ever written in each column).
    height_map: [[u8; CHUNK_SIZE]; CHUNK_SIZE],
    /// Whether this chunk has been modified since creation.
    pub modified: bool,
}

impl Chunk {
    /// Creates a new empty chunk at the given coordinates.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: Box::new([[[Block::AIR; CHUNK_SIZE]; CHUNK_SIZE]; CHUNK_HEIGHT]),
            height_map: [[0; CHUNK_SIZE]; CHUNK_SIZE],
            modified: false,
        }
    }

    /// Gets a block at local coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - Local X (0-15)
    /// * `y` - Y level (0-255)
    /// * `z` - Local Z (0-15)
    #[inline]
    #[must_use]
    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Block {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.blocks[y][z][x]
        } else {
            Block::AIR
        }
    }

    /// Sets a block at local coordinates. Out-of-range writes are ignored.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: Block) {
        if x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE {
            self.blocks[y][z][x] = block;
            self.modified = true;

            // y < CHUNK_HEIGHT (256) always fits in a u8
            if !block.is_air() && y as u8 > self.height_map[z][x] {
                self.height_map[z][x] = y as u8;
            }
        }
    }

    /// Gets the height at a local column.
    #[inline]
    #[must_use]
    pub fn get_height(&self, x: usize, z: usize) -> u8 {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.height_map[z][x]
        } else {
            0
        }
    }

    /// Fills a local column from the bottom up with `layers`, last one on top.
    pub fn fill_column(&mut self, x: usize, z: usize, layers: &[Block]) {
        for (y, block) in layers.iter().enumerate() {
            self.set_block(x, y, z, *block);
        }
    }

    /// Height of the topmost solid-or-liquid block in a local column.
    #[must_use]
    pub fn top_solid_or_liquid(&self, x: usize, z: usize) -> Option<usize> {
        let start = usize::from(self.get_height(x, z));
        (0..=start)
            .rev()
            .find(|&y| self.get_block(x, y, z).is_solid_or_liquid())
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_conversion() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 0), ChunkCoord::new(1, 0));
        assert_eq!(ChunkCoord::from_block_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-16, -17), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_min_corner() {
        assert_eq!(ChunkCoord::new(2, -3).min_corner(), BlockPos::new(32, 0, -48));
    }

    #[test]
    fn test_far_coordinates_wrap() {
        let far = ChunkCoord::new(134_217_728, -134_217_729);
        assert_eq!(far.world_x(), i32::MIN);
        assert_eq!(far.world_z(), i32::MAX - 15);
        assert_eq!(BlockPos::new(i32::MAX, 0, 0).offset(1, 0, 0).x, i32::MIN);
    }

    #[test]
    fn test_block_pos_local() {
        assert_eq!(BlockPos::new(17, 5, -1).local(), Some((1, 5, 15)));
        assert_eq!(BlockPos::new(0, -1, 0).local(), None);
        assert_eq!(BlockPos::new(0, 256, 0).local(), None);
        assert_eq!(BlockPos::new(-17, 0, 3).chunk(), ChunkCoord::new(-2, 0));
    }

    #[test]
    fn test_block_get_set() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));

        assert_eq!(chunk.get_block(5, 10, 5), Block::AIR);

        chunk.set_block(5, 10, 5, Block::STONE);
        assert_eq!(chunk.get_block(5, 10, 5), Block::STONE);
        assert!(chunk.modified);
        assert_eq!(chunk.get_height(5, 5), 10);

        // Out of range reads are air, writes are ignored
        assert_eq!(chunk.get_block(16, 0, 0), Block::AIR);
        chunk.set_block(0, 300, 0, Block::STONE);
        assert_eq!(chunk.get_height(0, 0), 0);
    }

    #[test]
    fn test_top_solid_skips_plants_and_leaves() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.fill_column(
            3,
            4,
            &[Block::BEDROCK, Block::DIRT, Block::GRASS, Block::TALL_GRASS, Block::LEAVES],
        );
        assert_eq!(chunk.top_solid_or_liquid(3, 4), Some(2));

        chunk.set_block(3, 6, 4, Block::WATER);
        assert_eq!(chunk.top_solid_or_liquid(3, 4), Some(6));

        assert_eq!(chunk.top_solid_or_liquid(0, 0), None);
    }

    #[test]
    fn test_block_classification() {
        assert!(Block::STONE.is_solid_or_liquid());
        assert!(Block::WATER.is_solid_or_liquid());
        assert!(!Block::AIR.is_solid_or_liquid());
        assert!(!Block::FERN.is_solid_or_liquid());
        assert!(!Block::DEAD_BUSH.is_solid_or_liquid());
        assert!(!Block::LEAVES.is_solid_or_liquid());
        assert_ne!(Block::TALL_GRASS, Block::FERN);
    }
}
