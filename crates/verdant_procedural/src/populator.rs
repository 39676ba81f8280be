//! # Feature Population
//!
//! Decides how many features a chunk receives, where they go and which
//! variant each one is.
//!
//! ## Batching
//!
//! The count policy does NOT give the number of features placed. The
//! requested amount is divided into batches of [`BATCH_SIZE`] and each batch
//! produces at most one placement:
//!
//! ```text
//! iterations = ceil(floor(count) / 128)
//! ```
//!
//! The emitter is expected to grow every placement into a dense patch, so a
//! default count of 128 yields one patch per chunk. Existing worlds depend on
//! this density; do not "correct" it into one feature per unit of count.
//!
//! ## Draw Order (per chunk)
//!
//! 1. Count policy.
//! 2. Per iteration: column X offset, column Z offset, variant table (unless
//!    an override is set), then whatever the emitter consumes.
//!
//! Columns are picked from `[8, 23]` on both axes relative to the chunk's
//! minimum corner. Features therefore straddle into the +X/+Z neighbours,
//! which keeps patches from lining up along chunk borders.

use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};
use verdant_weighted::{VariableAmount, WeightedTable};

use crate::chunk::{ChunkCoord, CHUNK_SIZE};
use crate::world::{FeatureEmitter, Location, TerrainSurface};

/// Requested amount covered by one placement.
pub const BATCH_SIZE: u64 = 128;

/// Default per-chunk count for a freshly constructed populator.
pub const DEFAULT_PER_CHUNK: f64 = 128.0;

/// Offset of the placement window from the chunk's minimum corner.
pub const COLUMN_INSET: i32 = 8;

/// Width of the placement window on each axis.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const COLUMN_SPREAD: i32 = CHUNK_SIZE as i32;

/// Number of placement iterations for a requested amount.
#[inline]
#[must_use]
pub const fn batch_iterations(target: u64) -> u64 {
    target.div_ceil(BATCH_SIZE)
}

/// Location-dependent variant choice that replaces the weighted table.
pub type VariantOverride<V> = Arc<dyn Fn(&Location) -> V + Send + Sync>;

/// Where a populator takes its variants from.
///
/// Exactly one source is active at a time. The table is kept while an
/// override is set, but it is not consulted (and consumes no randomness).
pub enum VariantSource<'a, V> {
    /// Weighted draw from the populator's table.
    Table(&'a WeightedTable<V>),
    /// Caller-supplied function of the placement location.
    Override(&'a (dyn Fn(&Location) -> V + Send + Sync)),
}

impl<V: Clone> VariantSource<'_, V> {
    /// Resolves the variant for one placement.
    ///
    /// Returns `None` when the table draws nothing; overrides always answer.
    pub fn resolve<R: Rng + ?Sized>(&self, location: &Location, rng: &mut R) -> Option<V> {
        match self {
            Self::Table(table) => table.get_one(rng),
            Self::Override(choose) => Some(choose(location)),
        }
    }
}

impl<V> fmt::Debug for VariantSource<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => f
                .debug_struct("Table")
                .field("entries", &table.len())
                .field("total_weight", &table.total_weight())
                .finish(),
            Self::Override(_) => f.write_str("Override"),
        }
    }
}

/// Per-chunk feature placement for one feature kind.
///
/// Cloning copies the whole configuration; an override function is shared
/// between clones.
///
/// ## Concurrency
///
/// `populate` takes `&self`, so one fully configured populator can serve
/// many generation threads at once, each with its own generator. Configure
/// before sharing: the setters need `&mut self`.
#[derive(Clone)]
pub struct FeaturePopulator<V, E> {
    /// Feature kind reported by the diagnostic string.
    kind: &'static str,
    /// Requested amount per chunk (input to the batching formula).
    count: VariableAmount,
    /// Weighted variant table.
    table: WeightedTable<V>,
    /// Optional table bypass.
    override_fn: Option<VariantOverride<V>>,
    /// Variant the table is seeded with on construction and reset.
    default_variant: V,
    /// Emission primitive for this feature kind.
    emitter: E,
}

impl<V: Clone, E> FeaturePopulator<V, E> {
    /// Creates a populator placing `default_variant` with a count of 128.
    #[must_use]
    pub fn new(kind: &'static str, default_variant: V, emitter: E) -> Self {
        Self {
            kind,
            count: VariableAmount::fixed(DEFAULT_PER_CHUNK),
            table: WeightedTable::single(default_variant.clone()),
            override_fn: None,
            default_variant,
            emitter,
        }
    }

    /// Restores the construction-time configuration.
    pub fn reset_to_default(&mut self) {
        self.count = VariableAmount::fixed(DEFAULT_PER_CHUNK);
        self.table = WeightedTable::single(self.default_variant.clone());
        self.override_fn = None;
    }
}

impl<V, E> FeaturePopulator<V, E> {
    /// Feature kind name.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Requested amount per chunk.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> &VariableAmount {
        &self.count
    }

    /// Replaces the requested amount per chunk.
    pub fn set_count(&mut self, count: VariableAmount) {
        self.count = count;
    }

    /// The weighted variant table.
    #[inline]
    #[must_use]
    pub const fn table(&self) -> &WeightedTable<V> {
        &self.table
    }

    /// Mutable access to the variant table. Changes apply to later calls.
    pub fn table_mut(&mut self) -> &mut WeightedTable<V> {
        &mut self.table
    }

    /// Replaces the variant table.
    pub fn set_table(&mut self, table: WeightedTable<V>) {
        self.table = table;
    }

    /// The override function, if one is set.
    #[must_use]
    pub fn override_fn(&self) -> Option<&VariantOverride<V>> {
        self.override_fn.as_ref()
    }

    /// Routes every placement through `choose` instead of the table.
    pub fn set_override<F>(&mut self, choose: F)
    where
        F: Fn(&Location) -> V + Send + Sync + 'static,
    {
        self.override_fn = Some(Arc::new(choose));
    }

    /// Goes back to drawing from the table.
    pub fn clear_override(&mut self) {
        self.override_fn = None;
    }

    /// Variant seeded into the table on construction.
    #[inline]
    #[must_use]
    pub const fn default_variant(&self) -> &V {
        &self.default_variant
    }

    /// The emission primitive.
    #[inline]
    #[must_use]
    pub const fn emitter(&self) -> &E {
        &self.emitter
    }

    /// The currently active variant source.
    #[must_use]
    pub fn variant_source(&self) -> VariantSource<'_, V> {
        match &self.override_fn {
            Some(choose) => VariantSource::Override(&**choose),
            None => VariantSource::Table(&self.table),
        }
    }
}

impl<V: Clone, E> FeaturePopulator<V, E> {
    /// Populates one chunk.
    ///
    /// Runs `ceil(floor(count) / 128)` iterations. Each one picks a column,
    /// finds the surface, resolves a variant and emits it one block above the
    /// surface. An iteration whose table draw comes back empty is skipped,
    /// not retried.
    pub fn populate<W, R>(&self, world: &mut W, chunk: ChunkCoord, rng: &mut R)
    where
        W: TerrainSurface + ?Sized,
        E: FeatureEmitter<W, V>,
        R: RngCore,
    {
        let target = self.count.floored_amount(rng);
        let iterations = batch_iterations(target);
        let source = self.variant_source();
        let min = chunk.min_corner();

        let mut placed = 0u64;
        for iteration in 0..iterations {
            let column_x = min.x.wrapping_add(COLUMN_INSET + rng.gen_range(0..COLUMN_SPREAD));
            let column_z = min.z.wrapping_add(COLUMN_INSET + rng.gen_range(0..COLUMN_SPREAD));
            let position = world.top_solid_or_liquid(column_x, column_z).up();

            let location = Location::new(chunk, position);
            let Some(variant) = source.resolve(&location, rng) else {
                tracing::trace!(
                    kind = self.kind,
                    iteration,
                    "variant table drew nothing, skipping placement"
                );
                continue;
            };

            self.emitter.emit(world, rng, position, &variant);
            placed += 1;
        }

        tracing::debug!(
            kind = self.kind,
            chunk.x = chunk.x,
            chunk.z = chunk.z,
            target,
            iterations,
            placed,
            "populated chunk"
        );
    }
}

impl<V, E> fmt::Display for FeaturePopulator<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeaturePopulator {{ type: {}, per_chunk: {} }}",
            self.kind, self.count
        )
    }
}

impl<V: fmt::Debug, E> fmt::Debug for FeaturePopulator<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeaturePopulator")
            .field("kind", &self.kind)
            .field("count", &self.count)
            .field("table", &self.table)
            .field("override", &self.override_fn.is_some())
            .field("default_variant", &self.default_variant)
            .finish_non_exhaustive()
    }
}
