use hashbrown::HashMap;
use strata_world::{ChunkCoord, ChunkFill, TerrainGenerator, TouchedChunks, VoxelStore};

/// Lifecycle of a loaded chunk. Absent from the table means unloaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    Generated,
    Meshed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkEntry {
    pub state: ChunkState,
    /// Mesh is stale relative to stored voxels.
    pub dirty: bool,
}

/// Tracks which chunk columns exist and drives their generation.
pub struct ChunkManager {
    entries: HashMap<ChunkCoord, ChunkEntry>,
    generator: TerrainGenerator,
}

impl ChunkManager {
    pub fn new(generator: TerrainGenerator) -> Self {
        Self {
            entries: HashMap::new(),
            generator,
        }
    }

    #[inline]
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    #[inline]
    pub fn contains(&self, c: ChunkCoord) -> bool {
        self.entries.contains_key(&c)
    }

    #[inline]
    pub fn entry(&self, c: ChunkCoord) -> Option<&ChunkEntry> {
        self.entries.get(&c)
    }

    #[inline]
    pub fn state(&self, c: ChunkCoord) -> Option<ChunkState> {
        self.entries.get(&c).map(|e| e.state)
    }

    #[inline]
    pub fn is_dirty(&self, c: ChunkCoord) -> bool {
        self.entries.get(&c).is_some_and(|e| e.dirty)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.entries.keys().copied()
    }

    /// Fills the chunk's columns and records it as Generated (and dirty).
    /// Returns `None` without touching the store if the chunk already exists.
    pub fn generate(&mut self, store: &mut VoxelStore, c: ChunkCoord) -> Option<ChunkFill> {
        if self.entries.contains_key(&c) {
            return None;
        }
        let fill = self.generator.generate_chunk(store, c);
        self.entries.insert(
            c,
            ChunkEntry {
                state: ChunkState::Generated,
                dirty: true,
            },
        );
        Some(fill)
    }

    /// Flags an existing chunk's mesh as stale. Returns false for unloaded chunks.
    pub fn mark_dirty(&mut self, c: ChunkCoord) -> bool {
        match self.entries.get_mut(&c) {
            Some(e) => {
                e.dirty = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn mark_meshed(&mut self, c: ChunkCoord) {
        if let Some(e) = self.entries.get_mut(&c) {
            e.state = ChunkState::Meshed;
            e.dirty = false;
        }
    }

    /// The loaded subset of the chunks an edit touched, owner first.
    pub fn invalidated_by(&self, touched: &TouchedChunks) -> Vec<ChunkCoord> {
        touched.iter().filter(|c| self.contains(*c)).collect()
    }

    pub fn loaded_neighbors(&self, c: ChunkCoord) -> impl Iterator<Item = ChunkCoord> + '_ {
        c.neighbors4().into_iter().filter(|n| self.contains(*n))
    }

    /// Unloaded chunks within the square of `radius` around `center`, nearest first.
    pub fn missing_around(&self, center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = square_around(center, radius)
            .into_iter()
            .filter(|c| !self.contains(*c))
            .collect();
        out.sort_by_key(|c| (c.distance_sq(center), c.cx, c.cz));
        out
    }
}

/// Largest radius the loader walks; 65x65 chunks.
pub const MAX_RENDER_DISTANCE: i32 = 32;

/// Every chunk in `[center - radius, center + radius]^2`, row-major by cx then cz.
/// `radius` is clamped to `0..=MAX_RENDER_DISTANCE`.
pub fn square_around(center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
    let r = radius.clamp(0, MAX_RENDER_DISTANCE);
    let side = 2 * r as usize + 1;
    let mut out = Vec::with_capacity(side * side);
    for cx in center.cx.saturating_sub(r)..=center.cx.saturating_add(r) {
        for cz in center.cz.saturating_sub(r)..=center.cz.saturating_add(r) {
            out.push(ChunkCoord::new(cx, cz));
        }
    }
    out
}
