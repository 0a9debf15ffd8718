use hashbrown::HashMap;
use strata_blocks::BlockType;

use crate::chunk_coord::{ChunkCoord, world_to_chunk};
use crate::{CHUNK_SIZE, y_in_range};

/// Integer voxel coordinate used as the map key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    #[inline]
    pub fn chunk(self) -> ChunkCoord {
        world_to_chunk(self.x, self.z)
    }
}

impl From<(i32, i32, i32)> for VoxelPos {
    fn from(v: (i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2)
    }
}

/// Chunks whose meshes a single voxel write can invalidate: the owner first,
/// then any neighbor sharing the edited boundary plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchedChunks {
    chunks: [ChunkCoord; 5],
    len: u8,
}

impl TouchedChunks {
    #[inline]
    pub const fn none() -> Self {
        Self {
            chunks: [ChunkCoord::new(0, 0); 5],
            len: 0,
        }
    }

    #[inline]
    fn push(&mut self, c: ChunkCoord) {
        self.chunks[self.len as usize] = c;
        self.len += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChunkCoord] {
        &self.chunks[..self.len as usize]
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.as_slice().iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, c: ChunkCoord) -> bool {
        self.as_slice().contains(&c)
    }
}

/// Sparse map from voxel coordinate to block kind, bucketed per chunk column.
/// An absent key is empty space; no key ever maps to "empty".
#[derive(Default, Debug, Clone)]
pub struct VoxelStore {
    // Per-chunk buckets: key=(cx,cz) -> map of world coords -> block
    inner: HashMap<ChunkCoord, HashMap<VoxelPos, BlockType>>,
    len: usize,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block at (x, y, z), or `None` for empty space. Never fails; out-of-range y is empty.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        if !y_in_range(y) {
            return None;
        }
        self.inner
            .get(&world_to_chunk(x, z))
            .and_then(|m| m.get(&VoxelPos::new(x, y, z)).copied())
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some()
    }

    /// Writes `block` at (x, y, z); `None` removes. Writes with y outside
    /// `0..WORLD_HEIGHT` are ignored and touch nothing. Otherwise returns the
    /// chunks whose meshes the write invalidates, whether or not the value changed.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: Option<BlockType>) -> TouchedChunks {
        if !y_in_range(y) {
            return TouchedChunks::none();
        }
        let key = world_to_chunk(x, z);
        let pos = VoxelPos::new(x, y, z);
        match block {
            Some(b) => {
                if self.inner.entry(key).or_default().insert(pos, b).is_none() {
                    self.len += 1;
                }
            }
            None => {
                if let Some(m) = self.inner.get_mut(&key) {
                    if m.remove(&pos).is_some() {
                        self.len -= 1;
                    }
                    if m.is_empty() {
                        self.inner.remove(&key);
                    }
                }
            }
        }
        self.affected_chunks(x, y, z)
    }

    /// Owning chunk of (x, z) plus each neighbor whose shared face plane the
    /// voxel lies on. At most one X and one Z neighbor can apply.
    pub fn affected_chunks(&self, x: i32, y: i32, z: i32) -> TouchedChunks {
        let mut out = TouchedChunks::none();
        if !y_in_range(y) {
            return out;
        }
        let owner = world_to_chunk(x, z);
        let lx = x.rem_euclid(CHUNK_SIZE);
        let lz = z.rem_euclid(CHUNK_SIZE);
        out.push(owner);
        if lx == 0 {
            out.push(owner.offset(-1, 0));
        }
        if lx == CHUNK_SIZE - 1 {
            out.push(owner.offset(1, 0));
        }
        if lz == 0 {
            out.push(owner.offset(0, -1));
        }
        if lz == CHUNK_SIZE - 1 {
            out.push(owner.offset(0, 1));
        }
        out
    }

    /// Total number of stored (non-empty) voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunk_voxel_count(&self, c: ChunkCoord) -> usize {
        self.inner.get(&c).map_or(0, |m| m.len())
    }

    /// Voxels inside one chunk column, in unspecified order.
    pub fn iter_chunk(&self, c: ChunkCoord) -> impl Iterator<Item = (VoxelPos, BlockType)> + '_ {
        self.inner
            .get(&c)
            .into_iter()
            .flat_map(|m| m.iter().map(|(p, b)| (*p, *b)))
    }

    /// Every stored voxel, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelPos, BlockType)> + '_ {
        self.inner
            .values()
            .flat_map(|m| m.iter().map(|(p, b)| (*p, *b)))
    }
}
