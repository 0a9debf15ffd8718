use crate::CHUNK_SIZE;

/// Key of one full-height chunk column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// World-space (x, z) of the chunk's minimum corner.
    #[inline]
    pub fn origin(self) -> (i32, i32) {
        (self.cx * CHUNK_SIZE, self.cz * CHUNK_SIZE)
    }

    #[inline]
    pub fn contains(self, wx: i32, wz: i32) -> bool {
        world_to_chunk(wx, wz) == self
    }

    /// -X, +X, -Z, +Z neighbors, in that order.
    #[inline]
    pub fn neighbors4(self) -> [ChunkCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

/// Owning chunk of world column (wx, wz); floors toward negative infinity.
#[inline]
pub fn world_to_chunk(wx: i32, wz: i32) -> ChunkCoord {
    ChunkCoord::new(wx.div_euclid(CHUNK_SIZE), wz.div_euclid(CHUNK_SIZE))
}
