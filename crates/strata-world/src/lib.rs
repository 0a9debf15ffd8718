//! World sizing, sparse voxel storage, and terrain synthesis.
#![forbid(unsafe_code)]

mod chunk_coord;
mod store;
pub mod terrain;
pub mod worldgen;

pub use chunk_coord::{ChunkCoord, world_to_chunk};
pub use store::{TouchedChunks, VoxelPos, VoxelStore};
pub use terrain::{Biome, ChunkFill, ColumnSample, TerrainGenerator};
pub use worldgen::WorldGenParams;

/// Width and depth of a chunk column, in voxels.
pub const CHUNK_SIZE: i32 = 16;
/// Number of voxel layers; valid y is `0..WORLD_HEIGHT`.
pub const WORLD_HEIGHT: i32 = 20;

#[inline]
pub fn y_in_range(y: i32) -> bool {
    (0..WORLD_HEIGHT).contains(&y)
}
