//! CPU meshing crate: face culling and per-(block, face) instance batching.
#![forbid(unsafe_code)]

mod face;

pub use face::{Face, FaceQuad};

use strata_blocks::{BlockType, MaterialSelector};
use strata_world::{CHUNK_SIZE, ChunkCoord, VoxelPos, VoxelStore, WORLD_HEIGHT};

/// All visible faces of one block kind pointing one way: one instanced draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshBatch {
    pub block: BlockType,
    pub face: Face,
    pub material: MaterialSelector,
    /// Voxel positions in scan order; each is one instance of `FaceQuad::for_face(face)`.
    pub positions: Vec<VoxelPos>,
}

/// The complete batch set of one chunk. Replaced wholesale on every rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub batches: Vec<MeshBatch>,
}

impl ChunkMesh {
    #[inline]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn face_count(&self) -> usize {
        self.batches.iter().map(|b| b.positions.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batch(&self, block: BlockType, face: Face) -> Option<&MeshBatch> {
        self.batches
            .iter()
            .find(|b| b.block == block && b.face == face)
    }
}

/// A face is visible when the cell it looks into is empty or holds the liquid.
#[inline]
pub fn face_visible(store: &VoxelStore, pos: VoxelPos, face: Face) -> bool {
    let (dx, dy, dz) = face.delta();
    match store.get(pos.x + dx, pos.y + dy, pos.z + dz) {
        None => true,
        Some(n) => n.is_liquid(),
    }
}

/// Scans every cell of the chunk column and groups visible faces by (block, face).
/// Neighbor lookups go through the store, so faces on the chunk seam are culled
/// against the adjacent chunk's voxels.
pub fn build_chunk_mesh(store: &VoxelStore, coord: ChunkCoord) -> ChunkMesh {
    let mut groups: Vec<Vec<VoxelPos>> = vec![Vec::new(); BlockType::COUNT * Face::ALL.len()];
    let (x0, z0) = coord.origin();
    if store.chunk_voxel_count(coord) > 0 {
        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                for y in 0..WORLD_HEIGHT {
                    let (x, z) = (x0 + lx, z0 + lz);
                    let Some(block) = store.get(x, y, z) else {
                        continue;
                    };
                    let pos = VoxelPos::new(x, y, z);
                    for face in Face::ALL {
                        if face_visible(store, pos, face) {
                            groups[block.index() * Face::ALL.len() + face.index()].push(pos);
                        }
                    }
                }
            }
        }
    }

    let mut batches = Vec::new();
    for block in BlockType::ALL {
        for face in Face::ALL {
            let positions = std::mem::take(&mut groups[block.index() * Face::ALL.len() + face.index()]);
            if positions.is_empty() {
                continue;
            }
            batches.push(MeshBatch {
                block,
                face,
                material: block.material_for(face.role()),
                positions,
            });
        }
    }
    let mesh = ChunkMesh { coord, batches };
    log::trace!(
        target: "mesh",
        "chunk ({}, {}) meshed: {} batches, {} faces",
        coord.cx,
        coord.cz,
        mesh.batch_count(),
        mesh.face_count()
    );
    mesh
}
