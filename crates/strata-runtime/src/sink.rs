use hashbrown::HashMap;
use strata_mesh_cpu::ChunkMesh;
use strata_world::ChunkCoord;

/// Receiver of finished chunk meshes (a renderer, or a stand-in for one).
/// On rebuild the previous mesh is retired before its replacement is installed.
pub trait ChunkMeshSink {
    fn retire(&mut self, coord: ChunkCoord, old: ChunkMesh);
    fn install(&mut self, coord: ChunkCoord, mesh: &ChunkMesh);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ChunkMeshSink for NullSink {
    fn retire(&mut self, _coord: ChunkCoord, _old: ChunkMesh) {}
    fn install(&mut self, _coord: ChunkCoord, _mesh: &ChunkMesh) {}
}

/// Tracks what a batching renderer would hold: one draw call per live batch.
#[derive(Debug, Default)]
pub struct DrawCallCounter {
    live: HashMap<ChunkCoord, (usize, usize)>,
    pub installs: usize,
    pub retires: usize,
}

impl DrawCallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_calls(&self) -> usize {
        self.live.values().map(|(batches, _)| batches).sum()
    }

    pub fn faces(&self) -> usize {
        self.live.values().map(|(_, faces)| faces).sum()
    }

    pub fn live_chunks(&self) -> usize {
        self.live.len()
    }
}

impl ChunkMeshSink for DrawCallCounter {
    fn retire(&mut self, coord: ChunkCoord, _old: ChunkMesh) {
        self.live.remove(&coord);
        self.retires += 1;
    }

    fn install(&mut self, coord: ChunkCoord, mesh: &ChunkMesh) {
        self.live
            .insert(coord, (mesh.batch_count(), mesh.face_count()));
        self.installs += 1;
    }
}
