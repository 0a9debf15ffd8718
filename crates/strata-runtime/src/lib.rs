//! Single-threaded engine core: chunk lifecycle, dirty tracking, and budgeted remeshing.
#![forbid(unsafe_code)]

mod chunks;
mod scheduler;
mod sink;

pub use chunks::{ChunkEntry, ChunkManager, ChunkState, MAX_RENDER_DISTANCE, square_around};
pub use scheduler::{Clock, DrainReport, MonotonicClock, RebuildScheduler};
pub use sink::{ChunkMeshSink, DrawCallCounter, NullSink};

use std::time::Duration;

use hashbrown::HashMap;
use strata_blocks::BlockType;
use strata_mesh_cpu::{ChunkMesh, build_chunk_mesh};
use strata_world::{ChunkCoord, TerrainGenerator, VoxelStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Generate,
    Mesh,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub chunks: usize,
    pub meshed: usize,
    pub queued: usize,
    pub voxels: usize,
    pub batches: usize,
    pub faces: usize,
}

/// Owns the voxel store and every piece of derived state. All voxel writes go
/// through [`Runtime::set`], so no edit can bypass dirty propagation.
pub struct Runtime {
    store: VoxelStore,
    chunks: ChunkManager,
    scheduler: RebuildScheduler,
    meshes: HashMap<ChunkCoord, ChunkMesh>,
    budget: Duration,
    clock: MonotonicClock,
}

impl Runtime {
    pub fn new(generator: TerrainGenerator, budget: Duration) -> Self {
        Self {
            store: VoxelStore::new(),
            chunks: ChunkManager::new(generator),
            scheduler: RebuildScheduler::new(),
            meshes: HashMap::new(),
            budget,
            clock: MonotonicClock::default(),
        }
    }

    #[inline]
    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    #[inline]
    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    #[inline]
    pub fn scheduler(&self) -> &RebuildScheduler {
        &self.scheduler
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    #[inline]
    pub fn mesh(&self, c: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&c)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.store.get(x, y, z)
    }

    /// Writes one voxel and queues every loaded chunk whose mesh it can change.
    /// Returns how many chunks were newly queued.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: Option<BlockType>) -> usize {
        let touched = self.store.set(x, y, z, block);
        let mut queued = 0;
        for c in self.chunks.invalidated_by(&touched) {
            self.chunks.mark_dirty(c);
            if self.scheduler.enqueue(c) {
                queued += 1;
            }
        }
        log::trace!(target: "chunks", "set ({x},{y},{z}) = {block:?}: {} touched, {queued} queued", touched.len());
        queued
    }

    /// Generates a chunk if absent. The new chunk and its loaded horizontal
    /// neighbors are queued, since the neighbors' seam faces may now be hidden.
    pub fn generate(&mut self, c: ChunkCoord) -> bool {
        let Some(fill) = self.chunks.generate(&mut self.store, c) else {
            return false;
        };
        self.scheduler.enqueue(c);
        let neighbors: Vec<ChunkCoord> = self.chunks.loaded_neighbors(c).collect();
        for n in neighbors {
            self.chunks.mark_dirty(n);
            self.scheduler.enqueue(n);
        }
        log::debug!(
            target: "chunks",
            "generated ({},{}): {} voxels, {} trees",
            c.cx,
            c.cz,
            fill.voxels,
            fill.trees
        );
        true
    }

    /// Generates every missing chunk within `radius` of `center`, nearest first.
    pub fn ensure_loaded_around(&mut self, center: ChunkCoord, radius: i32) -> usize {
        let missing = self.chunks.missing_around(center, radius);
        let n = missing.len();
        for c in missing {
            self.generate(c);
        }
        n
    }

    /// Rebuilds one chunk's mesh immediately and hands it to `sink`.
    ///
    /// # Panics
    /// If the chunk was never generated.
    pub fn rebuild_chunk(&mut self, c: ChunkCoord, sink: &mut dyn ChunkMeshSink) {
        self.scheduler.cancel(c);
        rebuild_into(&self.store, &mut self.chunks, &mut self.meshes, sink, c);
    }

    /// Spends up to the configured budget draining the rebuild queue.
    pub fn drain(&mut self, sink: &mut dyn ChunkMeshSink) -> DrainReport {
        let clock = self.clock;
        self.drain_with_clock(self.budget, &clock, sink)
    }

    pub fn drain_with_clock(
        &mut self,
        budget: Duration,
        clock: &dyn Clock,
        sink: &mut dyn ChunkMeshSink,
    ) -> DrainReport {
        let store = &self.store;
        let chunks = &mut self.chunks;
        let meshes = &mut self.meshes;
        let report = self
            .scheduler
            .drain(budget, clock, |c| rebuild_into(store, chunks, meshes, sink, c));
        if report.remaining > 0 {
            log::debug!(
                target: "rebuild",
                "drain: {} rebuilt in {:?}, {} deferred",
                report.rebuilt,
                report.elapsed,
                report.remaining
            );
        }
        report
    }

    /// Generates then meshes the square of `radius` around `center`, reporting
    /// `(phase, done, total)` after each chunk. Meshing happens after all
    /// generation so seams are built against their neighbors.
    pub fn load_area<F>(
        &mut self,
        center: ChunkCoord,
        radius: i32,
        sink: &mut dyn ChunkMeshSink,
        mut on_progress: F,
    ) -> usize
    where
        F: FnMut(LoadPhase, usize, usize),
    {
        let mut area = square_around(center, radius);
        area.sort_by_key(|c| (c.distance_sq(center), c.cx, c.cz));
        let total = area.len();
        for (i, c) in area.iter().enumerate() {
            self.generate(*c);
            on_progress(LoadPhase::Generate, i + 1, total);
        }
        for (i, c) in area.iter().enumerate() {
            self.rebuild_chunk(*c, sink);
            on_progress(LoadPhase::Mesh, i + 1, total);
        }
        log::info!(
            target: "chunks",
            "loaded {total} chunks around ({},{}), {} voxels",
            center.cx,
            center.cz,
            self.store.len()
        );
        total
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            chunks: self.chunks.len(),
            meshed: self.meshes.len(),
            queued: self.scheduler.len(),
            voxels: self.store.len(),
            batches: self.meshes.values().map(ChunkMesh::batch_count).sum(),
            faces: self.meshes.values().map(ChunkMesh::face_count).sum(),
        }
    }
}

fn rebuild_into(
    store: &VoxelStore,
    chunks: &mut ChunkManager,
    meshes: &mut HashMap<ChunkCoord, ChunkMesh>,
    sink: &mut dyn ChunkMeshSink,
    c: ChunkCoord,
) {
    assert!(
        chunks.contains(c),
        "rebuild of chunk ({},{}) which was never generated",
        c.cx,
        c.cz
    );
    let mesh = build_chunk_mesh(store, c);
    let replaced = match meshes.remove(&c) {
        Some(old) => {
            sink.retire(c, old);
            true
        }
        None => false,
    };
    sink.install(c, &mesh);
    log::trace!(target: "rebuild", "installed ({},{}), replaced={replaced}", c.cx, c.cz);
    meshes.insert(c, mesh);
    chunks.mark_meshed(c);
}
