//! Deterministic column synthesis: climate -> biome -> height -> layered fill, plus trees.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::BlockType;

use crate::chunk_coord::ChunkCoord;
use crate::store::VoxelStore;
use crate::worldgen::WorldGenParams;
use crate::{CHUNK_SIZE, WORLD_HEIGHT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Snow,
    Desert,
    Plains,
    Forest,
    Grassland,
}

impl Biome {
    /// Ordered decision table; the first matching rule wins.
    pub fn classify(temperature: f32, moisture: f32, p: &WorldGenParams) -> Biome {
        if temperature < p.snow_temp_max {
            Biome::Snow
        } else if temperature > p.desert_temp_min && moisture < p.desert_moisture_max {
            Biome::Desert
        } else if moisture < p.plains_moisture_max {
            Biome::Plains
        } else if moisture > p.forest_moisture_min {
            Biome::Forest
        } else {
            Biome::Grassland
        }
    }

    pub fn surface_block(self) -> BlockType {
        match self {
            Biome::Snow => BlockType::Snow,
            Biome::Desert => BlockType::Sand,
            Biome::Plains => BlockType::Grass,
            Biome::Forest => BlockType::DarkGrass,
            Biome::Grassland => BlockType::Grass,
        }
    }

    pub fn subsurface_block(self) -> BlockType {
        match self {
            Biome::Desert => BlockType::Sand,
            _ => BlockType::Dirt,
        }
    }

    fn height_offset(self, p: &WorldGenParams) -> f32 {
        match self {
            Biome::Snow => p.snow_height_offset,
            Biome::Desert => p.desert_height_offset,
            _ => 0.0,
        }
    }
}

/// Everything the fill needs to know about one (x, z) column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    pub biome: Biome,
    /// y of the surface block; may exceed the world ceiling, in which case the surface is clipped.
    pub height: i32,
    pub surface: BlockType,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkFill {
    pub columns: usize,
    pub voxels: usize,
    pub trees: usize,
}

pub struct TerrainGenerator {
    seed: i32,
    params: WorldGenParams,
    terrain: FastNoiseLite,
    temperature: FastNoiseLite,
    moisture: FastNoiseLite,
}

fn noise(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_noise_type(Some(NoiseType::OpenSimplex2));
    n.set_frequency(Some(frequency));
    n
}

impl TerrainGenerator {
    pub fn new(seed: i32) -> Self {
        Self::with_params(seed, WorldGenParams::default())
    }

    pub fn with_params(seed: i32, params: WorldGenParams) -> Self {
        let terrain = noise(seed, params.height_frequency);
        let temperature = noise(seed ^ 0x1203_5F31, params.climate_frequency);
        let moisture = noise(
            ((seed as u32) ^ 0x92E3_A1B2u32) as i32,
            params.climate_frequency,
        );
        Self {
            seed,
            params,
            terrain,
            temperature,
            moisture,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// (temperature, moisture), each in -1..1.
    pub fn climate_at(&self, wx: i32, wz: i32) -> (f32, f32) {
        let (x, z) = (wx as f32, wz as f32);
        (
            self.temperature.get_noise_2d(x, z),
            self.moisture.get_noise_2d(x, z),
        )
    }

    pub fn biome_at(&self, wx: i32, wz: i32) -> Biome {
        let (t, m) = self.climate_at(wx, wz);
        Biome::classify(t, m, &self.params)
    }

    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        self.sample_column(wx, wz).height
    }

    pub fn sample_column(&self, wx: i32, wz: i32) -> ColumnSample {
        let biome = self.biome_at(wx, wz);
        let n = self.terrain.get_noise_2d(wx as f32, wz as f32);
        let p = &self.params;
        let h = p.base_height + n * p.height_amplitude + biome.height_offset(p);
        ColumnSample {
            biome,
            height: h.floor() as i32,
            surface: biome.surface_block(),
        }
    }

    /// Layered column content at height `y`: surface, then sub-surface, then stone.
    pub fn block_for(&self, sample: &ColumnSample, y: i32) -> Option<BlockType> {
        if y < 0 || y > sample.height {
            None
        } else if y == sample.height {
            Some(sample.surface)
        } else if y >= sample.height - self.params.subsoil_depth {
            Some(sample.biome.subsurface_block())
        } else {
            Some(BlockType::Stone)
        }
    }

    /// Whether the column carries a tree. Only forest columns qualify.
    pub fn has_tree(&self, sample: &ColumnSample, wx: i32, wz: i32) -> bool {
        sample.biome == Biome::Forest
            && rand01_tree(self.seed as u32, wx, wz, 0x7EE5) < self.params.tree_probability
    }

    /// Writes one column (and its tree, if any) into `store`, overwriting
    /// whatever occupied cells `0..=height`. Returns the sample, the number of
    /// voxels written, and whether a tree was placed.
    pub fn fill_column(&self, store: &mut VoxelStore, wx: i32, wz: i32) -> (ColumnSample, usize, bool) {
        let sample = self.sample_column(wx, wz);
        let top = sample.height.min(WORLD_HEIGHT - 1);
        let mut written = 0;
        for y in 0..=top {
            if let Some(b) = self.block_for(&sample, y) {
                store.set(wx, y, wz, Some(b));
                written += 1;
            }
        }
        let tree = self.has_tree(&sample, wx, wz);
        if tree {
            written += self.place_tree(store, wx, sample.height, wz);
        }
        (sample, written, tree)
    }

    /// Trunk column plus a cross-shaped leaf cap; leaves may land in a neighboring chunk.
    fn place_tree(&self, store: &mut VoxelStore, wx: i32, surface: i32, wz: i32) -> usize {
        let th = self.params.trunk_height;
        let mut cells: Vec<(i32, i32, i32, BlockType)> = Vec::with_capacity(th as usize + 5);
        for ty in 1..=th {
            cells.push((wx, surface + ty, wz, BlockType::Wood));
        }
        let cap = surface + th;
        cells.push((wx, cap + 1, wz, BlockType::DarkGrass));
        cells.push((wx + 1, cap, wz, BlockType::DarkGrass));
        cells.push((wx - 1, cap, wz, BlockType::DarkGrass));
        cells.push((wx, cap, wz + 1, BlockType::DarkGrass));
        cells.push((wx, cap, wz - 1, BlockType::DarkGrass));
        cells
            .into_iter()
            .filter(|&(x, y, z, b)| !store.set(x, y, z, Some(b)).is_empty())
            .count()
    }

    /// Fills every column of `coord`. Deterministic in (seed, params, coord).
    pub fn generate_chunk(&self, store: &mut VoxelStore, coord: ChunkCoord) -> ChunkFill {
        let (x0, z0) = coord.origin();
        let mut fill = ChunkFill::default();
        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let (_, written, tree) = self.fill_column(store, x0 + lx, z0 + lz);
                fill.columns += 1;
                fill.voxels += written;
                fill.trees += usize::from(tree);
            }
        }
        log::trace!(target: "worldgen", "chunk ({}, {}) filled: {:?}", coord.cx, coord.cz, fill);
        fill
    }
}

fn hash2_tree(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

fn rand01_tree(world_seed: u32, ix: i32, iz: i32, salt: u32) -> f32 {
    let h = hash2_tree(ix, iz, (world_seed ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WorldGenParams {
        WorldGenParams::default()
    }

    #[test]
    fn decision_table_is_ordered() {
        let p = params();
        // Very cold wins even when dry and wet thresholds also match
        assert_eq!(Biome::classify(-0.9, -0.9, &p), Biome::Snow);
        assert_eq!(Biome::classify(-0.9, 0.9, &p), Biome::Snow);
        assert_eq!(Biome::classify(0.5, -0.25, &p), Biome::Desert);
        // Hot but not dry enough for desert falls through to the moisture rules
        assert_eq!(Biome::classify(0.5, -0.1, &p), Biome::Grassland);
        assert_eq!(Biome::classify(0.0, -0.5, &p), Biome::Plains);
        assert_eq!(Biome::classify(0.0, 0.5, &p), Biome::Forest);
        assert_eq!(Biome::classify(0.0, 0.0, &p), Biome::Grassland);
    }

    #[test]
    fn column_layers() {
        let g = TerrainGenerator::new(7);
        let s = ColumnSample {
            biome: Biome::Desert,
            height: 9,
            surface: BlockType::Sand,
        };
        assert_eq!(g.block_for(&s, 10), None);
        assert_eq!(g.block_for(&s, 9), Some(BlockType::Sand));
        assert_eq!(g.block_for(&s, 6), Some(BlockType::Sand));
        assert_eq!(g.block_for(&s, 5), Some(BlockType::Stone));
        assert_eq!(g.block_for(&s, 0), Some(BlockType::Stone));

        let s = ColumnSample {
            biome: Biome::Plains,
            height: 9,
            surface: BlockType::Grass,
        };
        assert_eq!(g.block_for(&s, 9), Some(BlockType::Grass));
        assert_eq!(g.block_for(&s, 8), Some(BlockType::Dirt));
    }

    #[test]
    fn default_heights_stay_inside_the_world() {
        let g = TerrainGenerator::new(1234);
        for x in (-200..200).step_by(7) {
            for z in (-200..200).step_by(11) {
                let h = g.height_at(x, z);
                assert!((0..WORLD_HEIGHT).contains(&h), "height {h} at ({x},{z})");
            }
        }
    }

    #[test]
    fn trees_only_in_forest() {
        let mut p = params();
        p.tree_probability = 1.0;
        let g = TerrainGenerator::with_params(99, p);
        for biome in [Biome::Snow, Biome::Desert, Biome::Plains, Biome::Grassland] {
            let s = ColumnSample {
                biome,
                height: 8,
                surface: biome.surface_block(),
            };
            assert!(!g.has_tree(&s, 3, 4));
        }
        let forest = ColumnSample {
            biome: Biome::Forest,
            height: 8,
            surface: BlockType::DarkGrass,
        };
        assert!(g.has_tree(&forest, 3, 4));
    }

    #[test]
    fn tree_shape() {
        let g = TerrainGenerator::new(5);
        let mut store = VoxelStore::new();
        let placed = g.place_tree(&mut store, 0, 8, 0);
        // Four trunk blocks, one cap leaf, four cross leaves; the cap at y=13 is in range
        assert_eq!(placed, 9);
        for y in 9..=12 {
            assert_eq!(store.get(0, y, 0), Some(BlockType::Wood));
        }
        assert_eq!(store.get(0, 13, 0), Some(BlockType::DarkGrass));
        for (x, z) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            assert_eq!(store.get(x, 12, z), Some(BlockType::DarkGrass));
        }
        // The cross at trunk-top height replaces nothing on the trunk itself
        assert_eq!(store.get(0, 12, 0), Some(BlockType::Wood));
    }

    #[test]
    fn tree_above_ceiling_is_clipped() {
        let g = TerrainGenerator::new(5);
        let mut store = VoxelStore::new();
        let placed = g.place_tree(&mut store, 0, WORLD_HEIGHT - 3, 0);
        // Trunk y = 18, 19 fit; everything above the ceiling is rejected
        assert_eq!(placed, 2);
        assert_eq!(store.len(), 2);
    }
}
