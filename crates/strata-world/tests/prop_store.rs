use proptest::prelude::*;
use strata_blocks::BlockType;
use strata_world::{CHUNK_SIZE, ChunkCoord, VoxelStore, WORLD_HEIGHT, world_to_chunk};

fn coord() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

fn any_y() -> impl Strategy<Value = i32> {
    -5i32..WORLD_HEIGHT + 5
}

fn arb_block() -> impl Strategy<Value = BlockType> {
    (0u8..BlockType::COUNT as u8).prop_map(|id| BlockType::from_id(id).unwrap())
}

proptest! {
    // set(T) then set(empty) then get reads empty, for any coordinate
    #[test]
    fn set_clear_get_round_trip(x in coord(), y in any_y(), z in coord(), b in arb_block()) {
        let mut store = VoxelStore::new();
        store.set(x, y, z, Some(b));
        store.set(x, y, z, None);
        prop_assert_eq!(store.get(x, y, z), None);
        prop_assert!(store.is_empty());
    }

    // Reads mirror writes only inside the vertical range
    #[test]
    fn y_range_policy(x in coord(), y in any_y(), z in coord(), b in arb_block()) {
        let mut store = VoxelStore::new();
        let touched = store.set(x, y, z, Some(b));
        let in_range = (0..WORLD_HEIGHT).contains(&y);
        prop_assert_eq!(touched.is_empty(), !in_range);
        prop_assert_eq!(store.get(x, y, z), in_range.then_some(b));
        prop_assert_eq!(store.len(), usize::from(in_range));
    }

    // The owner comes first; every extra chunk shares the edited voxel's boundary plane
    #[test]
    fn touched_chunks_share_the_edit_plane(x in coord(), y in 0..WORLD_HEIGHT, z in coord()) {
        let store = VoxelStore::new();
        let touched = store.affected_chunks(x, y, z);
        let owner = world_to_chunk(x, z);
        prop_assert_eq!(touched.as_slice()[0], owner);
        prop_assert!(touched.len() <= 3);

        let lx = x.rem_euclid(CHUNK_SIZE);
        let lz = z.rem_euclid(CHUNK_SIZE);
        let mut expect = vec![owner];
        if lx == 0 { expect.push(owner.offset(-1, 0)); }
        if lx == CHUNK_SIZE - 1 { expect.push(owner.offset(1, 0)); }
        if lz == 0 { expect.push(owner.offset(0, -1)); }
        if lz == CHUNK_SIZE - 1 { expect.push(owner.offset(0, 1)); }
        prop_assert_eq!(touched.as_slice(), expect.as_slice());
    }

    // A voxel and its face neighbor across a chunk seam always touch each other's chunk
    #[test]
    fn seam_neighbors_are_mutual(cx in -1000i32..1000, cz in -1000i32..1000, lz in 0..CHUNK_SIZE, y in 0..WORLD_HEIGHT) {
        let store = VoxelStore::new();
        let left = ChunkCoord::new(cx, cz);
        let right = left.offset(1, 0);
        let (x0, z0) = right.origin();
        prop_assert!(store.affected_chunks(x0, y, z0 + lz).contains(left));
        prop_assert!(store.affected_chunks(x0 - 1, y, z0 + lz).contains(right));
    }
}
