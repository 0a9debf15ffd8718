use std::cell::Cell;
use std::time::Duration;

use proptest::prelude::*;
use strata_blocks::BlockType;
use strata_mesh_cpu::build_chunk_mesh;
use strata_runtime::{Clock, NullSink, RebuildScheduler, Runtime};
use strata_world::{ChunkCoord, TerrainGenerator};

struct FakeClock(Cell<Duration>);

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn drain_processes_ceil_of_budget_over_cost(
        n in 1usize..40,
        budget_us in 1u64..20_000,
        cost_us in 1u64..5_000,
    ) {
        let mut s = RebuildScheduler::new();
        for i in 0..n {
            s.enqueue(ChunkCoord::new(i as i32, 0));
        }
        let clock = FakeClock(Cell::new(Duration::ZERO));
        let report = s.drain(Duration::from_micros(budget_us), &clock, |_| {
            clock.0.set(clock.0.get() + Duration::from_micros(cost_us));
        });
        let lower = (budget_us / cost_us) as usize;
        let upper = budget_us.div_ceil(cost_us) as usize;
        prop_assert!(report.rebuilt >= lower.min(n));
        prop_assert!(report.rebuilt <= upper.min(n));
        prop_assert_eq!(report.rebuilt + report.remaining, n);
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 8, .. ProptestConfig::default() })]

    #[test]
    fn seams_agree_for_any_generation_order(
        order in Just((0..9).collect::<Vec<i32>>()).prop_shuffle(),
        edits in prop::collection::vec((-16i32..32, 0i32..20, -16i32..32, any::<bool>()), 0..12),
        seed in any::<i32>(),
    ) {
        let mut rt = Runtime::new(TerrainGenerator::new(seed), Duration::from_millis(4));
        for i in &order {
            rt.generate(ChunkCoord::new(i % 3 - 1, i / 3 - 1));
            // Mesh between generations so stale seams must be requeued
            rt.drain_with_clock(Duration::from_secs(60), &FakeClock(Cell::new(Duration::ZERO)), &mut NullSink);
        }
        for (x, y, z, solid) in edits {
            rt.set(x, y, z, solid.then_some(BlockType::Stone));
        }
        let clock = FakeClock(Cell::new(Duration::ZERO));
        while !rt.scheduler().is_empty() {
            rt.drain_with_clock(Duration::from_secs(60), &clock, &mut NullSink);
        }
        for i in 0..9 {
            let c = ChunkCoord::new(i % 3 - 1, i / 3 - 1);
            prop_assert_eq!(rt.mesh(c), Some(&build_chunk_mesh(rt.store(), c)));
        }
    }
}
