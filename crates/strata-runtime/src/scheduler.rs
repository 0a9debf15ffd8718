use std::collections::VecDeque;
use std::time::{Duration, Instant};

use hashbrown::HashSet;
use strata_world::ChunkCoord;

/// Source of monotonic time for budgeted work. Injected so tests can drive it.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub rebuilt: usize,
    pub remaining: usize,
    pub elapsed: Duration,
}

/// FIFO of chunks awaiting a mesh rebuild. A chunk is queued at most once.
#[derive(Default, Debug)]
pub struct RebuildScheduler {
    queue: VecDeque<ChunkCoord>,
    queued: HashSet<ChunkCoord>,
}

impl RebuildScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the chunk was already waiting.
    pub fn enqueue(&mut self, c: ChunkCoord) -> bool {
        if !self.queued.insert(c) {
            return false;
        }
        self.queue.push_back(c);
        true
    }

    pub fn pop_front(&mut self) -> Option<ChunkCoord> {
        let c = self.queue.pop_front()?;
        self.queued.remove(&c);
        Some(c)
    }

    /// Drops a pending entry, e.g. after the chunk was rebuilt out of band.
    pub fn cancel(&mut self, c: ChunkCoord) -> bool {
        if !self.queued.remove(&c) {
            return false;
        }
        self.queue.retain(|q| *q != c);
        true
    }

    #[inline]
    pub fn is_queued(&self, c: ChunkCoord) -> bool {
        self.queued.contains(&c)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.queue.iter().copied()
    }

    /// Pops and rebuilds chunks in FIFO order until the queue is empty or
    /// `budget` has elapsed. The clock is read before each rebuild, so the
    /// rebuild that crosses the budget still completes. A zero budget
    /// processes nothing.
    pub fn drain<C, F>(&mut self, budget: Duration, clock: &C, mut rebuild: F) -> DrainReport
    where
        C: Clock + ?Sized,
        F: FnMut(ChunkCoord),
    {
        let start = clock.now();
        let mut rebuilt = 0usize;
        while !self.queue.is_empty() {
            if clock.now().saturating_sub(start) >= budget {
                break;
            }
            let Some(c) = self.pop_front() else { break };
            rebuild(c);
            rebuilt += 1;
        }
        DrainReport {
            rebuilt,
            remaining: self.queue.len(),
            elapsed: clock.now().saturating_sub(start),
        }
    }
}
