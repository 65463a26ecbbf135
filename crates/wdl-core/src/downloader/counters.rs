//! Shared byte counters: one grand total plus one per part.
//!
//! Workers only add; the ticker and the final check only read. Plain atomic
//! adds, no lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::partition::Part;
use crate::progress::ProgressStats;

#[derive(Debug)]
pub struct TransferCounters {
    total: AtomicU64,
    per_part: Vec<AtomicU64>,
    part_lens: Vec<u64>,
    total_size: u64,
}

impl TransferCounters {
    pub fn new(parts: &[Part]) -> Self {
        Self {
            total: AtomicU64::new(0),
            per_part: parts.iter().map(|_| AtomicU64::new(0)).collect(),
            part_lens: parts.iter().map(Part::len).collect(),
            total_size: parts.iter().map(Part::len).sum(),
        }
    }

    /// Record `n` bytes written by part `index`.
    pub fn add(&self, index: usize, n: u64) {
        if let Some(c) = self.per_part.get(index) {
            c.fetch_add(n, Ordering::Relaxed);
        }
        self.total.fetch_add(n, Ordering::Relaxed);
    }

    /// Bytes written so far by part `index`.
    pub fn part(&self, index: usize) -> u64 {
        self.per_part
            .get(index)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn part_count(&self) -> usize {
        self.per_part.len()
    }

    /// Parts whose whole range has been written.
    pub fn parts_done(&self) -> usize {
        self.part_lens
            .iter()
            .enumerate()
            .filter(|(i, len)| self.part(*i) >= **len)
            .count()
    }

    pub fn snapshot(&self, started: Instant) -> ProgressStats {
        ProgressStats {
            bytes_done: self.total(),
            total_bytes: self.total_size,
            elapsed_secs: started.elapsed().as_secs_f64(),
            parts_done: self.parts_done(),
            part_count: self.part_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::plan_parts;

    #[test]
    fn concurrent_adds_sum_up() {
        let parts = plan_parts(50_000, 5);
        let counters = TransferCounters::new(&parts);
        std::thread::scope(|s| {
            for p in &parts {
                let counters = &counters;
                s.spawn(move || {
                    for _ in 0..(p.len() / 100) {
                        counters.add(p.index, 100);
                    }
                });
            }
        });
        assert_eq!(counters.total(), 50_000);
        assert_eq!(counters.parts_done(), 5);
        assert_eq!(counters.part(2), 10_000);
        assert_eq!(counters.part(99), 0);
    }

    #[test]
    fn empty_parts_count_as_done() {
        let counters = TransferCounters::new(&plan_parts(3, 5));
        assert_eq!(counters.parts_done(), 4);
        counters.add(4, 3);
        let snap = counters.snapshot(Instant::now());
        assert_eq!(snap.total_bytes, 3);
        assert_eq!(snap.parts_done, 5);
        assert_eq!(snap.bytes_done, 3);
    }
}
