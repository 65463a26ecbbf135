//! Range math and part planning.
//!
//! Splits a download into a fixed number of contiguous parts and computes the
//! HTTP Range bounds each worker requests.

/// One contiguous slice of the target file: byte range [start, end) (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    /// Position in the plan.
    pub index: usize,
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl Part {
    /// Length of this part in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Range for curl, which wants `start-end` without the `bytes=` unit,
    /// starting `done` bytes into the part. `None` once nothing is left.
    pub fn curl_range(&self, done: u64) -> Option<String> {
        let from = self.start.checked_add(done)?;
        if from >= self.end {
            return None;
        }
        Some(format!("{}-{}", from, self.end - 1))
    }

    /// True if the two parts share at least one byte.
    pub fn overlaps(&self, other: &Part) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Builds a plan of `part_count` parts covering `[0, total_size)`.
///
/// Every part is `total_size / part_count` bytes long except the last, whose
/// end is pinned to `total_size` so it absorbs the division remainder. When
/// `total_size < part_count` the leading parts are empty.
/// Returns an empty vec if `total_size` is 0 or `part_count` is 0.
pub fn plan_parts(total_size: u64, part_count: usize) -> Vec<Part> {
    if total_size == 0 || part_count == 0 {
        return Vec::new();
    }

    let part_size = total_size / part_count as u64;
    (0..part_count)
        .map(|index| {
            let start = index as u64 * part_size;
            let end = if index == part_count - 1 {
                total_size
            } else {
                start + part_size
            };
            Part { index, start, end }
        })
        .collect()
}
