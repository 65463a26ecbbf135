//! Per-part result collected by the task group.

use crate::error::PartError;
use crate::partition::Part;

/// What one range worker did: how far it got and how it ended.
#[derive(Debug)]
pub struct PartOutcome {
    pub part: Part,
    /// Bytes of this part on disk when the worker stopped.
    pub bytes_written: u64,
    /// Attempts made, including the first.
    pub attempts: u32,
    pub result: Result<(), PartError>,
}

impl PartOutcome {
    /// Succeeded and wrote the whole range.
    pub fn is_complete(&self) -> bool {
        self.result.is_ok() && self.bytes_written == self.part.len()
    }
}

/// Outcomes split into the failures that matter for the caller.
pub(super) fn failures(outcomes: Vec<PartOutcome>) -> Vec<(usize, PartError)> {
    outcomes
        .into_iter()
        .filter_map(|o| {
            if o.is_complete() {
                return None;
            }
            let index = o.part.index;
            match o.result {
                Err(e) => Some((index, e)),
                Ok(()) => Some((
                    index,
                    PartError::PartialTransfer {
                        expected: o.part.len(),
                        received: o.bytes_written,
                    },
                )),
            }
        })
        .collect()
}
