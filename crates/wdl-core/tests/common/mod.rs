#![allow(dead_code)]

pub mod range_server;

use std::sync::Mutex;

use wdl_core::progress::{ProgressEvent, ProgressSink, ProgressStats};

/// Deterministic, non-repeating-at-part-boundaries test payload.
pub fn body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// What a [`RecordingSink`] saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Skipping,
    Downloading { total_bytes: u64, part_count: usize },
    Progress(ProgressStats),
    Completed { bytes: u64 },
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Seen>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Seen> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<ProgressStats> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Seen::Progress(stats) => Some(stats),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn on_event(&self, event: &ProgressEvent<'_>) {
        let seen = match event {
            ProgressEvent::Skipping { .. } => Seen::Skipping,
            ProgressEvent::Downloading {
                total_bytes,
                part_count,
                ..
            } => Seen::Downloading {
                total_bytes: *total_bytes,
                part_count: *part_count,
            },
            ProgressEvent::Progress(stats) => Seen::Progress(stats.clone()),
            ProgressEvent::Completed { bytes, .. } => Seen::Completed { bytes: *bytes },
        };
        self.events.lock().unwrap().push(seen);
    }
}
