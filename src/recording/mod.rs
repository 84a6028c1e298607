//! Record/replay transport

mod builder;
mod engine;

pub use builder::RecorderBuilder;
pub use engine::Recorder;

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters describing how a recorder answered requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    /// Requests answered from recorded entries
    pub replayed: usize,
    /// Requests sent to the live transport
    pub live: usize,
    /// Entries written to the recording file
    pub persisted: usize,
}

#[derive(Debug, Default)]
struct Counters {
    replayed: AtomicUsize,
    live: AtomicUsize,
    persisted: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> RecorderStats {
        RecorderStats {
            replayed: self.replayed.load(Ordering::Relaxed),
            live: self.live.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
        }
    }
}
