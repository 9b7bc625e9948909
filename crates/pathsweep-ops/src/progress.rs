//! Progress tracking for deletion batches.

use pathsweep_core::{ProgressMode, ProgressState};

/// Percentage of `total` units attempted, rounded down and capped at 100.
///
/// A zero total reports 0 until the batch finishes.
pub fn percentage(attempted: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let attempted = attempted.min(total) as u128;
    (attempted * 100 / total as u128) as u8
}

/// Derives a non-decreasing percentage from the number of units attempted.
///
/// Failed units advance progress exactly like removed ones.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    attempted: u64,
    state: ProgressState,
}

impl ProgressTracker {
    /// Create an idle tracker for a batch of `total` units.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            attempted: 0,
            state: ProgressState::default(),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Start the batch at 0%.
    pub fn begin(&mut self) -> u8 {
        self.attempted = 0;
        self.state = ProgressState {
            value: 0,
            mode: ProgressMode::InProgress,
        };
        0
    }

    /// Record one attempted unit. Returns the new value if it increased.
    pub fn record_unit(&mut self) -> Option<u8> {
        self.attempted += 1;
        self.advance(percentage(self.attempted, self.total))
    }

    /// Complete the batch: publishes 100 if not reached yet, then goes idle.
    pub fn finish(&mut self) -> Option<u8> {
        let last = self.advance(100);
        self.state = ProgressState::default();
        last
    }

    fn advance(&mut self, value: u8) -> Option<u8> {
        if value > self.state.value {
            self.state.value = value;
            Some(value)
        } else {
            None
        }
    }
}

/// Progress values for a batch of `total` units, given its attempted units.
///
/// Starts at 0, yields each increase, and always ends at exactly 100.
pub fn track<I: IntoIterator>(total: u64, attempts: I) -> Track<I::IntoIter> {
    Track {
        tracker: ProgressTracker::new(total),
        attempts: attempts.into_iter(),
        started: false,
        finished: false,
    }
}

/// Iterator returned by [`track`].
#[derive(Debug)]
pub struct Track<I> {
    tracker: ProgressTracker,
    attempts: I,
    started: bool,
    finished: bool,
}

impl<I: Iterator> Iterator for Track<I> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if !self.started {
            self.started = true;
            return Some(self.tracker.begin());
        }
        if self.finished {
            return None;
        }
        for _ in self.attempts.by_ref() {
            if let Some(value) = self.tracker.record_unit() {
                return Some(value);
            }
        }
        self.finished = true;
        self.tracker.finish()
    }
}
