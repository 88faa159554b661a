use parking_lot::Mutex;
use ringmap::set::RingSet;
use std::collections::HashMap;

pub const MAX_RETRY_ATTEMPTS: u32 = 5;
pub const MAX_RETRY_ENTRIES: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// Queued (or kept queued) for its nth attempt.
    Queued { attempt: u32 },
    /// Out of attempts; the block is left as a gap.
    Dropped,
}

struct RetryState {
    pending: RingSet<u64>,
    attempts: HashMap<u64, u32>,
}

/// Bounded FIFO of block numbers to re-index, with per-block attempt counts.
pub struct RetryQueue {
    state: Mutex<RetryState>,
    max_attempts: u32,
    max_entries: usize,
}

impl RetryQueue {
    pub fn new(max_attempts: u32, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            state: Mutex::new(RetryState {
                pending: RingSet::with_capacity(max_entries),
                attempts: HashMap::new(),
            }),
            max_attempts,
            max_entries,
        }
    }

    pub fn enqueue(&self, number: u64) -> Enqueued {
        let mut state = self.state.lock();

        let attempt = state.attempts.get(&number).copied().unwrap_or(0) + 1;
        if attempt > self.max_attempts {
            state.attempts.remove(&number);
            state.pending.retain(|&pending| pending != number);
            tracing::warn!(
                block = number,
                "Block exceeded {} retry attempts; dropping it, manual re-index required",
                self.max_attempts
            );
            return Enqueued::Dropped;
        }
        state.attempts.insert(number, attempt);

        if !state.pending.contains(&number) {
            if state.pending.len() >= self.max_entries {
                if let Some(evicted) = state.pending.pop_front() {
                    state.attempts.remove(&evicted);
                    tracing::warn!(block = evicted, "Retry queue full; evicted oldest entry");
                }
            }
            state.pending.insert(number);
        }

        Enqueued::Queued { attempt }
    }

    /// Removes and returns up to `max` of the oldest entries. Attempt counts are kept
    /// until the block is resolved or dropped.
    pub fn drain(&self, max: usize) -> Vec<u64> {
        let mut state = self.state.lock();
        let take = max.min(state.pending.len());
        (0..take).filter_map(|_| state.pending.pop_front()).collect()
    }

    /// Puts drained blocks back at the tail without counting an attempt.
    pub fn requeue(&self, numbers: &[u64]) {
        let mut state = self.state.lock();
        for &number in numbers {
            if state.pending.contains(&number) {
                continue;
            }
            if state.pending.len() >= self.max_entries {
                if let Some(evicted) = state.pending.pop_front() {
                    state.attempts.remove(&evicted);
                    tracing::warn!(block = evicted, "Retry queue full; evicted oldest entry");
                }
            }
            state.pending.insert(number);
        }
    }

    /// Forgets the attempt counts of blocks that have been persisted.
    pub fn resolve(&self, numbers: &[u64]) {
        let mut state = self.state.lock();
        if state.attempts.is_empty() {
            return;
        }
        for number in numbers {
            state.attempts.remove(number);
        }
    }

    pub fn attempts(&self, number: u64) -> Option<u32> {
        self.state.lock().attempts.get(&number).copied()
    }

    pub fn contains(&self, number: u64) -> bool {
        self.state.lock().pending.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RetryQueue {
    fn default() -> Self {
        Self::new(MAX_RETRY_ATTEMPTS, MAX_RETRY_ENTRIES)
    }
}
