use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Process-wide cap on simultaneous outbound RPC calls.
///
/// Backed by tokio's semaphore, which queues waiters first-in first-out, so a caller that has
/// been waiting longest is admitted first.
#[derive(Debug, Clone)]
pub struct ConcurrencyGovernor {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
}

/// An admitted call. Dropping it frees the slot.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyGovernor {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn acquire(&self) -> Result<Slot, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        Ok(Slot { _permit: permit, in_flight: Arc::clone(&self.in_flight) })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
