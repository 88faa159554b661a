use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, eyre};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::rpc::ChainRpc;

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Endpoint {
    pub index: usize,
    pub url: String,
    pub client: Arc<dyn ChainRpc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndpointHealth {
    pub consecutive_failures: u32,
    pub last_failure: Option<Instant>,
    pub cooldown_until: Option<Instant>,
}

impl EndpointHealth {
    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| until > now)
    }
}

struct PoolState {
    cursor: usize,
    health: Vec<EndpointHealth>,
}

/// Interchangeable endpoints picked round-robin, skipping the ones in cooldown.
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
    state: Mutex<PoolState>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl EndpointPool {
    pub fn new(endpoints: Vec<(String, Arc<dyn ChainRpc>)>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(eyre!("At least one RPC endpoint is required"));
        }
        let endpoints: Vec<Endpoint> = endpoints
            .into_iter()
            .enumerate()
            .map(|(index, (url, client))| Endpoint { index, url, client })
            .collect();
        let health = vec![EndpointHealth::default(); endpoints.len()];

        Ok(Self {
            endpoints,
            state: Mutex::new(PoolState { cursor: 0, health }),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
        })
    }

    pub fn with_cooldown(mut self, failure_threshold: u32, cooldown: Duration) -> Self {
        self.failure_threshold = failure_threshold.max(1);
        self.cooldown = cooldown;
        self
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn select(&self) -> Endpoint {
        let now = Instant::now();
        let mut state = self.state.lock();
        let len = self.endpoints.len();

        for offset in 0..len {
            let index = (state.cursor + offset) % len;
            if state.health[index].is_cooling_down(now) {
                continue;
            }
            state.cursor = (index + 1) % len;
            return self.endpoints[index].clone();
        }

        // Every endpoint is cooling down: prefer availability and rotate anyway.
        let index = state.cursor;
        state.cursor = (index + 1) % len;
        self.endpoints[index].clone()
    }

    pub fn mark_success(&self, index: usize) {
        let mut state = self.state.lock();
        if let Some(health) = state.health.get_mut(index) {
            health.consecutive_failures = 0;
            health.cooldown_until = None;
        }
    }

    /// Returns true when this failure put the endpoint into cooldown.
    pub fn mark_failure(&self, index: usize) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock();
        let Some(health) = state.health.get_mut(index) else {
            return false;
        };
        health.consecutive_failures += 1;
        health.last_failure = Some(now);
        if health.consecutive_failures < self.failure_threshold {
            return false;
        }

        tracing::warn!(
            "Endpoint {} cooling down ({} fails)",
            self.endpoints[index].url,
            health.consecutive_failures
        );
        health.cooldown_until = Some(now + self.cooldown);
        health.consecutive_failures = 0;
        true
    }

    pub fn health(&self, index: usize) -> Option<EndpointHealth> {
        self.state.lock().health.get(index).copied()
    }
}
