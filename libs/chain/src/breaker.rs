use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    pub window_size: usize,
    /// Error proportion in (0, 1) that must be exceeded to trip.
    pub error_threshold: f64,
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self { window_size: 100, error_threshold: 0.10, cooldown: Duration::from_secs(15) }
    }
}

#[derive(Debug, Default)]
struct BreakerState {
    window: VecDeque<bool>,
    errors: usize,
    opened_at: Option<Instant>,
}

/// Sliding-window circuit breaker over call outcomes.
///
/// The breaker can only trip once the window is full. While open, callers are expected to
/// wait; after the cooldown `try_close` closes it again without probing. The window survives
/// a close, so the calls that follow decide whether it re-opens.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: Mutex<BreakerState>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerStats {
    pub open: bool,
    pub window: usize,
    pub errors: usize,
    pub error_rate: f64,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self { config, state: Mutex::new(BreakerState::default()) }
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Records one outcome. Returns true when this outcome tripped the breaker.
    pub fn record(&self, ok: bool) -> bool {
        let mut state = self.state.lock();
        state.window.push_back(ok);
        if !ok {
            state.errors += 1;
        }
        while state.window.len() > self.config.window_size {
            if state.window.pop_front() == Some(false) {
                state.errors -= 1;
            }
        }

        let size = state.window.len();
        if size < self.config.window_size || state.opened_at.is_some() {
            return false;
        }
        let rate = state.errors as f64 / size as f64;
        if rate > self.config.error_threshold {
            state.opened_at = Some(Instant::now());
            tracing::error!(
                "Circuit breaker OPEN (errorRate={:.1}% over last {size})",
                rate * 100.0
            );
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().opened_at.is_some()
    }

    /// Closes the breaker if it is open and its cooldown has strictly elapsed.
    /// Returns whether the breaker is closed afterwards.
    pub fn try_close(&self) -> bool {
        let mut state = self.state.lock();
        match state.opened_at {
            None => true,
            Some(opened_at) if opened_at.elapsed() > self.config.cooldown => {
                tracing::warn!("Circuit breaker cooldown elapsed; attempting close");
                state.opened_at = None;
                true
            }
            Some(_) => false,
        }
    }

    pub fn stats(&self) -> BreakerStats {
        let state = self.state.lock();
        let window = state.window.len();
        let error_rate =
            if window == 0 { 0.0 } else { state.errors as f64 / window as f64 * 100.0 };
        BreakerStats { open: state.opened_at.is_some(), window, errors: state.errors, error_rate }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}
