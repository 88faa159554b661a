use std::time::Duration;

pub const THROTTLE_FLOOR: usize = 10;
pub const TIMEOUT_TOLERANCE: u64 = 3;
pub const STABLE_ITERATIONS: u32 = 5;
pub const GROWTH_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Shrunk { from: usize, to: usize },
    Grown { from: usize, to: usize },
    Unchanged,
}

/// Runtime ceiling on catch-up concurrency, driven by per-iteration timeout counts.
#[derive(Debug, Clone)]
pub struct Throttle {
    configured_max: usize,
    runtime_max: usize,
    stable_iterations: u32,
}

impl Throttle {
    pub fn new(configured_max: usize) -> Self {
        let configured_max = configured_max.max(1);
        Self { configured_max, runtime_max: configured_max, stable_iterations: 0 }
    }

    /// Shrinks by 30% (not below the floor) after a burst of timeouts, and grows back by a
    /// fixed step after enough quiet iterations.
    pub fn adjust(&mut self, timeouts: u64) -> Adjustment {
        let from = self.runtime_max;

        if timeouts > TIMEOUT_TOLERANCE {
            self.runtime_max = THROTTLE_FLOOR.max(from * 7 / 10).min(from);
            self.stable_iterations = 0;
        } else if timeouts == 0 {
            self.stable_iterations += 1;
            if self.stable_iterations >= STABLE_ITERATIONS && from < self.configured_max {
                self.runtime_max = (from + GROWTH_STEP).min(self.configured_max);
                self.stable_iterations = 0;
            }
        } else {
            self.stable_iterations = 0;
        }

        match self.runtime_max {
            to if to < from => Adjustment::Shrunk { from, to },
            to if to > from => Adjustment::Grown { from, to },
            _ => Adjustment::Unchanged,
        }
    }

    pub fn runtime_max(&self) -> usize {
        self.runtime_max
    }

    pub fn configured_max(&self) -> usize {
        self.configured_max
    }

    pub fn stable_iterations(&self) -> u32 {
        self.stable_iterations
    }
}

/// Catch-up concurrency for a given lag: the base scaled by how far behind we are.
pub fn dynamic_concurrency(lag: u64, base: usize, ceiling: usize) -> usize {
    let factor = match lag {
        l if l > 100_000 => 5,
        l if l > 20_000 => 3,
        l if l > 5_000 => 2,
        _ => 1,
    };
    (base * factor).min(ceiling).max(1)
}

/// Pause before the next tailer iteration.
pub fn adaptive_interval(lag: u64, base: Duration) -> Duration {
    match lag {
        l if l > 100_000 => Duration::from_millis(8_000),
        l if l > 20_000 => Duration::from_millis(5_000),
        l if l > 5_000 => Duration::from_millis(3_000),
        l if l > 200 => base.max(Duration::from_millis(2_000)),
        _ => Duration::from_millis(1_500),
    }
}
