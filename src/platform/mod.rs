//! Platform abstraction layer
//!
//! The simulation counts ticks; wall time is only needed to report how long a
//! session lasted. Hosts inject a [`Clock`] so replays and tests stay
//! deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock timestamps in milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set_ms(&self, ms: u64) {
        self.ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta: u64) {
        self.ms.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.ms.load(Ordering::SeqCst) as f64
    }
}

/// Whole seconds elapsed between two millisecond timestamps (floored, never negative)
pub fn elapsed_seconds(start_ms: f64, end_ms: f64) -> u64 {
    ((end_ms - start_ms) / 1000.0).floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        clock.advance_ms(2_500);
        assert_eq!(other.now_ms(), 3_500.0);
        other.set_ms(10);
        assert_eq!(clock.now_ms(), 10.0);
    }

    #[test]
    fn test_elapsed_seconds_floors() {
        assert_eq!(elapsed_seconds(0.0, 999.0), 0);
        assert_eq!(elapsed_seconds(0.0, 12_999.0), 12);
        assert_eq!(elapsed_seconds(5_000.0, 1_000.0), 0);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now_ms() > 0.0);
    }
}
