//! Minimum-spacing rate limiter for quote lookups.
//!
//! Callers block in [`RateLimiter::acquire`] until at least `min_interval`
//! has passed since the previous permit. The lock is held while sleeping,
//! so concurrent callers are served one at a time.

use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

pub struct RateLimiter {
    min_interval: Duration,
    last_permit: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_permit: Mutex::new(None),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Recovers from a poisoned lock; a stale timestamp only skews spacing.
    fn lock_last(&self) -> MutexGuard<'_, Option<Instant>> {
        self.last_permit.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Time a caller would have to wait right now.
    pub fn time_until_available(&self) -> Duration {
        match *self.lock_last() {
            Some(last) => self.min_interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Blocks until a permit is available, then takes it.
    pub fn acquire(&self) {
        let mut last = self.lock_last();
        if let Some(prev) = *last {
            let wait = self.min_interval.saturating_sub(prev.elapsed());
            if wait > Duration::ZERO {
                debug!("Rate limiter: waiting {:?}", wait);
                thread::sleep(wait);
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_permit_is_immediate() {
        let limiter = RateLimiter::from_millis(500);
        assert_eq!(limiter.time_until_available(), Duration::ZERO);
        let start = Instant::now();
        limiter.acquire();
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_consecutive_permits_are_spaced() {
        let limiter = RateLimiter::from_millis(30);
        let start = Instant::now();
        limiter.acquire();
        limiter.acquire();
        limiter.acquire();
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::from_millis(0);
        limiter.acquire();
        assert_eq!(limiter.time_until_available(), Duration::ZERO);
    }
}
