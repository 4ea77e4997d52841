//! Per-identity rating submission quota
//!
//! Throttles submissions to a small fixed quota per rolling window so a
//! single origin cannot spam ratings. Requests beyond quota are rejected
//! before any state is touched.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

/// Reference policy: 5 submissions per 15 minutes per identity
pub const MAX_SUBMISSIONS: u32 = 5;
pub const WINDOW_SECS: u64 = 15 * 60;

/// Keyed rate limiter over submitter identities
pub struct SubmissionLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
}

impl SubmissionLimiter {
    /// Allow `max` submissions per `window` for each identity, with the
    /// full burst available up front
    pub fn new(max: u32, window: Duration) -> Self {
        let max = max.max(1);
        let burst = NonZeroU32::new(max).unwrap();
        let quota = Quota::with_period(window / max)
            .expect("rate limit period must be non-zero")
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Returns true if this identity may submit now, consuming one slot
    pub fn check(&self, identity: &str) -> bool {
        self.limiter.check_key(&identity.to_string()).is_ok()
    }
}

impl Default for SubmissionLimiter {
    fn default() -> Self {
        Self::new(MAX_SUBMISSIONS, Duration::from_secs(WINDOW_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exhausted_on_sixth_attempt() {
        let limiter = SubmissionLimiter::new(5, Duration::from_secs(900));

        for _ in 0..5 {
            assert!(limiter.check("203.0.113.9"));
        }
        assert!(!limiter.check("203.0.113.9"));
    }

    #[test]
    fn test_identities_throttled_independently() {
        let limiter = SubmissionLimiter::new(1, Duration::from_secs(900));

        assert!(limiter.check("203.0.113.9"));
        assert!(!limiter.check("203.0.113.9"));
        assert!(limiter.check("198.51.100.7"));
    }
}
