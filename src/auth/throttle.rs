//! Per-phone throttling for OTP sends.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use crate::config::RateLimitConfig;

/// A simple token bucket.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Throttles OTP sends per phone number.
///
/// The bucket capacity equals the per-minute allowance, so a fresh number
/// may burst up to the allowance before refill kicks in.
pub struct OtpThrottle {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    enabled: bool,
    per_minute: f64,
}

impl OtpThrottle {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            enabled: config.enabled,
            per_minute: config.otp_per_minute as f64,
        }
    }

    /// Check whether a send to this phone is allowed right now.
    pub fn check(&self, phone: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let refill_rate = self.per_minute / 60.0;
        let mut buckets = self.buckets.lock().expect("throttle mutex poisoned");
        let bucket = buckets
            .entry(phone.to_string())
            .or_insert_with(|| TokenBucket::new(self.per_minute));
        bucket.try_acquire(self.per_minute, refill_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_blocked() {
        let throttle = OtpThrottle::new(&RateLimitConfig {
            enabled: true,
            otp_per_minute: 3,
        });
        assert!(throttle.check("+233200000001"));
        assert!(throttle.check("+233200000001"));
        assert!(throttle.check("+233200000001"));
        assert!(!throttle.check("+233200000001"));
        // Other numbers are unaffected
        assert!(throttle.check("+233200000002"));
    }

    #[test]
    fn test_disabled_allows_everything() {
        let throttle = OtpThrottle::new(&RateLimitConfig {
            enabled: false,
            otp_per_minute: 1,
        });
        for _ in 0..10 {
            assert!(throttle.check("+233200000001"));
        }
    }
}
