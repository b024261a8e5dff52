//! Continuous token bucket with on-access refill.

use std::time::Duration;

use tokio::time::Instant;

/// A fixed-capacity bucket of fractional tokens refilled from elapsed time.
///
/// Starts full. There is no background timer: every read or consume first
/// credits `elapsed * refill_rate` tokens, clamped to `capacity`.
/// `tokens` always stays within `0.0..=capacity`.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u32,
    tokens: f64,
    refill_rate_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket.
    ///
    /// A non-positive `refill_rate_per_sec` is clamped to a tiny positive rate.
    /// Waits that overflow `Duration` at such rates saturate to `Duration::MAX`.
    pub fn new(capacity: u32, refill_rate_per_sec: f64) -> Self {
        Self {
            capacity,
            tokens: f64::from(capacity),
            refill_rate_per_sec: refill_rate_per_sec.max(f64::MIN_POSITIVE),
            last_refill: Instant::now(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn refill_rate_per_sec(&self) -> f64 {
        self.refill_rate_per_sec
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens =
                (self.tokens + elapsed * self.refill_rate_per_sec).min(f64::from(self.capacity));
            self.last_refill = now;
        }
    }

    /// Refill, then remove `n` tokens if that many are available.
    ///
    /// On failure the token count is left as refilled.
    pub fn try_consume(&mut self, n: u32) -> bool {
        self.refill();
        let n = f64::from(n);
        if self.tokens >= n {
            self.tokens -= n;
            true
        } else {
            false
        }
    }

    /// Time until `n` tokens will be available, zero if they already are.
    pub fn time_until_available(&mut self, n: u32) -> Duration {
        self.refill();
        let deficit = f64::from(n) - self.tokens;
        if deficit <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(deficit / self.refill_rate_per_sec).unwrap_or(Duration::MAX)
    }

    /// Currently available tokens after a refill.
    pub fn available(&mut self) -> f64 {
        self.refill();
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_starts_full() {
        let mut bucket = TokenBucket::new(5, 1.0);
        assert!((bucket.available() - 5.0).abs() < f64::EPSILON);
        assert_eq!(bucket.time_until_available(1), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_throttle() {
        let mut bucket = TokenBucket::new(3, 1.0);
        for _ in 0..3 {
            assert!(bucket.try_consume(1));
        }
        assert!(!bucket.try_consume(1));

        advance(Duration::from_millis(500)).await;
        assert!(!bucket.try_consume(1));
        assert_eq!(bucket.time_until_available(1), Duration::from_millis(500));

        advance(Duration::from_millis(500)).await;
        assert!(bucket.try_consume(1));
        assert!(!bucket.try_consume(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_consume_leaves_tokens() {
        let mut bucket = TokenBucket::new(2, 0.5);
        assert!(bucket.try_consume(2));
        advance(Duration::from_secs(1)).await;
        assert!(!bucket.try_consume(1));
        assert!((bucket.available() - 0.5).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_clamps_to_capacity() {
        let mut bucket = TokenBucket::new(4, 2.0);
        assert!(bucket.try_consume(4));
        advance(Duration::from_secs(3600)).await;
        assert!((bucket.available() - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_stay_within_bounds() {
        let mut bucket = TokenBucket::new(3, 0.25);
        let steps = [0u64, 100, 1500, 0, 4000, 250, 20_000, 0, 0, 700];
        for (i, ms) in steps.iter().enumerate() {
            advance(Duration::from_millis(*ms)).await;
            let _ = bucket.try_consume((i % 3) as u32);
            let tokens = bucket.available();
            assert!(tokens >= 0.0, "tokens went negative: {tokens}");
            assert!(tokens <= 3.0, "tokens exceeded capacity: {tokens}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_rate_wait_saturates() {
        let mut bucket = TokenBucket::new(0, 0.0);
        assert!(!bucket.try_consume(1));
        assert_eq!(bucket.time_until_available(1), Duration::MAX);
        assert_eq!(bucket.available(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_multiple_tokens() {
        let mut bucket = TokenBucket::new(10, 2.0);
        assert!(bucket.try_consume(10));
        assert_eq!(bucket.time_until_available(4), Duration::from_secs(2));
    }
}
