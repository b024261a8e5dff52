//! Requests-per-minute admission control over one shared token bucket.

use std::sync::{Mutex, PoisonError};

use parley_types::chat::RateLimitStatus;
use parley_types::error::ChatError;
use tracing::info;

use super::bucket::TokenBucket;

/// Process-wide limiter guarding upstream calls.
///
/// Capacity equals `requests_per_minute` and the bucket refills at
/// `requests_per_minute / 60` tokens per second, so a fresh limiter admits a
/// full minute's burst and then settles to the steady rate.
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: u32,
    bucket: Mutex<TokenBucket>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let refill_rate = f64::from(requests_per_minute) / 60.0;
        Self {
            requests_per_minute,
            bucket: Mutex::new(TokenBucket::new(requests_per_minute, refill_rate)),
        }
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Take one request slot or fail with `ChatError::RateLimited`.
    pub fn admit(&self) -> Result<(), ChatError> {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        if bucket.try_consume(1) {
            return Ok(());
        }

        let retry_after = bucket.time_until_available(1);
        drop(bucket);

        info!(
            requests_per_minute = self.requests_per_minute,
            retry_after_secs = retry_after.as_secs_f64(),
            "rate limit exceeded"
        );

        Err(ChatError::RateLimited {
            message: format!(
                "Rate limit exceeded. {} requests per minute allowed. Try again in {:.1} seconds.",
                self.requests_per_minute,
                retry_after.as_secs_f64()
            ),
            retry_after,
        })
    }

    /// Current bucket state. Triggers a refill but never consumes.
    pub fn status(&self) -> RateLimitStatus {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let available = bucket.available();
        let wait = bucket.time_until_available(1);
        RateLimitStatus {
            requests_per_minute: self.requests_per_minute,
            available_tokens: available.trunc() as u32,
            capacity: bucket.capacity(),
            refill_rate_per_second: bucket.refill_rate_per_sec(),
            time_until_next_token: wait.as_secs_f64(),
        }
    }
}
