//! Admission control for upstream model calls.
//!
//! `TokenBucket` is the lazily refilled counter; `RateLimiter` applies a
//! requests-per-minute policy over one shared bucket.

pub mod bucket;
pub mod rate_limiter;

pub use bucket::TokenBucket;
pub use rate_limiter::RateLimiter;
