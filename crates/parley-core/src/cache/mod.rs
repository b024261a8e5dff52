//! Response caching for completed exchanges.

pub mod response;

pub use response::{ResponseCache, cache_key};
