//! Shared domain types for Parley.
//!
//! This crate contains the types that cross crate boundaries: conversation
//! turns, chat log records, component status snapshots, configuration, and
//! the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
