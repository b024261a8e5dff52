//! Request-path logic and port trait definitions for Parley.
//!
//! This crate holds the three runtime mechanisms every chat request passes
//! through (rate limiter, response cache, conversation context) and the
//! orchestrator that composes them. It defines the "ports" (provider and
//! log repository traits) that the infrastructure layer implements, and
//! depends only on `parley-types` -- never on `parley-infra` or any
//! database/IO crate.

pub mod cache;
pub mod chat;
pub mod limiter;
pub mod llm;
