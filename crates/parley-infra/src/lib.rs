//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`: the
//! SQLite chat log and the Gemini model provider, plus configuration and
//! credential loading.

pub mod config;
pub mod llm;
pub mod sqlite;
