//! Interactive CLI chat experience for Parley.
//!
//! Implements the chat loop: welcome banner, slash commands, a thinking
//! spinner around each exchange, and memory/cache status after each reply.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
