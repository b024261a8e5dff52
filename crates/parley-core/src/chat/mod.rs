//! Conversation handling: the bounded context window, the chat log port,
//! and the orchestrator that runs one exchange end to end.

pub mod context;
pub mod orchestrator;
pub mod repository;
pub mod tokens;

pub use context::ConversationContext;
pub use orchestrator::ChatOrchestrator;
pub use repository::ChatLogRepository;
