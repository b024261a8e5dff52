//! Bounded rolling window over the conversation.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use parley_types::chat::{Message, MessageRole};

/// The last `2 * exchanges` turns of the conversation, oldest first.
///
/// Shared by every transport in the process. `append` drops from the front
/// once the bound is exceeded.
#[derive(Debug)]
pub struct ConversationContext {
    max_turns: usize,
    turns: Mutex<VecDeque<Message>>,
}

impl ConversationContext {
    /// Create a context that remembers `exchanges` user/assistant pairs.
    pub fn new(exchanges: usize) -> Self {
        let max_turns = exchanges * 2;
        Self {
            max_turns,
            turns: Mutex::new(VecDeque::with_capacity(max_turns + 1)),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn append(&self, role: MessageRole, text: impl Into<String>) {
        let mut turns = self.lock();
        turns.push_back(Message {
            role,
            content: text.into(),
        });
        while turns.len() > self.max_turns {
            turns.pop_front();
        }
    }

    /// Append a user prompt and its reply in one critical section.
    pub fn append_exchange(&self, prompt: &str, reply: &str) {
        let mut turns = self.lock();
        turns.push_back(Message::user(prompt));
        turns.push_back(Message::assistant(reply));
        while turns.len() > self.max_turns {
            turns.pop_front();
        }
    }

    /// `role:text` for each turn, joined with `|`. Empty when there is no history.
    pub fn fingerprint(&self) -> String {
        let turns = self.lock();
        fingerprint_turns(turns.iter())
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of complete exchanges currently remembered.
    pub fn exchanges(&self) -> usize {
        self.len() / 2
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Message>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serialize turns as cache-key material. Order-sensitive.
pub fn fingerprint_turns<'a>(turns: impl IntoIterator<Item = &'a Message>) -> String {
    turns
        .into_iter()
        .map(|turn| format!("{}:{}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("|")
}
