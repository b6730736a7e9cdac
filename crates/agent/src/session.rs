//! Conversation store: the message history of one session.

use chrono::{DateTime, Utc};
use mailpilot_core::message::{Conversation, ConversationId, Message};

/// Owns one conversation's ordered message list. No I/O.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversation: Conversation,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &ConversationId {
        &self.conversation.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.conversation.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.conversation.updated_at
    }

    /// Drop every message and start a fresh conversation.
    pub fn reset(&mut self) {
        self.conversation = Conversation::new();
    }

    pub fn append(&mut self, message: Message) {
        self.conversation.push(message);
    }

    /// Keep only the most recent `2 * max_turns` messages.
    ///
    /// A turn is counted as two messages, which undercounts turns that
    /// involved tool calls. Returns how many messages were dropped.
    pub fn trim(&mut self, max_turns: usize) -> usize {
        let keep = max_turns.saturating_mul(2);
        let len = self.conversation.messages.len();
        if len <= keep {
            return 0;
        }

        let dropped = len - keep;
        self.conversation.messages.drain(..dropped);
        self.conversation.updated_at = Utc::now();
        dropped
    }

    pub fn len(&self) -> usize {
        self.conversation.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.messages.is_empty()
    }

    /// An owned copy of the history, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.conversation.messages.clone()
    }

    /// Borrow the history without copying.
    pub fn messages(&self) -> &[Message] {
        &self.conversation.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailpilot_core::message::Role;

    fn store_with(n: usize) -> ConversationStore {
        let mut store = ConversationStore::new();
        for i in 0..n {
            if i % 2 == 0 {
                store.append(Message::user(format!("m{i}")));
            } else {
                store.append(Message::assistant(format!("m{i}")));
            }
        }
        store
    }

    fn contents(store: &ConversationStore) -> Vec<String> {
        store.messages().iter().map(|m| m.content.clone()).collect()
    }

    #[test]
    fn append_preserves_order() {
        let store = store_with(3);
        assert_eq!(contents(&store), vec!["m0", "m1", "m2"]);
        assert_eq!(store.messages()[0].role, Role::User);
        assert_eq!(store.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn trim_keeps_most_recent_suffix() {
        let mut store = store_with(7);
        let dropped = store.trim(2);
        assert_eq!(dropped, 3);
        assert_eq!(contents(&store), vec!["m3", "m4", "m5", "m6"]);
    }

    #[test]
    fn trim_below_bound_is_noop() {
        let mut store = store_with(4);
        let before = store.updated_at();
        assert_eq!(store.trim(2), 0);
        assert_eq!(store.len(), 4);
        assert_eq!(store.updated_at(), before);
    }

    #[test]
    fn trim_to_zero_turns_empties_store() {
        let mut store = store_with(3);
        store.trim(0);
        assert!(store.is_empty());
    }

    #[test]
    fn reset_starts_new_conversation() {
        let mut store = store_with(5);
        let old_id = store.id().clone();
        store.reset();
        assert!(store.is_empty());
        assert_ne!(store.id(), &old_id);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = store_with(2);
        let snapshot = store.snapshot();
        store.append(Message::user("later"));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.len(), 3);
    }
}
