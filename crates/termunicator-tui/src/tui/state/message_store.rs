//! MessageStore - ordered, deduplicated buffer for the open conversation

use indexmap::IndexMap;
use termunicator_platform::Message;
use tracing::debug;

/// Messages of the active conversation, oldest first, unique by id.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    /// Insertion-ordered with O(1) id lookup
    messages: IndexMap<String, Message>,
    /// Revision number for dirty tracking
    revision: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current revision number for dirty tracking
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// Iterate over all messages, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages.values()
    }

    /// The pagination anchor: the oldest loaded message.
    pub fn oldest(&self) -> Option<&Message> {
        self.messages.first().map(|(_, message)| message)
    }

    /// Discard everything and install `messages` in the given order.
    ///
    /// A repeated id keeps its first position.
    pub fn replace(&mut self, messages: Vec<Message>) {
        let incoming = messages.len();
        self.messages.clear();
        for message in messages {
            self.messages.entry(message.id.clone()).or_insert(message);
        }
        if self.messages.len() != incoming {
            debug!(
                target: "tui.store",
                "replace dropped {} repeated ids",
                incoming - self.messages.len()
            );
        }
        self.revision += 1;
    }

    /// Append a live message unless its id is already present.
    pub fn append_if_new(&mut self, message: Message) -> bool {
        if self.messages.contains_key(&message.id) {
            return false;
        }
        self.messages.insert(message.id.clone(), message);
        self.revision += 1;
        true
    }

    /// Insert the unknown messages of an older batch before the current
    /// first element, preserving the batch order. Returns what was inserted.
    pub fn prepend_older(&mut self, batch: Vec<Message>) -> Vec<Message> {
        let mut fresh: IndexMap<String, Message> = IndexMap::with_capacity(batch.len());
        for message in batch {
            if !self.messages.contains_key(&message.id) {
                fresh.entry(message.id.clone()).or_insert(message);
            }
        }
        if fresh.is_empty() {
            return Vec::new();
        }

        let inserted: Vec<Message> = fresh.values().cloned().collect();
        fresh.extend(self.messages.drain(..));
        self.messages = fresh;
        self.revision += 1;
        inserted
    }
}
