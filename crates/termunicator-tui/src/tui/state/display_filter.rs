//! DisplayFilter - the root posts of a MessageStore, cached per revision

use termunicator_platform::Message;

use super::MessageStore;

/// Cached subsequence of the store that the timeline shows.
///
/// Thread replies are never shown on their own, in channels or DMs alike.
#[derive(Debug, Clone, Default)]
pub struct DisplayFilter {
    items: Vec<Message>,
    /// Store revision the cache was built from; `None` forces a rebuild
    revision: Option<u64>,
}

impl DisplayFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self, store: &MessageStore) -> bool {
        self.revision != Some(store.revision())
    }

    pub fn invalidate(&mut self) {
        self.revision = None;
    }

    /// Items as of the last [`DisplayFilter::visible`] call.
    pub fn cached(&self) -> &[Message] {
        &self.items
    }

    pub fn visible(&mut self, store: &MessageStore) -> &[Message] {
        if self.is_dirty(store) {
            self.items = store
                .iter()
                .filter(|message| !message.is_thread_reply())
                .cloned()
                .collect();
            self.revision = Some(store.revision());
        }
        &self.items
    }
}
