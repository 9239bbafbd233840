//! Backward pagination: when to ask for older history, and what a returned
//! batch means for the conversation.

use termunicator_platform::Message;
use tracing::{debug, warn};

use super::MessageStore;

/// Messages requested per page, for both the newest page and older ones.
pub const PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryState {
    #[default]
    MayHaveMore,
    /// The server returned an empty page: nothing older exists.
    Exhausted,
    /// The last page held only messages we already had.
    Stuck,
}

/// Why an older page was requested. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Cursor or scroll reached the top of loaded history.
    ReachedTop,
    /// A page jump landed close to the top.
    PagePrefetch,
    /// The newest page had no root posts to show.
    NoRootPosts,
    /// An older page added only thread replies.
    RepliesOnly,
}

/// What the caller should do with an older batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Stale or unexpected anchor, nothing changed.
    Discarded,
    Exhausted,
    /// `roots` new root posts were prepended.
    Revealed { roots: usize },
    /// Only replies arrived; another page was requested at `anchor`.
    Continue { anchor: String },
    Stuck,
}

#[derive(Debug, Clone, Default)]
pub struct Pagination {
    /// Anchor of the single outstanding older fetch
    in_flight: Option<String>,
    history: HistoryState,
    exhausted_noticed: bool,
    stuck_noticed: bool,
}

impl Pagination {
    pub fn history(&self) -> HistoryState {
        self.history
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// Start an older fetch anchored at the oldest loaded message.
    ///
    /// Returns `None` while another fetch is outstanding, once history is
    /// exhausted, or when the store is empty.
    pub fn request(&mut self, store: &MessageStore, trigger: Trigger) -> Option<String> {
        if let Some(anchor) = &self.in_flight {
            debug!(target: "tui.pagination", ?trigger, %anchor, "older fetch already in flight");
            return None;
        }
        if self.history == HistoryState::Exhausted {
            debug!(target: "tui.pagination", ?trigger, "history exhausted, not fetching");
            return None;
        }
        let anchor = store.oldest()?.id.clone();
        debug!(target: "tui.pagination", ?trigger, %anchor, "requesting older messages");
        self.in_flight = Some(anchor.clone());
        Some(anchor)
    }

    /// Clear the in-flight marker if `before_id` is the outstanding anchor.
    fn settle(&mut self, before_id: &str) -> bool {
        if self.in_flight.as_deref() == Some(before_id) {
            self.in_flight = None;
            true
        } else {
            warn!(
                target: "tui.pagination",
                before_id,
                in_flight = ?self.in_flight,
                "discarding older batch for unexpected anchor"
            );
            false
        }
    }

    /// Merge an older batch into `store` and decide how to continue.
    pub fn on_batch(
        &mut self,
        store: &mut MessageStore,
        before_id: &str,
        batch: Vec<Message>,
    ) -> BatchOutcome {
        if !self.settle(before_id) {
            return BatchOutcome::Discarded;
        }
        if batch.is_empty() {
            debug!(target: "tui.pagination", before_id, "empty batch, history exhausted");
            self.history = HistoryState::Exhausted;
            return BatchOutcome::Exhausted;
        }

        let received = batch.len();
        let fresh = store.prepend_older(batch);
        let roots = fresh.iter().filter(|m| !m.is_thread_reply()).count();
        debug!(
            target: "tui.pagination",
            before_id,
            received,
            new = fresh.len(),
            duplicates = received - fresh.len(),
            roots,
            replies = fresh.len() - roots,
            "older batch merged"
        );

        if roots > 0 {
            self.history = HistoryState::MayHaveMore;
            return BatchOutcome::Revealed { roots };
        }
        if fresh.is_empty() {
            debug!(target: "tui.pagination", before_id, "batch held only known messages, stopping");
            self.history = HistoryState::Stuck;
            return BatchOutcome::Stuck;
        }

        self.history = HistoryState::MayHaveMore;
        match self.request(store, Trigger::RepliesOnly) {
            Some(anchor) => BatchOutcome::Continue { anchor },
            None => BatchOutcome::Stuck,
        }
    }

    /// A fetch failed. History state is left alone so the user can retry.
    pub fn on_failure(&mut self, before_id: &str) -> bool {
        self.settle(before_id)
    }

    /// One-time notice for an exhausted or stuck history.
    pub fn take_notice(&mut self) -> Option<&'static str> {
        match self.history {
            HistoryState::Exhausted if !self.exhausted_noticed => {
                self.exhausted_noticed = true;
                Some("beginning of history")
            }
            HistoryState::Stuck if !self.stuck_noticed => {
                self.stuck_noticed = true;
                Some("no older messages could be loaded")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::test_support::{ids, reply, root, roots};

    fn store_with(messages: Vec<Message>) -> MessageStore {
        let mut store = MessageStore::new();
        store.replace(messages);
        store
    }

    #[test]
    fn only_one_fetch_in_flight() {
        let store = store_with(roots("m", 3));
        let mut pagination = Pagination::default();

        assert_eq!(
            pagination.request(&store, Trigger::ReachedTop).as_deref(),
            Some("m0")
        );
        assert_eq!(pagination.request(&store, Trigger::PagePrefetch), None);
        assert_eq!(pagination.in_flight(), Some("m0"));
    }

    #[test]
    fn empty_store_has_no_anchor() {
        let mut pagination = Pagination::default();
        assert_eq!(
            pagination.request(&MessageStore::new(), Trigger::ReachedTop),
            None
        );
        assert_eq!(pagination.in_flight(), None);
    }

    #[test]
    fn empty_batch_exhausts_history() {
        let mut store = store_with(roots("m", 3));
        let mut pagination = Pagination::default();
        let anchor = pagination.request(&store, Trigger::ReachedTop).unwrap();

        assert_eq!(
            pagination.on_batch(&mut store, &anchor, Vec::new()),
            BatchOutcome::Exhausted
        );
        assert_eq!(pagination.history(), HistoryState::Exhausted);
        assert_eq!(pagination.request(&store, Trigger::ReachedTop), None);
    }

    #[test]
    fn mixed_batch_merges_only_new_roots() {
        let mut store = store_with(vec![root("d"), root("e")]);
        let mut pagination = Pagination::default();
        let anchor = pagination.request(&store, Trigger::ReachedTop).unwrap();

        let batch = vec![root("a"), root("d"), root("b"), root("e"), root("c")];
        let outcome = pagination.on_batch(&mut store, &anchor, batch);

        assert_eq!(outcome, BatchOutcome::Revealed { roots: 3 });
        assert_eq!(store.len(), 5);
        let merged: Vec<_> = store.iter().cloned().collect();
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn duplicate_batch_is_stuck() {
        let mut store = store_with(roots("m", 3));
        let mut pagination = Pagination::default();
        let anchor = pagination.request(&store, Trigger::ReachedTop).unwrap();

        let outcome = pagination.on_batch(&mut store, &anchor, roots("m", 3));

        assert_eq!(outcome, BatchOutcome::Stuck);
        assert_eq!(pagination.history(), HistoryState::Stuck);
        assert_eq!(pagination.in_flight(), None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn replies_only_batch_continues_from_new_anchor() {
        let mut store = store_with(vec![reply("r5", "x")]);
        let mut pagination = Pagination::default();
        let anchor = pagination.request(&store, Trigger::NoRootPosts).unwrap();

        let outcome =
            pagination.on_batch(&mut store, &anchor, vec![reply("r3", "x"), reply("r4", "x")]);

        assert_eq!(
            outcome,
            BatchOutcome::Continue {
                anchor: "r3".to_string()
            }
        );
        assert_eq!(pagination.in_flight(), Some("r3"));
    }

    #[test]
    fn stale_anchor_is_discarded() {
        let mut store = store_with(roots("m", 2));
        let mut pagination = Pagination::default();
        pagination.request(&store, Trigger::ReachedTop);

        let outcome = pagination.on_batch(&mut store, "other", roots("old", 2));

        assert_eq!(outcome, BatchOutcome::Discarded);
        assert_eq!(store.len(), 2);
        assert_eq!(pagination.in_flight(), Some("m0"));
    }

    #[test]
    fn failure_allows_retry() {
        let store = store_with(roots("m", 2));
        let mut pagination = Pagination::default();
        let anchor = pagination.request(&store, Trigger::ReachedTop).unwrap();

        assert!(pagination.on_failure(&anchor));
        assert_eq!(pagination.history(), HistoryState::MayHaveMore);
        assert!(pagination.request(&store, Trigger::ReachedTop).is_some());
    }

    #[test]
    fn notices_are_shown_once() {
        let mut store = store_with(roots("m", 2));
        let mut pagination = Pagination::default();
        assert_eq!(pagination.take_notice(), None);

        let anchor = pagination.request(&store, Trigger::ReachedTop).unwrap();
        pagination.on_batch(&mut store, &anchor, roots("m", 2));
        assert_eq!(
            pagination.take_notice(),
            Some("no older messages could be loaded")
        );
        assert_eq!(pagination.take_notice(), None);

        let anchor = pagination.request(&store, Trigger::ReachedTop).unwrap();
        pagination.on_batch(&mut store, &anchor, Vec::new());
        assert_eq!(pagination.take_notice(), Some("beginning of history"));
        assert_eq!(pagination.take_notice(), None);
    }
}
