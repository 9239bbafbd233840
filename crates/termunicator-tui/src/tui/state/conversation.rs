//! The open conversation: message buffer, timeline filter, scroll position
//! and pagination, kept consistent with each other.

use std::ops::Range;

use termunicator_platform::Message;
use tracing::debug;

use super::{
    BatchOutcome, CursorMove, DisplayFilter, MessageStore, Pagination, ScrollState, Trigger,
    Viewport,
};

type Movement = fn(&mut ScrollState, &[Message], Viewport) -> CursorMove;

#[derive(Debug, Clone)]
pub struct Conversation {
    channel_id: String,
    store: MessageStore,
    filter: DisplayFilter,
    scroll: ScrollState,
    pagination: Pagination,
    /// Set once the newest page has been installed
    loaded: bool,
}

impl Conversation {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            store: MessageStore::new(),
            filter: DisplayFilter::new(),
            scroll: ScrollState::default(),
            pagination: Pagination::default(),
            loaded: false,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Whether the newest page has arrived. Only one page is accepted per
    /// opened conversation.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn visible(&mut self) -> &[Message] {
        self.filter.visible(&self.store)
    }

    /// The timeline as of the last [`Conversation::visible`] or
    /// [`Conversation::window`] call. Used by rendering.
    pub fn timeline(&self) -> &[Message] {
        self.filter.cached()
    }

    pub fn window(&mut self, viewport: Viewport) -> Range<usize> {
        let offset = self.scroll.offset;
        viewport.window(self.filter.visible(&self.store), offset)
    }

    /// Install the newest page. If none of it is displayable, returns the
    /// anchor of an older fetch that must be issued right away.
    pub fn replace(&mut self, messages: Vec<Message>) -> Option<String> {
        self.store.replace(messages);
        self.filter.invalidate();
        self.scroll.reset();
        self.pagination = Pagination::default();
        self.loaded = true;

        let shown = self.filter.visible(&self.store).len();
        debug!(
            target: "tui.conversation",
            channel_id = %self.channel_id,
            loaded = self.store.len(),
            shown,
            "conversation loaded"
        );
        if shown == 0 && !self.store.is_empty() {
            self.pagination.request(&self.store, Trigger::NoRootPosts)
        } else {
            None
        }
    }

    /// Append a live message. A view pinned to the bottom stays pinned.
    pub fn append_if_new(&mut self, message: Message, viewport: Viewport) -> bool {
        if !self.store.append_if_new(message) {
            return false;
        }
        let visible = self.filter.visible(&self.store);
        self.scroll.clamp(visible, viewport);
        true
    }

    fn apply(&mut self, viewport: Viewport, movement: Movement, trigger: Trigger) -> Option<String> {
        let visible = self.filter.visible(&self.store);
        match movement(&mut self.scroll, visible, viewport) {
            CursorMove::Moved => None,
            CursorMove::NeedsOlder => self.pagination.request(&self.store, trigger),
        }
    }

    /// Returns the anchor of an older fetch to issue, if any.
    pub fn cursor_up(&mut self, viewport: Viewport) -> Option<String> {
        self.apply(viewport, ScrollState::cursor_up, Trigger::ReachedTop)
    }

    pub fn cursor_down(&mut self, viewport: Viewport) {
        self.apply(viewport, ScrollState::cursor_down, Trigger::ReachedTop);
    }

    pub fn page_up(&mut self, viewport: Viewport) -> Option<String> {
        self.apply(viewport, ScrollState::page_up, Trigger::PagePrefetch)
    }

    pub fn page_down(&mut self, viewport: Viewport) {
        self.apply(viewport, ScrollState::page_down, Trigger::PagePrefetch);
    }

    /// Drop the message cursor and return to the newest messages.
    pub fn clear_cursor(&mut self) {
        self.scroll.cursor = None;
        self.scroll.offset = 0;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let visible = self.filter.visible(&self.store);
        self.scroll.clamp(visible, viewport);
    }

    /// Merge an older page fetched with `before_id` as anchor.
    pub fn older_loaded(
        &mut self,
        before_id: &str,
        batch: Vec<Message>,
        viewport: Viewport,
    ) -> BatchOutcome {
        let outcome = self.pagination.on_batch(&mut self.store, before_id, batch);
        if let BatchOutcome::Revealed { roots } = outcome {
            let visible = self.filter.visible(&self.store);
            self.scroll.reveal_older(roots, visible, viewport);
        }
        outcome
    }

    pub fn older_failed(&mut self, before_id: &str) -> bool {
        self.pagination.on_failure(before_id)
    }

    pub fn take_history_notice(&mut self) -> Option<&'static str> {
        self.pagination.take_notice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::HistoryState;
    use crate::tui::state::test_support::{reply, root, roots};

    fn replies(count: usize) -> Vec<Message> {
        (0..count)
            .map(|i| reply(&format!("r{i}"), "elsewhere"))
            .collect()
    }

    fn assert_scroll_invariants(conversation: &mut Conversation, viewport: Viewport) {
        let scroll = conversation.scroll();
        let visible = conversation.visible();
        assert!(scroll.offset <= viewport.max_scroll(visible));
        if let Some(cursor) = scroll.cursor {
            assert!(cursor < visible.len());
        }
    }

    #[test]
    fn replace_resets_view() {
        let mut conversation = Conversation::new("chan");
        assert!(!conversation.is_loaded());
        assert_eq!(conversation.replace(roots("m", 5)), None);
        assert!(conversation.is_loaded());

        assert_eq!(conversation.visible().len(), 5);
        assert_eq!(conversation.scroll(), ScrollState::default());
    }

    #[test]
    fn replies_only_page_requests_exactly_one_older_fetch() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(10);

        assert_eq!(conversation.replace(replies(10)).as_deref(), Some("r0"));
        assert!(conversation.visible().is_empty());
        assert_eq!(conversation.cursor_up(viewport), None);
        assert_eq!(conversation.page_up(viewport), None);
        assert_eq!(conversation.pagination().in_flight(), Some("r0"));
    }

    #[test]
    fn scrolling_to_top_fetches_older_history() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(5);
        conversation.replace(roots("m", 6));

        let mut anchor = None;
        for _ in 0..10 {
            anchor = conversation.cursor_up(viewport);
            assert_scroll_invariants(&mut conversation, viewport);
            if anchor.is_some() {
                break;
            }
        }
        assert_eq!(anchor.as_deref(), Some("m0"));
        assert_eq!(conversation.scroll().cursor, Some(0));
    }

    #[test]
    fn revealed_page_keeps_cursor_on_message() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(5);
        conversation.replace(roots("m", 6));
        while conversation.cursor_up(viewport).is_none() {}

        let outcome = conversation.older_loaded("m0", roots("old", 10), viewport);

        assert_eq!(outcome, BatchOutcome::Revealed { roots: 10 });
        let cursor = conversation.scroll().cursor.unwrap();
        assert_eq!(conversation.visible()[cursor].id, "m0");
        assert!(conversation.window(viewport).contains(&cursor));
        assert_scroll_invariants(&mut conversation, viewport);
    }

    #[test]
    fn replies_then_roots_eventually_shows_history() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(5);
        let anchor = conversation.replace(replies(3)).unwrap();

        let next = conversation.older_loaded(&anchor, vec![reply("q0", "x")], viewport);
        let BatchOutcome::Continue { anchor } = next else {
            panic!("expected a follow-up fetch, got {next:?}");
        };
        assert_eq!(anchor, "q0");

        let outcome = conversation.older_loaded(&anchor, vec![root("a"), root("b")], viewport);
        assert_eq!(outcome, BatchOutcome::Revealed { roots: 2 });
        assert_eq!(conversation.visible().len(), 2);
        assert_scroll_invariants(&mut conversation, viewport);
    }

    #[test]
    fn duplicate_page_halts_and_notifies_once() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(5);
        conversation.replace(roots("m", 3));
        let anchor = conversation.page_up(viewport).unwrap();

        let outcome = conversation.older_loaded(&anchor, roots("m", 3), viewport);

        assert_eq!(outcome, BatchOutcome::Stuck);
        assert_eq!(conversation.pagination().history(), HistoryState::Stuck);
        assert_eq!(conversation.pagination().in_flight(), None);
        assert!(conversation.take_history_notice().is_some());
        assert!(conversation.take_history_notice().is_none());
    }

    #[test]
    fn live_append_stays_pinned_to_bottom() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(5);
        conversation.replace(roots("m", 10));

        assert!(conversation.append_if_new(root("new"), viewport));
        assert!(!conversation.append_if_new(root("new"), viewport));
        assert_eq!(conversation.scroll().offset, 0);
        assert_eq!(conversation.window(viewport), 6..11);
    }

    #[test]
    fn escape_returns_to_bottom() {
        let mut conversation = Conversation::new("chan");
        let viewport = Viewport::new(5);
        conversation.replace(roots("m", 20));
        conversation.page_up(viewport);
        conversation.page_up(viewport);

        conversation.clear_cursor();

        assert_eq!(conversation.scroll(), ScrollState::default());
    }

    #[test]
    fn resize_keeps_offset_in_range() {
        let mut conversation = Conversation::new("chan");
        conversation.replace(roots("m", 20));
        for _ in 0..3 {
            conversation.page_up(Viewport::new(3));
        }
        let large = Viewport::new(18);
        conversation.resize(large);
        assert_scroll_invariants(&mut conversation, large);
    }
}
