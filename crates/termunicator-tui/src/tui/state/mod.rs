//! View-model state for the active conversation and the sidebar.

pub mod conversation;
pub use conversation::Conversation;

pub mod display_filter;
pub use display_filter::DisplayFilter;

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod message_store;
pub use message_store::MessageStore;

pub mod nav_index;
pub use nav_index::{NavIndex, NavItem};

pub mod pagination;
pub use pagination::{BatchOutcome, HistoryState, Pagination, Trigger};

pub mod scroll;
pub use scroll::{CursorMove, ScrollState, Viewport};
