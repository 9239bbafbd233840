//! Scroll offset, message cursor and the visible window.
//!
//! The offset counts display items hidden below the viewport bottom, so
//! `offset == 0` means pinned to the newest message. The window is always
//! bottom-aligned and sized by the line count of each message.

use std::ops::Range;

use termunicator_platform::Message;

/// Smallest viewport height the layout will ever report.
pub const MIN_MESSAGE_HEIGHT: usize = 3;

/// Rows reserved below the message area (status line and input line).
pub const RESERVED_LINES: usize = 2;

/// Lower bound of a page jump.
pub const PAGE_JUMP_MIN: usize = 5;

/// A page jump that lands the cursor within this many items of the top
/// starts loading older history.
pub const PREFETCH_MARGIN: usize = 3;

/// Height of the message area, in terminal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: MIN_MESSAGE_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            height: height.max(MIN_MESSAGE_HEIGHT),
        }
    }

    /// Derive the message area from the full terminal height.
    pub fn from_terminal_height(rows: u16) -> Self {
        Self::new(usize::from(rows).saturating_sub(RESERVED_LINES))
    }

    pub fn page_jump(&self) -> usize {
        (self.height / 2).max(PAGE_JUMP_MIN)
    }

    /// Half-open range of display items shown for `offset`.
    ///
    /// Walks backwards from the bottom while the lines fit. The first
    /// message is always taken even if it alone overflows.
    pub fn window(&self, visible: &[Message], offset: usize) -> Range<usize> {
        let end = visible.len().saturating_sub(offset);
        let mut start = end;
        let mut lines = 0;
        while start > 0 && lines < self.height {
            let height = visible[start - 1].line_count();
            if lines + height > self.height && lines > 0 {
                break;
            }
            lines += height;
            start -= 1;
        }
        start..end
    }

    /// Largest offset that still fills the viewport from the top.
    pub fn max_scroll(&self, visible: &[Message]) -> usize {
        let mut lines = 0;
        let mut fit = 0;
        for message in visible {
            let height = message.line_count();
            if lines + height > self.height && fit > 0 {
                break;
            }
            lines += height;
            fit += 1;
            if lines >= self.height {
                break;
            }
        }
        visible.len().saturating_sub(fit)
    }
}

/// Result of a cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Moved,
    /// The movement wants older history to be loaded.
    NeedsOlder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: usize,
    /// Index into the display items; `None` when nothing is selected.
    pub cursor: Option<usize>,
}

impl ScrollState {
    /// Back to the bottom with no cursor.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep `offset` in `[0, max_scroll]` and the cursor inside the items.
    pub fn clamp(&mut self, visible: &[Message], viewport: Viewport) {
        self.offset = self.offset.min(viewport.max_scroll(visible));
        if let Some(cursor) = self.cursor {
            self.cursor = visible.len().checked_sub(1).map(|last| cursor.min(last));
        }
    }

    /// Scroll so the cursor lies inside the window, then clamp. Without a
    /// cursor this pins the view to the bottom.
    pub fn ensure_cursor_visible(&mut self, visible: &[Message], viewport: Viewport) {
        match self.cursor {
            None => self.offset = 0,
            Some(cursor) => {
                let window = viewport.window(visible, self.offset);
                if !window.contains(&cursor) {
                    // Put the cursor on the bottom row, clamp fixes the top
                    self.offset = visible.len().saturating_sub(cursor + 1);
                }
            }
        }
        self.clamp(visible, viewport);
    }

    fn initial_cursor(&self, visible: &[Message], viewport: Viewport) -> usize {
        let window = viewport.window(visible, self.offset);
        window.end.saturating_sub(1).min(visible.len().saturating_sub(1))
    }

    pub fn cursor_up(&mut self, visible: &[Message], viewport: Viewport) -> CursorMove {
        if visible.is_empty() {
            return CursorMove::Moved;
        }
        match self.cursor {
            None => self.cursor = Some(self.initial_cursor(visible, viewport)),
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.ensure_cursor_visible(visible, viewport);
            }
            Some(_) => {
                if self.offset < viewport.max_scroll(visible) {
                    self.offset += 1;
                    self.clamp(visible, viewport);
                } else {
                    return CursorMove::NeedsOlder;
                }
            }
        }
        CursorMove::Moved
    }

    pub fn cursor_down(&mut self, visible: &[Message], viewport: Viewport) -> CursorMove {
        if visible.is_empty() {
            return CursorMove::Moved;
        }
        let last = visible.len() - 1;
        match self.cursor {
            Some(cursor) if cursor < last => {
                self.cursor = Some(cursor + 1);
                self.ensure_cursor_visible(visible, viewport);
            }
            _ => {
                if self.offset > 0 {
                    self.offset -= 1;
                    self.clamp(visible, viewport);
                }
            }
        }
        CursorMove::Moved
    }

    pub fn page_up(&mut self, visible: &[Message], viewport: Viewport) -> CursorMove {
        if visible.is_empty() {
            return CursorMove::Moved;
        }
        let cursor = self
            .cursor
            .unwrap_or_else(|| self.initial_cursor(visible, viewport))
            .saturating_sub(viewport.page_jump());
        self.cursor = Some(cursor);
        self.ensure_cursor_visible(visible, viewport);
        if cursor < PREFETCH_MARGIN {
            CursorMove::NeedsOlder
        } else {
            CursorMove::Moved
        }
    }

    pub fn page_down(&mut self, visible: &[Message], viewport: Viewport) -> CursorMove {
        if visible.is_empty() {
            return CursorMove::Moved;
        }
        let last = visible.len() - 1;
        let cursor = self
            .cursor
            .unwrap_or_else(|| self.initial_cursor(visible, viewport));
        self.cursor = Some((cursor + viewport.page_jump()).min(last));
        self.ensure_cursor_visible(visible, viewport);
        CursorMove::Moved
    }

    /// Shift the view after `roots` display items were prepended: the
    /// cursor keeps pointing at the same message and roughly half of the
    /// new items (at least three, at most half a screen) come into view.
    pub fn reveal_older(&mut self, roots: usize, visible: &[Message], viewport: Viewport) {
        if let Some(cursor) = self.cursor {
            self.cursor = Some(cursor + roots);
        }
        let mut show = (roots / 2).min(viewport.height / 2);
        if show < 3 && roots >= 3 {
            show = 3;
        }
        self.offset += roots.saturating_sub(show);
        self.ensure_cursor_visible(visible, viewport);
    }
}
