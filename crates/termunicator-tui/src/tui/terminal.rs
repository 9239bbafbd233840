//! Terminal mode handling shared by the normal exit, panic and signal paths.
//!
//! Every mode records whether it is on, so [`cleanup`] can run from several
//! places (drop, panic hook, signal handler) without emitting stray escape
//! sequences the second time.

use ratatui::crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

const WINDOW_TITLE: &str = "termunicator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Raw,
    AltScreen,
    BracketedPaste,
    KeyboardFlags,
}

/// Enable order; cleanup walks it backwards.
const MODES: [Mode; 4] = [
    Mode::Raw,
    Mode::AltScreen,
    Mode::BracketedPaste,
    Mode::KeyboardFlags,
];

static ACTIVE: [AtomicBool; MODES.len()] = [const { AtomicBool::new(false) }; MODES.len()];

impl Mode {
    fn flag(self) -> &'static AtomicBool {
        &ACTIVE[self as usize]
    }

    fn enable<W: Write>(self, w: &mut W) -> io::Result<()> {
        match self {
            Mode::Raw => enable_raw_mode(),
            Mode::AltScreen => execute!(w, EnterAlternateScreen, SetTitle(WINDOW_TITLE)),
            Mode::BracketedPaste => execute!(w, EnableBracketedPaste),
            // Ctrl+Enter is indistinguishable from Enter without this
            Mode::KeyboardFlags => execute!(
                w,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            ),
        }?;
        self.flag().store(true, Ordering::Relaxed);
        Ok(())
    }

    fn disable<W: Write>(self, w: &mut W) {
        if !self.flag().swap(false, Ordering::Relaxed) {
            return;
        }
        let result = match self {
            Mode::Raw => disable_raw_mode(),
            Mode::AltScreen => execute!(w, LeaveAlternateScreen),
            Mode::BracketedPaste => execute!(w, DisableBracketedPaste),
            Mode::KeyboardFlags => execute!(w, PopKeyboardEnhancementFlags),
        };
        if let Err(e) = result {
            debug!(target: "tui.terminal", mode = ?self, "failed to restore: {}", e);
        }
    }
}

/// Whether any terminal mode is still switched on.
pub fn is_active() -> bool {
    MODES.iter().any(|mode| mode.flag().load(Ordering::Relaxed))
}

/// Switch the terminal into TUI mode. On failure, whatever was already
/// enabled is rolled back before the error is returned.
pub fn setup<W: Write>(w: &mut W) -> io::Result<()> {
    for mode in MODES {
        if let Err(e) = mode.enable(w) {
            cleanup_with_writer(w);
            return Err(e);
        }
    }
    Ok(())
}

/// Undo whatever [`setup`] switched on, writing to `writer`.
pub fn cleanup_with_writer<W: Write>(writer: &mut W) {
    for mode in MODES.iter().rev() {
        mode.disable(writer);
    }
    let _ = writer.flush();
}

/// Best-effort cleanup on stdout, falling back to the controlling tty.
pub fn cleanup() {
    cleanup_with_writer(&mut io::stdout());
    #[cfg(not(windows))]
    if let Ok(mut tty) = std::fs::OpenOptions::new().write(true).open("/dev/tty") {
        cleanup_with_writer(&mut tty);
    }
}
