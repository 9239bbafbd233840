//! TUI module for termunicator
//!
//! This module implements the terminal user interface using ratatui. The
//! event loop feeds terminal events, platform results and blink ticks into
//! [`update::ChatModel`] one at a time and hands the returned requests to
//! [`executor::RequestExecutor`].

use std::io::{self, Stdout};
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{Event, KeyEventKind};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use termunicator_platform::Platform;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::tui::events::{Input, Request};
use crate::tui::executor::RequestExecutor;
use crate::tui::theme::{Component, Theme};
use crate::tui::ui_layout::UiLayout;
use crate::tui::update::{ChatModel, Connection, Focus, SessionOptions};
use crate::tui::widgets::{InputLine, MessagePane, Sidebar, StatusLine};

pub mod events;
pub mod executor;
pub mod keys;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod update;
pub mod widgets;

mod ui_layout;

/// Cursor blink period on the input line
const CURSOR_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Buffered platform results waiting for the event loop
const INPUT_CHANNEL_CAPACITY: usize = 100;

/// Main TUI application state
pub struct Tui {
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    model: ChatModel,
    executor: RequestExecutor,
    theme: Theme,
}

impl Tui {
    pub fn new(executor: RequestExecutor, options: SessionOptions) -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::setup(&mut stdout)?;

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                terminal::cleanup();
                return Err(e.into());
            }
        };
        let terminal_size = terminal
            .size()
            .map(|s| (s.width, s.height))
            .unwrap_or((80, 24));

        Ok(Self {
            terminal,
            model: ChatModel::new(options, terminal_size),
            executor,
            theme: Theme::default(),
        })
    }

    /// Apply an input and dispatch the resulting requests. Returns true when
    /// the user asked to quit.
    fn apply(&mut self, input: Input) -> bool {
        let requests = self.model.update(input);
        self.dispatch(requests)
    }

    fn dispatch(&self, requests: Vec<Request>) -> bool {
        let mut quit = false;
        for request in requests {
            if request == Request::Quit {
                quit = true;
            } else {
                self.executor.execute(request);
            }
        }
        quit
    }

    pub async fn run(&mut self, mut inputs: mpsc::Receiver<Input>) -> Result<()> {
        info!(target: "tui.run", "Starting TUI");
        self.dispatch(self.model.init());

        let (term_event_tx, mut term_event_rx) = mpsc::channel::<Result<Event>>(1);
        let input_handle: JoinHandle<()> = tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(event) = events.next().await {
                match event {
                    Ok(evt) => {
                        if term_event_tx.send(Ok(evt)).await.is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                        debug!(target: "tui.input", "Ignoring interrupted syscall");
                    }
                    Err(e) => {
                        warn!(target: "tui.input", "Input error: {}", e);
                        let _ = term_event_tx.send(Err(Error::from(e))).await;
                        break;
                    }
                }
            }
        });

        let mut blink = tokio::time::interval(CURSOR_BLINK_INTERVAL);
        blink.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut should_exit = false;
        let mut needs_redraw = true;
        let mut outcome = Ok(());

        while !should_exit {
            if needs_redraw {
                self.draw()?;
                needs_redraw = false;
            }

            tokio::select! {
                event_res = term_event_rx.recv() => {
                    match event_res {
                        Some(Ok(evt)) => {
                            if let Some(input) = translate_event(evt) {
                                should_exit = self.apply(input);
                                needs_redraw = true;
                            }
                        }
                        Some(Err(e)) => {
                            error!(target: "tui.run", "Fatal input error: {}. Exiting.", e);
                            outcome = Err(e);
                            should_exit = true;
                        }
                        None => {
                            outcome = Err(Error::Channel("terminal input closed".to_string()));
                            should_exit = true;
                        }
                    }
                }
                Some(input) = inputs.recv() => {
                    should_exit = self.apply(input);
                    needs_redraw = true;
                }
                _ = blink.tick() => {
                    self.apply(Input::Tick);
                    needs_redraw = true;
                }
            }
        }

        info!(target: "tui.run", "Shutting down");
        input_handle.abort();
        self.executor.shutdown().await;
        outcome
    }

    fn draw(&mut self) -> Result<()> {
        let viewport = self.model.viewport();
        // Refreshes the timeline cache that rendering reads
        let window = self
            .model
            .conversation_mut()
            .map(|conversation| conversation.window(viewport))
            .unwrap_or_default();

        let model = &self.model;
        let theme = &self.theme;
        self.terminal
            .draw(|f| render(f, model, window, theme))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        terminal::cleanup();
    }
}

fn translate_event(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => keys::map_key(key).map(Input::Key),
        Event::Paste(data) => Some(Input::Paste(data)),
        Event::Resize(width, height) => Some(Input::Resize { width, height }),
        _ => None,
    }
}

fn render(f: &mut Frame, model: &ChatModel, window: Range<usize>, theme: &Theme) {
    let area = f.area();
    match model.connection() {
        Connection::Connecting => {
            f.render_widget(Paragraph::new("Connecting..."), area);
            return;
        }
        Connection::Failed(err) => {
            let lines = vec![
                Line::from(format!("Error: {err}")),
                Line::default(),
                Line::from("Press Enter to retry, Ctrl+C to quit."),
            ];
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
            return;
        }
        Connection::Connected(_) => {}
    }

    let layout = UiLayout::compute(area);
    layout.prepare_background(f);

    let focus = model.focus();
    f.render_widget(
        Sidebar::new(model.nav(), focus == Focus::Sidebar, theme),
        layout.sidebar,
    );
    f.render_widget(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(theme.style(Component::Separator)),
        layout.separator,
    );

    if let Some(conversation) = model.conversation() {
        let nick = |id: &str| model.display_name(id);
        f.render_widget(
            MessagePane::new(
                conversation.timeline(),
                window,
                conversation.scroll().cursor,
                &nick,
                theme,
            ),
            layout.messages,
        );
    }

    f.render_widget(
        StatusLine::new(model.status(), location(model), theme),
        layout.status,
    );

    let channel = model
        .nav()
        .active_channel()
        .map(|channel| channel.label())
        .unwrap_or_default();
    let show_cursor = focus == Focus::Main && model.cursor_visible();
    f.render_widget(
        InputLine::new(channel, model.input(), show_cursor, theme),
        layout.input,
    );
}

/// "user | team | channel" for the status line.
fn location(model: &ChatModel) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Connection::Connected(user) = model.connection() {
        parts.push(user.username.clone());
    }
    if let Some(team) = model.nav().active_team() {
        parts.push(team.label().to_string());
    }
    if let Some(channel) = model.nav().active_channel() {
        parts.push(channel.label().to_string());
    }
    if !model.live_updates() {
        parts.push("offline".to_string());
    }
    parts.join(" | ")
}

/// Helper to wrap terminal cleanup in panic handler
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        if terminal::is_active() {
            terminal::cleanup();
        }
        report_panic(&panic_info.to_string());
    }));
}

#[expect(clippy::print_stderr, reason = "the terminal is restored and logging may be off")]
fn report_panic(info: &str) {
    eprintln!("Application panicked:");
    eprintln!("{info}");
}

/// High-level entry point for running the TUI
pub async fn run_tui(platform: Arc<dyn Platform>, options: SessionOptions) -> Result<()> {
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let executor = RequestExecutor::new(platform, input_tx);
    let mut tui = Tui::new(executor, options)?;
    let result = tui.run(input_rx).await;
    drop(tui);
    if let Err(e) = &result {
        error!(target: "tui.run", "TUI exited with error: {}", e);
    }
    result
}
