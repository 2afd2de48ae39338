//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the Elm runtime boundary. All side effects happen here; the
//! reducer stays pure and only returns effects.
//!
//! Async results use an inbox: spawned handlers send a `UiEvent` to
//! `inbox_tx` and the loop drains `inbox_rx` every iteration.

mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use parley_core::api::ApiClient;
use parley_core::store::LocalStore;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::TerminalSession;
use crate::{dispatch, render, update};

/// Tick interval while something is in flight (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

pub struct TuiRuntime {
    terminal: TerminalSession,
    pub state: AppState,
    client: ApiClient,
    store: LocalStore,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Takes over the terminal. It is restored when the runtime drops.
    pub fn new(state: AppState, client: ApiClient, store: LocalStore) -> Result<Self> {
        let terminal = TerminalSession::enter().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            client,
            store,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs until the user quits. Must be called inside a tokio runtime.
    pub fn run(&mut self) -> Result<()> {
        let effects = dispatch::bootstrap(&mut self.state.tui);
        self.execute_effects(effects);
        self.event_loop()
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            // Layout must be current before any other event is reduced.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty && !self.state.tui.should_quit {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tui = &self.state.tui;
        let needs_fast_poll = tui.session.is_sending()
            || tui.tasks.is_any_running()
            || tui.status.is_some()
            || self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        // Block until the next tick only when there is nothing to reduce.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a handler and posts its result to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Spawns a handler wrapped in the TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            let completed = TaskCompleted {
                id,
                result: Box::new(f().await),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let client = self.client.clone();
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::SendMessage { ticket } => {
                self.spawn_effect(move || handlers::send_message(client, ticket));
            }
            UiEffect::LoadConversation { ticket } => {
                self.spawn_effect(move || handlers::load_conversation(client, ticket));
            }
            UiEffect::RefreshConversations { task } => {
                self.spawn_task(TaskKind::ConversationList, task, move || {
                    handlers::list_conversations(client)
                });
            }
            UiEffect::DeleteConversation { conversation_id } => {
                self.spawn_effect(move || handlers::delete_conversation(client, conversation_id));
            }
            UiEffect::RenameConversation {
                conversation_id,
                new_name,
                previous,
            } => {
                self.spawn_effect(move || {
                    handlers::rename_conversation(client, conversation_id, new_name, previous)
                });
            }
            UiEffect::Search { task, term } => {
                self.spawn_task(TaskKind::Search, task, move || {
                    handlers::search(client, task, term)
                });
            }
            UiEffect::PersistConversationId { id } => {
                if let Err(error) = self.store.set_conversation_id(id.as_deref()) {
                    tracing::warn!(error = %format!("{error:#}"), "failed to persist conversation id");
                }
            }
        }
    }
}
