//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use parley_core::conversation::Role;
use parley_core::session::{LoadOutcome, SendOutcome};
use ratatui::layout::{Position, Rect};

use crate::common::TaskKind;
use crate::dispatch::{Command, dispatch};
use crate::effects::UiEffect;
use crate::events::{SessionUiEvent, UiEvent};
use crate::features::directory::DirectoryAction;
use crate::features::{composer, directory, transcript};
use crate::overlays::{
    AlertState, ConfirmDeleteState, Overlay, OverlayTransition, OverlayUpdate, SearchState,
};
use crate::render;
use crate::state::{AppState, Focus, StatusLevel, TuiState};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.expire_status();
            vec![]
        }
        UiEvent::Frame { width, height } => {
            handle_frame(&mut app.tui, width, height);
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            if kind == TaskKind::Search
                && let Some(search) = app.overlay.as_mut().and_then(Overlay::as_search_mut)
            {
                search.begin(started.id);
            }
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tui.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "dropping superseded task result");
                vec![]
            }
        }
        UiEvent::Session(event) => handle_session_event(app, event),
    }
}

// ============================================================================
// Frame Handler
// ============================================================================

/// Recomputes layout and scroll metrics for the current terminal size.
fn handle_frame(tui: &mut TuiState, width: u16, height: u16) {
    let layout = render::compute_layout(
        Rect::new(0, 0, width, height),
        tui.show_sidebar,
        tui.composer.height(),
    );
    tui.layout = layout;

    let show_welcome = tui.show_welcome();
    let line_count = transcript::line_count(
        &tui.transcript,
        layout.transcript.width as usize,
        show_welcome,
    );
    tui.transcript
        .scroll
        .update_metrics(line_count, layout.transcript.height as usize);

    if let Some(list) = layout.directory_list {
        tui.directory.set_viewport_rows(list.height as usize);
    }
}

// ============================================================================
// Session Results
// ============================================================================

fn handle_session_event(app: &mut AppState, event: SessionUiEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    match event {
        SessionUiEvent::SendCompleted { ticket, result } => {
            match tui.session.complete_send(&ticket, result) {
                SendOutcome::Stale => vec![],
                SendOutcome::Replied { reply, adopted } => {
                    tui.transcript.hide_typing();
                    tui.transcript.append(Role::Bot, reply);
                    let Some(id) = adopted else {
                        return vec![];
                    };
                    tui.composer.subject.clear();
                    tui.normalize_focus();
                    let mut effects = vec![UiEffect::PersistConversationId { id: Some(id) }];
                    effects.extend(dispatch(tui, Command::RefreshDirectory));
                    effects
                }
                SendOutcome::Failed { message } => {
                    tui.transcript.hide_typing();
                    tui.transcript.append(Role::Error, format!("Error: {message}"));
                    vec![]
                }
            }
        }
        SessionUiEvent::LoadCompleted { ticket, result } => {
            match tui.session.complete_load(&ticket, result) {
                LoadOutcome::Stale => vec![],
                LoadOutcome::Loaded { messages, .. } => {
                    tui.transcript.replace(messages);
                    tui.composer.subject.clear();
                    tui.directory.select(&ticket.conversation_id);
                    tui.normalize_focus();
                    vec![UiEffect::PersistConversationId {
                        id: Some(ticket.conversation_id),
                    }]
                }
                LoadOutcome::Failed { message } => {
                    tracing::warn!(
                        conversation_id = %ticket.conversation_id,
                        error = %message,
                        "failed to load conversation"
                    );
                    tui.transcript.clear();
                    tui.transcript.append(Role::Error, format!("Error: {message}"));
                    vec![]
                }
            }
        }
        SessionUiEvent::ConversationsLoaded { rows } => {
            tui.directory.set_rows(rows);
            if let Some(id) = tui.session.active_conversation_id().map(String::from) {
                tui.directory.select(&id);
            }
            vec![]
        }
        SessionUiEvent::ConversationsFailed { error } => {
            tracing::warn!(%error, "failed to fetch conversations");
            tui.directory.set_failed(error.to_string());
            vec![]
        }
        SessionUiEvent::DeleteCompleted {
            conversation_id,
            result,
        } => match result {
            Ok(message) => {
                let mut effects = Vec::new();
                if tui.session.complete_delete(&conversation_id) {
                    tui.transcript.clear();
                    tui.composer.subject.clear();
                    effects.push(UiEffect::PersistConversationId { id: None });
                }
                tui.set_status(message, StatusLevel::Info);
                effects.extend(dispatch(tui, Command::RefreshDirectory));
                effects
            }
            Err(error) => {
                tracing::warn!(%conversation_id, %error, "failed to delete conversation");
                vec![]
            }
        },
        SessionUiEvent::RenameCompleted {
            conversation_id,
            new_name,
            previous,
            result,
        } => match result {
            Ok(message) => {
                tui.session.apply_rename(&conversation_id, &new_name);
                tui.set_status(message, StatusLevel::Info);
                vec![]
            }
            Err(error) => {
                if let Some(previous) = previous {
                    tui.directory.restore(previous);
                }
                app.overlay = Some(Overlay::Alert(AlertState::new(
                    "Rename failed",
                    error.to_string(),
                )));
                vec![]
            }
        },
        SessionUiEvent::SearchCompleted { task, result } => {
            match result {
                Ok(hits) => {
                    if let Some(search) = app.overlay.as_mut().and_then(Overlay::as_search_mut) {
                        search.complete(task, hits);
                    }
                }
                Err(error) if matches!(app.overlay, Some(Overlay::Search(_))) => {
                    app.overlay = Some(Overlay::Alert(AlertState::new(
                        "Search failed",
                        error.to_string(),
                    )));
                }
                Err(error) => {
                    tracing::warn!(%error, "search failed after overlay closed");
                }
            }
            vec![]
        }
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Paste(text) => {
            handle_paste(app, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    if update.transition == OverlayTransition::Close {
        app.overlay = None;
    }
    let mut effects = Vec::new();
    for command in update.commands {
        effects.extend(dispatch(&mut app.tui, command));
    }
    effects
}

fn apply_directory_action(app: &mut AppState, action: DirectoryAction) -> Vec<UiEffect> {
    match action {
        DirectoryAction::None => vec![],
        DirectoryAction::Load { conversation_id } => {
            dispatch(&mut app.tui, Command::LoadConversation { conversation_id })
        }
        DirectoryAction::ConfirmDelete {
            conversation_id,
            label,
        } => {
            app.overlay = Some(Overlay::ConfirmDelete(ConfirmDeleteState::new(
                conversation_id,
                label,
            )));
            vec![]
        }
        DirectoryAction::Rename {
            conversation_id,
            new_name,
        } => dispatch(
            &mut app.tui,
            Command::RenameConversation {
                conversation_id,
                new_name,
            },
        ),
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(key);
        return apply_overlay_update(app, update);
    }

    if let Some(effects) = handle_global_key(app, key) {
        return effects;
    }

    let tui = &mut app.tui;
    match tui.focus {
        Focus::Subject => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                tui.focus = Focus::Composer;
            } else {
                composer::handle_subject_key(&mut tui.composer, key);
            }
            vec![]
        }
        Focus::Composer => match composer::handle_key(&mut tui.composer, key) {
            composer::ComposerAction::None => vec![],
            composer::ComposerAction::Submit { text } => {
                dispatch(tui, Command::SendMessage { text })
            }
        },
        Focus::Directory => {
            let action = directory::handle_key(&mut tui.directory, key);
            apply_directory_action(app, action)
        }
    }
}

/// Keys that work regardless of focus. Returns `None` when the key should
/// go to the focused pane instead.
fn handle_global_key(app: &mut AppState, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let tui = &mut app.tui;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let editing_row = tui.focus == Focus::Directory && tui.directory.is_editing();
    let composer_idle = tui.focus == Focus::Composer && tui.composer.buffer.is_blank();

    let effects = match key.code {
        KeyCode::Char('n') if ctrl => dispatch(tui, Command::StartNew),
        KeyCode::Char('r') if ctrl => dispatch(tui, Command::RefreshDirectory),
        KeyCode::Char('f') if ctrl => {
            app.overlay = Some(Overlay::Search(SearchState::new()));
            vec![]
        }
        KeyCode::Char('b') if ctrl => {
            tui.show_sidebar = !tui.show_sidebar;
            tui.normalize_focus();
            vec![]
        }
        KeyCode::Tab | KeyCode::BackTab if !editing_row => {
            tui.cycle_focus();
            vec![]
        }
        KeyCode::PageUp => {
            tui.transcript.scroll.page_up();
            vec![]
        }
        KeyCode::PageDown => {
            tui.transcript.scroll.page_down();
            vec![]
        }
        KeyCode::Home if ctrl || composer_idle => {
            tui.transcript.scroll.scroll_to_top();
            vec![]
        }
        KeyCode::End if ctrl || composer_idle => {
            tui.transcript.scroll.scroll_to_bottom();
            vec![]
        }
        _ => return None,
    };
    Some(effects)
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Vec<UiEffect> {
    if app.overlay.is_some() {
        return vec![];
    }
    let tui = &mut app.tui;
    let position = Position::new(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => {
            tui.transcript.scroll.scroll_up(WHEEL_LINES);
            vec![]
        }
        MouseEventKind::ScrollDown => {
            tui.transcript.scroll.scroll_down(WHEEL_LINES);
            vec![]
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let layout = tui.layout;
            if let Some(list) = layout.directory_list
                && list.contains(position)
            {
                tui.focus = Focus::Directory;
                let action = tui.directory.handle_click(list, mouse.column, mouse.row);
                return apply_directory_action(app, action);
            }
            if layout.composer.contains(position) {
                tui.focus = Focus::Composer;
            } else if layout.subject.contains(position) && tui.session.is_new() {
                tui.focus = Focus::Subject;
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_paste(app: &mut AppState, text: &str) {
    if let Some(overlay) = app.overlay.as_mut() {
        if let Some(search) = overlay.as_search_mut() {
            search.handle_paste(text);
        }
        return;
    }
    let tui = &mut app.tui;
    match tui.focus {
        Focus::Subject => composer::handle_paste(&mut tui.composer, true, text),
        Focus::Composer => composer::handle_paste(&mut tui.composer, false, text),
        Focus::Directory => {
            if let Some(editor) = tui.directory.editor.as_mut() {
                editor.input.push_str(&text.replace(['\r', '\n'], " "));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_core::api::ApiError;
    use parley_core::api::types::{ChatReply, Exchange, LoadedConversation};
    use parley_core::config::Config;
    use parley_core::conversation::Conversation;

    use super::*;
    use crate::common::{TaskCompleted, TaskStarted};
    use crate::features::transcript::ScrollMode;

    fn app(resumed: Option<&str>) -> AppState {
        let mut app = AppState::new(TuiState::new(
            &Config::default(),
            "http://127.0.0.1:5000".into(),
            true,
            resumed,
        ));
        update(
            &mut app,
            UiEvent::Frame {
                width: 120,
                height: 40,
            },
        );
        app
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            update(app, key(KeyCode::Char(c)));
        }
    }

    fn submit(app: &mut AppState, text: &str) -> Vec<UiEffect> {
        type_text(app, text);
        update(app, key(KeyCode::Enter))
    }

    fn send_ticket(effects: &[UiEffect]) -> parley_core::session::SendTicket {
        match effects {
            [UiEffect::SendMessage { ticket }] => ticket.clone(),
            other => panic!("expected a send effect, got {other:?}"),
        }
    }

    fn reply(text: &str, id: Option<&str>) -> ChatReply {
        ChatReply {
            reply: text.into(),
            conversation_id: id.map(String::from),
            subject: None,
        }
    }

    fn row(id: &str, subject: &str) -> Conversation {
        Conversation {
            id: id.into(),
            subject: Some(subject.into()),
            name: None,
        }
    }

    #[test]
    fn test_first_exchange_adopts_and_persists_id() {
        let mut app = app(None);
        let ticket = send_ticket(&submit(&mut app, "Hello"));
        assert_eq!(app.tui.transcript.lines(), vec!["user: Hello"]);

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SendCompleted {
                ticket,
                result: Ok(reply("Hi", Some("abc123"))),
            }),
        );

        assert_eq!(app.tui.transcript.lines(), vec!["user: Hello", "bot: Hi"]);
        assert!(!app.tui.transcript.is_typing());
        assert_eq!(app.tui.session.active_conversation_id(), Some("abc123"));
        assert_eq!(
            effects[0],
            UiEffect::PersistConversationId {
                id: Some("abc123".into())
            }
        );
        assert!(matches!(effects[1], UiEffect::RefreshConversations { .. }));
    }

    #[test]
    fn test_failed_send_appends_one_error() {
        let mut app = app(Some("abc123"));
        let ticket = send_ticket(&submit(&mut app, "Hello"));
        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SendCompleted {
                ticket,
                result: Err(ApiError::server(Some(500), "boom")),
            }),
        );

        assert!(effects.is_empty());
        assert_eq!(
            app.tui.transcript.lines(),
            vec!["user: Hello", "error: Error: boom"]
        );
        assert_eq!(app.tui.session.active_conversation_id(), Some("abc123"));
    }

    #[test]
    fn test_reply_after_start_new_is_dropped() {
        let mut app = app(None);
        let ticket = send_ticket(&submit(&mut app, "Hello"));
        let effects = update(&mut app, ctrl('n'));
        assert_eq!(effects, vec![UiEffect::PersistConversationId { id: None }]);

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SendCompleted {
                ticket,
                result: Ok(reply("Hi", Some("abc123"))),
            }),
        );

        assert!(effects.is_empty());
        assert!(app.tui.transcript.is_empty());
        assert!(app.tui.session.is_new());
    }

    #[test]
    fn test_failed_load_shows_single_error_and_keeps_id() {
        let mut app = app(Some("prior"));
        let effects = crate::dispatch::dispatch(
            &mut app.tui,
            Command::LoadConversation {
                conversation_id: "missing".into(),
            },
        );
        let [UiEffect::LoadConversation { ticket }] = effects.as_slice() else {
            panic!("expected load effect");
        };

        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::LoadCompleted {
                ticket: ticket.clone(),
                result: Err(ApiError::server(Some(200), "not found")),
            }),
        );

        assert_eq!(app.tui.transcript.lines(), vec!["error: Error: not found"]);
        assert_eq!(app.tui.session.active_conversation_id(), Some("prior"));
    }

    #[test]
    fn test_load_after_start_new_leaves_new_phase() {
        let mut app = app(None);
        update(&mut app, ctrl('n'));
        let effects = crate::dispatch::dispatch(
            &mut app.tui,
            Command::LoadConversation {
                conversation_id: "abc123".into(),
            },
        );
        let [UiEffect::LoadConversation { ticket }] = effects.as_slice() else {
            panic!("expected load effect");
        };

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::LoadCompleted {
                ticket: ticket.clone(),
                result: Ok(LoadedConversation {
                    messages: vec![Exchange {
                        user: Some("Hi".into()),
                        bot: Some("Hello".into()),
                    }],
                    subject: Some("Greeting".into()),
                }),
            }),
        );

        assert!(!app.tui.session.is_new());
        assert_eq!(app.tui.transcript.lines(), vec!["user: Hi", "bot: Hello"]);
        assert_eq!(
            effects,
            vec![UiEffect::PersistConversationId {
                id: Some("abc123".into())
            }]
        );
        assert_eq!(app.tui.active_label().as_deref(), Some("Greeting"));
    }

    #[test]
    fn test_delete_active_conversation_resets_session() {
        let mut app = app(Some("abc123"));
        app.tui.transcript.append(Role::User, "Hello");

        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::DeleteCompleted {
                conversation_id: "abc123".into(),
                result: Ok("Conversation deleted".into()),
            }),
        );

        assert!(app.tui.transcript.is_empty());
        assert!(app.tui.session.is_new());
        assert_eq!(effects[0], UiEffect::PersistConversationId { id: None });
        assert!(matches!(effects[1], UiEffect::RefreshConversations { .. }));
    }

    #[test]
    fn test_deleting_active_during_load_lands_on_loaded_conversation() {
        let mut app = app(Some("a"));
        let effects = crate::dispatch::dispatch(
            &mut app.tui,
            Command::LoadConversation {
                conversation_id: "b".into(),
            },
        );
        let [UiEffect::LoadConversation { ticket }] = effects.as_slice() else {
            panic!("expected load effect");
        };

        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::DeleteCompleted {
                conversation_id: "a".into(),
                result: Ok("Conversation deleted".into()),
            }),
        );
        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::LoadCompleted {
                ticket: ticket.clone(),
                result: Ok(LoadedConversation {
                    messages: vec![Exchange {
                        user: Some("Hi".into()),
                        bot: Some("Hello".into()),
                    }],
                    subject: None,
                }),
            }),
        );

        assert_eq!(app.tui.session.active_conversation_id(), Some("b"));
        assert_eq!(app.tui.transcript.lines(), vec!["user: Hi", "bot: Hello"]);
        assert_eq!(
            effects,
            vec![UiEffect::PersistConversationId {
                id: Some("b".into())
            }]
        );
    }

    #[test]
    fn test_delete_failure_does_not_refresh() {
        let mut app = app(Some("abc123"));
        let effects = update(
            &mut app,
            UiEvent::Session(SessionUiEvent::DeleteCompleted {
                conversation_id: "abc123".into(),
                result: Err(ApiError::Network("connection refused".into())),
            }),
        );
        assert!(effects.is_empty());
        assert_eq!(app.tui.session.active_conversation_id(), Some("abc123"));
    }

    #[test]
    fn test_click_delete_affordance_confirms_before_request() {
        let mut app = app(None);
        app.tui.directory.set_rows(vec![row("abc123", "Trip")]);
        let list = app.tui.layout.directory_list.unwrap();
        let delete_column = list.x + list.width - 1;

        let effects = update(
            &mut app,
            UiEvent::Terminal(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: delete_column,
                row: list.y,
                modifiers: KeyModifiers::NONE,
            })),
        );
        assert!(effects.is_empty());
        assert!(matches!(app.overlay, Some(Overlay::ConfirmDelete(_))));

        let effects = update(&mut app, key(KeyCode::Char('y')));
        assert!(app.overlay.is_none());
        assert_eq!(
            effects,
            vec![UiEffect::DeleteConversation {
                conversation_id: "abc123".into()
            }]
        );
    }

    #[test]
    fn test_rename_failure_restores_label_and_alerts() {
        let mut app = app(None);
        app.tui.directory.set_rows(vec![row("abc123", "Trip")]);
        app.tui.focus = Focus::Directory;

        update(&mut app, key(KeyCode::Char('e')));
        for _ in 0.."Trip".len() {
            update(&mut app, key(KeyCode::Backspace));
        }
        type_text(&mut app, "Holiday");
        let effects = update(&mut app, key(KeyCode::Enter));
        let [
            UiEffect::RenameConversation {
                new_name, previous, ..
            },
        ] = effects.as_slice()
        else {
            panic!("expected rename effect, got {effects:?}");
        };
        assert_eq!(new_name, "Holiday");
        assert_eq!(
            app.tui.directory.label_of("abc123").as_deref(),
            Some("Holiday")
        );

        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::RenameCompleted {
                conversation_id: "abc123".into(),
                new_name: new_name.clone(),
                previous: previous.clone(),
                result: Err(ApiError::server(Some(200), "rename failed")),
            }),
        );

        assert_eq!(app.tui.directory.label_of("abc123").as_deref(), Some("Trip"));
        assert!(matches!(app.overlay, Some(Overlay::Alert(_))));
    }

    #[test]
    fn test_superseded_directory_refresh_is_dropped() {
        let mut app = app(None);
        let first = app.tui.task_seq.next_id();
        let second = app.tui.task_seq.next_id();
        for id in [first, second] {
            update(
                &mut app,
                UiEvent::TaskStarted {
                    kind: TaskKind::ConversationList,
                    started: TaskStarted { id },
                },
            );
        }

        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::ConversationList,
                completed: TaskCompleted {
                    id: first,
                    result: Box::new(UiEvent::Session(SessionUiEvent::ConversationsLoaded {
                        rows: vec![row("old", "Old")],
                    })),
                },
            },
        );
        assert!(app.tui.directory.rows().is_empty());

        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::ConversationList,
                completed: TaskCompleted {
                    id: second,
                    result: Box::new(UiEvent::Session(SessionUiEvent::ConversationsLoaded {
                        rows: vec![row("new", "New")],
                    })),
                },
            },
        );
        assert_eq!(app.tui.directory.rows()[0].id, "new");
    }

    #[test]
    fn test_search_overlay_flow() {
        let mut app = app(None);
        update(&mut app, ctrl('f'));
        type_text(&mut app, "rust");
        let effects = update(&mut app, key(KeyCode::Enter));
        let [UiEffect::Search { task, term }] = effects.as_slice() else {
            panic!("expected search effect, got {effects:?}");
        };
        assert_eq!(term, "rust");

        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::Search,
                started: TaskStarted { id: *task },
            },
        );
        update(
            &mut app,
            UiEvent::Session(SessionUiEvent::SearchCompleted {
                task: *task,
                result: Err(ApiError::Network("timed out".into())),
            }),
        );
        assert!(matches!(app.overlay, Some(Overlay::Alert(_))));
    }

    #[test]
    fn test_manual_scroll_leaves_follow_until_append() {
        let mut app = app(Some("abc123"));
        for i in 0..60 {
            app.tui.transcript.append(Role::Bot, format!("line {i}"));
        }
        update(
            &mut app,
            UiEvent::Frame {
                width: 120,
                height: 40,
            },
        );

        update(&mut app, key(KeyCode::PageUp));
        assert!(matches!(
            app.tui.transcript.scroll.mode,
            ScrollMode::Anchored { .. }
        ));

        app.tui.transcript.append(Role::User, "new");
        assert!(app.tui.transcript.scroll.is_following());
    }

    #[test]
    fn test_ctrl_c_quits_even_with_overlay() {
        let mut app = app(None);
        update(&mut app, ctrl('f'));
        assert_eq!(update(&mut app, ctrl('c')), vec![UiEffect::Quit]);
    }
}
