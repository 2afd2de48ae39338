//! Terminal lifecycle.
//!
//! The terminal is restored on normal exit, on error and on panic. Raw mode
//! delivers Ctrl+C as a key event, so no signal handler is installed.

use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::panic;
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Backend = CrosstermBackend<Stdout>;

static PANIC_HOOK: Once = Once::new();

/// Owns the alternate screen for the lifetime of the TUI.
///
/// Dropping it leaves the alternate screen and raw mode.
pub struct TerminalSession {
    terminal: Terminal<Backend>,
}

impl TerminalSession {
    /// Installs the panic hook, enters raw mode and the alternate screen, and
    /// enables bracketed paste and mouse capture.
    pub fn enter() -> Result<Self> {
        install_panic_hook();

        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableMouseCapture
        ) {
            let _ = restore_terminal();
            return Err(err).context("Failed to enter alternate screen");
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .context("Failed to create terminal")?;
        Ok(Self { terminal })
    }
}

impl Deref for TerminalSession {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = restore_terminal();
    }
}

/// Restores terminal state. Idempotent.
pub fn restore_terminal() -> Result<()> {
    // Mouse and paste must be disabled before leaving raw mode.
    let _ = execute!(io::stdout(), DisableMouseCapture, DisableBracketedPaste);
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Restores the terminal before the default panic output is printed.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));
    });
}
