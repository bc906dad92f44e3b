//! UI module for the mvnscope TUI
//!
//! This module provides the terminal user interface for browsing a parsed
//! dependency tree: expand and collapse, search, and jumping to conflicts.

mod app;
pub mod tree;

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::parser::MavenNode;

pub use app::{run_app, App, Mode, Viewport};
pub use tree::TreeNode;

/// Take over the terminal and browse the forest until the user quits
///
/// The terminal is restored even when the event loop fails.
pub fn run(forest: Vec<MavenNode>) -> io::Result<()> {
    with_restored(enter_screen, leave_screen, || {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let mut app = App::new(forest);
        let result = run_app(&mut terminal, &mut app);
        result.and(terminal.show_cursor())
    })
}

fn enter_screen() -> io::Result<()> {
    enable_raw_mode()?;
    if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    Ok(())
}

fn leave_screen() -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(io::stdout(), LeaveAlternateScreen)?;
    raw
}

/// Runs `body` between `enter` and `leave`
///
/// Once `enter` succeeds, `leave` runs whatever `body` returns. An error
/// from `body` is reported ahead of one from `leave`.
fn with_restored<T>(
    enter: impl FnOnce() -> io::Result<()>,
    leave: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> io::Result<T>,
) -> io::Result<T> {
    enter()?;
    let result = body();
    let restored = leave();
    let value = result?;
    restored?;
    Ok(value)
}
