//! Application state and UI logic.
//!
//! This module holds the core `App` struct: the pages on offer, the live
//! location and the copy-link widget. It also defines how user input events
//! are translated into application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::location::Location;
use crate::widget::{CopyLinkWidget, TriggerId};

/// A page the viewer can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn new(title: Option<String>, url: String, body: Option<String>) -> Self {
        let title = title.unwrap_or_else(|| url.clone());
        Self {
            title: sanitize_text(&title),
            url,
            body: sanitize_text(body.as_deref().unwrap_or_default()),
        }
    }
}

/// The main application state container.
#[derive(Debug)]
pub struct App {
    pub pages: Vec<Page>,
    /// Index of the page currently shown.
    pub selected: usize,
    pub location: Location,
    pub widget: CopyLinkWidget,
    /// Whether to use Unicode symbols.
    pub use_symbols: bool,
    /// Whether to show the help overlay.
    pub show_help: bool,
    /// Flag indicating if the application should exit.
    pub should_quit: bool,
}

/// Actions resulting from user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// No action required.
    None,
    /// Exit the application.
    Quit,
    /// Copy the current location through a trigger.
    Copy(TriggerId),
}

impl App {
    /// Creates a new `App` showing the first page. `pages` must not be empty.
    pub fn new(pages: Vec<Page>, location: Location, widget: CopyLinkWidget, use_symbols: bool) -> Self {
        if let Some(first) = pages.first() {
            location.assign(first.url.clone());
        }
        Self {
            pages,
            selected: 0,
            location,
            widget,
            use_symbols,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.selected)
    }

    /// Show page `index` and move the location there.
    pub fn select(&mut self, index: usize) {
        let Some(page) = self.pages.get(index) else {
            return;
        };
        self.selected = index;
        self.location.assign(page.url.clone());
        debug!(url = %page.url, "navigated");
    }

    pub fn next_page(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        self.select((self.selected + 1) % self.pages.len());
    }

    pub fn previous_page(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let len = self.pages.len();
        self.select((self.selected + len - 1) % len);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return AppAction::None;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => AppAction::Quit,
            KeyCode::Char('?') => {
                self.show_help = true;
                AppAction::None
            }
            KeyCode::Char('y') | KeyCode::Char('c') => AppAction::Copy(TriggerId::HEADER),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.next_page();
                AppAction::None
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.previous_page();
                AppAction::None
            }
            KeyCode::Home => {
                self.select(0);
                AppAction::None
            }
            KeyCode::End => {
                self.select(self.pages.len().saturating_sub(1));
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> AppAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.show_help {
                    self.show_help = false;
                    return AppAction::None;
                }
                match self.widget.trigger_at(mouse.column, mouse.row) {
                    Some(trigger) => AppAction::Copy(trigger),
                    None => AppAction::None,
                }
            }
            MouseEventKind::ScrollDown => {
                self.next_page();
                AppAction::None
            }
            MouseEventKind::ScrollUp => {
                self.previous_page();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        let divider = if self.use_symbols { " · " } else { " | " };
        match self.current_page() {
            Some(page) => format!(
                "page {}/{}{}{}",
                self.selected + 1,
                self.pages.len(),
                divider,
                page.url
            ),
            None => "no page".to_string(),
        }
    }
}

/// Strip terminal escape sequences from text taken from config or the command line.
pub fn sanitize_text(text: &str) -> String {
    let stripped = strip_ansi_escapes::strip(text.as_bytes());
    String::from_utf8_lossy(&stripped).to_string()
}
