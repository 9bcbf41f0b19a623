//! Terminal User Interface (TUI) rendering and management.
//!
//! This module handles initializing the terminal in raw mode, restoring it on exit,
//! and drawing the page, its copy buttons and their tooltips using `ratatui`.

use std::io::{self, Stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::app::App;
use crate::tooltip::bubble_area;
use crate::widget::TriggerId;

/// Type alias for the specific terminal backend used.
pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Initializes the terminal for TUI mode.
///
/// Enables raw mode, enters the alternate screen, and creates a `ratatui` Terminal instance.
pub fn init_terminal() -> io::Result<TuiTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode, leaves the alternate screen, and shows the cursor.
pub fn restore_terminal(mut terminal: TuiTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draws the current application state to the terminal.
pub fn draw(app: &mut App, terminal: &mut TuiTerminal) -> io::Result<()> {
    let title = window_title(app);
    execute!(terminal.backend_mut(), SetTitle(title))?;
    terminal.draw(|frame| render(app, frame))?;
    Ok(())
}

fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.size();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(area);
    let border_style = Style::default().fg(Color::DarkGray);
    let label = button_label(app.use_symbols);

    let (page_title, page_body) = app
        .current_page()
        .map(|page| (page.title.clone(), page.body.clone()))
        .unwrap_or_default();

    let header = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let header_inner = header.inner(vertical[0]);
    frame.render_widget(header, vertical[0]);
    let header_button = button_rect(header_inner, label);
    let title_area = Rect {
        width: header_inner.width.saturating_sub(header_button.width + 1),
        ..header_inner
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            page_title,
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        title_area,
    );
    render_button(frame, header_button, label);
    app.widget.set_area(TriggerId::HEADER, header_button);

    let body = Paragraph::new(Text::from(page_body))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, vertical[1]);

    let footer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let footer_inner = footer.inner(vertical[2]);
    frame.render_widget(footer, vertical[2]);
    let footer_button = button_rect(footer_inner, label);
    let status_area = Rect {
        width: footer_inner.width.saturating_sub(footer_button.width + 1),
        ..footer_inner
    };
    let divider = if app.use_symbols { " · " } else { " | " };
    let arrows = if app.use_symbols { "←/→" } else { "Left/Right" };
    let status = format!("{}{}y copy | {} page | ? help | q quit", app.status_line(), divider, arrows);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(status, Style::default().fg(Color::DarkGray)))),
        status_area,
    );
    render_button(frame, footer_button, label);
    app.widget.set_area(TriggerId::FOOTER, footer_button);

    for element in app.widget.triggers() {
        let (Some(anchor), Some(message)) = (element.area, element.tooltip.message()) else {
            continue;
        };
        let bubble = bubble_area(anchor, area, element.tooltip.placement, message);
        let text = Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Gray)),
            );
        frame.render_widget(Clear, bubble);
        frame.render_widget(text, bubble);
    }

    if app.show_help {
        let popup_area = centered_rect(50, 50, area);
        let help_text = [
            "Navigation:",
            "  Left/Right  Previous/next page",
            "  Tab         Next page",
            "  Home/End    First/last page",
            "",
            "Actions:",
            "  y / c       Copy page URL",
            "  click       Copy page URL",
            "",
            "General:",
            "  ?           Toggle this help",
            "  q           Quit",
        ]
        .join("\n");
        let help_block = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(Clear, popup_area);
        frame.render_widget(help_block, popup_area);
    }
}

fn button_label(use_symbols: bool) -> &'static str {
    if use_symbols {
        "[⧉ copy link]"
    } else {
        "[copy link]"
    }
}

/// Right-aligned single-row area for a button inside `inner`.
fn button_rect(inner: Rect, label: &str) -> Rect {
    let width = (label.chars().count() as u16).min(inner.width);
    Rect::new(
        inner.x + inner.width - width,
        inner.y,
        width,
        inner.height.min(1),
    )
}

fn render_button(frame: &mut Frame, area: Rect, label: &str) {
    let button = Paragraph::new(Span::styled(
        label.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(button, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn window_title(app: &App) -> String {
    match app.current_page() {
        Some(page) => format!("copylink · {}", page.title),
        None => "copylink".to_string(),
    }
}
