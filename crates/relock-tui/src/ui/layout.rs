//! Shared layout helpers for all screens

use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme::Theme;

/// Standard three-row screen layout
pub struct ScreenLayout {
    pub header: Rect,
    pub content: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: chunks[0],
            content: chunks[1],
            footer: chunks[2],
        }
    }
}

/// Center a rect of the given percentage size within an area
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Split an area into two side-by-side columns
pub fn two_column_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Render the top bar with brand, optional breadcrumb, and clock
pub fn render_header(frame: &mut Frame, area: Rect, breadcrumb: Option<&str>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border())
        .style(Style::default().bg(theme.relock_dark));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(7)])
        .split(inner);

    let mut spans = vec![Span::styled("◆ RELOCK", theme.title())];
    if let Some(crumb) = breadcrumb {
        spans.push(Span::styled(" › ", theme.text_muted()));
        spans.push(Span::styled(crumb, theme.subtitle()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), columns[0]);

    let clock = Local::now().format("%H:%M").to_string();
    frame.render_widget(
        Paragraph::new(Span::styled(clock, theme.text_muted())).alignment(Alignment::Right),
        columns[1],
    );
}

/// Render the bottom bar of key hints
pub fn render_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], theme: &Theme) {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme.text_muted()));
        }
        spans.push(Span::styled(format!("[{key}]"), theme.text_highlight()));
        spans.push(Span::styled(format!(" {action}"), theme.text_secondary()));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

/// Render the status line; errors take precedence over status messages
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: Option<&str>,
    error: Option<&str>,
    theme: &Theme,
) {
    let line = if let Some(err) = error {
        Line::from(Span::styled(format!("✗ {err}"), theme.danger()))
    } else if let Some(msg) = status {
        Line::from(Span::styled(format!("✓ {msg}"), theme.success()))
    } else {
        Line::from("")
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Bordered section with a title
pub fn section_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .title(Span::styled(format!(" {title} "), theme.subtitle()))
}

/// Bordered section with a title, highlighted as focused
pub fn section_block_focused<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_focused())
        .title(Span::styled(format!(" {title} "), theme.title()))
}

/// Horizontal bar showing `remaining` out of `total` as filled cells
pub fn progress_line(remaining: u64, total: u64, width: usize, theme: &Theme) -> Line<'static> {
    let total = total.max(1);
    let filled = ((remaining as f64 / total as f64) * width as f64).round() as usize;
    let filled = filled.min(width);
    Line::from(vec![
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.progress_filled),
        ),
        Span::styled(
            "░".repeat(width - filled),
            Style::default().fg(theme.progress_empty),
        ),
    ])
}
