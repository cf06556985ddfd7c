//! First-run passphrase enrollment screen

use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::app::{App, SetupStep};
use crate::credential::MIN_PASSPHRASE_LEN;
use crate::ui::layout::{centered_rect, render_footer, render_header, section_block_focused, ScreenLayout};

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, layout.header, Some("Setup"), theme);

    let dialog = centered_rect(60, 50, layout.content);
    frame.render_widget(Clear, dialog);

    let (title, prompt, input) = match app.state.setup_step {
        SetupStep::Enter => (
            "Create a passphrase",
            "Choose the passphrase that unlocks this host",
            &app.state.setup_input,
        ),
        SetupStep::Confirm => (
            "Confirm your passphrase",
            "Type the same passphrase again",
            &app.state.setup_confirm,
        ),
    };

    let block = section_block_focused(title, theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // step indicator
            Constraint::Length(1),
            Constraint::Length(1), // prompt
            Constraint::Length(1),
            Constraint::Length(1), // masked input
            Constraint::Length(1),
            Constraint::Length(1), // hint or error
        ])
        .split(inner);

    let step = match app.state.setup_step {
        SetupStep::Enter => "Step 1 of 2",
        SetupStep::Confirm => "Step 2 of 2",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(step, theme.text_muted())).alignment(Alignment::Center),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(prompt, theme.text_secondary())).alignment(Alignment::Center),
        rows[2],
    );

    // Filled dots for typed characters, placeholders up to the minimum
    let typed = input.chars().count();
    let masked = Line::from(vec![
        Span::styled("[ ", theme.text_muted()),
        Span::styled("●".repeat(typed), theme.dot()),
        Span::styled(
            "○".repeat(MIN_PASSPHRASE_LEN.saturating_sub(typed)),
            theme.dot_placeholder(),
        ),
        Span::styled(" ]", theme.text_muted()),
    ]);
    frame.render_widget(
        Paragraph::new(masked).alignment(Alignment::Center),
        rows[4],
    );

    let note = if let Some(err) = app.state.error_message.as_deref() {
        Span::styled(err, theme.danger())
    } else {
        Span::styled(
            format!("At least {MIN_PASSPHRASE_LEN} characters"),
            theme.text_muted(),
        )
    };
    frame.render_widget(
        Paragraph::new(note).alignment(Alignment::Center),
        rows[6],
    );

    let hints: &[(&str, &str)] = match app.state.setup_step {
        SetupStep::Enter => &[("Enter", "Continue"), ("Esc", "Quit")],
        SetupStep::Confirm => &[("Enter", "Finish"), ("Esc", "Start over")],
    };
    render_footer(frame, layout.footer, hints, theme);
}
