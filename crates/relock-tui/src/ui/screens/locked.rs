//! Locked screen: idle gate plus the sensor, passphrase, and lockout dialogs

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::credential::MIN_PASSPHRASE_LEN;
use crate::ui::format_countdown;
use crate::ui::layout::{
    centered_rect, progress_line, render_footer, render_header, render_status_bar,
    section_block_focused, ScreenLayout,
};

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, layout.header, Some("Locked"), theme);

    if app.state.sensor_prompt.is_some() {
        render_sensor_dialog(frame, layout.content, app);
        render_footer(
            frame,
            layout.footer,
            &[
                ("Enter", "Match"),
                ("m", "Mismatch"),
                ("e", "Sensor error"),
                ("Esc", "Cancel"),
            ],
            theme,
        );
    } else if app.state.credential_prompt.is_some() {
        if app.verifier.lockout_remaining_secs().is_some() {
            render_lockout_dialog(frame, layout.content, app);
            render_footer(frame, layout.footer, &[("Esc", "Dismiss")], theme);
        } else {
            render_passphrase_dialog(frame, layout.content, app);
            render_footer(
                frame,
                layout.footer,
                &[("Enter", "Submit"), ("Esc", "Cancel")],
                theme,
            );
        }
    } else {
        render_idle(frame, layout.content, app);
        render_footer(
            frame,
            layout.footer,
            &[("Enter", "Unlock"), ("q", "Quit")],
            theme,
        );
    }
}

/// The resting state of the gate, before or between prompts
fn render_idle(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let dialog = centered_rect(50, 40, area);
    frame.render_widget(Clear, dialog);

    let block = section_block_focused("Screen locked", theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1), // padlock
            Constraint::Length(1),
            Constraint::Length(1), // hint
            Constraint::Length(1), // status / error
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled("🔒", theme.text())).alignment(Alignment::Center),
        rows[1],
    );

    let hint = if app.state.check_in_flight {
        Span::styled("Verifying...", theme.info())
    } else {
        Span::styled("Press Enter to unlock", theme.text_secondary())
    };
    frame.render_widget(
        Paragraph::new(hint).alignment(Alignment::Center),
        rows[3],
    );

    render_status_bar(
        frame,
        rows[4],
        app.state.status_message.as_deref(),
        app.state.error_message.as_deref(),
        theme,
    );
}

/// Simulated sensor reading: the dialog pulses while it waits for a key
fn render_sensor_dialog(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(prompt) = app.state.sensor_prompt.as_ref() else {
        return;
    };

    let dialog = centered_rect(55, 45, area);
    frame.render_widget(Clear, dialog);

    let block = section_block_focused(&prompt.spec.title, theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // subtitle
            Constraint::Length(1),
            Constraint::Length(1), // pulsing sensor
            Constraint::Length(1),
            Constraint::Length(1), // instruction
            Constraint::Length(1), // error
        ])
        .split(inner);

    if let Some(subtitle) = prompt.spec.subtitle.as_deref() {
        frame.render_widget(
            Paragraph::new(Span::styled(subtitle, theme.subtitle()))
                .alignment(Alignment::Center),
            rows[0],
        );
    }

    let pulse = if app.state.tick % 2 == 0 { "◉" } else { "○" };
    frame.render_widget(
        Paragraph::new(Span::styled(pulse, theme.pulse())).alignment(Alignment::Center),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Touch the sensor (press Enter)",
            theme.text_secondary(),
        ))
        .alignment(Alignment::Center),
        rows[4],
    );

    if let Some(err) = app.state.error_message.as_deref() {
        frame.render_widget(
            Paragraph::new(Span::styled(err, theme.danger())).alignment(Alignment::Center),
            rows[5],
        );
    }
}

/// Passphrase entry with masked input and a low-attempts warning
fn render_passphrase_dialog(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(prompt) = app.state.credential_prompt.as_ref() else {
        return;
    };

    let dialog = centered_rect(55, 45, area);
    frame.render_widget(Clear, dialog);

    let block = section_block_focused(&prompt.spec.title, theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // subtitle
            Constraint::Length(1),
            Constraint::Length(1), // masked input
            Constraint::Length(1),
            Constraint::Length(1), // attempts warning
            Constraint::Length(1), // error
        ])
        .split(inner);

    if let Some(subtitle) = prompt.spec.subtitle.as_deref() {
        frame.render_widget(
            Paragraph::new(Span::styled(subtitle, theme.subtitle()))
                .alignment(Alignment::Center),
            rows[0],
        );
    }

    let typed = prompt.input.chars().count();
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
        rows[2],
    );

    let remaining = app.verifier.attempts_remaining();
    if app.verifier.failed_attempts() > 0 && remaining <= 2 {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("⚠ {remaining} attempts remaining before lockout"),
                theme.warning(),
            ))
            .alignment(Alignment::Center),
            rows[4],
        );
    }

    if let Some(err) = app.state.error_message.as_deref() {
        frame.render_widget(
            Paragraph::new(Span::styled(err, theme.danger())).alignment(Alignment::Center),
            rows[5],
        );
    }
}

/// Too many failures: countdown until the verifier accepts input again
fn render_lockout_dialog(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let remaining = app.verifier.lockout_remaining_secs().unwrap_or(0);
    let total = app.verifier.lockout_total_secs().unwrap_or(remaining);

    let dialog = centered_rect(55, 45, area);
    frame.render_widget(Clear, dialog);

    let block = section_block_focused("Too many attempts", theme);
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // banner
            Constraint::Length(1),
            Constraint::Length(1), // countdown
            Constraint::Length(1),
            Constraint::Length(1), // progress bar
            Constraint::Length(1),
            Constraint::Length(1), // hint
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled("⚠ LOCKED ⚠", theme.danger())).alignment(Alignment::Center),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("Try again in {}", format_countdown(remaining)),
            theme.text(),
        ))
        .alignment(Alignment::Center),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(progress_line(remaining, total, 30, theme)).alignment(Alignment::Center),
        rows[4],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            "The passphrase prompt stays disabled until the timer runs out",
            theme.text_muted(),
        ))
        .alignment(Alignment::Center),
        rows[6],
    );
}
