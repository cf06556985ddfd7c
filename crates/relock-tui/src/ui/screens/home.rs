//! Home screen: the protected surface shown after the gate allows entry

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::ui::layout::{
    progress_line, render_footer, render_header, render_status_bar, section_block,
    two_column_layout, ScreenLayout,
};
use crate::ui::{format_countdown, format_timeout};

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, layout.header, None, theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(layout.content);

    let (left, right) = two_column_layout(rows[0]);
    render_session_panel(frame, left, app);
    render_policy_panel(frame, right, app);

    render_status_bar(
        frame,
        rows[1],
        app.state.status_message.as_deref(),
        app.state.error_message.as_deref(),
        theme,
    );

    render_footer(
        frame,
        layout.footer,
        &[("l", "Lock"), ("s", "Settings"), ("q", "Quit")],
        theme,
    );
}

fn render_session_panel(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = section_block("Session", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let policy = app.prefs.lock_policy();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  ● Unlocked", theme.success())),
        Line::from(""),
    ];

    if !policy.enabled {
        lines.push(Line::from(Span::styled(
            "  Screen lock is off",
            theme.text_secondary(),
        )));
        lines.push(Line::from(Span::styled(
            "  Turn it on under Settings",
            theme.text_muted(),
        )));
    } else if policy.timeout_secs == 0 {
        lines.push(Line::from(Span::styled(
            "  Re-authenticates on every entry",
            theme.text_secondary(),
        )));
    } else if let Some(remaining) = app.remaining_validity_secs() {
        lines.push(Line::from(vec![
            Span::styled("  Re-locks in ", theme.text_secondary()),
            Span::styled(format_countdown(remaining), theme.text_highlight()),
        ]));
        lines.push(Line::from(""));
        let mut bar = progress_line(remaining, policy.timeout_secs, 24, theme);
        bar.spans.insert(0, Span::raw("  "));
        lines.push(bar);
    } else {
        lines.push(Line::from(Span::styled(
            "  Session expired",
            theme.warning(),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_policy_panel(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = section_block("Policy", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let policy = app.prefs.lock_policy();
    let lock_state = if policy.enabled {
        Span::styled("On", theme.success())
    } else {
        Span::styled("Off", theme.text_muted())
    };
    let sensor = if app.sensor_available {
        Span::styled("Simulated", theme.info())
    } else {
        Span::styled("Not present", theme.text_muted())
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Screen lock  ", theme.text_secondary()),
            lock_state,
        ]),
        Line::from(vec![
            Span::styled("  Lock timeout ", theme.text_secondary()),
            Span::styled(format_timeout(policy.timeout_secs), theme.text()),
        ]),
        Line::from(vec![
            Span::styled("  Sensor       ", theme.text_secondary()),
            sensor,
        ]),
        Line::from(vec![
            Span::styled("  Passphrase   ", theme.text_secondary()),
            Span::styled("Enrolled", theme.text()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
