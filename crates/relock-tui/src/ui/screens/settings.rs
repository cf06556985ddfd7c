//! Settings screen: lock policy and appearance

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::ui::format_timeout;
use crate::ui::layout::{
    render_footer, render_header, render_status_bar, section_block, section_block_focused,
    two_column_layout, ScreenLayout,
};

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, layout.header, Some("Settings"), theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(layout.content);

    let (left, right) = two_column_layout(rows[0]);
    render_menu(frame, left, app);
    render_detail(frame, right, app);

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
        &[
            ("↑↓", "Select"),
            ("Enter", "Toggle"),
            ("←→", "Adjust"),
            ("Esc", "Back"),
        ],
        theme,
    );
}

fn render_menu(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let policy = app.prefs.lock_policy();

    let on_off = |on: bool| if on { "On" } else { "Off" };
    let entries = [
        ("Screen lock", on_off(policy.enabled).to_string()),
        ("Lock timeout", format_timeout(policy.timeout_secs)),
        ("High contrast", on_off(app.config.high_contrast).to_string()),
    ];

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let selected = i == app.state.settings_index;
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {name:<14}"), theme.menu_item(selected)),
                Span::styled(value.clone(), theme.text_secondary()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(section_block_focused("Settings", theme))
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.state.settings_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = section_block("About this setting", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = match app.state.settings_index {
        0 => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Gate entry to this host behind",
                theme.text_secondary(),
            )),
            Line::from(Span::styled(
                "  authentication.",
                theme.text_secondary(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  When off, entry is always allowed.",
                theme.text_muted(),
            )),
        ],
        1 => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  How long a confirmation stays valid",
                theme.text_secondary(),
            )),
            Line::from(Span::styled(
                "  before the screen re-locks.",
                theme.text_secondary(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  \"Immediately\" re-authenticates on",
                theme.text_muted(),
            )),
            Line::from(Span::styled("  every entry.", theme.text_muted())),
        ],
        _ => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Brighter palette for low-contrast",
                theme.text_secondary(),
            )),
            Line::from(Span::styled("  terminals.", theme.text_secondary())),
        ],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}
