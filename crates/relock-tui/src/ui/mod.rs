//! Terminal rendering: theme, layout helpers, and per-screen views

pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::Frame;

use crate::app::{App, Screen};

/// Render the active screen
pub fn render(frame: &mut Frame, app: &App) {
    match app.state.screen {
        Screen::Setup => screens::setup::render(frame, app),
        Screen::Locked => screens::locked::render(frame, app),
        Screen::Home => screens::home::render(frame, app),
        Screen::Settings => screens::settings::render(frame, app),
    }
}

/// MM:SS countdown label
pub(crate) fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Human-readable lock timeout
pub(crate) fn format_timeout(secs: u64) -> String {
    if secs == 0 {
        "Immediately".to_string()
    } else if secs < 60 {
        format!("{secs} seconds")
    } else if secs < 3600 {
        let mins = secs / 60;
        if mins == 1 {
            "1 minute".to_string()
        } else {
            format!("{mins} minutes")
        }
    } else {
        let hours = secs / 3600;
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{hours} hours")
        }
    }
}
