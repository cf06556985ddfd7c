//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// Relock color palette
pub struct Theme {
    // Primary branding colors
    pub relock_cyan: Color,
    pub relock_teal: Color,
    pub relock_dark: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub selection: Color,

    // Masked passphrase dots
    pub dot_filled: Color,
    pub dot_empty: Color,

    // Progress bar colors
    pub progress_filled: Color,
    pub progress_empty: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Primary branding - Relock Cyan
            relock_cyan: Color::Rgb(0, 188, 212), // #00BCD4
            relock_teal: Color::Rgb(38, 166, 154), // #26A69A
            relock_dark: Color::Rgb(28, 32, 38),  // #1C2026

            // Status colors
            success: Color::Rgb(76, 175, 80), // #4CAF50 - Green
            warning: Color::Rgb(255, 152, 0), // #FF9800 - Orange
            danger: Color::Rgb(244, 67, 54),  // #F44336 - Red
            info: Color::Rgb(33, 150, 243),   // #2196F3 - Blue

            // UI elements
            border: Color::Rgb(66, 66, 66),            // #424242
            border_focused: Color::Rgb(0, 188, 212),   // #00BCD4
            text_primary: Color::Rgb(250, 250, 250),   // #FAFAFA
            text_secondary: Color::Rgb(189, 189, 189), // #BDBDBD
            text_muted: Color::Rgb(117, 117, 117),     // #757575
            selection: Color::Rgb(45, 55, 60),         // #2D373C

            // Passphrase dots
            dot_filled: Color::Rgb(0, 188, 212),
            dot_empty: Color::Rgb(117, 117, 117),

            // Progress bars
            progress_filled: Color::Rgb(0, 188, 212),
            progress_empty: Color::Rgb(66, 66, 66),
        }
    }
}

impl Theme {
    /// Get default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Get secondary text style
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Get muted text style
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Get highlighted text style
    pub fn text_highlight(&self) -> Style {
        Style::default()
            .fg(self.relock_cyan)
            .add_modifier(Modifier::BOLD)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.relock_cyan)
            .add_modifier(Modifier::BOLD)
    }

    /// Get subtitle style
    pub fn subtitle(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Get border style
    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get focused border style
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Get success style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Get warning style
    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Get danger style
    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    /// Get info style
    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Get sensor pulse style
    pub fn pulse(&self) -> Style {
        Style::default()
            .fg(self.relock_teal)
            .add_modifier(Modifier::BOLD)
    }

    /// Get menu item style
    pub fn menu_item(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .bg(self.selection)
                .fg(self.relock_cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text_primary)
        }
    }

    /// Get filled passphrase dot style
    pub fn dot(&self) -> Style {
        Style::default()
            .fg(self.dot_filled)
            .add_modifier(Modifier::BOLD)
    }

    /// Get empty passphrase dot style
    pub fn dot_placeholder(&self) -> Style {
        Style::default().fg(self.dot_empty)
    }

    /// Create a high-contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            border: Color::White,
            border_focused: Color::Yellow,
            relock_cyan: Color::Yellow,
            relock_teal: Color::Cyan,
            relock_dark: Color::Black,
            dot_filled: Color::Yellow,
            progress_filled: Color::Yellow,
            ..Self::default()
        }
    }
}
