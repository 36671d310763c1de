use ratatui::{prelude::*, style::palette::tailwind};
use smart_search::ThemeToken;

/// Application theme - centralized color and style management
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    // Background colors
    pub bg_primary: Color,
    pub bg_panel: Color,
    pub bg_input: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Status colors
    pub status_error: Color,
    pub status_warning: Color,
    pub status_info: Color,

    // Selection colors
    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn from_token(token: ThemeToken) -> Self {
        match token {
            ThemeToken::Light => Self::light(),
            ThemeToken::Dark => Self::dark(),
        }
    }

    /// Light theme (default) - slate text on white, sky accents
    pub fn light() -> Self {
        Self {
            bg_primary: tailwind::SLATE.c50,
            bg_panel: Color::White,
            bg_input: Color::White,

            text_primary: tailwind::SLATE.c900,
            text_secondary: tailwind::SLATE.c600,
            text_muted: tailwind::SLATE.c400,
            text_disabled: tailwind::SLATE.c300,

            accent_primary: tailwind::SKY.c600,
            accent_secondary: tailwind::INDIGO.c500,

            status_error: tailwind::RED.c600,
            status_warning: tailwind::AMBER.c600,
            status_info: tailwind::SKY.c700,

            selected_bg: tailwind::SKY.c100,
            selected_fg: tailwind::SLATE.c900,
        }
    }

    /// Dark theme - Cyan/Magenta color scheme
    pub fn dark() -> Self {
        Self {
            bg_primary: tailwind::SLATE.c950,
            bg_panel: tailwind::SLATE.c900,
            bg_input: tailwind::SLATE.c800,

            text_primary: tailwind::CYAN.c50,
            text_secondary: tailwind::CYAN.c200,
            text_muted: tailwind::CYAN.c700,
            text_disabled: tailwind::SLATE.c600,

            accent_primary: tailwind::CYAN.c400,
            accent_secondary: tailwind::FUCHSIA.c500,

            status_error: tailwind::FUCHSIA.c400,
            status_warning: tailwind::PURPLE.c400,
            status_info: tailwind::CYAN.c500,

            selected_bg: tailwind::FUCHSIA.c500,
            selected_fg: Color::White,
        }
    }

    // Prebuilt styles for common use cases

    /// Style for panel borders
    pub fn panel_border(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints (e.g., "Esc" in "Esc close")
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the highlighted dropdown row
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn disabled(&self) -> Style {
        Style::default()
            .fg(self.text_disabled)
            .add_modifier(Modifier::DIM)
    }
}
