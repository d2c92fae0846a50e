//! Catppuccin Mocha colors used by the queue panel

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Color,
    pub subtext: Color,
    pub overlay: Color,
    pub surface: Color,
    pub base: Color,
    pub mauve: Color,
    pub blue: Color,
    pub teal: Color,
    pub green: Color,
    pub yellow: Color,
    pub peach: Color,
    pub red: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext: Color::Rgb(0xa6, 0xad, 0xc8),
            overlay: Color::Rgb(0x6c, 0x70, 0x86),
            surface: Color::Rgb(0x31, 0x32, 0x44),
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
            mauve: Color::Rgb(0xcb, 0xa6, 0xf7),
            blue: Color::Rgb(0x89, 0xb4, 0xfa),
            teal: Color::Rgb(0x94, 0xe2, 0xd5),
            green: Color::Rgb(0xa6, 0xe3, 0xa1),
            yellow: Color::Rgb(0xf9, 0xe2, 0xaf),
            peach: Color::Rgb(0xfa, 0xb3, 0x87),
            red: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }
}

impl Theme {
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.yellow)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.overlay)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().bg(self.surface).add_modifier(Modifier::BOLD)
    }

    /// Row being dragged
    pub fn dragged_style(&self) -> Style {
        Style::default().fg(self.overlay).add_modifier(Modifier::ITALIC)
    }

    /// Insertion marker drawn above or below the drop target
    pub fn drop_marker_style(&self) -> Style {
        Style::default().fg(self.mauve).add_modifier(Modifier::BOLD)
    }
}
