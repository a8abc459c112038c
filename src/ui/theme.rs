//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Section accents, cycled by position in the sequence.
const SECTION_ACCENTS: &[Color] = &[
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
];

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── strip ──────────────────────────────────────────────────
    pub fn section_accent(index: usize) -> Color {
        SECTION_ACCENTS[index % SECTION_ACCENTS.len()]
    }

    pub fn section_border_style(index: usize) -> Style {
        Style::default().fg(Self::section_accent(index))
    }

    pub fn section_title_style(index: usize) -> Style {
        Style::default()
            .fg(Self::section_accent(index))
            .add_modifier(Modifier::BOLD)
    }

    pub fn section_body_style() -> Style {
        Style::default().fg(Color::White)
    }

    // ── progress ───────────────────────────────────────────────
    pub fn counter_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn bar_filled_style() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn bar_empty_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn notice_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC)
    }
}
