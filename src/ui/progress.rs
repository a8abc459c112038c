//! Loop progress indicator: numeric readout plus a horizontal bar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

const FILLED: &str = "━";
const EMPTY: &str = "─";

/// Right-aligned percentage readout, e.g. `" 42 %"`.
pub struct Counter<'a> {
    pub text: &'a str,
}

impl<'a> Widget for Counter<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let label = format!("{:>3} %", self.text);
        let line = Line::from(Span::styled(label, Theme::counter_style()));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Bar filled to `scale` (`0.0..=1.0`) of its width.
pub struct ProgressBar {
    pub scale: f64,
}

impl ProgressBar {
    /// Number of filled cells for a bar `width` cells wide.
    pub fn filled_cells(&self, width: u16) -> u16 {
        let filled = (self.scale.clamp(0.0, 1.0) * f64::from(width)).round();
        filled as u16
    }
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let filled = self.filled_cells(area.width);
        let line = Line::from(vec![
            Span::styled(FILLED.repeat(filled as usize), Theme::bar_filled_style()),
            Span::styled(
                EMPTY.repeat((area.width - filled) as usize),
                Theme::bar_empty_style(),
            ),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
