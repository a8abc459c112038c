//! The strip itself: the terminal-side renderer and the widget that draws
//! the visible slice of the track.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::core::geometry::{Track, TrackItem};
use crate::core::render::StripRenderer;

use super::theme::Theme;

// ───────────────────────────────────────── renderer ──────────

/// Latest values pushed by the controller.  Read back by the widgets on
/// the next draw.
#[derive(Debug, Default)]
pub struct StripView {
    offset: f64,
    bar_scale: f64,
    counter: String,
}

impl StripView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn bar_scale(&self) -> f64 {
        self.bar_scale
    }

    pub fn counter(&self) -> &str {
        &self.counter
    }
}

impl StripRenderer for StripView {
    fn set_track_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn set_bar_scale(&mut self, scale: f64) {
        self.bar_scale = scale.clamp(0.0, 1.0);
    }

    fn set_counter_text(&mut self, text: &str) {
        self.counter.clear();
        self.counter.push_str(text);
    }
}

// ───────────────────────────────────────── widget ────────────

/// Draws the part of the track under the viewport, shifted left by
/// `offset` columns.  Created fresh each frame.
pub struct StripWidget<'a> {
    track: &'a Track,
    offset: f64,
}

impl<'a> StripWidget<'a> {
    pub fn new(track: &'a Track, offset: f64) -> Self {
        Self { track, offset }
    }
}

impl<'a> Widget for StripWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let span = self.track.total_width();
        if area.width == 0 || area.height == 0 || span <= 0.0 {
            return;
        }

        // The track repeats every cycle, so it also repeats every `span`.
        // Tile it whenever the pane is wider than what the clones cover.
        let width = f64::from(area.width);
        // Snap to whole columns once so neighbouring sections never overlap.
        let mut start = self.offset.round().rem_euclid(span);
        let mut screen = 0.0;
        while screen < width {
            let chunk = (span - start).min(width - screen);
            for item in self.track.visible(start, chunk) {
                let screen_x = (item.x - start + screen).round() as i64;
                render_clipped(item, screen_x, area, buf);
            }
            screen += span - start;
            start = 0.0;
        }
    }
}

/// Render one section at `screen_x` (relative to `area`, may be negative)
/// and copy whatever falls inside `area`.
///
/// Past its title and body a section is plain border filler, so it is drawn
/// at content width and the filler column is repeated out to the real width.
/// The scratch buffer stays small however wide the section is.
fn render_clipped(item: &TrackItem, screen_x: i64, area: Rect, buf: &mut Buffer) {
    let width = item.width.round().max(1.0) as i64;
    let first = screen_x.max(0);
    let last = (screen_x + width).min(i64::from(area.width));
    if first >= last {
        return;
    }

    let title = format!(" {} ", item.section.title);
    let body_width = item
        .section
        .body
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let content = title.chars().count().max(body_width) as i64 + 1;
    let drawn = width.min(content + 2).min(i64::from(u16::MAX));

    let scratch_area = Rect::new(0, 0, drawn as u16, area.height);
    let mut scratch = Buffer::empty(scratch_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::section_border_style(item.index))
        .title(Line::from(Span::styled(
            title,
            Theme::section_title_style(item.index),
        )));
    let inner = block.inner(scratch_area);
    block.render(scratch_area, &mut scratch);
    Paragraph::new(item.section.body.as_str())
        .style(Theme::section_body_style())
        .wrap(Wrap { trim: true })
        .render(inner, &mut scratch);

    for col in first..last {
        let c = col - screen_x;
        let sx = if c < drawn - 1 {
            c
        } else if c == width - 1 {
            drawn - 1
        } else {
            drawn - 2
        };
        let x = area.x + col as u16;
        for sy in 0..area.height {
            if let (Some(src), Some(dst)) =
                (scratch.cell((sx as u16, sy)), buf.cell_mut((x, area.y + sy)))
            {
                *dst = src.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Section, SectionWidth};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn view_records_the_latest_values() {
        let mut view = StripView::new();
        view.set_track_offset(12.5);
        view.set_bar_scale(1.5);
        view.set_counter_text("42");
        view.set_counter_text("7");
        assert_eq!(view.offset(), 12.5);
        assert_eq!(view.bar_scale(), 1.0);
        assert_eq!(view.counter(), "7");
    }

    #[test]
    fn draws_the_section_under_the_offset() {
        let mut track = Track::new();
        track.build(
            &[
                Section::new("Alpha", SectionWidth::Columns(20.0)),
                Section::new("Beta", SectionWidth::Columns(20.0)),
            ],
            40.0,
            1,
        );
        // Home cycle starts at 40; offset 60 puts "Beta" at the left edge.
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        StripWidget::new(&track, 60.0).render(area, &mut buf);
        assert!(row_text(&buf, 0).contains("Beta"));
        assert!(!row_text(&buf, 0).contains("Alpha"));
    }

    #[test]
    fn partially_visible_sections_are_clipped() {
        let mut track = Track::new();
        track.build(&[Section::new("Alpha", SectionWidth::Columns(20.0))], 40.0, 1);
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        // Half of one copy, half of the next.
        StripWidget::new(&track, 30.0).render(area, &mut buf);
        let top = row_text(&buf, 0);
        assert_eq!(top.chars().count(), 20);
        // The right-hand copy's left border lands in column 10.
        assert_eq!(buf.cell((10, 0)).map(|c| c.symbol().to_string()), Some("╭".into()));
    }

    #[test]
    fn narrow_cycles_are_tiled_across_the_pane() {
        let mut track = Track::new();
        track.build(&[Section::new("A", SectionWidth::Columns(10.0))], 80.0, 2);
        assert_eq!(track.total_width(), 50.0);

        let area = Rect::new(0, 0, 80, 4);
        let mut buf = Buffer::empty(area);
        StripWidget::new(&track, 20.0).render(area, &mut buf);

        let top = row_text(&buf, 0);
        assert_eq!(top.matches('╭').count(), 8);
        assert_eq!(top.matches('╮').count(), 8);
        for x in 0..80 {
            let bottom = buf.cell((x, 3)).map(|c| c.symbol().to_string());
            assert_ne!(bottom.as_deref(), Some(" "), "blank edge at column {x}");
        }
    }

    #[test]
    fn very_wide_sections_draw_their_borders_in_place() {
        let mut track = Track::new();
        track.build(
            &[Section::new("Wide", SectionWidth::Columns(60_000.0)).with_body("body")],
            80.0,
            1,
        );
        // Home copy starts at 60000; the previous copy ends 40 columns in.
        let area = Rect::new(0, 0, 80, 4);
        let mut buf = Buffer::empty(area);
        StripWidget::new(&track, 59_960.0).render(area, &mut buf);

        let cell = |x: u16, y: u16| buf.cell((x, y)).map(|c| c.symbol().to_string());
        assert_eq!(cell(39, 0), Some("╮".into()));
        assert_eq!(cell(39, 1), Some("│".into()));
        assert_eq!(cell(40, 0), Some("╭".into()));
        assert_eq!(cell(79, 0), Some("─".into()));
        assert!(row_text(&buf, 0).contains("Wide"));
        assert!(row_text(&buf, 1).contains("body"));
        // Far from either edge only filler is visible.
        assert_eq!(cell(10, 0), Some("─".into()));
        assert_eq!(cell(10, 1), Some(" ".into()));
    }
}
