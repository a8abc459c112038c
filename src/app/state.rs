//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::controller::LoopController;
use crate::core::geometry::Section;
use crate::core::scheduler::FrameQueue;
use crate::ui::layout::{AppLayout, LayoutError};
use crate::ui::strip_view::StripView;

/// The strip controller as wired up for the terminal.
pub type Strip = LoopController<StripView, FrameQueue>;

/// Top-level application state.
pub struct AppState {
    /// Offsets, progress, drag tracking and the cloned track.
    pub strip: Strip,
    /// Sections the strip is built from.
    pub sections: Vec<Section>,
    /// User configuration (bindings and tuning).
    pub config: AppConfig,
    /// Layout for the current terminal size.  `Err` while the terminal is
    /// too small to host every region.
    pub layout: Result<AppLayout, LayoutError>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and the initial strip.  Fails when the terminal is
    /// too small for the viewport, counter or bar.
    pub fn new(
        sections: Vec<Section>,
        config: AppConfig,
        terminal_area: Rect,
    ) -> Result<Self, LayoutError> {
        let layout = AppLayout::from_area(terminal_area)?;
        let mut strip = LoopController::new(config.motion, StripView::new(), FrameQueue::new());
        strip.setup(&sections, layout.viewport_width());

        Ok(Self {
            strip,
            sections,
            config,
            layout: Ok(layout),
            should_quit: false,
            status_message: None,
        })
    }

    /// Recompute the layout for a new terminal size and re-measure the strip.
    pub fn resize(&mut self, terminal_area: Rect) {
        self.layout = AppLayout::from_area(terminal_area);
        if let Err(e) = &self.layout {
            tracing::debug!("layout unavailable: {e}");
            self.status_message = Some(e.to_string());
            return;
        }
        self.status_message = None;
        self.rebuild();
    }

    /// Re-measure the sections against the current viewport and rebuild
    /// the strip.  No-op while the layout is unavailable.
    pub fn rebuild(&mut self) {
        let Ok(layout) = &self.layout else {
            return;
        };
        let cycle = self.strip.setup(&self.sections, layout.viewport_width());
        tracing::debug!(cycle, offset = self.strip.scroll().current, "strip re-measured");
    }

    /// Short motion indicator for the right-hand end of the status bar.
    pub fn motion_label(&self) -> &'static str {
        if self.strip.drag().is_dragging {
            "dragging"
        } else if self.strip.is_animating() {
            "moving"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::SectionWidth;

    fn sections() -> Vec<Section> {
        vec![
            Section::new("A", SectionWidth::Percent(50.0)),
            Section::new("B", SectionWidth::Columns(30.0)),
        ]
    }

    #[test]
    fn new_builds_against_the_viewport() {
        let state = AppState::new(sections(), AppConfig::default(), Rect::new(0, 0, 100, 20)).unwrap();
        assert_eq!(state.strip.cycle_width(), 80.0);
        assert_eq!(state.strip.scroll().current, 160.0);
        assert_eq!(state.strip.renderer().counter(), "0");
    }

    #[test]
    fn new_fails_fast_on_a_tiny_terminal() {
        let err = AppState::new(sections(), AppConfig::default(), Rect::new(0, 0, 100, 2));
        assert!(err.is_err());
    }

    #[test]
    fn resize_re_measures() {
        let mut state = AppState::new(sections(), AppConfig::default(), Rect::new(0, 0, 100, 20)).unwrap();
        state.resize(Rect::new(0, 0, 200, 20));
        assert_eq!(state.strip.cycle_width(), 130.0);
    }

    #[test]
    fn resize_to_tiny_keeps_the_strip_and_shows_a_notice() {
        let mut state = AppState::new(sections(), AppConfig::default(), Rect::new(0, 0, 100, 20)).unwrap();
        state.resize(Rect::new(0, 0, 100, 1));
        assert!(state.layout.is_err());
        assert!(state.status_message.is_some());
        assert_eq!(state.strip.cycle_width(), 80.0);

        state.resize(Rect::new(0, 0, 100, 20));
        assert!(state.layout.is_ok());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn motion_label_follows_the_strip() {
        let mut state = AppState::new(sections(), AppConfig::default(), Rect::new(0, 0, 100, 20)).unwrap();
        assert_eq!(state.motion_label(), "");
        state.strip.wheel(10.0);
        assert_eq!(state.motion_label(), "moving");
        state.strip.drag_start(0.0, std::time::Instant::now());
        assert_eq!(state.motion_label(), "dragging");
    }
}
