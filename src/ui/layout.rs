//! Layout helpers: split the terminal area into regions.

use std::fmt;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use thiserror::Error;

/// Rows a section needs: border, title, one body line, border.
pub const MIN_STRIP_HEIGHT: u16 = 4;
/// Columns reserved for the numeric readout (`100 %` plus a gap).
pub const COUNTER_WIDTH: u16 = 6;

/// A region the screen must be able to host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Viewport,
    Counter,
    Bar,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Viewport => "strip viewport",
            Region::Counter => "progress counter",
            Region::Bar => "progress bar",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("terminal is {width}x{height}: no room for the {region}")]
    MissingRegion { region: Region, width: u16, height: u16 },
}

/// Primary screen layout: the strip, a progress row, and an optional
/// status bar at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub strip_area: Rect,
    pub counter_area: Rect,
    pub bar_area: Rect,
    /// Zero-height when the terminal is exactly one row short of room.
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area, failing when any
    /// required region would be empty.
    pub fn from_area(area: Rect) -> Result<Self, LayoutError> {
        let missing = |region| LayoutError::MissingRegion {
            region,
            width: area.width,
            height: area.height,
        };

        if area.width == 0 || area.height < MIN_STRIP_HEIGHT {
            return Err(missing(Region::Viewport));
        }
        if area.height < MIN_STRIP_HEIGHT + 1 || area.width < COUNTER_WIDTH {
            return Err(missing(Region::Counter));
        }
        if area.width <= COUNTER_WIDTH {
            return Err(missing(Region::Bar));
        }

        let status_rows = if area.height >= MIN_STRIP_HEIGHT + 2 { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(MIN_STRIP_HEIGHT), // strip (takes all remaining space)
                Constraint::Length(1),             // counter + bar
                Constraint::Length(status_rows),   // status bar
            ])
            .split(area);

        let progress = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(COUNTER_WIDTH), Constraint::Min(1)])
            .split(rows[1]);

        Ok(Self {
            strip_area: rows[0],
            counter_area: progress[0],
            bar_area: progress[1],
            status_area: rows[2],
        })
    }

    /// Width the strip is measured against.
    pub fn viewport_width(&self) -> f64 {
        f64::from(self.strip_area.width)
    }

    pub fn contains_strip(&self, column: u16, row: u16) -> bool {
        let r = self.strip_area;
        column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
    }
}
