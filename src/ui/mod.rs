//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! The core pushes offsets, bar fill and counter text into
//! [`strip_view::StripView`]; the widgets here read them back and draw.

pub mod layout;
pub mod progress;
pub mod strip_view;
pub mod theme;
