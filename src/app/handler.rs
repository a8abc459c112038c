//! Input handling: maps key/mouse events to state mutations.
//!
//! The wheel scrolls the strip; a left-button drag stands in for touch:
//! press, move, release, and the strip flings with the release velocity.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.config.match_key(key) {
        Some(Action::Quit) => state.should_quit = true,
        Some(Action::Rebuild) => {
            state.rebuild();
            state.status_message = Some(format!(
                "Re-measured: cycle is {} columns",
                state.strip.cycle_width()
            ));
        }
        None => {}
    }
}

/// Process a mouse event received at `at`.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, at: Instant) {
    let Ok(layout) = &state.layout else {
        return;
    };
    let in_strip = layout.contains_strip(mouse.column, mouse.row);
    let x = f64::from(mouse.column) * state.config.drag_sensitivity;

    match mouse.kind {
        MouseEventKind::ScrollDown if in_strip => state.strip.wheel(state.config.wheel_step),
        MouseEventKind::ScrollUp if in_strip => state.strip.wheel(-state.config.wheel_step),
        MouseEventKind::Down(MouseButton::Left) if in_strip => {
            state.status_message = None;
            state.strip.drag_start(x, at);
        }
        // Once pressed inside the strip the drag follows the pointer anywhere.
        MouseEventKind::Drag(MouseButton::Left) => state.strip.drag_move(x, at),
        MouseEventKind::Up(MouseButton::Left) => state.strip.drag_end(),
        _ => {}
    }
}
