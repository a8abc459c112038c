//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  Mouse
//! events are stamped on arrival so drag velocity does not depend on how
//! long they sat in the channel.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent, Instant),
    Resize(u16, u16),
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
///
/// Nothing is sent while the terminal is idle; `poll_timeout` only bounds how
/// long the task takes to notice that the receiver has gone.
pub fn spawn_event_reader(poll_timeout: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let has_event = event::poll(poll_timeout).unwrap_or(false);
            if !has_event {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            if let Ok(ev) = event::read() {
                let app_event = match ev {
                    CtEvent::Key(k) => AppEvent::Key(k),
                    CtEvent::Mouse(m) => AppEvent::Mouse(m, Instant::now()),
                    CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                    _ => continue,
                };
                if tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
        }
    });

    rx
}
