//! Wheel and drag input, plus the inertial fling that follows a release.

use std::time::Instant;

use super::controller::LoopController;
use super::render::StripRenderer;
use super::scheduler::{FrameScheduler, FrameTask};

/// Pointer tracking for the current (or last) drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    pub is_dragging: bool,
    pub last_x: f64,
    pub last_timestamp: Option<Instant>,
    /// Columns per frame, positive = toward later sections.
    pub velocity: f64,
}

impl<R: StripRenderer, S: FrameScheduler> LoopController<R, S> {
    /// Wheel notch: move the target by `delta_y` and make sure the easing
    /// loop runs.
    pub fn wheel(&mut self, delta_y: f64) {
        self.scroll.target += delta_y;
        let needs_reset = self.wrap_offsets();
        self.start_motion(needs_reset);
    }

    /// Pointer pressed.  Freezes the strip where it is currently drawn.
    pub fn drag_start(&mut self, x: f64, at: Instant) {
        self.drag = DragState {
            is_dragging: true,
            last_x: x,
            last_timestamp: Some(at),
            velocity: 0.0,
        };
        self.scroll.target = self.scroll.current;
    }

    /// Pointer moved while pressed.
    ///
    /// Only the velocity is tracked here; the strip itself moves once the
    /// pointer is released and the fling starts.
    pub fn drag_move(&mut self, x: f64, at: Instant) {
        if !self.drag.is_dragging {
            return;
        }

        let delta = self.drag.last_x - x;
        if let Some(last) = self.drag.last_timestamp {
            let dt_ms = at.duration_since(last).as_secs_f64() * 1000.0;
            if dt_ms > 0.0 {
                self.drag.velocity = delta / dt_ms * self.settings.velocity_gain;
            }
        }
        self.drag.last_x = x;
        self.drag.last_timestamp = Some(at);

        let needs_reset = self.wrap_offsets();
        self.start_motion(needs_reset);
    }

    /// Pointer released.  Flings the strip if it was moving fast enough.
    pub fn drag_end(&mut self) {
        self.drag.is_dragging = false;

        if self.drag.velocity.abs() > self.settings.velocity_threshold {
            self.scroll.target += self.drag.velocity * self.settings.fling_gain;
            tracing::debug!(velocity = self.drag.velocity, "fling");
            self.scheduler.request_frame(FrameTask::Decay);
            self.start_motion(false);
        }
    }

    /// One frame of inertial decay.  Returns `true` while still coasting.
    ///
    /// Decay frames are not deduplicated: a second release while one fling
    /// is still coasting schedules a second chain sharing the same velocity.
    pub(super) fn decay_step(&mut self) -> bool {
        self.drag.velocity *= self.settings.decay_factor;
        if self.drag.velocity.abs() <= self.settings.velocity_threshold {
            return false;
        }

        self.scroll.target += self.drag.velocity;
        if self.wrap_offsets() {
            self.progress.update(
                self.scroll.current,
                self.cycle_width,
                self.settings.buffer_size,
                true,
                &mut self.renderer,
            );
        }
        self.start_motion(false);
        self.scheduler.request_frame(FrameTask::Decay);
        true
    }
}
