//! Offset easing with linear interpolation.
//!
//! Each frame the rendered offset closes a fixed fraction of the distance to
//! the target, so motion decelerates as it arrives.  The loop keeps
//! rescheduling itself until the remaining distance is below
//! [`SETTLE_EPSILON`].

use super::controller::LoopController;
use super::render::StripRenderer;
use super::scheduler::{FrameScheduler, FrameTask};

/// Distance (columns) under which the strip counts as settled.
pub const SETTLE_EPSILON: f64 = 0.01;

pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor
}

/// Tunables for easing, wrapping and the fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    /// Fraction of the remaining distance covered per frame.
    pub smooth_factor: f64,
    /// Cloned cycles on each side of the home cycle.
    pub buffer_size: usize,
    /// Fling velocity multiplier applied every decay frame.
    pub decay_factor: f64,
    /// Flings and decay stop at or below this speed.
    pub velocity_threshold: f64,
    /// Initial displacement on release, as a multiple of the velocity.
    pub fling_gain: f64,
    /// Scales `delta / ms` into a per-frame velocity while dragging.
    pub velocity_gain: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            smooth_factor: 0.05,
            buffer_size: 2,
            decay_factor: 0.95,
            velocity_threshold: 0.1,
            fling_gain: 20.0,
            velocity_gain: 15.0,
        }
    }
}

impl<R: StripRenderer, S: FrameScheduler> LoopController<R, S> {
    /// Start the easing loop unless one is already running.
    pub(super) fn start_motion(&mut self, force_progress_reset: bool) {
        if !self.is_animating {
            self.is_animating = true;
            self.scheduler
                .request_frame(FrameTask::Motion { force_progress_reset });
        }
    }

    /// One easing step.  Returns `true` when another frame was scheduled.
    pub(super) fn tick(&mut self, force_progress_reset: bool) -> bool {
        let smooth = self.settings.smooth_factor;
        self.scroll.current = lerp(self.scroll.current, self.scroll.target, smooth);

        // A wrap re-bases the offsets; snap the bar rather than ease across it.
        let wrapped = self.wrap_offsets();
        let force = force_progress_reset || wrapped;

        self.renderer.set_track_offset(self.scroll.current);
        self.progress.update(
            self.scroll.current,
            self.cycle_width,
            self.settings.buffer_size,
            force,
            &mut self.renderer,
        );

        if !force {
            self.progress.ease(smooth);
            self.renderer.set_bar_scale(self.progress.current_scale);
        }

        if (self.scroll.target - self.scroll.current).abs() < SETTLE_EPSILON {
            self.is_animating = false;
            tracing::trace!(offset = self.scroll.current, "motion settled");
            false
        } else {
            self.scheduler.request_frame(FrameTask::Motion {
                force_progress_reset: false,
            });
            true
        }
    }
}
