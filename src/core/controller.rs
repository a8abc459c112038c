//! The loop controller: single owner of all strip state.
//!
//! Geometry, offsets, progress and drag tracking live here together with
//! the render sink and the frame scheduler, so nothing is global and the
//! whole loop can be stepped deterministically.  The easing step lives in
//! [`super::motion`], input handling in [`super::input`].

use super::boundary::ScrollState;
use super::geometry::{Section, Track};
use super::input::DragState;
use super::motion::MotionSettings;
use super::progress::ProgressState;
use super::render::StripRenderer;
use super::scheduler::{FrameScheduler, FrameTask};

pub struct LoopController<R, S> {
    pub(super) settings: MotionSettings,
    pub(super) track: Track,
    pub(super) cycle_width: f64,
    pub(super) scroll: ScrollState,
    pub(super) progress: ProgressState,
    pub(super) drag: DragState,
    /// Guards against scheduling a second easing loop.
    pub(super) is_animating: bool,
    pub(super) renderer: R,
    pub(super) scheduler: S,
}

impl<R: StripRenderer, S: FrameScheduler> LoopController<R, S> {
    pub fn new(settings: MotionSettings, renderer: R, scheduler: S) -> Self {
        Self {
            settings,
            track: Track::new(),
            cycle_width: 0.0,
            scroll: ScrollState::default(),
            progress: ProgressState::default(),
            drag: DragState::default(),
            is_animating: false,
            renderer,
            scheduler,
        }
    }

    /// Measure and clone the strip, park both offsets at the start of the
    /// home cycle, and render the initial frame.  Returns the cycle width.
    ///
    /// Called again on resize: the home sequence is re-measured against the
    /// new viewport width.
    pub fn setup(&mut self, sections: &[Section], viewport_width: f64) -> f64 {
        let buffer = self.settings.buffer_size;
        self.cycle_width = self.track.build(sections, viewport_width, buffer);
        self.scroll = ScrollState::at_home(self.cycle_width, buffer);
        self.renderer.set_track_offset(self.scroll.current);

        self.progress.update(
            self.scroll.current,
            self.cycle_width,
            buffer,
            true,
            &mut self.renderer,
        );
        self.renderer.set_bar_scale(self.progress.current_scale);

        if self.cycle_width <= 0.0 {
            tracing::warn!("strip has no width; progress will read 0%");
        }
        self.cycle_width
    }

    /// Run every task queued before this frame.  Returns how many ran.
    pub fn run_frame(&mut self) -> usize {
        let tasks = self.scheduler.take_frame();
        for &task in &tasks {
            match task {
                FrameTask::Motion {
                    force_progress_reset,
                } => {
                    self.tick(force_progress_reset);
                }
                FrameTask::Decay => {
                    self.decay_step();
                }
            }
        }
        tasks.len()
    }

    /// Apply the boundary wrap and re-render the offset if it moved.
    pub(super) fn wrap_offsets(&mut self) -> bool {
        let wrapped = self
            .scroll
            .wrap(self.cycle_width, self.settings.buffer_size);
        if wrapped {
            tracing::debug!(
                current = self.scroll.current,
                target = self.scroll.target,
                "offsets re-based by one cycle"
            );
            self.renderer.set_track_offset(self.scroll.current);
        }
        wrapped
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn has_pending_frames(&self) -> bool {
        self.scheduler.has_pending()
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn cycle_width(&self) -> f64 {
        self.cycle_width
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use crate::core::geometry::SectionWidth;
    use crate::core::render::RecordingRenderer;
    use crate::core::scheduler::FrameQueue;

    pub(crate) type TestController = LoopController<RecordingRenderer, FrameQueue>;

    /// Controller over a single section exactly `cycle` columns wide.
    pub(crate) fn controller_with_cycle(cycle: f64) -> TestController {
        let mut c = LoopController::new(
            MotionSettings::default(),
            RecordingRenderer::default(),
            FrameQueue::new(),
        );
        c.setup(&[Section::new("only", SectionWidth::Columns(cycle))], 80.0);
        c
    }

    /// Step frames until nothing is scheduled.  Returns the frame count.
    pub(crate) fn run_until_idle(c: &mut TestController, max_frames: usize) -> usize {
        let mut frames = 0;
        while c.has_pending_frames() {
            assert!(frames < max_frames, "loop did not settle in {max_frames} frames");
            c.run_frame();
            frames += 1;
        }
        frames
    }

    #[test]
    fn setup_parks_offsets_at_home() {
        let c = controller_with_cycle(1000.0);
        assert_eq!(c.cycle_width(), 1000.0);
        assert_eq!(c.scroll(), ScrollState { current: 2000.0, target: 2000.0 });
        assert_eq!(c.renderer().last_offset(), Some(2000.0));
        assert_eq!(c.renderer().last_counter(), Some("0"));
        assert_eq!(c.renderer().last_scale(), Some(0.0));
        assert!(!c.has_pending_frames());
    }

    #[test]
    fn setup_with_no_sections_reads_zero() {
        let mut c: TestController = LoopController::new(
            MotionSettings::default(),
            RecordingRenderer::default(),
            FrameQueue::new(),
        );
        assert_eq!(c.setup(&[], 80.0), 0.0);
        assert_eq!(c.renderer().last_counter(), Some("0"));
        assert_eq!(c.progress.target_scale, 0.0);
    }

    #[test]
    fn resetup_returns_to_home() {
        let mut c = controller_with_cycle(1000.0);
        c.wheel(300.0);
        run_until_idle(&mut c, 10_000);
        c.setup(&[], 80.0);
        assert_eq!(c.scroll(), ScrollState { current: 2000.0, target: 2000.0 });
        assert_eq!(c.progress.current_scale, 0.0);
    }

    #[test]
    fn tasks_requested_mid_frame_wait_for_the_next() {
        let mut c = controller_with_cycle(1000.0);
        c.wheel(100.0);
        assert_eq!(c.run_frame(), 1);
        // The motion step rescheduled itself for the following frame.
        assert_eq!(c.scheduler.pending().len(), 1);
    }
}
