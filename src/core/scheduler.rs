//! Frame scheduling.
//!
//! Per-frame callbacks are plain values.  Whoever owns the display refresh
//! (the terminal loop, or a test stepping by hand) drains one frame's worth
//! of tasks at a time; anything requested while a frame runs lands in the
//! next one.

/// Work to run on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// One step of the easing loop.
    Motion { force_progress_reset: bool },
    /// One step of the inertial fling.
    Decay,
}

pub trait FrameScheduler {
    /// Queue `task` for the next frame.
    fn request_frame(&mut self, task: FrameTask);
    /// Hand over everything queued so far, leaving the queue empty.
    fn take_frame(&mut self) -> Vec<FrameTask>;
    fn has_pending(&self) -> bool;
}

/// FIFO frame queue.  Stepped by the terminal loop's frame interval in the
/// app and by hand in tests.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: Vec<FrameTask>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[FrameTask] {
        &self.pending
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, task: FrameTask) {
        self.pending.push(task);
    }

    fn take_frame(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.pending)
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
