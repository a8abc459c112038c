//! Scroll offsets and the boundary wrap that keeps them near the home cycle.

/// Current (rendered) and target (resting) offsets, in columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub current: f64,
    pub target: f64,
}

impl ScrollState {
    /// Both offsets parked at the start of the home cycle.
    pub fn at_home(cycle_width: f64, buffer_size: usize) -> Self {
        let home = cycle_width * buffer_size as f64;
        Self {
            current: home,
            target: home,
        }
    }

    /// Re-base both offsets by one whole cycle when the current offset has
    /// drifted more than half a cycle away from the home cycle.
    ///
    /// Corrects at most one cycle per call.  Returns `true` when it moved.
    pub fn wrap(&mut self, cycle_width: f64, buffer_size: usize) -> bool {
        let buffer = buffer_size as f64;
        if self.current > cycle_width * (buffer + 0.5) {
            self.current -= cycle_width;
            self.target -= cycle_width;
            true
        } else if self.current < cycle_width * (buffer - 0.5) {
            self.current += cycle_width;
            self.target += cycle_width;
            true
        } else {
            false
        }
    }
}
