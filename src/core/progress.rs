//! Loop progress: where the current offset sits inside one cycle.
//!
//! The bar normally eases toward its target, but when the position jumps
//! across the 0/100 seam (or the offsets were just re-based) it snaps, so
//! the bar never sweeps across its whole length at the loop point.

use super::render::StripRenderer;

/// Percentages above this and then below [`WRAP_LOW`] (or the reverse)
/// count as crossing the seam.
const WRAP_HIGH: f64 = 80.0;
const WRAP_LOW: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressState {
    /// Percentage from the previous update, `0..100`.
    pub last_percentage: f64,
    /// Fill currently shown by the bar.
    pub current_scale: f64,
    /// Fill the bar is easing toward.
    pub target_scale: f64,
}

/// Position of `current_offset` within one cycle as a percentage in `[0, 100)`.
///
/// Negative remainders are folded with `100 + pct`; a zero-width cycle
/// reads as 0%.
pub fn percentage(current_offset: f64, cycle_width: f64, buffer_size: usize) -> f64 {
    if cycle_width <= 0.0 {
        return 0.0;
    }
    let base = cycle_width * buffer_size as f64;
    let position = (current_offset - base) % cycle_width;
    let mut pct = position / cycle_width * 100.0;
    if pct < 0.0 {
        pct += 100.0;
    }
    // `100 + (-tiny)` rounds to exactly 100.
    if pct >= 100.0 {
        pct = 0.0;
    }
    pct
}

impl ProgressState {
    /// Recompute the percentage, update the counter, and snap the bar if
    /// the seam was crossed or `force_reset` is set.
    pub fn update<R: StripRenderer>(
        &mut self,
        current_offset: f64,
        cycle_width: f64,
        buffer_size: usize,
        force_reset: bool,
        renderer: &mut R,
    ) -> f64 {
        let pct = percentage(current_offset, cycle_width, buffer_size);

        let is_wrapping = (self.last_percentage > WRAP_HIGH && pct < WRAP_LOW)
            || (self.last_percentage < WRAP_LOW && pct > WRAP_HIGH)
            || force_reset;

        renderer.set_counter_text(&format!("{}", pct.round() as i64));
        self.target_scale = pct / 100.0;

        if is_wrapping {
            self.current_scale = self.target_scale;
            renderer.set_bar_scale(self.current_scale);
        }

        self.last_percentage = pct;
        pct
    }

    /// Ease the visible fill toward the target by `factor`.
    pub fn ease(&mut self, factor: f64) {
        self.current_scale = super::motion::lerp(self.current_scale, self.target_scale, factor);
    }
}
