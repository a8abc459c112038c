//! Render seam between the numeric core and whatever draws it.

/// Sink for the three visual outputs of the strip.
pub trait StripRenderer {
    /// Horizontal offset of the track, in columns (the track is drawn
    /// shifted left by this amount).
    fn set_track_offset(&mut self, offset: f64);
    /// Fill of the progress bar, `0.0..=1.0`.
    fn set_bar_scale(&mut self, scale: f64);
    /// Text of the numeric progress readout.
    fn set_counter_text(&mut self, text: &str);
}

/// Renderer that remembers every call.  Used by tests across the core.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub offsets: Vec<f64>,
    pub scales: Vec<f64>,
    pub counters: Vec<String>,
}

#[cfg(test)]
impl RecordingRenderer {
    pub fn last_offset(&self) -> Option<f64> {
        self.offsets.last().copied()
    }

    pub fn last_scale(&self) -> Option<f64> {
        self.scales.last().copied()
    }

    pub fn last_counter(&self) -> Option<&str> {
        self.counters.last().map(String::as_str)
    }
}

#[cfg(test)]
impl StripRenderer for RecordingRenderer {
    fn set_track_offset(&mut self, offset: f64) {
        self.offsets.push(offset);
    }

    fn set_bar_scale(&mut self, scale: f64) {
        self.scales.push(scale);
    }

    fn set_counter_text(&mut self, text: &str) {
        self.counters.push(text.to_string());
    }
}
