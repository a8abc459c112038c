//! Strip geometry: sections, their natural widths, and the cloned track.
//!
//! One *cycle* is the home sequence of sections laid end to end.  The
//! [`Track`] pads it with `buffer_size` full copies on each side so the
//! viewport never reaches an edge while the offsets stay inside the
//! buffered window.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Columns added around a title when a section is narrower than its label.
const TITLE_PADDING: f64 = 4.0;

// ───────────────────────────────────────── sections ──────────

/// How wide a section wants to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionWidth {
    /// Fixed number of terminal columns.
    Columns(f64),
    /// Share of the viewport width, `0..=100`.
    Percent(f64),
}

impl SectionWidth {
    /// Resolve against the current viewport width.
    pub fn resolve(self, viewport_width: f64) -> f64 {
        match self {
            SectionWidth::Columns(c) => c,
            SectionWidth::Percent(p) => viewport_width * p / 100.0,
        }
    }
}

impl fmt::Display for SectionWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionWidth::Columns(c) => write!(f, "{c}"),
            SectionWidth::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// A single content panel in the strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: String,
    pub width: SectionWidth,
}

impl Section {
    pub fn new(title: impl Into<String>, width: SectionWidth) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            width,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Rendered width in columns.  Never narrower than the padded title.
    pub fn natural_width(&self, viewport_width: f64) -> f64 {
        let min = self.title.chars().count() as f64 + TITLE_PADDING;
        self.width.resolve(viewport_width).max(min).round()
    }

    /// Built-in sequence used when neither the CLI nor the config file
    /// names any sections.
    pub fn defaults() -> Vec<Section> {
        vec![
            Section::new("Intro", SectionWidth::Percent(60.0))
                .with_body("Scroll the wheel or drag to travel along the strip."),
            Section::new("Work", SectionWidth::Columns(48.0))
                .with_body("Every section is measured once per setup."),
            Section::new("Studio", SectionWidth::Columns(36.0))
                .with_body("Clones on both sides hide the seam."),
            Section::new("Journal", SectionWidth::Percent(45.0))
                .with_body("Fling with a drag and watch it coast."),
            Section::new("Contact", SectionWidth::Columns(40.0))
                .with_body("The counter shows where you are in the loop."),
        ]
    }
}

/// Error for a malformed `TITLE:WIDTH[:BODY]` section value.
#[derive(Debug, Error, PartialEq)]
pub enum SectionSpecError {
    #[error("section `{0}` is missing a width (expected TITLE:WIDTH[:BODY])")]
    MissingWidth(String),
    #[error("section title is empty")]
    EmptyTitle,
    #[error("invalid section width `{0}` (expected columns like `40` or a share like `50%`)")]
    InvalidWidth(String),
}

impl FromStr for SectionWidth {
    type Err = SectionSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || SectionSpecError::InvalidWidth(s.to_string());
        if let Some(pct) = s.strip_suffix('%') {
            let p: f64 = pct.trim().parse().map_err(|_| invalid())?;
            if !(p > 0.0 && p <= 100.0) {
                return Err(invalid());
            }
            Ok(SectionWidth::Percent(p))
        } else {
            let c: f64 = s.parse().map_err(|_| invalid())?;
            if !(c.is_finite() && c > 0.0) {
                return Err(invalid());
            }
            Ok(SectionWidth::Columns(c))
        }
    }
}

impl Section {
    /// Parse `TITLE:WIDTH[:BODY]` (CLI); the separator is `:`.
    pub fn parse_cli(s: &str) -> Result<Self, SectionSpecError> {
        Self::parse_with(s, ':')
    }

    /// Parse `Title, WIDTH[, body]` (config file); the separator is `,`.
    pub fn parse_config(s: &str) -> Result<Self, SectionSpecError> {
        Self::parse_with(s, ',')
    }

    fn parse_with(s: &str, sep: char) -> Result<Self, SectionSpecError> {
        let mut parts = s.splitn(3, sep);
        let title = parts.next().unwrap_or_default().trim();
        if title.is_empty() {
            return Err(SectionSpecError::EmptyTitle);
        }
        let width = parts
            .next()
            .ok_or_else(|| SectionSpecError::MissingWidth(title.to_string()))?
            .parse::<SectionWidth>()?;
        let body = parts.next().map(str::trim).unwrap_or_default();
        Ok(Section::new(title, width).with_body(body))
    }

    /// Inverse of [`Section::parse_config`].
    pub fn to_config_string(&self) -> String {
        if self.body.is_empty() {
            format!("{}, {}", self.title, self.width)
        } else {
            format!("{}, {}, {}", self.title, self.width, self.body)
        }
    }
}

// ───────────────────────────────────────── track ─────────────

/// Identifies a cloned copy: which cycle it belongs to (negative = before
/// the home cycle) and its index within the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CloneTag {
    pub cycle: i32,
    pub index: usize,
}

/// Where a placed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Part of the home (non-cloned) sequence.
    Home,
    Clone(CloneTag),
}

/// A section placed on the track at horizontal position `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackItem {
    pub section: Section,
    /// Position within the sequence (same for a section and its clones).
    pub index: usize,
    pub origin: Origin,
    pub x: f64,
    pub width: f64,
}

impl TrackItem {
    pub fn is_clone(&self) -> bool {
        matches!(self.origin, Origin::Clone(_))
    }
}

/// The full padded strip: clones, home cycle, clones.
#[derive(Debug, Clone, Default)]
pub struct Track {
    items: Vec<TrackItem>,
    total_width: f64,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TrackItem] {
        &self.items
    }

    pub fn total_width(&self) -> f64 {
        self.total_width
    }

    /// (Re)build the strip and return the cycle width.
    ///
    /// Safe to call repeatedly: earlier clones are dropped first and the
    /// home sequence already on the track wins over `sections`.
    pub fn build(&mut self, sections: &[Section], viewport_width: f64, buffer_size: usize) -> f64 {
        self.items.retain(|item| !item.is_clone());

        let template: Vec<Section> = if self.items.is_empty() {
            sections.to_vec()
        } else {
            self.items.iter().map(|item| item.section.clone()).collect()
        };

        let widths: Vec<f64> = template
            .iter()
            .map(|s| s.natural_width(viewport_width))
            .collect();
        let cycle_width: f64 = widths.iter().sum();

        self.items.clear();
        let buffer = buffer_size as i32;
        let mut x = 0.0;
        for cycle in -buffer..=buffer {
            for (index, (section, &width)) in template.iter().zip(&widths).enumerate() {
                let origin = if cycle == 0 {
                    Origin::Home
                } else {
                    Origin::Clone(CloneTag { cycle, index })
                };
                self.items.push(TrackItem {
                    section: section.clone(),
                    index,
                    origin,
                    x,
                    width,
                });
                x += width;
            }
        }

        self.total_width = cycle_width * (1 + 2 * buffer_size) as f64;
        tracing::debug!(
            sections = template.len(),
            cycle_width,
            total_width = self.total_width,
            "strip built"
        );
        cycle_width
    }

    /// Items overlapping the window `[offset, offset + width)`.
    pub fn visible(&self, offset: f64, width: f64) -> impl Iterator<Item = &TrackItem> {
        let end = offset + width;
        self.items()
            .iter()
            .filter(move |item| item.x + item.width > offset && item.x < end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(title: &str, cols: f64) -> Section {
        Section::new(title, SectionWidth::Columns(cols))
    }

    #[test]
    fn cycle_width_sums_template_sections() {
        let mut track = Track::new();
        let cycle = track.build(&[fixed("a", 100.0), fixed("b", 250.0)], 80.0, 2);
        assert_eq!(cycle, 350.0);
        assert_eq!(track.total_width(), 350.0 * 5.0);
    }

    #[test]
    fn clones_surround_the_home_cycle() {
        let mut track = Track::new();
        track.build(&[fixed("a", 10.0), fixed("b", 20.0)], 80.0, 2);

        let origins: Vec<Origin> = track.items().iter().map(|i| i.origin).collect();
        assert_eq!(origins.len(), 10);
        assert_eq!(origins[0], Origin::Clone(CloneTag { cycle: -2, index: 0 }));
        assert_eq!(origins[3], Origin::Clone(CloneTag { cycle: -1, index: 1 }));
        assert_eq!(origins[4], Origin::Home);
        assert_eq!(origins[5], Origin::Home);
        assert_eq!(origins[9], Origin::Clone(CloneTag { cycle: 2, index: 1 }));

        // The home cycle starts exactly `buffer` cycles in.
        assert_eq!(track.items()[4].x, 60.0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut track = Track::new();
        let sections = [fixed("a", 10.0), fixed("b", 20.0)];
        let first = track.build(&sections, 80.0, 2);
        let items = track.items().to_vec();
        let second = track.build(&sections, 80.0, 2);
        assert_eq!(first, second);
        assert_eq!(track.items(), items.as_slice());
    }

    #[test]
    fn rebuild_keeps_home_sequence_over_new_input() {
        let mut track = Track::new();
        track.build(&[fixed("a", 10.0)], 80.0, 1);
        let cycle = track.build(&[fixed("other", 99.0)], 80.0, 1);
        assert_eq!(cycle, 10.0);
        assert!(track.items().iter().all(|i| i.section.title == "a"));
    }

    #[test]
    fn percent_widths_follow_the_viewport() {
        let mut track = Track::new();
        let sections = [Section::new("half", SectionWidth::Percent(50.0))];
        assert_eq!(track.build(&sections, 120.0, 2), 60.0);
        assert_eq!(track.build(&sections, 200.0, 2), 100.0);
    }

    #[test]
    fn narrow_sections_fit_their_title() {
        assert_eq!(fixed("Journal", 2.0).natural_width(80.0), 11.0);
    }

    #[test]
    fn empty_template_produces_no_width() {
        let mut track = Track::new();
        assert_eq!(track.build(&[], 80.0, 2), 0.0);
        assert!(track.items().is_empty());
        assert_eq!(track.total_width(), 0.0);
    }

    #[test]
    fn visible_filters_by_window() {
        let mut track = Track::new();
        track.build(&[fixed("a", 10.0), fixed("b", 20.0)], 80.0, 1);
        let titles: Vec<&str> = track
            .visible(41.0, 5.0)
            .map(|i| i.section.title.as_str())
            .collect();
        assert_eq!(titles, ["b"]);
    }

    #[test]
    fn parse_cli_section() {
        let s = Section::parse_cli("About:40%:hello: world").unwrap();
        assert_eq!(s.title, "About");
        assert_eq!(s.width, SectionWidth::Percent(40.0));
        assert_eq!(s.body, "hello: world");
    }

    #[test]
    fn parse_rejects_bad_values() {
        assert_eq!(
            Section::parse_cli("About"),
            Err(SectionSpecError::MissingWidth("About".into()))
        );
        assert_eq!(Section::parse_cli(":40"), Err(SectionSpecError::EmptyTitle));
        assert!(matches!(
            Section::parse_cli("About:wide"),
            Err(SectionSpecError::InvalidWidth(_))
        ));
        assert!(matches!(
            Section::parse_cli("About:150%"),
            Err(SectionSpecError::InvalidWidth(_))
        ));
    }

    #[test]
    fn config_string_parses_back() {
        let s = fixed("Work", 48.0).with_body("body text");
        assert_eq!(Section::parse_config(&s.to_config_string()), Ok(s));
    }
}
