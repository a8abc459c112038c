//! User configuration: keybindings, motion tuning, sections, persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/loop-strip/config.toml` (default `~/.config/loop-strip/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::geometry::Section;
use crate::core::motion::MotionSettings;

// ───────────────────────────────────────── actions ───────────

/// All configurable key actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Re-measure the sections and rebuild the strip.
    Rebuild,
    Quit,
}

impl Action {
    /// Ordered list of all actions.
    pub const ALL: &[Action] = &[Action::Rebuild, Action::Quit];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Rebuild => "rebuild",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "rebuild" => Some(Action::Rebuild),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Config-file / status-bar form (e.g. `"Ctrl+r"`, `"q"`, `"F5"`).
    fn to_config_string(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"q"`, `"Esc"`, `"F5"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub motion: MotionSettings,
    /// Columns moved per wheel notch.
    pub wheel_step: f64,
    /// Offset columns per column of pointer travel while dragging.
    pub drag_sensitivity: f64,
    /// Frame rate of the easing and fling loops.
    pub fps: u32,
    /// Sections from the config file; empty means the built-in set.
    pub sections: Vec<Section>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            motion: MotionSettings::default(),
            wheel_step: 12.0,
            drag_sensitivity: 2.5,
            fps: 60,
            sections: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();
        m.insert(Action::Rebuild, vec![KeyBind::new(KeyCode::Char('r'), n)]);
        m.insert(
            Action::Quit,
            vec![KeyBind::new(KeyCode::Char('q'), n), KeyBind::new(KeyCode::Esc, n)],
        );
        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].to_config_string(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "wheel/drag: scroll | {}: re-measure | {}: quit",
            self.short_binding(Action::Rebuild),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => return Self::parse_config(&contents),
                Err(e) => tracing::warn!("cannot read {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for (lineno, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!("config line {}: expected `key = value`", lineno + 1);
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Tuning values.  Each is bounded to keep the loop well-behaved.
            let applied = match key {
                "smooth_factor" => parse_finite(value, |v| {
                    config.motion.smooth_factor = v.clamp(0.01, 1.0)
                }),
                "buffer_size" => parse_into(value, |v: usize| {
                    config.motion.buffer_size = v.clamp(1, 8)
                }),
                "decay_factor" => parse_finite(value, |v| {
                    config.motion.decay_factor = v.clamp(0.0, 0.99)
                }),
                "velocity_threshold" => parse_finite(value, |v| {
                    config.motion.velocity_threshold = v.clamp(0.001, 10.0)
                }),
                "fling_gain" => parse_finite(value, |v| {
                    config.motion.fling_gain = v.clamp(0.0, 200.0)
                }),
                "velocity_gain" => parse_finite(value, |v| {
                    config.motion.velocity_gain = v.clamp(0.0, 200.0)
                }),
                "wheel_step" => parse_finite(value, |v| config.wheel_step = v.clamp(1.0, 500.0)),
                "drag_sensitivity" => parse_finite(value, |v| {
                    config.drag_sensitivity = v.clamp(0.1, 20.0)
                }),
                "fps" => parse_into(value, |v: u32| config.fps = v.clamp(10, 240)),
                "section" => match Section::parse_config(value.trim_matches('"')) {
                    Ok(section) => {
                        config.sections.push(section);
                        true
                    }
                    Err(e) => {
                        tracing::warn!("config line {}: {e}", lineno + 1);
                        continue;
                    }
                },
                _ => {
                    if let Some(action) = Action::from_config_key(key) {
                        let parsed: Vec<KeyBind> = value
                            .split(',')
                            .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                            .collect();
                        if !parsed.is_empty() {
                            config.bindings.insert(action, parsed);
                        }
                        true
                    } else {
                        tracing::warn!("config line {}: unknown key `{key}`", lineno + 1);
                        continue;
                    }
                }
            };
            if !applied {
                tracing::warn!("config line {}: bad value for `{key}`: {value}", lineno + 1);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# loop-strip configuration".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("smooth_factor = {}", self.motion.smooth_factor),
            format!("buffer_size = {}", self.motion.buffer_size),
            format!("decay_factor = {}", self.motion.decay_factor),
            format!("velocity_threshold = {}", self.motion.velocity_threshold),
            format!("fling_gain = {}", self.motion.fling_gain),
            format!("velocity_gain = {}", self.motion.velocity_gain),
            format!("wheel_step = {}", self.wheel_step),
            format!("drag_sensitivity = {}", self.drag_sensitivity),
            format!("fps = {}", self.fps),
            String::new(),
            "# Sections, in order: section = Title, WIDTH[, body]".to_string(),
            "# WIDTH is columns (40) or a share of the window (50%)".to_string(),
        ];
        for section in &self.sections {
            lines.push(format!("section = {}", section.to_config_string()));
        }

        lines.push(String::new());
        lines.push("# Key bindings".to_string());
        lines.push("# Format: action = Key1, Key2, ...".to_string());
        lines.push("# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string());
        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Parse `value` and hand it to `apply`.  Returns `false` on a parse error.
fn parse_into<T: std::str::FromStr>(value: &str, apply: impl FnOnce(T)) -> bool {
    match value.parse::<T>() {
        Ok(v) => {
            apply(v);
            true
        }
        Err(_) => false,
    }
}

/// Float variant of [`parse_into`].  NaN and infinities count as bad values.
fn parse_finite(value: &str, apply: impl FnOnce(f64)) -> bool {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            apply(v);
            true
        }
        _ => false,
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/loop-strip/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("loop-strip").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::SectionWidth;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut ev = KeyEvent::new(code, modifiers);
        ev.kind = KeyEventKind::Press;
        ev
    }

    #[test]
    fn defaults_match_key_presses() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(Action::Rebuild)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn parses_tuning_sections_and_bindings() {
        let config = AppConfig::parse_config(
            "# comment\n\
             smooth_factor = 0.1\n\
             buffer_size = 3\n\
             wheel_step = 20\n\
             fps = 30\n\
             section = Home, 50%, welcome\n\
             section = About, 40\n\
             quit = Ctrl+x\n",
        );
        assert_eq!(config.motion.smooth_factor, 0.1);
        assert_eq!(config.motion.buffer_size, 3);
        assert_eq!(config.wheel_step, 20.0);
        assert_eq!(config.fps, 30);
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.sections[0].width, SectionWidth::Percent(50.0));
        assert_eq!(config.sections[0].body, "welcome");
        assert_eq!(
            config.match_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn bad_lines_are_skipped() {
        let config = AppConfig::parse_config(
            "smooth_factor = fast\n\
             no equals sign\n\
             mystery = 1\n\
             section = Broken\n\
             fps = 5000\n",
        );
        assert_eq!(config.motion.smooth_factor, MotionSettings::default().smooth_factor);
        assert!(config.sections.is_empty());
        assert_eq!(config.fps, 240);
    }

    #[test]
    fn non_finite_tuning_values_are_skipped() {
        let config = AppConfig::parse_config(
            "smooth_factor = NaN\n\
             decay_factor = nan\n\
             velocity_threshold = NaN\n\
             fling_gain = inf\n\
             velocity_gain = -inf\n\
             wheel_step = nan\n\
             drag_sensitivity = infinity\n",
        );
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn loop_settles_with_a_config_that_had_nan_lines() {
        use crate::core::controller::LoopController;
        use crate::core::render::RecordingRenderer;
        use crate::core::scheduler::FrameQueue;

        let config = AppConfig::parse_config("smooth_factor = NaN\ndecay_factor = nan\n");
        let mut strip =
            LoopController::new(config.motion, RecordingRenderer::default(), FrameQueue::new());
        strip.setup(&[Section::new("Only", SectionWidth::Columns(200.0))], 80.0);
        strip.wheel(config.wheel_step);

        let mut frames = 0;
        while strip.has_pending_frames() {
            strip.run_frame();
            frames += 1;
            assert!(frames < 10_000, "motion loop never settled");
        }
        assert!(strip.scroll().current.is_finite());
    }

    #[test]
    fn every_motion_setting_round_trips() {
        let config = AppConfig::parse_config(
            "velocity_threshold = 0.5\n\
             velocity_gain = 30\n\
             fling_gain = 10\n",
        );
        assert_eq!(config.motion.velocity_threshold, 0.5);
        assert_eq!(config.motion.velocity_gain, 30.0);
        assert_eq!(config.motion.fling_gain, 10.0);
        assert_eq!(AppConfig::parse_config(&config.serialise()), config);
    }

    #[test]
    fn save_and_load_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.motion.buffer_size = 4;
        config.drag_sensitivity = 1.5;
        config.sections = vec![
            Section::new("One", SectionWidth::Columns(30.0)).with_body("first"),
            Section::new("Two", SectionWidth::Percent(25.0)),
        ];
        config
            .bindings
            .insert(Action::Rebuild, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)]);
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppConfig::load_from(&dir.path().join("absent.toml")), AppConfig::default());
    }

    #[test]
    fn keybind_strings() {
        assert_eq!(
            KeyBind::parse("Ctrl+r"),
            Some(KeyBind::new(KeyCode::Char('r'), KeyModifiers::CONTROL))
        );
        assert_eq!(KeyBind::parse("esc"), Some(KeyBind::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+q"), None);
        assert_eq!(KeyBind::new(KeyCode::F(5), KeyModifiers::ALT).to_config_string(), "Alt+F5");
        assert_eq!(AppConfig::default().status_bar_hint(), "wheel/drag: scroll | r: re-measure | q: quit");
    }
}
