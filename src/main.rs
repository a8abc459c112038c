//! An endlessly looping horizontal strip for the terminal.
//!
//! Scroll with the mouse wheel or drag and release to fling.  The counter
//! and bar at the bottom show the position within one loop of the sections.
//! Run with `--write-config` to dump the effective settings to the config
//! file.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::geometry::Section;
use crate::ui::{
    progress::{Counter, ProgressBar},
    strip_view::StripWidget,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Endlessly looping horizontal strip")]
struct Cli {
    /// Section as TITLE:WIDTH[:BODY]; WIDTH is columns (40) or a share of
    /// the window (50%).  Repeat for each section, in order.
    #[arg(long = "section", value_name = "TITLE:WIDTH[:BODY]", value_parser = Section::parse_cli)]
    sections: Vec<Section>,

    /// Cloned cycles on each side of the home cycle.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    buffer_size: Option<u8>,

    /// Animation frame rate.
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=240))]
    fps: Option<u32>,

    /// Read settings from this file instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

impl Cli {
    /// Config file merged with command-line overrides.
    fn effective_config(&self) -> AppConfig {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path),
            None => AppConfig::load(),
        };
        if let Some(buffer) = self.buffer_size {
            config.motion.buffer_size = usize::from(buffer);
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if !self.sections.is_empty() {
            config.sections = self.sections.clone();
        }
        config
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let config = cli.effective_config();

    if cli.write_config {
        let written = match &cli.config {
            Some(path) => config.save_to(path).map(|()| path.clone()),
            None => config.save(),
        }?;
        println!("{}", written.display());
        return Ok(());
    }

    let sections = if config.sections.is_empty() {
        Section::defaults()
    } else {
        config.sections.clone()
    };

    // ── fail fast before touching the terminal ────────────────
    let (cols, rows) = crossterm::terminal::size().context("cannot read terminal size")?;
    let frame_period = Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1)));
    let mut state = AppState::new(sections, config, Rect::new(0, 0, cols, rows))
        .context("terminal too small for the strip")?;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, frame_period).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Draw, wait for input or the next animation frame, repeat.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    frame_period: Duration,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(250));
    let mut frames = tokio::time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| {
            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);

            match &state.layout {
                Ok(layout) => {
                    let view = state.strip.renderer();
                    frame.render_widget(
                        StripWidget::new(state.strip.track(), view.offset()),
                        layout.strip_area,
                    );
                    frame.render_widget(Counter { text: view.counter() }, layout.counter_area);
                    frame.render_widget(ProgressBar { scale: view.bar_scale() }, layout.bar_area);
                    frame.render_widget(
                        Paragraph::new(status_text).style(Theme::status_bar_style()),
                        layout.status_area,
                    );
                    frame.render_widget(
                        Paragraph::new(format!("{} ", state.motion_label()))
                            .style(Theme::status_bar_style())
                            .alignment(Alignment::Right),
                        layout.status_area,
                    );
                }
                Err(_) => {
                    frame.render_widget(
                        Paragraph::new(status_text).style(Theme::notice_style()),
                        frame.area(),
                    );
                }
            }
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m, at) => handler::handle_mouse(state, m, at),
                    AppEvent::Resize(w, h) => state.resize(Rect::new(0, 0, w, h)),
                }
            }

            // Only wake for frames while a loop is in flight.
            _ = frames.tick(), if state.strip.has_pending_frames() => {
                let ran = state.strip.run_frame();
                tracing::trace!(tasks = ran, "frame");
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}
