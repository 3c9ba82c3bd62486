//! Main Application
//!
//! The App struct hosts one animated character in the terminal:
//! - Event loop (resize and quit keys)
//! - Clock: milliseconds since the loop started, fed to the engine
//! - Rendering the canvas whenever the engine drew something
//!
//! The loop sleeps until the engine's next timer deadline or the next
//! terminal event, whichever comes first. Timer wakeups are spaced at least
//! `MIN_FRAME_INTERVAL` apart so zero-length frames cannot spin the loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing::{debug, info};

use animator_core::{AnimatorConfig, Application};

use crate::canvas::TerminalCanvas;
use crate::imaging::ImageFileDecoder;

/// How long to sleep when no timer is pending
const IDLE_WAIT: Duration = Duration::from_secs(1);

/// Shortest gap between two timer-driven wakeups (~60fps cap)
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// The animation engine, drawing into the canvas
    engine: Application<ImageFileDecoder, TerminalCanvas>,
    /// Character name for the caption
    name: String,
    /// Engine clock origin
    started_at: Instant,
    /// Something changed since the last render
    dirty: bool,
    /// When the loop last advanced the engine on a timer wakeup
    last_wake: Instant,
}

impl App {
    /// Create the app for a terminal of `size` cells, decoding every frame
    pub fn new(config: &AnimatorConfig, size: (u16, u16)) -> anyhow::Result<Self> {
        let canvas = TerminalCanvas::new(size.0, size.1);
        let engine = Application::from_config(config, ImageFileDecoder::new(), canvas)?;

        Ok(Self {
            running: true,
            engine,
            name: config.name.clone(),
            started_at: Instant::now(),
            dirty: true,
            last_wake: Instant::now(),
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.started_at = Instant::now();
        self.last_wake = self.started_at;
        self.engine.start()?;
        self.render(terminal)?;
        info!(name = %self.name, "Vivian is on stage");

        while self.running {
            let wait = loop_wait(self.time_until_next_timer(), self.last_wake.elapsed());

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => {
                        // Bring the clock up to date so resize timers start from now
                        self.advance()?;
                        self.handle_event(event);
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },

                _ = tokio::time::sleep(wait) => {}
            }

            self.last_wake = Instant::now();
            self.advance()?;
            if self.dirty {
                self.render(terminal)?;
            }
        }

        self.engine.shutdown();
        info!("Vivian left the stage");
        Ok(())
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The animation engine
    pub fn engine(&self) -> &Application<ImageFileDecoder, TerminalCanvas> {
        &self.engine
    }

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(cols, rows) => self.handle_resize(cols, rows),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false
            }
            _ => {}
        }
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) {
        let viewport = self.engine.surface_mut().resize(cols, rows);
        debug!(cols, rows, "Terminal resized");
        self.engine.handle_resize(viewport.width, viewport.height);
        self.dirty = true;
    }

    fn advance(&mut self) -> anyhow::Result<()> {
        if self.engine.advance(self.elapsed_ms())? > 0 {
            self.dirty = true;
        }
        Ok(())
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn time_until_next_timer(&self) -> Option<Duration> {
        self.engine
            .next_deadline()
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(self.elapsed_ms())))
    }

    /// Draw the canvas with an up to date caption
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let active = self.engine.entity().active_set().unwrap_or_default().to_string();
        self.engine.surface_mut().set_caption(&self.name, &active);

        let canvas = self.engine.surface();
        terminal.draw(|frame| frame.render_widget(canvas, frame.area()))?;
        self.dirty = false;
        Ok(())
    }
}

/// Sleep before the next wakeup: the timer deadline (or `IDLE_WAIT`),
/// but never sooner than `MIN_FRAME_INTERVAL` after the previous wakeup
fn loop_wait(until_deadline: Option<Duration>, since_wake: Duration) -> Duration {
    until_deadline
        .unwrap_or(IDLE_WAIT)
        .max(MIN_FRAME_INTERVAL.saturating_sub(since_wake))
}
