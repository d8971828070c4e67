//! TUI module for ecg
//!
//! Drives the scroll engine once per frame and draws the sweep.

pub mod state;
mod status;
mod trace;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer, PushError};
use tracing::{debug, warn};

use saavy_ecg::{
    scroll::{Continuity, EngineMessage, FrameClock, FrameRecord, ScrollEngine},
    waveform::WaveformConfig,
};

pub use state::{Draft, HEART_RATE_STEP};

use status::render_status;
use trace::render_trace;

/// UI application state
pub struct UiApp {
    engine: ScrollEngine,
    clock: FrameClock,
    /// Commands queued by key handling, applied at the start of a frame
    tx: Producer<EngineMessage>,
    rx: Consumer<EngineMessage>,
    /// Settings being edited but not yet applied
    draft: Draft,
    /// Last frame the engine emitted
    record: FrameRecord,
    /// Last rejected configuration, shown until the next successful apply
    notice: Option<String>,
    frame_interval: Duration,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        engine: ScrollEngine,
        config: WaveformConfig,
        tx: Producer<EngineMessage>,
        rx: Consumer<EngineMessage>,
        frame_interval: Duration,
    ) -> Self {
        Self {
            engine,
            clock: FrameClock::new(),
            tx,
            rx,
            draft: Draft::new(config),
            record: FrameRecord::new(),
            notice: None,
            frame_interval,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.apply_pending();

            let elapsed = self.clock.tick(Instant::now());
            self.engine.tick(elapsed);
            self.engine.render(&mut self.record);

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(self.frame_interval)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn apply_pending(&mut self) {
        let had_messages = !self.rx.is_empty();
        let rejected = self.engine.drain_messages(&mut self.rx);
        if let Some(err) = rejected.last() {
            self.notice = Some(err.to_string());
            self.draft.revert(self.engine.config());
        } else if had_messages {
            self.notice = None;
        }
    }

    fn send(&mut self, message: EngineMessage) {
        if let Err(PushError::Full(message)) = self.tx.push(message) {
            warn!(?message, "engine queue full, dropping command");
        }
    }

    fn apply_draft(&mut self, continuity: Continuity) {
        debug!(?continuity, "applying draft");
        let config = self.draft.config().clone();
        self.send(EngineMessage::Apply { config, continuity });
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.draft.nudge_heart_rate(HEART_RATE_STEP),
            KeyCode::Char('-') => self.draft.nudge_heart_rate(-HEART_RATE_STEP),
            KeyCode::Char('r') => self.draft.toggle_r_pattern(),
            KeyCode::Char('p') => self.draft.toggle_p_pattern(),
            KeyCode::Char('c') => self.draft.toggle_custom(),
            KeyCode::Enter => self.apply_draft(Continuity::Keep),
            KeyCode::Char('a') => self.apply_draft(Continuity::Restart),
            KeyCode::Char('x') => self.send(EngineMessage::Reset),
            _ => {}
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: status, sweep, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Sweep
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_status(
            frame,
            chunks[0],
            &self.engine,
            &self.draft,
            self.notice.as_deref(),
        );
        render_trace(frame, chunks[1], &self.record, self.engine.viewport());

        let help = Paragraph::new(
            " [Q] Quit  [+/-] Rate  [R] R-burst  [P] P-burst  [C] Custom  [Enter] Apply  [A] Apply+restart  [X] Reset",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
