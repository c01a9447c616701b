//! Terminal user interface for the live waveform.
//!
//! Owns the alternate screen, draws each frame's wave layers above a one-line
//! status footer, and turns key presses into [`VisualizerCommand`]s.

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use super::canvas::{canvas_bounds, WaveCanvas};
use crate::waveform::{Bounds, WaveColor, WaveLayer};

const FOOTER_HEIGHT: u16 = 1;

/// User input during visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerCommand {
    /// Keep animating (no relevant key pressed)
    Continue,
    /// Leave the visualizer (Escape, 'q', or Ctrl+C)
    Quit,
    /// Freeze or unfreeze the level input (Space)
    TogglePause,
    /// The terminal was resized
    Resize,
}

/// Values shown in the footer for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameStatus<'a> {
    /// Input label, e.g. the device name or "demo"
    pub source: &'a str,
    /// Raw reading in dBFS
    pub decibels: f32,
    /// Normalized level in 0..=1
    pub level: f32,
    pub paused: bool,
}

/// Full-screen waveform view.
pub struct WaveTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    background: WaveColor,
    started_at: Instant,
    paused_for: Duration,
    paused_since: Option<Instant>,
}

impl WaveTui {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the alternate screen cannot be entered
    /// - If the terminal cannot be initialized
    pub fn new(background: WaveColor) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            background,
            started_at: Instant::now(),
            paused_for: Duration::ZERO,
            paused_since: None,
        })
    }

    /// Geometry bounds of the wave area for the current terminal size.
    ///
    /// # Errors
    /// - If the terminal size cannot be queried
    pub fn canvas_bounds(&self) -> anyhow::Result<Bounds> {
        let size = self.terminal.size()?;
        let (wave_area, _) = split_frame(Rect::new(0, 0, size.width, size.height));
        Ok(canvas_bounds(wave_area))
    }

    /// Draws one frame.
    ///
    /// `layers` must have been rendered for [`WaveTui::canvas_bounds`].
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn draw(&mut self, layers: &[WaveLayer], status: FrameStatus<'_>) -> anyhow::Result<()> {
        let background = self.background;
        let elapsed = self.elapsed();

        self.terminal.draw(|frame| {
            let (wave_area, footer_area) = split_frame(frame.area());
            let bounds = canvas_bounds(wave_area);

            frame.render_widget(WaveCanvas::new(layers, bounds, background), wave_area);
            frame.render_widget(footer(status, elapsed, background), footer_area);
        })?;

        Ok(())
    }

    /// Waits up to `timeout` for a key press or resize.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self, timeout: Duration) -> anyhow::Result<VisualizerCommand> {
        if !event::poll(timeout)? {
            return Ok(VisualizerCommand::Continue);
        }

        let command = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    tracing::debug!("Escape or 'q' pressed: quitting");
                    VisualizerCommand::Quit
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    tracing::debug!("Ctrl+C pressed: quitting");
                    VisualizerCommand::Quit
                }
                KeyCode::Char(' ') => {
                    tracing::debug!("Space pressed: toggling pause");
                    self.toggle_pause_clock();
                    VisualizerCommand::TogglePause
                }
                _ => VisualizerCommand::Continue,
            },
            Event::Resize(width, height) => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
                self.terminal.autoresize()?;
                VisualizerCommand::Resize
            }
            _ => VisualizerCommand::Continue,
        };

        Ok(command)
    }

    /// Pauses or resumes the elapsed-time clock.
    fn toggle_pause_clock(&mut self) {
        match self.paused_since.take() {
            Some(since) => self.paused_for += since.elapsed(),
            None => self.paused_since = Some(Instant::now()),
        }
    }

    /// Running time excluding pauses.
    fn elapsed(&self) -> Duration {
        let mut paused = self.paused_for;
        if let Some(since) = self.paused_since {
            paused += since.elapsed();
        }
        self.started_at.elapsed().saturating_sub(paused)
    }

    /// Restores the terminal.
    ///
    /// # Errors
    /// - If raw mode cannot be disabled
    /// - If the alternate screen cannot be left
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Splits the screen into the wave area and the footer line below it.
fn split_frame(area: Rect) -> (Rect, Rect) {
    let footer_height = FOOTER_HEIGHT.min(area.height);
    let wave_area = Rect {
        height: area.height - footer_height,
        ..area
    };
    let footer_area = Rect {
        y: area.y + wave_area.height,
        height: footer_height,
        ..area
    };
    (wave_area, footer_area)
}

fn footer(status: FrameStatus<'_>, elapsed: Duration, background: WaveColor) -> Paragraph<'_> {
    let indicator = if status.paused {
        Span::styled("⏸ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("● ", Style::default().fg(Color::Red))
    };

    let secs = elapsed.as_secs();
    let decibels = if status.paused {
        "--".to_string()
    } else {
        format!("{:.1} dB", status.decibels.max(-99.9))
    };

    let line = Line::from(vec![
        indicator,
        Span::raw(format!("{}:{:02}", secs / 60, secs % 60)),
        Span::raw(" / "),
        Span::raw(status.source),
        Span::raw(" / "),
        Span::raw(decibels),
        Span::raw(" / "),
        Span::raw(format!("{:>3.0}%", status.level * 100.0)),
        Span::styled(
            "   space pause · q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    Paragraph::new(line).style(
        Style::default()
            .fg(Color::Rgb(185, 207, 212))
            .bg(Color::Rgb(background.red, background.green, background.blue)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frame_reserves_footer() {
        let (wave, footer) = split_frame(Rect::new(0, 0, 80, 24));
        assert_eq!(wave, Rect::new(0, 0, 80, 23));
        assert_eq!(footer, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn test_split_frame_zero_height() {
        let (wave, footer) = split_frame(Rect::new(0, 0, 80, 0));
        assert_eq!(wave.height, 0);
        assert_eq!(footer.height, 0);
    }

    #[test]
    fn test_footer_text() {
        let status = FrameStatus {
            source: "demo",
            decibels: -23.46,
            level: 0.42,
            paused: false,
        };
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        footer(status, Duration::from_secs(75), WaveColor::rgb(0, 0, 0)).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("1:15 / demo / -23.5 dB /  42%"), "{text}");
    }

    #[test]
    fn test_footer_paused() {
        let status = FrameStatus {
            source: "mic",
            decibels: -160.0,
            level: 0.0,
            paused: true,
        };
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        footer(status, Duration::ZERO, WaveColor::rgb(0, 0, 0)).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("0:00 / mic / --"), "{text}");
    }
}
