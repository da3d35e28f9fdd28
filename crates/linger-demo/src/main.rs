//! Interactive demo: a popup that lingers for its exit transition.
//!
//! Space toggles the popup. On close it stays on screen, frozen at its last
//! committed content, for the grace period - the background counter keeps
//! running, the popup's does not - then leaves the tree.

use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use linger_core::Presence;
use linger_tui::{FreezeFrame, RevealRegistry};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};

/// Poll interval; also the tick cadence for the presence machine.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Exaggerated grace period so the frozen popup is easy to observe.
const GRACE: Duration = Duration::from_millis(800);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    install_panic_hook();
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run(&mut terminal);

    restore_terminal()?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let registry = RevealRegistry::new();
    let mut popup = FreezeFrame::new(&registry);
    let mut presence = Presence::with_grace(false, GRACE);
    let mut ticks: u64 = 0;

    loop {
        presence.tick(Instant::now());
        terminal
            .draw(|frame| draw(frame, &mut popup, &presence, ticks))
            .context("Failed to draw frame")?;
        ticks += 1;

        if event::poll(FRAME_DURATION).context("Failed to poll events")? {
            match event::read().context("Failed to read event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char(' ') => {
                        presence.set_open(!presence.is_open(), Instant::now());
                    }
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

fn draw(frame: &mut Frame, popup: &mut FreezeFrame, presence: &Presence, ticks: u64) {
    let area = frame.area();

    let state = if presence.is_frozen() {
        "closing (frozen)"
    } else if presence.is_open() {
        "open"
    } else {
        "closed"
    };
    let background = Paragraph::new(vec![
        Line::from(format!("background tick: {ticks}")),
        Line::from(format!("popup: {state}")),
        Line::from(""),
        Line::from("space: toggle popup   q: quit"),
    ]);
    frame.render_widget(background, area);

    if presence.should_render() {
        let popup_area = centered(area, 34, 6);
        popup.render(frame, popup_area, presence.is_frozen(), |frame, area| {
            frame.render_widget(Clear, area);
            let body = Paragraph::new(vec![
                Line::from(format!("committed at tick {ticks}")),
                Line::from(""),
                Line::from("close me and watch this frame"),
                Line::from("linger while the counter runs"),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" popup ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            );
            frame.render_widget(body, area);
        });
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Restores terminal state. Idempotent; safe on all exit paths.
fn restore_terminal() -> Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
