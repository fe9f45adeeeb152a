use crate::tui::app::{AppState, Button, InputAction};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Maps one key press to input actions. Returns true when the user quits.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        return true;
    }
    let action = match key.code {
        KeyCode::Esc => {
            if app.close_overlays() {
                return false;
            }
            if app.input.is_empty() {
                return true;
            }
            InputAction::ClearInput
        }
        KeyCode::F(1) => InputAction::ToggleHelp,
        KeyCode::F(2) => InputAction::Press(Button::SellIt),
        KeyCode::F(3) => InputAction::Press(Button::NoSale),
        KeyCode::F(4) => InputAction::Press(Button::AuctionNext),
        KeyCode::F(5) => InputAction::Press(Button::Shuffle),
        KeyCode::F(6) => InputAction::ToggleHistory,
        _ if app.help_open() || app.history_open() => return false,
        KeyCode::Enter => InputAction::Submit,
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::Up | KeyCode::PageUp => InputAction::ScrollUp,
        KeyCode::Down | KeyCode::PageDown => InputAction::ScrollDown,
        KeyCode::Char(c) => InputAction::Char(c),
        _ => return false,
    };
    let _ = app.handle_input(action);
    false
}
