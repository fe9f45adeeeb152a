use crate::action::Action;
use crate::session::{Reply, Session};
use crate::state::GameState;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

/// On-screen controls that produce an [`Action`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Button {
    SellIt,
    NoSale,
    AuctionNext,
    Shuffle,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::SellIt => "F2 sell it",
            Button::NoSale => "F3 no sale",
            Button::AuctionNext => "F4 auction next",
            Button::Shuffle => "F5 shuffle",
        }
    }

    /// The action this button sends for the given state.
    pub fn action(self, state: &GameState) -> Action {
        match self {
            Button::SellIt => Action::SellItem {
                item: state.current_item.clone(),
                player: state.high_bidder.clone(),
                amount: state.current_bid,
            },
            Button::NoSale => {
                Action::SellItem { item: state.current_item.clone(), player: None, amount: 0 }
            }
            Button::AuctionNext => match state.next_item() {
                Some(item) => Action::StartItemAuction { item: item.to_string() },
                None => Action::no_action("no items are pending"),
            },
            Button::Shuffle => Action::ShuffleItems,
        }
    }

    /// Whether pressing makes sense right now; used to dim the label.
    pub fn enabled(self, state: &GameState) -> bool {
        match self {
            Button::SellIt | Button::NoSale => state.current_item.is_some(),
            Button::AuctionNext => state.current_item.is_none() && !state.item_list.is_empty(),
            Button::Shuffle => !state.item_list.is_empty(),
        }
    }
}

pub const BUTTONS: [Button; 4] = [Button::SellIt, Button::NoSale, Button::AuctionNext, Button::Shuffle];

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    Char(char),
    Backspace,
    ClearInput,
    Submit,
    Press(Button),
    ToggleHelp,
    ToggleHistory,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub session: Session,
    pub input: String,
    pub started: Instant,
    state_path: Option<PathBuf>,
    help_open: bool,
    history_open: bool,
    chat_offset: usize,
    notice: Option<String>,
    notice_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Session::new(), None)
    }
}

impl AppState {
    pub const INPUT_MAX: usize = 240;
    const NOTICE_TTL: Duration = Duration::from_secs(4);

    pub fn new(session: Session, state_path: Option<PathBuf>) -> Self {
        Self {
            session,
            input: String::new(),
            started: Instant::now(),
            state_path,
            help_open: false,
            history_open: false,
            chat_offset: 0,
            notice: None,
            notice_at: None,
        }
    }

    pub fn game(&self) -> &GameState {
        self.session.state()
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    /// Lines scrolled up from the newest chat entry.
    pub fn chat_offset(&self) -> usize {
        self.chat_offset
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }

    pub(crate) fn close_overlays(&mut self) -> bool {
        let was_open = self.help_open || self.history_open;
        self.help_open = false;
        self.history_open = false;
        was_open
    }

    fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
        self.notice_at = Some(Instant::now());
    }

    fn show_reply(&mut self, reply: Reply) -> bool {
        self.chat_offset = 0;
        self.set_notice(reply.message);
        reply.changed
    }

    /// Returns true when the game state changed.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Char(c) => {
                if self.input.chars().count() < Self::INPUT_MAX && !c.is_control() {
                    self.input.push(c);
                }
                false
            }
            InputAction::Backspace => {
                self.input.pop();
                false
            }
            InputAction::ClearInput => {
                self.input.clear();
                false
            }
            InputAction::Submit => self.submit(),
            InputAction::Press(button) => {
                let action = button.action(self.game());
                let reply = self.session.press(action);
                self.show_reply(reply)
            }
            InputAction::ToggleHelp => {
                self.history_open = false;
                self.help_open = !self.help_open;
                false
            }
            InputAction::ToggleHistory => {
                self.help_open = false;
                self.history_open = !self.history_open;
                false
            }
            InputAction::ScrollUp => {
                let max = self.game().chat_log.len().saturating_sub(1);
                self.chat_offset = (self.chat_offset + 1).min(max);
                false
            }
            InputAction::ScrollDown => {
                self.chat_offset = self.chat_offset.saturating_sub(1);
                false
            }
        }
    }

    fn submit(&mut self) -> bool {
        let line = std::mem::take(&mut self.input);
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        match line.strip_prefix('/') {
            Some(command) => self.console_command(command),
            None => {
                let reply = self.session.chat(line);
                self.show_reply(reply)
            }
        }
    }

    fn console_command(&mut self, command: &str) -> bool {
        let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
        match name {
            "upload" if arg.trim().is_empty() => {
                self.set_notice("usage: /upload <path to .csv or .txt>");
                false
            }
            "upload" => match self.session.upload_file(Path::new(arg.trim())) {
                Ok(reply) => self.show_reply(reply),
                Err(err) => {
                    self.set_notice(err.to_string());
                    false
                }
            },
            "reset" => {
                self.session.reset();
                self.chat_offset = 0;
                self.set_notice("Game reset.");
                true
            }
            "save" => {
                self.save();
                false
            }
            other => {
                self.set_notice(format!("unknown command /{other}; try /upload, /reset or /save"));
                false
            }
        }
    }

    /// Writes the state to the configured path, if any.
    pub fn save(&mut self) {
        let Some(path) = self.state_path.clone() else {
            self.set_notice("no state file configured; start with --state <path>");
            return;
        };
        match self.session.save(&path) {
            Ok(()) => self.set_notice(format!("Saved to {}", path.display())),
            Err(err) => {
                warn!(error = %err, "saving state failed");
                self.set_notice(err.to_string());
            }
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(at) = self.notice_at {
            if at.elapsed() >= Self::NOTICE_TTL {
                self.notice = None;
                self.notice_at = None;
            }
        }
    }
}
