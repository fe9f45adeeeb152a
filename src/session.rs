//! A single auction session: one [`GameState`] plus the RNG used for shuffles.
//!
//! The session is the single writer for its state. Callers that share one
//! across threads must serialize access themselves (e.g. behind a `Mutex`).

use crate::action::{Action, ActionKind};
use crate::applier::apply_with_rng;
use crate::ingest::{self, IngestError};
use crate::interpreter::interpret;
use crate::state::{GameState, Sender};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    #[error("state file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is not a valid game state: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the caller shows after one input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Reply {
    /// Auctioneer narrative; empty for button presses.
    pub narrative: String,
    /// Applier result message.
    pub message: String,
    pub changed: bool,
    pub kind: ActionKind,
}

#[derive(Debug)]
pub struct Session {
    state: GameState,
    rng: ChaCha8Rng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Session whose shuffles are reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_state(GameState::new(), seed)
    }

    pub fn from_state(state: GameState, seed: u64) -> Self {
        Self { state, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Handles one line of chat: log it, interpret it, apply the result.
    #[instrument(skip(self), fields(status = %self.state.status))]
    pub fn chat(&mut self, text: &str) -> Reply {
        let text = text.trim();
        if text.is_empty() {
            return Reply {
                narrative: String::new(),
                message: "No message provided.".to_string(),
                changed: false,
                kind: ActionKind::NoAction,
            };
        }
        self.state.log(Sender::You, text);
        let interpretation = interpret(text, &self.state);
        self.state.log(Sender::Auctioneer, interpretation.narrative.clone());
        let mut reply = self.commit(&interpretation.action);
        reply.narrative = interpretation.narrative;
        reply
    }

    /// Applies an action that came straight from a UI control.
    #[instrument(skip(self), fields(kind = %action.kind()))]
    pub fn press(&mut self, action: Action) -> Reply {
        self.commit(&action)
    }

    /// Adds already-parsed item names, as an upload would.
    pub fn upload(&mut self, items: Vec<String>) -> Reply {
        self.commit(&Action::AddItems { items })
    }

    pub fn upload_file(&mut self, path: &Path) -> Result<Reply, IngestError> {
        let items = ingest::items_from_file(path)?;
        info!(count = items.len(), path = %path.display(), "items uploaded");
        Ok(self.upload(items))
    }

    /// Discards the current game and starts over.
    pub fn reset(&mut self) {
        info!("session reset");
        self.state = GameState::new();
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        fs::write(path, self.state.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path, seed: u64) -> Result<Self, SessionError> {
        let state = GameState::from_json(&fs::read_to_string(path)?)?;
        Ok(Self::from_state(state, seed))
    }

    fn commit(&mut self, action: &Action) -> Reply {
        let kind = action.kind();
        let outcome = apply_with_rng(action, std::mem::take(&mut self.state), &mut self.rng);
        self.state = outcome.state;
        if kind != ActionKind::NoAction {
            self.state.log(Sender::System, format!("Action processed: {}", outcome.message));
        }
        Reply { narrative: String::new(), message: outcome.message, changed: outcome.changed, kind }
    }
}
