//! Actions: the small typed vocabulary that drives a [`GameState`](crate::state::GameState).
//!
//! Actions arrive either from the command interpreter or straight from a UI
//! button. The wire form is a JSON object tagged by `type`, e.g.
//! `{"type": "bid", "player": "Ann", "amount": 5}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Action {
    InitGame {
        players: Vec<String>,
        budget: u64,
    },
    AddItems {
        items: Vec<String>,
    },
    StartItemAuction {
        item: String,
    },
    Bid {
        player: String,
        amount: u64,
    },
    SellItem {
        #[serde(default)]
        item: Option<String>,
        #[serde(default)]
        player: Option<String>,
        #[serde(default)]
        amount: u64,
    },
    Pass {
        player: String,
    },
    ShuffleItems,
    NoAction {
        #[serde(default)]
        reason: String,
    },
    /// Any `type` tag this engine does not know.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ActionKind {
    InitGame,
    AddItems,
    StartItemAuction,
    Bid,
    SellItem,
    Pass,
    ShuffleItems,
    NoAction,
    Unknown,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::InitGame => "init_game",
            ActionKind::AddItems => "add_items",
            ActionKind::StartItemAuction => "start_item_auction",
            ActionKind::Bid => "bid",
            ActionKind::SellItem => "sell_item",
            ActionKind::Pass => "pass",
            ActionKind::ShuffleItems => "shuffle_items",
            ActionKind::NoAction => "no_action",
            ActionKind::Unknown => "unknown",
        }
    }

    /// Kinds that may be applied repeatedly without being treated as duplicates.
    pub fn dedup_exempt(self) -> bool {
        matches!(self, ActionKind::Pass | ActionKind::NoAction)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical identity of an action, used to suppress accidental re-application.
///
/// Keys compare by equality over a fixed field order, so two actions share a
/// key exactly when every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

impl ActionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Action {
    pub fn no_action(reason: impl Into<String>) -> Self {
        Action::NoAction { reason: reason.into() }
    }

    /// Sale with explicit buyer and price.
    pub fn sell(item: impl Into<String>, player: impl Into<String>, amount: u64) -> Self {
        Action::SellItem { item: Some(item.into()), player: Some(player.into()), amount }
    }

    /// Close out an item with no buyer.
    pub fn no_sale(item: impl Into<String>) -> Self {
        Action::SellItem { item: Some(item.into()), player: None, amount: 0 }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::InitGame { .. } => ActionKind::InitGame,
            Action::AddItems { .. } => ActionKind::AddItems,
            Action::StartItemAuction { .. } => ActionKind::StartItemAuction,
            Action::Bid { .. } => ActionKind::Bid,
            Action::SellItem { .. } => ActionKind::SellItem,
            Action::Pass { .. } => ActionKind::Pass,
            Action::ShuffleItems => ActionKind::ShuffleItems,
            Action::NoAction { .. } => ActionKind::NoAction,
            Action::Unknown => ActionKind::Unknown,
        }
    }

    pub fn key(&self) -> ActionKey {
        let kind = self.kind();
        let fields = match self {
            Action::InitGame { players, budget } => format!("budget={budget};players={players:?}"),
            Action::AddItems { items } => format!("items={items:?}"),
            Action::StartItemAuction { item } => format!("item={item:?}"),
            Action::Bid { player, amount } => format!("amount={amount};player={player:?}"),
            Action::SellItem { item, player, amount } => {
                format!("amount={amount};item={item:?};player={player:?}")
            }
            Action::Pass { player } => format!("player={player:?}"),
            Action::NoAction { reason } => format!("reason={reason:?}"),
            Action::ShuffleItems | Action::Unknown => String::new(),
        };
        ActionKey(format!("{kind}{{{fields}}}"))
    }

    /// Decodes the JSON wire form. Malformed input becomes [`Action::NoAction`]
    /// carrying the parse error.
    pub fn from_json(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix("```json").unwrap_or(raw);
        let raw = raw.strip_suffix("```").unwrap_or(raw).trim();
        match serde_json::from_str::<Action>(raw) {
            Ok(action) => action,
            Err(err) => {
                warn!(error = %err, "rejecting malformed action json");
                Action::no_action(format!("could not parse action: {err}"))
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
