//! Game state for one auction session and the invariants it must keep.

use crate::action::ActionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Phase of an auction session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Status {
    #[default]
    WaitingForInit,
    WaitingForItems,
    WaitingForAuctionStart,
    Bidding,
    GameOver,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::WaitingForInit => "waiting_for_init",
            Status::WaitingForItems => "waiting_for_items",
            Status::WaitingForAuctionStart => "waiting_for_auction_start",
            Status::Bidding => "bidding",
            Status::GameOver => "game_over",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who wrote a chat log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Sender {
    You,
    Auctioneer,
    System,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::You => "You",
            Sender::Auctioneer => "Auctioneer",
            Sender::System => "System",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub sender: Sender,
    pub message: String,
}

impl ChatEntry {
    pub fn new(sender: Sender, message: impl Into<String>) -> Self {
        Self { sender, message: message.into() }
    }
}

/// An item a player won, with the price paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedItem {
    pub name: String,
    pub price: u64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("current bid {bid} has no valid high bidder")]
    BidWithoutBidder { bid: u64 },
    #[error("high bidder {0} is set without a bid")]
    BidderWithoutBid(String),
    #[error("'{0}' is both under auction and pending")]
    CurrentItemPending(String),
    #[error("{player} spent {spent} but budget moved from {initial} to {remaining}")]
    LedgerMismatch { player: String, initial: u64, remaining: u64, spent: u64 },
    #[error("status {status} is inconsistent with the current item")]
    StatusMismatch { status: Status },
}

/// One auction session.
///
/// The record is plain data so it can be snapshotted, passed by value into
/// [`crate::applier::apply`] and persisted without loss.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub participants: BTreeMap<String, u64>,
    pub player_items: BTreeMap<String, Vec<PurchasedItem>>,
    pub item_list: Vec<String>,
    pub auction_history: Vec<String>,
    pub current_item: Option<String>,
    pub current_bid: u64,
    pub high_bidder: Option<String>,
    pub status: Status,
    pub chat_log: Vec<ChatEntry>,
    #[serde(default)]
    pub initial_budget: u64,
    #[serde(default)]
    pub last_action_key: Option<ActionKey>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_item(&self) -> Option<&str> {
        self.current_item.as_deref()
    }

    pub fn high_bidder(&self) -> Option<&str> {
        self.high_bidder.as_deref()
    }

    pub fn budget(&self, player: &str) -> Option<u64> {
        self.participants.get(player).copied()
    }

    pub fn items_of(&self, player: &str) -> &[PurchasedItem] {
        self.player_items.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Next pending item, the one `auction next` refers to.
    pub fn next_item(&self) -> Option<&str> {
        self.item_list.first().map(String::as_str)
    }

    /// Case-insensitive lookup of a participant, returning the stored spelling.
    pub fn find_participant(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.participants.keys().find(|p| same_name(p, name)).map(String::as_str)
    }

    /// Case-insensitive lookup of a pending item, returning the stored spelling.
    pub fn find_pending_item(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.item_list.iter().find(|i| same_name(i, name)).map(String::as_str)
    }

    pub fn participant_names(&self) -> String {
        self.participants.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
    }

    pub fn pending_items(&self) -> String {
        self.item_list.join(", ")
    }

    pub(crate) fn log(&mut self, sender: Sender, message: impl Into<String>) {
        self.chat_log.push(ChatEntry::new(sender, message));
    }

    /// Checks the structural invariants every committed state must satisfy.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        match (&self.high_bidder, self.current_bid) {
            (Some(p), 0) => return Err(InvariantViolation::BidderWithoutBid(p.clone())),
            (Some(p), bid) if !self.participants.contains_key(p) => {
                return Err(InvariantViolation::BidWithoutBidder { bid })
            }
            (None, bid) if bid > 0 => return Err(InvariantViolation::BidWithoutBidder { bid }),
            _ => {}
        }
        if let Some(item) = &self.current_item {
            if self.item_list.contains(item) {
                return Err(InvariantViolation::CurrentItemPending(item.clone()));
            }
        }
        let bidding = self.status == Status::Bidding;
        if bidding != self.current_item.is_some() {
            return Err(InvariantViolation::StatusMismatch { status: self.status });
        }
        for (player, &remaining) in &self.participants {
            let spent: u64 = self.items_of(player).iter().map(|i| i.price).sum();
            if self.initial_budget.checked_sub(remaining) != Some(spent) {
                return Err(InvariantViolation::LedgerMismatch {
                    player: player.clone(),
                    initial: self.initial_budget,
                    remaining,
                    spent,
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Case-insensitive name comparison over full Unicode lowercase mappings.
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// Capitalizes the first letter of each word and lowercases the rest.
///
/// Words are re-joined with single spaces, so runs of interior whitespace
/// collapse ("Old  Vase" becomes "Old Vase").
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_normalizes_words() {
        assert_eq!(title_case("  old   VASE "), "Old Vase");
        assert_eq!(title_case("diamond ring"), "Diamond Ring");
        assert_eq!(title_case(""), "");
    }

    fn seeded() -> GameState {
        let mut s = GameState::new();
        s.participants.insert("Ann".into(), 95);
        s.participants.insert("Bo".into(), 100);
        s.player_items.insert("Ann".into(), vec![PurchasedItem { name: "Vase".into(), price: 5 }]);
        s.player_items.insert("Bo".into(), Vec::new());
        s.initial_budget = 100;
        s.status = Status::WaitingForAuctionStart;
        s.item_list = vec!["Ring".into()];
        s
    }

    #[test]
    fn default_state_waits_for_init() {
        let s = GameState::new();
        assert_eq!(s.status, Status::WaitingForInit);
        assert_eq!(s.current_bid, 0);
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn lookups_ignore_case_and_return_stored_spelling() {
        let s = seeded();
        assert_eq!(s.find_participant("ann"), Some("Ann"));
        assert_eq!(s.find_pending_item(" RING "), Some("Ring"));
        assert_eq!(s.find_participant("zed"), None);
    }

    #[test]
    fn lookups_fold_non_ascii_case() {
        let mut s = seeded();
        s.participants.insert(title_case("åsa"), 100);
        s.item_list.push(title_case("éclair"));
        assert_eq!(s.find_participant("åsa"), Some("Åsa"));
        assert_eq!(s.find_participant("ÅSA"), Some("Åsa"));
        assert_eq!(s.find_pending_item("éclair"), Some("Éclair"));
        assert!(same_name("Öl", "öL"));
        assert!(!same_name("Åsa", "Asa"));
    }

    #[test]
    fn ledger_mismatch_is_reported() {
        let mut s = seeded();
        assert!(s.check_invariants().is_ok());
        s.participants.insert("Bo".into(), 90);
        assert!(matches!(s.check_invariants(), Err(InvariantViolation::LedgerMismatch { .. })));
    }

    #[test]
    fn bidder_requires_bid() {
        let mut s = seeded();
        s.item_list.clear();
        s.current_item = Some("Ring".into());
        s.status = Status::Bidding;
        s.high_bidder = Some("Ann".into());
        assert_eq!(s.check_invariants(), Err(InvariantViolation::BidderWithoutBid("Ann".into())));
        s.current_bid = 3;
        assert!(s.check_invariants().is_ok());
    }

    #[test]
    fn json_snapshot_restores_every_field() {
        let mut s = seeded();
        s.log(Sender::System, "hello");
        s.auction_history.push("'Vase' sold to Ann for 5 credits.".into());
        let json = s.to_json().unwrap();
        assert!(json.contains("\"waiting_for_auction_start\""));
        assert_eq!(GameState::from_json(&json).unwrap(), s);
    }
}
