//! The action applier: a validating state transition over [`GameState`].
//!
//! `apply` takes the state by value and hands back either a new state with the
//! action committed, or the original state untouched together with the reason
//! it was refused. No partially applied state is ever returned.

use crate::action::{Action, ActionKind};
use crate::state::{title_case, GameState, PurchasedItem, Sender, Status};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApplyError {
    #[error("duplicate action skipped")]
    Duplicate,
    #[error("missing players for init_game")]
    MissingPlayers,
    #[error("game is already initialized; reset to start over")]
    AlreadyInitialized,
    #[error("game has not been initialized yet")]
    NotInitialized,
    #[error("the game is over; reset to start a new one")]
    GameOver,
    #[error("no items provided for add_items")]
    NoItems,
    #[error("item '{item}' not found in available items. Available: {available}")]
    ItemNotFound { item: String, available: String },
    #[error("auction for '{0}' is still underway; sell it or call no sale first")]
    AuctionInProgress(String),
    #[error("no item is currently being auctioned")]
    NoActiveAuction,
    #[error("'{item}' is not the item under auction ('{current}')")]
    NotCurrentItem { item: String, current: String },
    #[error("no item is under auction and none was named")]
    NoItemToSell,
    #[error("player '{player}' not recognized. Current participants: {known}")]
    UnknownPlayer { player: String, known: String },
    #[error("bid of {amount} is not higher than current bid of {current}. Minimum bid is {min}")]
    BidTooLow { amount: u64, current: u64, min: u64 },
    #[error("player '{player}' does not have enough budget ({budget}) for a bid of {amount}")]
    InsufficientBudget { player: String, budget: u64, amount: u64 },
    #[error("nothing to shuffle")]
    NothingToShuffle,
    #[error("unknown action type")]
    UnknownActionType,
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Outcome {
    pub state: GameState,
    pub message: String,
    pub changed: bool,
}

impl Outcome {
    fn unchanged(state: GameState, message: String) -> Self {
        Self { state, message, changed: false }
    }
}

enum Step {
    Committed(String),
    Unchanged(String),
}

enum Settlement {
    Sold { player: String, amount: u64 },
    Unaffordable { player: String, amount: u64 },
    UnknownBuyer { player: String },
    NoBids,
}

/// Applies `action` using the thread-local RNG for shuffles.
pub fn apply(action: &Action, state: GameState) -> Outcome {
    apply_with_rng(action, state, &mut rand::rng())
}

/// Applies `action`; `rng` is only consulted by `shuffle_items`.
pub fn apply_with_rng<R: Rng + ?Sized>(action: &Action, state: GameState, rng: &mut R) -> Outcome {
    let kind = action.kind();
    let key = action.key();
    if !kind.dedup_exempt() && state.last_action_key.as_ref() == Some(&key) {
        warn!(%kind, "duplicate action skipped");
        return Outcome::unchanged(state, ApplyError::Duplicate.to_string());
    }

    let mut next = state.clone();
    match transition(action, &mut next, rng) {
        Ok(Step::Committed(message)) => {
            next.last_action_key = Some(key);
            info!(%kind, status = %next.status, "action committed");
            Outcome { state: next, message, changed: true }
        }
        Ok(Step::Unchanged(message)) => Outcome::unchanged(state, message),
        Err(err) => {
            if kind == ActionKind::Unknown {
                warn!("unknown action type rejected");
            } else {
                debug!(%kind, error = %err, "action rejected");
            }
            Outcome::unchanged(state, err.to_string())
        }
    }
}

fn transition<R: Rng + ?Sized>(
    action: &Action,
    s: &mut GameState,
    rng: &mut R,
) -> Result<Step, ApplyError> {
    match action {
        Action::InitGame { players, budget } => init_game(s, players, *budget),
        Action::AddItems { items } => add_items(s, items),
        Action::StartItemAuction { item } => start_item_auction(s, item),
        Action::Bid { player, amount } => bid(s, player, *amount),
        Action::SellItem { item, player, amount } => {
            sell_item(s, item.as_deref(), player.as_deref(), *amount)
        }
        Action::Pass { player } => pass(s, player),
        Action::ShuffleItems => shuffle_items(s, rng),
        Action::NoAction { reason } if reason.is_empty() => Ok(Step::Unchanged("no action".into())),
        Action::NoAction { reason } => Ok(Step::Unchanged(format!("no action: {reason}"))),
        Action::Unknown => Err(ApplyError::UnknownActionType),
    }
}

fn ensure_open(s: &GameState) -> Result<(), ApplyError> {
    match s.status {
        Status::WaitingForInit => Err(ApplyError::NotInitialized),
        Status::GameOver => Err(ApplyError::GameOver),
        _ => Ok(()),
    }
}

fn unknown_player(s: &GameState, player: &str) -> ApplyError {
    ApplyError::UnknownPlayer { player: player.to_string(), known: s.participant_names() }
}

fn init_game(s: &mut GameState, players: &[String], budget: u64) -> Result<Step, ApplyError> {
    if s.status != Status::WaitingForInit {
        return Err(ApplyError::AlreadyInitialized);
    }
    let mut names: Vec<String> = Vec::with_capacity(players.len());
    for p in players {
        let p = p.trim();
        if !p.is_empty() && !names.iter().any(|n| n == p) {
            names.push(p.to_string());
        }
    }
    if names.is_empty() {
        return Err(ApplyError::MissingPlayers);
    }

    s.participants = names.iter().map(|p| (p.clone(), budget)).collect();
    s.player_items = names.iter().map(|p| (p.clone(), Vec::new())).collect();
    s.initial_budget = budget;
    s.chat_log.clear();
    s.log(
        Sender::System,
        format!(
            "Game initialized with players: {}. Each has {budget} credits.",
            names.join(", ")
        ),
    );
    s.status = Status::WaitingForItems;
    Ok(Step::Committed(format!("Game initialized for {} players.", names.len())))
}

fn add_items(s: &mut GameState, items: &[String]) -> Result<Step, ApplyError> {
    ensure_open(s)?;
    let items: Vec<String> =
        items.iter().map(|i| title_case(i)).filter(|i| !i.is_empty()).collect();
    if items.is_empty() {
        return Err(ApplyError::NoItems);
    }

    s.item_list.extend(items.iter().cloned());
    if s.status == Status::WaitingForItems {
        s.status = Status::WaitingForAuctionStart;
    }
    s.log(Sender::System, format!("Items added: {}.", items.join(", ")));
    if s.status == Status::WaitingForAuctionStart && s.current_item.is_none() {
        if let Some(first) = s.next_item().map(str::to_string) {
            s.log(
                Sender::Auctioneer,
                format!("Excellent, items have been added! Shall we begin the auction for '{first}' now?"),
            );
            s.log(
                Sender::System,
                "You can now type 'auction first' or 'auction <item name>'.",
            );
        }
    }
    Ok(Step::Committed(format!("Added {} items.", items.len())))
}

fn start_item_auction(s: &mut GameState, item: &str) -> Result<Step, ApplyError> {
    ensure_open(s)?;
    match s.current_item.as_deref() {
        Some(current) if current == item => {
            return Ok(Step::Unchanged(format!("Auction for '{item}' is already underway.")))
        }
        Some(current) => return Err(ApplyError::AuctionInProgress(current.to_string())),
        None => {}
    }
    let Some(idx) = s.item_list.iter().position(|i| i == item) else {
        return Err(ApplyError::ItemNotFound {
            item: item.to_string(),
            available: s.pending_items(),
        });
    };

    let item = s.item_list.remove(idx);
    s.current_bid = 0;
    s.high_bidder = None;
    s.status = Status::Bidding;
    s.log(Sender::System, format!("Auction for '{item}' has started! Current bid: 0"));
    let message = format!("Auction started for '{item}'.");
    s.current_item = Some(item);
    Ok(Step::Committed(message))
}

fn bid(s: &mut GameState, player: &str, amount: u64) -> Result<Step, ApplyError> {
    let Some(item) = s.current_item.clone() else {
        return Err(ApplyError::NoActiveAuction);
    };
    let Some(budget) = s.budget(player) else {
        return Err(unknown_player(s, player));
    };
    if amount <= s.current_bid {
        return Err(ApplyError::BidTooLow {
            amount,
            current: s.current_bid,
            min: s.current_bid.saturating_add(1),
        });
    }
    if amount > budget {
        return Err(ApplyError::InsufficientBudget { player: player.to_string(), budget, amount });
    }

    s.current_bid = amount;
    s.high_bidder = Some(player.to_string());
    s.log(Sender::System, format!("{player} bids {amount} credits for '{item}'."));
    Ok(Step::Committed(format!("Bid updated: {player} at {amount}.")))
}

fn sell_item(
    s: &mut GameState,
    item: Option<&str>,
    player: Option<&str>,
    amount: u64,
) -> Result<Step, ApplyError> {
    let item = match (item, s.current_item.as_deref()) {
        (Some(named), _) => named.to_string(),
        (None, Some(current)) => current.to_string(),
        (None, None) => return Err(ApplyError::NoItemToSell),
    };
    match s.current_item.as_deref() {
        Some(current) if current != item => {
            return Err(ApplyError::NotCurrentItem { item, current: current.to_string() })
        }
        Some(_) => {}
        None if !s.item_list.contains(&item) => {
            return Err(ApplyError::ItemNotFound { item, available: s.pending_items() })
        }
        None => {}
    }

    if let Some(idx) = s.item_list.iter().position(|i| *i == item) {
        s.item_list.remove(idx);
    }

    let settlement = match player {
        Some(p) if amount > 0 => match s.budget(p) {
            Some(budget) if budget >= amount => Settlement::Sold { player: p.to_string(), amount },
            Some(_) => Settlement::Unaffordable { player: p.to_string(), amount },
            None => Settlement::UnknownBuyer { player: p.to_string() },
        },
        _ => Settlement::NoBids,
    };

    let summary = match settlement {
        Settlement::Sold { player, amount } => {
            let mut remaining = 0;
            if let Some(budget) = s.participants.get_mut(&player) {
                *budget -= amount;
                remaining = *budget;
            }
            s.player_items
                .entry(player.clone())
                .or_default()
                .push(PurchasedItem { name: item.clone(), price: amount });
            let line = format!("'{item}' sold to {player} for {amount} credits.");
            s.log(Sender::System, format!("{line} {player}'s new budget: {remaining}."));
            line
        }
        Settlement::Unaffordable { player, amount } => {
            let line = format!("'{item}' went unsold: {player} cannot afford {amount} credits.");
            s.log(Sender::System, line.clone());
            line
        }
        Settlement::UnknownBuyer { player } => {
            let line = format!("'{item}' went unsold: {player} is not a participant.");
            s.log(Sender::System, line.clone());
            line
        }
        Settlement::NoBids => {
            let line = format!("'{item}' went unsold: no bids.");
            s.log(Sender::System, line.clone());
            line
        }
    };
    s.auction_history.push(summary.clone());

    s.current_item = None;
    s.current_bid = 0;
    s.high_bidder = None;

    match s.next_item().map(str::to_string) {
        None => {
            s.status = Status::GameOver;
            s.log(Sender::System, "All items auctioned! Game Over.");
            Ok(Step::Committed(format!("{summary} Game Over: all items auctioned.")))
        }
        Some(next) => {
            s.status = Status::WaitingForAuctionStart;
            s.log(
                Sender::System,
                format!("Next up: '{next}'. Type 'auction next' to open the bidding."),
            );
            Ok(Step::Committed(format!("{summary} Next item '{next}' is pending.")))
        }
    }
}

fn pass(s: &mut GameState, player: &str) -> Result<Step, ApplyError> {
    if !s.participants.contains_key(player) {
        return Err(unknown_player(s, player));
    }
    let Some(item) = s.current_item.clone() else {
        return Err(ApplyError::NoActiveAuction);
    };
    s.log(Sender::System, format!("{player} passes on '{item}'."));
    Ok(Step::Committed(format!("{player} passed.")))
}

fn shuffle_items<R: Rng + ?Sized>(s: &mut GameState, rng: &mut R) -> Result<Step, ApplyError> {
    if s.item_list.is_empty() {
        return Err(ApplyError::NothingToShuffle);
    }
    s.item_list.shuffle(rng);
    s.log(Sender::System, format!("Pending items shuffled: {}.", s.pending_items()));
    Ok(Step::Committed(format!("Shuffled {} items.", s.item_list.len())))
}
