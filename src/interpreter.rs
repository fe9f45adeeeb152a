//! Text command interpreter.
//!
//! Input is lower-cased and trimmed, then offered to [`RULES`] in order. The
//! first rule whose pattern parses *and* whose precondition holds for the
//! current state wins; later rules are never consulted. Rule patterns
//! overlap ("sell it" vs "sell ann 5"), so the order of `RULES` is part of
//! the observable behavior.
//!
//! A winning rule still performs local checks (known player, affordable
//! amount, existing item) and answers with [`Action::NoAction`] and an
//! explanatory narrative when they fail.

use crate::action::Action;
use crate::state::{same_name, title_case, GameState, Status};
use tracing::debug;

/// Narrative for the user plus the action to hand to the applier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Interpretation {
    pub narrative: String,
    pub action: Action,
    /// Name of the rule that matched, `None` when nothing did.
    pub rule: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    StartGame { players: Vec<String>, budget: Option<u64> },
    Add { items: Vec<String> },
    Shuffle,
    NoSale,
    SellTo { player: String, amount: u64 },
    SellIt,
    Auction { target: AuctionTarget },
    Bid { player: String, amount: Option<u64> },
    Pass { player: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AuctionTarget {
    Next,
    Named(String),
}

struct Rule {
    name: &'static str,
    parse: fn(&str) -> Option<Command>,
    applies: fn(&Command, &GameState) -> bool,
}

const RULES: [Rule; 9] = [
    Rule { name: "start_game", parse: parse_start_game, applies: awaiting_init },
    Rule { name: "add", parse: parse_add, applies: initialized },
    Rule { name: "shuffle", parse: parse_shuffle, applies: has_pending },
    Rule { name: "no_sale", parse: parse_no_sale, applies: under_hammer },
    Rule { name: "sell_to", parse: parse_sell_to, applies: under_hammer },
    Rule { name: "sell_it", parse: parse_sell_it, applies: under_hammer },
    Rule { name: "auction", parse: parse_auction, applies: auction_applies },
    Rule { name: "bid", parse: parse_bid, applies: bidding },
    Rule { name: "pass", parse: parse_pass, applies: under_hammer },
];

fn awaiting_init(_: &Command, s: &GameState) -> bool {
    s.status == Status::WaitingForInit
}

fn initialized(_: &Command, s: &GameState) -> bool {
    s.status != Status::WaitingForInit
}

fn has_pending(_: &Command, s: &GameState) -> bool {
    !s.item_list.is_empty()
}

fn under_hammer(_: &Command, s: &GameState) -> bool {
    s.current_item.is_some()
}

fn bidding(_: &Command, s: &GameState) -> bool {
    s.status == Status::Bidding
}

/// Rule names in evaluation order.
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|r| r.name)
}

pub fn interpret(text: &str, state: &GameState) -> Interpretation {
    let text = normalize(text);
    for rule in &RULES {
        let Some(cmd) = (rule.parse)(&text) else {
            continue;
        };
        if !(rule.applies)(&cmd, state) {
            debug!(rule = rule.name, "pattern matched but precondition failed");
            continue;
        }
        let (narrative, action) = resolve(cmd, state);
        debug!(rule = rule.name, kind = %action.kind(), "interpreted input");
        return Interpretation { narrative, action, rule: Some(rule.name) };
    }
    debug!(input = %text, "no rule matched");
    Interpretation {
        narrative: format!("I couldn't quite catch that. {}", hint(state)),
        action: Action::no_action("could not understand input"),
        rule: None,
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().trim_end_matches(['.', '!', '?']).trim().to_string()
}

fn parse_amount(token: &str) -> Option<u64> {
    token.trim_end_matches(',').parse().ok()
}

fn parse_start_game(text: &str) -> Option<Command> {
    let rest = text.strip_prefix("start game")?.trim_start();
    let rest = rest.strip_prefix("with").map(str::trim_start).unwrap_or(rest);
    let rest = rest
        .strip_prefix("players")
        .or_else(|| rest.strip_prefix("player"))?
        .trim_start_matches([':', ' ']);
    let (names, budget) = match rest.rfind("budget") {
        Some(idx) => {
            let budget = rest[idx + "budget".len()..]
                .trim_start_matches([':', ' '])
                .split_whitespace()
                .next()
                .and_then(parse_amount);
            (&rest[..idx], budget)
        }
        None => (rest, None),
    };
    let names = names.trim();
    let names = names.strip_suffix("with").unwrap_or(names);
    Some(Command::StartGame { players: split_names(names), budget })
}

fn split_names(names: &str) -> Vec<String> {
    let names = names.trim();
    let parts: Vec<&str> = if names.contains(',') || names.contains(" and ") {
        names.split(',').flat_map(|p| p.split(" and ")).collect()
    } else {
        names.split_whitespace().collect()
    };
    parts
        .into_iter()
        .map(|p| p.trim().strip_prefix("and ").unwrap_or(p.trim()))
        .filter(|p| !p.is_empty())
        .map(title_case)
        .collect()
}

fn parse_add(text: &str) -> Option<Command> {
    let rest = text.strip_prefix("add ")?.trim_start();
    let rest = ["items:", "items", "item:", "item"]
        .iter()
        .find_map(|p| rest.strip_prefix(p))
        .unwrap_or(rest);
    let items = rest
        .split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(title_case)
        .collect();
    Some(Command::Add { items })
}

fn parse_shuffle(text: &str) -> Option<Command> {
    (text == "shuffle" || text.starts_with("shuffle ")).then_some(Command::Shuffle)
}

fn parse_no_sale(text: &str) -> Option<Command> {
    text.starts_with("no sale").then_some(Command::NoSale)
}

fn parse_sell_to(text: &str) -> Option<Command> {
    let rest = text.strip_prefix("sell ")?;
    let mut tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.first() == Some(&"it") {
        tokens.remove(0);
    }
    if tokens.first() == Some(&"to") {
        tokens.remove(0);
    }
    let amount = parse_amount(tokens.pop()?)?;
    if tokens.last() == Some(&"for") {
        tokens.pop();
    }
    if tokens.is_empty() {
        return None;
    }
    Some(Command::SellTo { player: tokens.join(" "), amount })
}

fn parse_sell_it(text: &str) -> Option<Command> {
    matches!(text, "sell" | "sell it" | "sold" | "sold it").then_some(Command::SellIt)
}

fn parse_auction(text: &str) -> Option<Command> {
    let rest = ["start the auction", "start auction", "auction"]
        .iter()
        .find_map(|p| text.strip_prefix(p))?;
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let rest = rest.trim_start();
    let rest = rest.strip_prefix("for ").unwrap_or(rest).trim();
    let rest = rest.strip_prefix("the ").unwrap_or(rest).trim();
    let target = match rest {
        "" | "first" | "next" | "first item" | "next item" => AuctionTarget::Next,
        named => AuctionTarget::Named(named.to_string()),
    };
    Some(Command::Auction { target })
}

fn auction_applies(cmd: &Command, s: &GameState) -> bool {
    let Command::Auction { target } = cmd else {
        return false;
    };
    if s.item_list.is_empty() {
        return false;
    }
    match (target, s.current_item()) {
        (AuctionTarget::Named(name), Some(current)) => !same_name(current, name),
        _ => true,
    }
}

fn parse_bid(text: &str) -> Option<Command> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let idx = tokens.iter().position(|t| *t == "bid" || *t == "bids")?;
    if idx == 0 {
        return None;
    }
    let amount = tokens.get(idx + 1).and_then(|t| parse_amount(t));
    Some(Command::Bid { player: tokens[..idx].join(" "), amount })
}

fn parse_pass(text: &str) -> Option<Command> {
    let rest = text.strip_suffix(" passes").or_else(|| text.strip_suffix(" pass"))?;
    let player = rest.trim();
    (!player.is_empty()).then(|| Command::Pass { player: player.to_string() })
}

fn resolve(cmd: Command, s: &GameState) -> (String, Action) {
    match cmd {
        Command::StartGame { players, budget } => {
            if players.is_empty() {
                return refuse("Who's playing? Try 'start game players Ann, Bo budget 100'.");
            }
            let Some(budget) = budget else {
                return refuse("What's the starting budget? Try '... budget 100'.");
            };
            (
                format!(
                    "Welcome, {}! Each of you starts with {budget} credits. Let the bidding begin!",
                    and_list(&players)
                ),
                Action::InitGame { players, budget },
            )
        }
        Command::Add { items } => {
            if s.status == Status::GameOver {
                return refuse("The auction is over; there's nothing left to add items to.");
            }
            if items.is_empty() {
                return refuse("Add what? Try 'add Old Vase, Diamond Ring'.");
            }
            (
                format!("Excellent! We have {} ready for auction.", and_list(&items)),
                Action::AddItems { items },
            )
        }
        Command::Shuffle => (
            "Let's mix things up! The catalogue has been shuffled.".to_string(),
            Action::ShuffleItems,
        ),
        Command::NoSale => {
            let Some(item) = s.current_item() else {
                return refuse("There's nothing under the hammer.");
            };
            (format!("No sale! '{item}' goes unsold."), Action::no_sale(item))
        }
        Command::SellTo { player, amount } => {
            let Some(item) = s.current_item() else {
                return refuse("There's nothing under the hammer.");
            };
            let Some(buyer) = s.find_participant(&player) else {
                return refuse(format!(
                    "I don't see {} among our bidders: {}.",
                    title_case(&player),
                    s.participant_names()
                ));
            };
            if amount == 0 {
                return refuse("A sale needs a price of at least 1 credit.");
            }
            let budget = s.budget(buyer).unwrap_or(0);
            if budget < amount {
                return refuse(format!(
                    "{buyer} only has {budget} credits and can't pay {amount} for '{item}'."
                ));
            }
            (
                format!("Sold! '{item}' goes to {buyer} for {amount} credits!"),
                Action::sell(item, buyer, amount),
            )
        }
        Command::SellIt => {
            let Some(item) = s.current_item() else {
                return refuse("There's nothing under the hammer.");
            };
            match s.high_bidder() {
                Some(bidder) if s.current_bid > 0 => {
                    let left = s.budget(bidder).unwrap_or(0).saturating_sub(s.current_bid);
                    (
                        format!(
                            "Going once, going twice... Sold! '{item}' goes to {bidder} for {} credits! {bidder}'s new budget is {left}.",
                            s.current_bid
                        ),
                        Action::sell(item, bidder, s.current_bid),
                    )
                }
                _ => (format!("No bids on '{item}', so it goes unsold."), Action::no_sale(item)),
            }
        }
        Command::Auction { target } => {
            if let Some(current) = s.current_item() {
                return refuse(format!(
                    "'{current}' is still under the hammer. Say 'sell it' or 'no sale' first."
                ));
            }
            let item = match &target {
                AuctionTarget::Next => s.next_item(),
                AuctionTarget::Named(name) => s.find_pending_item(name),
            };
            let Some(item) = item else {
                let name = match target {
                    AuctionTarget::Named(name) => title_case(&name),
                    AuctionTarget::Next => String::new(),
                };
                return refuse(format!(
                    "There's no '{name}' in the catalogue. Available: {}.",
                    s.pending_items()
                ));
            };
            (
                format!(
                    "Our next item up for bid is the magnificent '{item}'! Who will start us off? Bids begin at 1 credit."
                ),
                Action::StartItemAuction { item: item.to_string() },
            )
        }
        Command::Bid { player, amount } => {
            let Some(bidder) = s.find_participant(&player) else {
                return refuse(format!(
                    "I don't see {} among our bidders: {}.",
                    title_case(&player),
                    s.participant_names()
                ));
            };
            let Some(amount) = amount else {
                return refuse(format!("How much does {bidder} bid?"));
            };
            if amount <= s.current_bid {
                return refuse(format!(
                    "{bidder}, the bid is {} already; the minimum is {}.",
                    s.current_bid,
                    s.current_bid.saturating_add(1)
                ));
            }
            let budget = s.budget(bidder).unwrap_or(0);
            if amount > budget {
                return refuse(format!(
                    "{bidder} only has {budget} credits and can't bid {amount}."
                ));
            }
            (
                format!(
                    "A bid of {amount} credits from {bidder}! The current high bid stands at {amount}. Any other contenders?"
                ),
                Action::Bid { player: bidder.to_string(), amount },
            )
        }
        Command::Pass { player } => {
            let Some(who) = s.find_participant(&player) else {
                return refuse(format!(
                    "I don't see {} among our bidders: {}.",
                    title_case(&player),
                    s.participant_names()
                ));
            };
            let item = s.current_item().unwrap_or_default();
            (format!("{who} passes on '{item}'."), Action::Pass { player: who.to_string() })
        }
    }
}

fn refuse(narrative: impl Into<String>) -> (String, Action) {
    let narrative = narrative.into();
    let action = Action::no_action(narrative.clone());
    (narrative, action)
}

/// What to type next, given the phase.
fn hint(s: &GameState) -> String {
    match s.status {
        Status::WaitingForInit => {
            "Start with 'start game players Ann, Bo budget 100'.".to_string()
        }
        Status::WaitingForItems => "Add items with 'add Old Vase, Diamond Ring'.".to_string(),
        Status::WaitingForAuctionStart => match s.next_item() {
            Some(item) => format!("Type 'auction next' to open the bidding on '{item}'."),
            None => "Add more items with 'add <names>'.".to_string(),
        },
        Status::Bidding => format!(
            "Bidding on '{}' stands at {}. Try '<player> bid <amount>', '<player> pass', 'sell it' or 'no sale'.",
            s.current_item().unwrap_or_default(),
            s.current_bid
        ),
        Status::GameOver => "The auction is over. Reset to play again.".to_string(),
    }
}

fn and_list(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}
