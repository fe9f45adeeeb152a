use auctioneer::action::Action;
use auctioneer::applier::apply;
use auctioneer::interpreter::{interpret, rule_names};
use auctioneer::state::GameState;

fn drive(actions: &[Action]) -> GameState {
    let mut s = GameState::new();
    for action in actions {
        let out = apply(action, s);
        assert!(out.changed, "{}", out.message);
        s = out.state;
    }
    s
}

fn catalogue() -> GameState {
    drive(&[
        Action::InitGame { players: vec!["Ann".into(), "Bo".into()], budget: 100 },
        Action::AddItems { items: vec!["Vase".into(), "Ring".into()] },
    ])
}

fn bidding_on_vase() -> GameState {
    let s = catalogue();
    drive_from(s, &[Action::StartItemAuction { item: "Vase".into() }])
}

fn drive_from(mut s: GameState, actions: &[Action]) -> GameState {
    for action in actions {
        s = apply(action, s).state;
    }
    s
}

#[test]
fn rules_are_evaluated_in_a_fixed_order() {
    let names: Vec<&str> = rule_names().collect();
    assert_eq!(
        names,
        ["start_game", "add", "shuffle", "no_sale", "sell_to", "sell_it", "auction", "bid", "pass"]
    );
}

#[test]
fn start_game_builds_init() {
    let i = interpret("Start game players Ann, Bo budget 100", &GameState::new());
    assert_eq!(i.rule, Some("start_game"));
    assert_eq!(i.action, Action::InitGame { players: vec!["Ann".into(), "Bo".into()], budget: 100 });
    assert!(i.narrative.contains("Ann and Bo"), "{}", i.narrative);
}

#[test]
fn start_game_without_budget_asks_for_one() {
    let i = interpret("start game players ann", &GameState::new());
    assert_eq!(i.rule, Some("start_game"));
    assert!(matches!(i.action, Action::NoAction { .. }));
    assert!(i.narrative.contains("starting budget"), "{}", i.narrative);
}

#[test]
fn start_game_only_applies_before_init() {
    let i = interpret("start game players cy budget 5", &catalogue());
    assert_eq!(i.rule, None);
}

#[test]
fn add_needs_an_initialized_game() {
    let i = interpret("add old vase", &GameState::new());
    assert_eq!(i.rule, None);
    assert!(i.narrative.starts_with("I couldn't quite catch that."), "{}", i.narrative);
    assert_eq!(i.action, Action::no_action("could not understand input"));

    let i = interpret("add old vase, diamond ring", &catalogue());
    assert_eq!(i.action, Action::AddItems { items: vec!["Old Vase".into(), "Diamond Ring".into()] });
}

#[test]
fn shuffle_needs_pending_items() {
    assert_eq!(interpret("shuffle", &catalogue()).action, Action::ShuffleItems);
    let empty = drive(&[Action::InitGame { players: vec!["Ann".into()], budget: 1 }]);
    assert_eq!(interpret("shuffle", &empty).rule, None);
}

#[test]
fn sell_to_wins_over_sell_it() {
    let s = bidding_on_vase();
    let i = interpret("sell it to ann for 5", &s);
    assert_eq!(i.rule, Some("sell_to"));
    assert_eq!(i.action, Action::sell("Vase", "Ann", 5));
}

#[test]
fn sell_to_checks_buyer_and_budget() {
    let s = bidding_on_vase();
    let i = interpret("sell zed 5", &s);
    assert_eq!(i.rule, Some("sell_to"));
    assert!(matches!(i.action, Action::NoAction { .. }));
    assert!(i.narrative.contains("Ann, Bo"), "{}", i.narrative);

    let i = interpret("sell bo 101", &s);
    assert!(matches!(i.action, Action::NoAction { .. }));
    assert!(i.narrative.contains("only has 100 credits"), "{}", i.narrative);
}

#[test]
fn sell_it_sells_to_the_high_bidder() {
    let s = drive_from(bidding_on_vase(), &[Action::Bid { player: "Bo".into(), amount: 7 }]);
    let i = interpret("Sold!", &s);
    assert_eq!(i.rule, Some("sell_it"));
    assert_eq!(i.action, Action::sell("Vase", "Bo", 7));
    assert!(i.narrative.contains("new budget is 93"), "{}", i.narrative);
}

#[test]
fn sell_it_without_bids_is_a_no_sale() {
    let i = interpret("sell it", &bidding_on_vase());
    assert_eq!(i.action, Action::no_sale("Vase"));
}

#[test]
fn no_sale_needs_an_item_under_the_hammer() {
    assert_eq!(interpret("no sale", &bidding_on_vase()).action, Action::no_sale("Vase"));
    assert_eq!(interpret("no sale", &catalogue()).rule, None);
}

#[test]
fn auction_resolves_names_case_insensitively() {
    let s = catalogue();
    assert_eq!(
        interpret("auction next", &s).action,
        Action::StartItemAuction { item: "Vase".into() }
    );
    assert_eq!(
        interpret("start auction for RING", &s).action,
        Action::StartItemAuction { item: "Ring".into() }
    );
    let i = interpret("auction lamp", &s);
    assert_eq!(i.rule, Some("auction"));
    assert!(matches!(i.action, Action::NoAction { .. }));
    assert!(i.narrative.contains("Available: Vase, Ring"), "{}", i.narrative);
}

#[test]
fn auction_of_another_item_mid_bidding_is_refused() {
    let i = interpret("auction ring", &bidding_on_vase());
    assert_eq!(i.rule, Some("auction"));
    assert!(i.narrative.contains("'Vase' is still under the hammer"), "{}", i.narrative);
    assert!(matches!(i.action, Action::NoAction { .. }));
}

#[test]
fn auction_of_the_current_item_falls_through() {
    let i = interpret("auction vase", &bidding_on_vase());
    assert_eq!(i.rule, None);
    assert!(i.narrative.contains("Bidding on 'Vase' stands at 0"), "{}", i.narrative);
}

#[test]
fn bid_resolves_the_stored_spelling() {
    let i = interpret("ann bids 5", &bidding_on_vase());
    assert_eq!(i.rule, Some("bid"));
    assert_eq!(i.action, Action::Bid { player: "Ann".into(), amount: 5 });
}

#[test]
fn bid_local_checks_explain_themselves() {
    let s = drive_from(bidding_on_vase(), &[Action::Bid { player: "Ann".into(), amount: 10 }]);
    let cases = [
        ("zed bid 20", "don't see Zed"),
        ("bo bid", "How much does Bo bid?"),
        ("bo bid 10", "the minimum is 11"),
        ("bo bid 500", "only has 100 credits"),
    ];
    for (text, expected) in cases {
        let i = interpret(text, &s);
        assert_eq!(i.rule, Some("bid"), "{text}");
        assert!(matches!(i.action, Action::NoAction { .. }), "{text}");
        assert!(i.narrative.contains(expected), "{text}: {}", i.narrative);
    }
}

#[test]
fn bid_outside_bidding_is_not_understood() {
    let i = interpret("ann bid 5", &catalogue());
    assert_eq!(i.rule, None);
    assert!(i.narrative.contains("auction next"), "{}", i.narrative);
}

#[test]
fn pass_names_a_participant() {
    let s = bidding_on_vase();
    assert_eq!(interpret("Bo passes.", &s).action, Action::Pass { player: "Bo".into() });
    assert_eq!(interpret("bo pass", &catalogue()).rule, None);
}

#[test]
fn interpreting_never_changes_the_state() {
    let s = bidding_on_vase();
    let before = s.clone();
    for text in ["ann bid 5", "sell it", "no sale", "gibberish", "", "shuffle"] {
        let _ = interpret(text, &s);
    }
    assert_eq!(s, before);
}

#[test]
fn accented_names_resolve_to_the_stored_spelling() {
    let s = drive(&[
        Action::InitGame { players: vec!["Åsa".into(), "Bo".into()], budget: 100 },
        Action::AddItems { items: vec!["éclair".into(), "vase".into()] },
    ]);
    assert_eq!(
        interpret("auction éclair", &s).action,
        Action::StartItemAuction { item: "Éclair".into() }
    );

    let s = drive_from(s, &[Action::StartItemAuction { item: "Éclair".into() }]);
    assert_eq!(interpret("Åsa bid 5", &s).action, Action::Bid { player: "Åsa".into(), amount: 5 });
    assert_eq!(interpret("ÅSA passes", &s).action, Action::Pass { player: "Åsa".into() });
    assert_eq!(interpret("sell åsa 7", &s).action, Action::sell("Éclair", "Åsa", 7));
    // Naming the item already under the hammer is not a new auction.
    assert_eq!(interpret("auction ÉCLAIR", &s).rule, None);
}

#[test]
fn minimum_bid_at_the_top_of_the_range_does_not_overflow() {
    let s = drive(&[
        Action::InitGame { players: vec!["Ann".into(), "Bo".into()], budget: u64::MAX },
        Action::AddItems { items: vec!["Vase".into()] },
        Action::StartItemAuction { item: "Vase".into() },
        Action::Bid { player: "Ann".into(), amount: u64::MAX },
    ]);
    let i = interpret("bo bid 1", &s);
    assert!(matches!(i.action, Action::NoAction { .. }));
    assert!(i.narrative.contains(&format!("the minimum is {}", u64::MAX)), "{}", i.narrative);
}
