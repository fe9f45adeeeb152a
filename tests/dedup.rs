use auctioneer::action::Action;
use auctioneer::applier::apply;
use auctioneer::state::GameState;

fn bidding() -> GameState {
    let mut s = GameState::new();
    for action in [
        Action::InitGame { players: vec!["Ann".into(), "Bo".into()], budget: 100 },
        Action::AddItems { items: vec!["Vase".into(), "Ring".into()] },
        Action::StartItemAuction { item: "Vase".into() },
    ] {
        s = apply(&action, s).state;
    }
    s
}

#[test]
fn same_action_twice_is_skipped() {
    let s = bidding();
    let bid = Action::Bid { player: "Ann".into(), amount: 5 };
    let first = apply(&bid, s);
    assert!(first.changed);
    let second = apply(&bid, first.state.clone());
    assert!(!second.changed);
    assert_eq!(second.message, "duplicate action skipped");
    assert_eq!(second.state, first.state);
}

#[test]
fn add_items_twice_is_skipped() {
    let s = apply(&Action::InitGame { players: vec!["Ann".into()], budget: 1 }, GameState::new()).state;
    let add = Action::AddItems { items: vec!["Vase".into()] };
    let s = apply(&add, s).state;
    let out = apply(&add, s);
    assert!(!out.changed);
    assert_eq!(out.state.item_list, vec!["Vase".to_string()]);
}

#[test]
fn pass_is_never_a_duplicate() {
    let s = bidding();
    let pass = Action::Pass { player: "Bo".into() };
    let first = apply(&pass, s);
    assert!(first.changed);
    let second = apply(&pass, first.state);
    assert!(second.changed, "{}", second.message);
}

#[test]
fn no_action_is_never_a_duplicate_and_never_commits() {
    let s = bidding();
    let nothing = Action::no_action("could not understand input");
    let first = apply(&nothing, s.clone());
    let second = apply(&nothing, first.state);
    assert!(!second.changed);
    assert_eq!(second.message, "no action: could not understand input");
    assert_eq!(second.state, s);
}

#[test]
fn rejected_action_does_not_move_the_fingerprint() {
    let s = bidding();
    let bid = Action::Bid { player: "Ann".into(), amount: 5 };
    let s = apply(&bid, s).state;
    let rejected = apply(&Action::Bid { player: "Bo".into(), amount: 2 }, s);
    assert!(!rejected.changed);
    let again = apply(&bid, rejected.state);
    assert_eq!(again.message, "duplicate action skipped");
}

#[test]
fn an_intervening_action_clears_the_guard() {
    let s = bidding();
    let pass = Action::Pass { player: "Bo".into() };
    let s = apply(&Action::Bid { player: "Ann".into(), amount: 5 }, s).state;
    let s = apply(&pass, s).state;
    // Same bid again is now judged on its merits.
    let out = apply(&Action::Bid { player: "Ann".into(), amount: 5 }, s);
    assert!(!out.changed);
    assert!(out.message.contains("Minimum bid is 6"), "{}", out.message);
}

#[test]
fn key_depends_on_values_not_field_order() {
    let a = Action::sell("Vase", "Ann", 5);
    let b = Action::from_json(r#"{"amount": 5, "player": "Ann", "type": "sell_item", "item": "Vase"}"#);
    assert_eq!(a.key(), b.key());
    assert_ne!(a.key(), Action::sell("Vase", "Ann", 6).key());
    assert_ne!(a.key(), Action::sell("Vase", "Bo", 5).key());
}
