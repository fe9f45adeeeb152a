use std::hint::black_box;

use auctioneer::action::Action;
use auctioneer::applier::apply_with_rng;
use auctioneer::interpreter::interpret;
use auctioneer::session::Session;
use auctioneer::state::GameState;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bidding_state() -> GameState {
    let mut session = Session::with_seed(1);
    session.chat("start game players Ann, Bo, Cy budget 1000");
    session.chat("add Old Vase, Diamond Ring, Lamp, Clock, Rug");
    session.chat("auction next");
    session.chat("Ann bid 10");
    session.into_state()
}

fn bench_interpret(c: &mut Criterion) {
    let state = bidding_state();
    let mut g = c.benchmark_group("interpret");
    for input in ["Bo bids 25", "sell it", "sell cy for 30", "what is going on"] {
        g.bench_with_input(BenchmarkId::new("bidding", input), &input, |b, text| {
            b.iter(|| interpret(black_box(text), black_box(&state)))
        });
    }
    g.finish();
}

fn bench_apply(c: &mut Criterion) {
    let state = bidding_state();
    let bid = Action::Bid { player: "Bo".into(), amount: 25 };
    let low = Action::Bid { player: "Bo".into(), amount: 5 };
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut g = c.benchmark_group("apply");
    g.bench_function("accepted_bid", |b| {
        b.iter(|| apply_with_rng(black_box(&bid), state.clone(), &mut rng))
    });
    g.bench_function("rejected_bid", |b| {
        b.iter(|| apply_with_rng(black_box(&low), state.clone(), &mut rng))
    });
    g.bench_function("shuffle", |b| {
        b.iter(|| apply_with_rng(black_box(&Action::ShuffleItems), state.clone(), &mut rng))
    });
    g.finish();
}

criterion_group!(benches, bench_interpret, bench_apply);
criterion_main!(benches);
