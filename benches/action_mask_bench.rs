use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riichi_engine::engine::action_mask::ActionMask;
use riichi_engine::{GameEngine, GameRule, WinChecker};

fn bench_action_mask_generate(c: &mut Criterion) {
    let mut engine = GameEngine::new(GameRule::with_seed(2024));
    engine.start_game();
    let state = engine.snapshot();
    let dealer = state.dealer;

    c.bench_function("action_mask_generate", |b| {
        let mut checker = WinChecker::new();
        b.iter(|| {
            let mask = ActionMask::generate(black_box(&state), dealer, &mut checker);
            black_box(mask.to_bool_array(None));
        });
    });
}

criterion_group!(benches, bench_action_mask_generate);
criterion_main!(benches);
