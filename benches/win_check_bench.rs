use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riichi_engine::tile::{parse_tiles, Hand, WinChecker};
use riichi_engine::ReadyChecker;

fn hand(s: &str) -> Hand {
    Hand::from_tiles(&parse_tiles(s).unwrap()).unwrap()
}

fn bench_win_check_normal(c: &mut Criterion) {
    // 基本和牌型
    let hand = hand("11234567899m123p");

    c.bench_function("win_check_normal", |b| {
        let mut checker = WinChecker::new();
        b.iter(|| {
            black_box(checker.check_win(black_box(&hand)));
        });
    });
}

fn bench_win_check_seven_pairs(c: &mut Criterion) {
    // 七对子
    let hand = hand("11223344556677m");

    c.bench_function("win_check_seven_pairs", |b| {
        let mut checker = WinChecker::new();
        b.iter(|| {
            black_box(checker.check_win(black_box(&hand)));
        });
    });
}

fn bench_wait_tiles(c: &mut Criterion) {
    // 九莲宝灯听九面
    let hand = hand("1112345678999m");

    c.bench_function("wait_tiles_nine_gates", |b| {
        let mut checker = WinChecker::new();
        b.iter(|| {
            black_box(ReadyChecker::check_ready_with(&mut checker, black_box(&hand), &[]));
        });
    });
}

criterion_group!(benches, bench_win_check_normal, bench_win_check_seven_pairs, bench_wait_tiles);
criterion_main!(benches);
