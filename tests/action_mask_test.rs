use riichi_engine::engine::action_mask::{ActionMask, ACTION_SPACE_SIZE, PASS};
use riichi_engine::{ExhaustiveDrawPolicy, GameEngine, GameRule, GameState, RandomCallback, Wind};

fn rule(seed: u64) -> GameRule {
    GameRule {
        seed: Some(seed),
        draw_policy: ExhaustiveDrawPolicy::Rotate,
        last_round_wind: Wind::East,
        ..GameRule::default()
    }
}

/// 在局面副本上试执行一个动作索引
fn try_index(rule: GameRule, state: &GameState, seat: u8, index: usize) -> Option<bool> {
    let action = ActionMask::to_action(index, state)?;
    let mut trial = GameEngine::new(rule);
    trial.restore(state.clone()).ok()?;
    Some(trial.process_action(seat, action).is_ok())
}

#[test]
fn test_mask_matches_engine() {
    let rule = rule(31);
    let mut engine = GameEngine::new(rule);
    engine.start_game();
    let mut callback = RandomCallback::new(31);

    for _ in 0..150 {
        if engine.is_game_over() {
            break;
        }
        let state = engine.snapshot();
        let tile = state.pending_claims().map(|p| p.tile);
        let acting = engine.acting_seat().unwrap();

        for seat in 0..4u8 {
            let bools = engine.action_mask(seat).to_bool_array(tile);
            for index in 0..ACTION_SPACE_SIZE {
                if !bools[index] && seat != acting {
                    continue;
                }
                if let Some(accepted) = try_index(rule, &state, seat, index) {
                    assert_eq!(accepted, bools[index], "seat {} index {} in {:?}", seat, index, state.phase);
                }
            }
        }
        // 行动者至少有一个合法动作
        assert!(engine.action_mask(acting).to_bool_array(tile).iter().any(|&b| b));

        engine.step(&mut callback).unwrap();
    }
}

#[test]
fn test_claim_window_always_offers_pass() {
    let rule = rule(77);
    let mut engine = GameEngine::new(rule);
    engine.start_game();
    let mut callback = RandomCallback::new(77);

    for _ in 0..2_000 {
        if engine.is_game_over() {
            break;
        }
        if let Some(pending) = engine.state.pending_claims().cloned() {
            for seat in pending.undecided() {
                let mask = engine.action_mask(seat);
                assert!(mask.claim.is_some());
                assert!(mask.discards.is_empty());
                assert!(ActionMask::is_action_legal(&mask.to_bool_array(Some(pending.tile)), PASS));
            }
        }
        engine.step(&mut callback).unwrap();
    }
}
