use riichi_engine::{
    parse_tiles, ActionResult, DiscardRecord, GameEngine, GameRule, Hand, Honor, Phase, Tile, Wall,
};

const SOUTH: Tile = Tile::Honor(Honor::South);
const OTHERS: &str = "147m258p369s1357z";

fn engine_with(hands: [&str; 4], acting: u8, draws: &str) -> GameEngine {
    let mut engine = GameEngine::new(GameRule::default());
    let mut live = parse_tiles(draws).unwrap();
    live.reverse();
    let dead = parse_tiles("1234567z1234567z").unwrap()[..14].to_vec();
    engine.state.wall = Wall::from_parts(live, dead);
    for (seat, hand) in hands.iter().enumerate() {
        engine.state.players[seat].hand = Hand::from_tiles(&parse_tiles(hand).unwrap()).unwrap();
    }
    engine.state.phase = Phase::Discarding { seat: acting };
    engine.state.hand_number = 1;
    engine
}

/// 0 号位单骑 2z，1 号位准备打出 2z
fn south_wait(discarded: Option<DiscardRecord>) -> GameEngine {
    let mut engine = engine_with(["123m456p789s111z2z", "147m258p369s23456z", OTHERS, OTHERS], 1, "9m");
    if let Some(record) = discarded {
        engine.state.players[0].discards.push(record);
    }
    engine
}

#[test]
fn test_ron_allowed_without_furiten() {
    let mut engine = south_wait(None);
    assert!(engine.legal_claims(0, SOUTH).unwrap().can_win);

    let result = engine.submit_discard(1, SOUTH, false).unwrap();
    assert!(matches!(
        result,
        ActionResult::AwaitingClaims { discarder: 1, tile: SOUTH, ref eligible } if eligible.as_slice() == [0]
    ));
}

#[test]
fn test_own_discard_blocks_ron() {
    let mut engine = south_wait(Some(DiscardRecord::new(SOUTH)));
    assert!(!engine.legal_claims(0, SOUTH).unwrap().can_win);

    // 无人可以鸣牌，直接轮到 2 号位摸牌
    let result = engine.submit_discard(1, SOUTH, false).unwrap();
    assert_eq!(result, ActionResult::NextTurn { seat: 2, drawn: Some(Tile::Man(9)) });
}

#[test]
fn test_claimed_discard_still_counts() {
    let mut record = DiscardRecord::new(SOUTH);
    record.claimed_by = Some(3);
    let mut engine = south_wait(Some(record));
    assert!(!engine.legal_claims(0, SOUTH).unwrap().can_win);
}

#[test]
fn test_furiten_covers_every_wait() {
    // 两面听 1m/4m，打过 4m 后 1m 也不能荣和
    let mut engine = engine_with(["23m456p789s11122z", "1147m258p369s3456z", OTHERS, OTHERS], 1, "9m");
    assert_eq!(engine.wait_set(0).unwrap(), vec![Tile::Man(1), Tile::Man(4)]);
    engine.state.players[0].discards.push(DiscardRecord::new(Tile::Man(4)));

    let result = engine.submit_discard(1, Tile::Man(1), false).unwrap();
    assert_eq!(result, ActionResult::NextTurn { seat: 2, drawn: Some(Tile::Man(9)) });
}

#[test]
fn test_furiten_seat_may_still_self_draw() {
    let mut engine = engine_with(["123m456p789s111z2z", OTHERS, OTHERS, "147m258p369s13567z"], 3, "2z");
    engine.state.players[0].discards.push(DiscardRecord::new(SOUTH));

    let result = engine.submit_discard(3, Tile::Honor(Honor::Red), false).unwrap();
    assert_eq!(result, ActionResult::NextTurn { seat: 0, drawn: Some(SOUTH) });
    assert!(engine.action_mask(0).can_self_draw_win);
    assert!(matches!(engine.declare_self_draw_win(0).unwrap(), ActionResult::HandEnded(_)));
}

#[test]
fn test_wait_set_of_fourteen_tiles_is_union() {
    let mut engine = engine_with(["123m456p789s111z2z5s", OTHERS, OTHERS, OTHERS], 0, "9m");
    assert_eq!(engine.wait_set(0).unwrap(), vec![Tile::Sou(5), SOUTH]);
    // 不听牌的座位
    assert!(engine.wait_set(1).unwrap().is_empty());
}
