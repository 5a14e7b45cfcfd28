/// 可执行文件入口（用于测试和调试）
///
/// 用贪心策略跑一场带种子的东南战，打印每局结果

use riichi_engine::{GameEngine, GameRule, GreedyShantenCallback, HandOutcome, ReadyChecker, calculate_shanten};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(2024);
    println!("立直麻将引擎测试（种子 {}）", seed);

    let mut engine = GameEngine::new(GameRule::with_seed(seed));
    engine.start_game();
    for player in &engine.state.players {
        let tiles: Vec<String> = player.hand.to_sorted_vec().iter().map(|t| t.to_string()).collect();
        println!(
            "座位 {} 配牌：{}  向听 {}  听牌 {:?}",
            player.seat,
            tiles.join(" "),
            calculate_shanten(&player.hand),
            ReadyChecker::check_ready(&player.hand, &player.melds)
        );
    }

    let mut callback = GreedyShantenCallback::new(seed);
    let result = match engine.run(&mut callback) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("对局中断：{}", err);
            std::process::exit(1);
        }
    };

    for hand in &result.hands {
        match &hand.outcome {
            HandOutcome::Win(record) => println!(
                "第 {} 局：座位 {} {}和 {}，{} 点 {:?}",
                hand.hand_number,
                record.winner,
                if record.discarder.is_some() { "荣" } else { "自摸" },
                record.win_tile,
                record.value.points,
                record.value.bonus_list
            ),
            HandOutcome::ExhaustiveDraw { tenpai } => {
                println!("第 {} 局：荒牌流局，听牌 {:?}", hand.hand_number, tenpai)
            }
        }
    }
    println!("共 {} 局", result.hands.len());
}
