use crate::game::claims::ClaimKind;
use crate::game::state::Wind;
use crate::tile::Tile;

/// 对局事件
///
/// 引擎按发生顺序记录，调用方通过 `GameEngine::take_events` 取走
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameEvent {
    /// 新的一局配牌完成
    HandStarted {
        hand_number: u32,
        dealer: u8,
        round_wind: Wind,
        honba: u32,
        indicator: Option<Tile>,
    },
    /// 摸牌
    Drew { seat: u8, tile: Tile },
    /// 打牌（`is_auto` 为立直后的自动摸切）
    Discarded {
        seat: u8,
        tile: Tile,
        is_auto: bool,
        declare_lock: bool,
    },
    /// 立直成立
    LockDeclared { seat: u8, waits: Vec<Tile> },
    /// 吃、碰、大明杠
    Claimed {
        seat: u8,
        from: u8,
        tile: Tile,
        kind: ClaimKind,
    },
    /// 暗杠
    ClosedQuad { seat: u8, tile: Tile },
    /// 杠后翻开新的宝牌指示牌
    IndicatorRevealed { tile: Tile },
    /// 和牌
    Won {
        winner: u8,
        from: Option<u8>,
        tile: Tile,
        points: u32,
    },
    /// 荒牌流局
    ExhaustiveDraw { tenpai: Vec<u8> },
    /// 整场结束
    GameOver,
}
