use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::constants::MAX_QUADS_PER_HAND;
use crate::game::kong::KongHandler;
use crate::game::meld::Meld;
use crate::game::player::{DiscardRecord, Player};
use crate::game::ready::ReadyChecker;
use crate::game::state::Wind;
use crate::tile::{Tile, WinChecker};

/// 荒牌流局后的亲家处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExhaustiveDrawPolicy {
    /// 亲家连庄
    #[default]
    DealerKeeps,
    /// 亲家听牌时连庄，否则下庄
    DealerKeepsIfTenpai,
    /// 总是下庄
    Rotate,
}

/// 对局规则配置
///
/// 所有字段都有默认值，JSON 中省略的字段取默认
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRule {
    /// 整场种子；None 时每局使用系统熵洗牌
    pub seed: Option<u64>,
    /// 荒牌流局后的亲家处理
    pub draw_policy: ExhaustiveDrawPolicy,
    /// 该场风结束（亲家轮转一周回到起家）后整场结束
    pub last_round_wind: Wind,
    /// 活牌墙摸空后的最后一张舍牌是否还能吃碰
    pub allow_claims_on_last_tile: bool,
}

impl Default for GameRule {
    fn default() -> Self {
        Self {
            seed: None,
            draw_policy: ExhaustiveDrawPolicy::DealerKeeps,
            last_round_wind: Wind::South,
            allow_claims_on_last_tile: false,
        }
    }
}

impl GameRule {
    /// 带种子的默认规则
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// 从 JSON 读取规则
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// 检查振听
///
/// 自己的舍牌（包括被鸣走的）中有任何一张在听牌集合里即为振听
///
/// # 参数
///
/// - `discards`: 该玩家的全部舍牌记录
/// - `waits`: 该玩家当前的听牌集合
///
/// # 返回
///
/// `true` 表示振听，不能荣和
pub fn is_furiten(discards: &[DiscardRecord], waits: &[Tile]) -> bool {
    discards.iter().any(|record| waits.contains(&record.tile))
}

/// 检查立直宣言
///
/// 条件：尚未立直、门清（暗杠不算副露）、打出 `discard` 后听牌
///
/// # 返回
///
/// 打出后的听牌集合，立直后固定使用
pub fn check_lock_declaration(checker: &mut WinChecker, player: &Player, discard: Tile) -> Result<Vec<Tile>, GameError> {
    if player.is_locked {
        return Err(GameError::IllegalDeclaration { reason: "already declared" });
    }
    if !player.is_menzen() {
        return Err(GameError::IllegalDeclaration { reason: "cannot declare after calling melds" });
    }
    let mut rest = player.hand.clone();
    if !rest.remove_tile(discard) {
        return Err(GameError::TileNotInHand { tile: discard });
    }
    let waits = ReadyChecker::check_ready_with(checker, &rest, &player.melds);
    if waits.is_empty() {
        return Err(GameError::IllegalDeclaration { reason: "hand is not tenpai after this discard" });
    }
    Ok(waits)
}

/// 检查暗杠
///
/// 条件：手中四张、还有岭上牌可摸、本局杠数未满。
/// 立直中只能杠刚摸到的牌，且杠后听牌集合不变。
pub fn check_closed_quad(
    checker: &mut WinChecker,
    player: &Player,
    tile: Tile,
    wall_is_empty: bool,
    quads_formed: u8,
) -> Result<(), GameError> {
    if !KongHandler::can_concealed_kong(player, &tile) {
        return Err(GameError::IllegalDeclaration { reason: "closed quad needs four copies in hand" });
    }
    if wall_is_empty {
        return Err(GameError::IllegalDeclaration { reason: "no replacement tile left" });
    }
    if quads_formed >= MAX_QUADS_PER_HAND {
        return Err(GameError::IllegalDeclaration { reason: "quad limit reached" });
    }
    if player.is_locked {
        if player.last_drawn != Some(tile) {
            return Err(GameError::IllegalDeclaration { reason: "locked hand may only quad the drawn tile" });
        }
        let mut rest = player.hand.clone();
        rest.remove_n(tile, 4);
        let mut melds = player.melds.clone();
        melds.push(Meld::Quad { tile, from: None });
        if ReadyChecker::check_ready_with(checker, &rest, &melds) != player.locked_waits {
            return Err(GameError::IllegalDeclaration { reason: "quad would change the locked waits" });
        }
    }
    Ok(())
}
