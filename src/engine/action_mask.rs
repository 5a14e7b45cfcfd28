use crate::game::action::Action;
use crate::game::claims::{ClaimOptions, ClaimResponse};
use crate::game::kong::KongHandler;
use crate::game::ready::ReadyChecker;
use crate::game::rules;
use crate::game::state::{GameState, Phase};
use crate::tile::{Tile, WinChecker};

/// 打牌动作起始索引（34 种牌）
pub const DISCARD_BASE: usize = 0;
/// 立直打牌动作起始索引（34 种牌）
pub const LOCK_DISCARD_BASE: usize = 34;
/// 暗杠动作起始索引（34 种牌）
pub const CLOSED_QUAD_BASE: usize = 68;
/// 自摸
pub const SELF_DRAW_WIN: usize = 102;
/// 荣和
pub const CLAIM_WIN: usize = 103;
/// 碰
pub const CLAIM_TRIPLET: usize = 104;
/// 大明杠
pub const CLAIM_QUAD: usize = 105;
/// 吃：舍牌在顺子末位、中间、首位三种形状
pub const CLAIM_SEQUENCE_BASE: usize = 106;
/// 过
pub const PASS: usize = 109;
/// 动作空间大小
pub const ACTION_SPACE_SIZE: usize = 110;

/// 动作掩码
///
/// 一个座位在当前局面下的全部合法动作
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMask {
    /// 可以打出的牌（立直后只有刚摸到的牌）
    pub discards: Vec<Tile>,
    /// 打出后可以宣言立直的牌
    pub lock_discards: Vec<Tile>,
    /// 可以暗杠的牌
    pub closed_quads: Vec<Tile>,
    /// 是否可以自摸
    pub can_self_draw_win: bool,
    /// 鸣牌窗口中尚未响应时的可选鸣牌
    pub claim: Option<ClaimOptions>,
}

impl ActionMask {
    /// 生成动作掩码
    ///
    /// # 参数
    ///
    /// - `state`: 游戏状态
    /// - `seat`: 座位
    /// - `checker`: 和牌判定器（复用缓存）
    pub fn generate(state: &GameState, seat: u8, checker: &mut WinChecker) -> Self {
        let mut mask = ActionMask::default();
        if state.is_game_over || seat as usize >= state.players.len() {
            return mask;
        }
        let player = state.player_ref(seat);

        match &state.phase {
            Phase::AwaitingClaims(pending) => {
                if pending.response_of(seat).is_none() {
                    mask.claim = pending.options_for(seat).cloned();
                }
            }
            Phase::Discarding { seat: current } if *current == seat => {
                if player.is_locked {
                    mask.discards.extend(player.last_drawn);
                } else {
                    mask.discards = player.hand.distinct_tiles().into_vec();
                    if player.is_menzen() {
                        mask.lock_discards = ReadyChecker::discard_candidates(checker, &player.hand, &player.melds)
                            .into_iter()
                            .map(|(tile, _)| tile)
                            .collect();
                    }
                }
                mask.closed_quads = KongHandler::concealed_candidates(player)
                    .into_iter()
                    .filter(|&t| {
                        rules::check_closed_quad(checker, player, t, state.wall.is_empty(), state.quads_formed).is_ok()
                    })
                    .collect();
                mask.can_self_draw_win = player.last_drawn.is_some()
                    && checker.check_win_with_melds(&player.hand, player.melds.len()).is_win;
            }
            Phase::Discarding { .. } => {}
        }
        mask
    }

    /// 吃的形状编号：0 = 舍牌在末位，1 = 中间，2 = 首位
    pub fn sequence_shape(tile: Tile, with: [Tile; 2]) -> Option<usize> {
        let mut with = with;
        with.sort();
        [(-2, -1), (-1, 1), (1, 2)]
            .iter()
            .position(|&(low, high)| tile.offset(low) == Some(with[0]) && tile.offset(high) == Some(with[1]))
    }

    fn sequence_with(tile: Tile, shape: usize) -> Option<[Tile; 2]> {
        let (low, high) = [(-2, -1), (-1, 1), (1, 2)].get(shape).copied()?;
        Some([tile.offset(low)?, tile.offset(high)?])
    }

    /// 将动作掩码转换为布尔数组
    ///
    /// 动作空间定义：
    /// - 索引 0-33: 打牌
    /// - 索引 34-67: 打牌并立直
    /// - 索引 68-101: 暗杠
    /// - 索引 102: 自摸
    /// - 索引 103-105: 荣和、碰、大明杠
    /// - 索引 106-108: 吃（三种形状）
    /// - 索引 109: 过
    ///
    /// # 参数
    ///
    /// - `discarded_tile`: 鸣牌窗口中的舍牌（用于确定吃的形状）
    pub fn to_bool_array(&self, discarded_tile: Option<Tile>) -> [bool; ACTION_SPACE_SIZE] {
        let mut mask = [false; ACTION_SPACE_SIZE];
        for tile in &self.discards {
            mask[DISCARD_BASE + tile.to_index()] = true;
        }
        for tile in &self.lock_discards {
            mask[LOCK_DISCARD_BASE + tile.to_index()] = true;
        }
        for tile in &self.closed_quads {
            mask[CLOSED_QUAD_BASE + tile.to_index()] = true;
        }
        mask[SELF_DRAW_WIN] = self.can_self_draw_win;

        if let Some(options) = &self.claim {
            mask[CLAIM_WIN] = options.can_win;
            mask[CLAIM_TRIPLET] = options.can_triplet;
            mask[CLAIM_QUAD] = options.can_quad;
            if let Some(tile) = discarded_tile {
                for with in &options.sequences {
                    if let Some(shape) = Self::sequence_shape(tile, *with) {
                        mask[CLAIM_SEQUENCE_BASE + shape] = true;
                    }
                }
            }
            mask[PASS] = true;
        }
        mask
    }

    /// 从布尔数组验证动作是否合法
    pub fn is_action_legal(action_mask: &[bool; ACTION_SPACE_SIZE], action_index: usize) -> bool {
        action_mask.get(action_index).copied().unwrap_or(false)
    }

    /// 把动作索引还原为动作
    ///
    /// 鸣牌类索引需要鸣牌窗口中的舍牌；索引越界或形状不成立时返回 None
    pub fn to_action(action_index: usize, state: &GameState) -> Option<Action> {
        let claimed = state.pending_claims().map(|p| p.tile);
        match action_index {
            i if i < LOCK_DISCARD_BASE => Some(Action::discard(Tile::from_index(i - DISCARD_BASE)?)),
            i if i < CLOSED_QUAD_BASE => Some(Action::Discard {
                tile: Tile::from_index(i - LOCK_DISCARD_BASE)?,
                declare_lock: true,
            }),
            i if i < SELF_DRAW_WIN => Some(Action::ClosedQuad {
                tile: Tile::from_index(i - CLOSED_QUAD_BASE)?,
            }),
            SELF_DRAW_WIN => Some(Action::SelfDrawWin),
            CLAIM_WIN => Some(Action::Claim(ClaimResponse::Win)),
            CLAIM_TRIPLET => Some(Action::Claim(ClaimResponse::Triplet)),
            CLAIM_QUAD => Some(Action::Claim(ClaimResponse::Quad)),
            i if i < PASS => {
                let with = Self::sequence_with(claimed?, i - CLAIM_SEQUENCE_BASE)?;
                Some(Action::Claim(ClaimResponse::Sequence { with }))
            }
            PASS => Some(Action::Claim(ClaimResponse::Pass)),
            _ => None,
        }
    }
}
