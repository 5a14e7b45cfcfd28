use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::game::action::Action;
use crate::game::claims::ClaimResponse;
use crate::game::kong::KongHandler;
use crate::game::player::Player;
use crate::game::rules;
use crate::game::shanten::ShantenCalculator;
use crate::game::state::GameState;
use crate::tile::{Tile, WinChecker};

/// 动作回调 trait
///
/// 定义动作回调的标准接口
pub trait ActionCallback {
    /// 根据游戏状态返回座位的动作
    ///
    /// # 参数
    ///
    /// - `state`: 当前游戏状态
    /// - `seat`: 需要做决定的座位
    ///
    /// # 返回
    ///
    /// 座位选择的动作
    fn get_action(&mut self, state: &GameState, seat: u8) -> Action;
}

/// 函数式动作回调适配器
///
/// 将函数转换为 ActionCallback trait
pub struct FnActionCallback<F> {
    callback: F,
}

impl<F> FnActionCallback<F>
where
    F: FnMut(&GameState, u8) -> Action,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ActionCallback for FnActionCallback<F>
where
    F: FnMut(&GameState, u8) -> Action,
{
    fn get_action(&mut self, state: &GameState, seat: u8) -> Action {
        (self.callback)(state, seat)
    }
}

/// 本回合摸到的牌是否和牌
fn can_self_draw_win(checker: &mut WinChecker, player: &Player) -> bool {
    player.last_drawn.is_some() && checker.check_win_with_melds(&player.hand, player.melds.len()).is_win
}

/// 向听数贪心策略
///
/// - 能和就和（荣和、自摸）
/// - 不鸣牌
/// - 打出使向听数最小的牌，同分时随机
/// - 门清且打出后听牌时宣言立直
pub struct GreedyShantenCallback {
    rng: StdRng,
    shanten: ShantenCalculator,
    checker: WinChecker,
}

impl GreedyShantenCallback {
    /// 固定种子，便于复现
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            shanten: ShantenCalculator::new(),
            checker: WinChecker::new(),
        }
    }

    /// 打出后向听数最小的牌
    fn best_discard(&mut self, player: &Player) -> Option<Tile> {
        let mut best = Vec::new();
        let mut best_shanten = i32::MAX;
        for tile in player.hand.distinct_tiles() {
            let mut rest = player.hand.clone();
            rest.remove_tile(tile);
            let shanten = self.shanten.shanten(rest.counts());
            if shanten < best_shanten {
                best_shanten = shanten;
                best.clear();
            }
            if shanten == best_shanten {
                best.push(tile);
            }
        }
        best.choose(&mut self.rng).copied()
    }
}

impl ActionCallback for GreedyShantenCallback {
    fn get_action(&mut self, state: &GameState, seat: u8) -> Action {
        if let Some(pending) = state.pending_claims() {
            let can_win = pending.options_for(seat).is_some_and(|o| o.can_win);
            return Action::Claim(if can_win { ClaimResponse::Win } else { ClaimResponse::Pass });
        }

        let player = state.player_ref(seat);
        if can_self_draw_win(&mut self.checker, player) {
            return Action::SelfDrawWin;
        }
        if player.is_locked {
            if let Some(tile) = player.last_drawn {
                return Action::discard(tile);
            }
        }

        let Some(tile) = self.best_discard(player) else {
            return Action::SelfDrawWin;
        };
        let declare_lock = rules::check_lock_declaration(&mut self.checker, player, tile).is_ok();
        Action::Discard { tile, declare_lock }
    }
}

/// 随机合法动作策略（用于测试）
///
/// 从合法动作中随机选择，会吃碰杠、立直和暗杠，用来覆盖尽可能多的流程分支
pub struct RandomCallback {
    rng: StdRng,
    checker: WinChecker,
}

impl RandomCallback {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            checker: WinChecker::new(),
        }
    }
}

impl ActionCallback for RandomCallback {
    fn get_action(&mut self, state: &GameState, seat: u8) -> Action {
        if let Some(pending) = state.pending_claims() {
            let mut choices = vec![ClaimResponse::Pass];
            if let Some(options) = pending.options_for(seat) {
                if options.can_win {
                    choices.push(ClaimResponse::Win);
                }
                if options.can_triplet {
                    choices.push(ClaimResponse::Triplet);
                }
                if options.can_quad {
                    choices.push(ClaimResponse::Quad);
                }
                choices.extend(options.sequences.iter().map(|&with| ClaimResponse::Sequence { with }));
            }
            let response = choices.choose(&mut self.rng).copied().unwrap_or(ClaimResponse::Pass);
            return Action::Claim(response);
        }

        let player = state.player_ref(seat);
        if can_self_draw_win(&mut self.checker, player) {
            return Action::SelfDrawWin;
        }

        if self.rng.gen_bool(0.3) {
            let quads: Vec<Tile> = KongHandler::concealed_candidates(player)
                .into_iter()
                .filter(|&t| {
                    rules::check_closed_quad(&mut self.checker, player, t, state.wall.is_empty(), state.quads_formed)
                        .is_ok()
                })
                .collect();
            if let Some(&tile) = quads.choose(&mut self.rng) {
                return Action::ClosedQuad { tile };
            }
        }
        if player.is_locked {
            if let Some(tile) = player.last_drawn {
                return Action::discard(tile);
            }
        }

        let tiles = player.hand.distinct_tiles();
        let Some(&tile) = tiles.choose(&mut self.rng) else {
            return Action::SelfDrawWin;
        };
        let declare_lock =
            self.rng.gen_bool(0.5) && rules::check_lock_declaration(&mut self.checker, player, tile).is_ok();
        Action::Discard { tile, declare_lock }
    }
}
