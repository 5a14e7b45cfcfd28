use log::debug;

use crate::game::constants::{INITIAL_HAND_SIZE, NUM_PLAYERS};
use crate::game::rules::{ExhaustiveDrawPolicy, GameRule};
use crate::game::state::{GameState, Phase, Wind};

/// 一局结束后的场况
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundProgress {
    /// 下一局的亲家
    pub dealer: u8,
    /// 下一局的场风
    pub round_wind: Wind,
    /// 下一局的本场数
    pub honba: u32,
    /// 整场是否结束
    pub game_over: bool,
}

/// 局的推进：配牌、连庄、下庄与场风
pub struct RoundController;

impl RoundController {
    /// 开始新的一局
    ///
    /// 洗牌并切出王牌，从亲家开始按座位顺序每人 13 张，亲家再多摸 1 张
    pub fn deal(state: &mut GameState) {
        state.wall.shuffle();
        for player in state.players.iter_mut() {
            player.reset_for_hand();
        }
        state.first_turn_bonus = [false; 4];
        state.quads_formed = 0;
        state.hand_number += 1;

        for _ in 0..INITIAL_HAND_SIZE {
            for offset in 0..NUM_PLAYERS {
                let seat = (state.dealer + offset) % NUM_PLAYERS;
                if let Some(tile) = state.wall.draw() {
                    state.players[seat as usize].hand.add_tile(tile);
                }
            }
        }
        let dealer = state.dealer as usize;
        if let Some(tile) = state.wall.draw() {
            state.players[dealer].hand.add_tile(tile);
            state.players[dealer].last_drawn = Some(tile);
        }
        state.phase = Phase::Discarding { seat: state.dealer };

        debug!(
            "hand {} dealt: dealer={} wind={:?} honba={} live={}",
            state.hand_number,
            state.dealer,
            state.round_wind,
            state.honba,
            state.wall.remaining_count()
        );
    }

    /// 和牌后的场况
    ///
    /// 亲家和牌连庄并加一本场；子家和牌则下庄、本场清零
    pub fn after_win(state: &GameState, winner: u8, rule: &GameRule) -> RoundProgress {
        if winner == state.dealer {
            return RoundProgress {
                dealer: state.dealer,
                round_wind: state.round_wind,
                honba: state.honba + 1,
                game_over: false,
            };
        }
        Self::rotate(state, 0, rule)
    }

    /// 荒牌流局后的场况，本场数总是加一
    ///
    /// # 参数
    ///
    /// - `dealer_tenpai`: 流局时亲家是否听牌
    pub fn after_exhaustive_draw(state: &GameState, dealer_tenpai: bool, rule: &GameRule) -> RoundProgress {
        let keeps = match rule.draw_policy {
            ExhaustiveDrawPolicy::DealerKeeps => true,
            ExhaustiveDrawPolicy::DealerKeepsIfTenpai => dealer_tenpai,
            ExhaustiveDrawPolicy::Rotate => false,
        };
        if keeps {
            RoundProgress {
                dealer: state.dealer,
                round_wind: state.round_wind,
                honba: state.honba + 1,
                game_over: false,
            }
        } else {
            Self::rotate(state, state.honba + 1, rule)
        }
    }

    /// 亲家移到下家；回到起家时场风前进，若已是最后的场风则整场结束
    fn rotate(state: &GameState, honba: u32, rule: &GameRule) -> RoundProgress {
        let dealer = (state.dealer + 1) % NUM_PLAYERS;
        let wraps = dealer == 0;
        RoundProgress {
            dealer,
            round_wind: if wraps { state.round_wind.next() } else { state.round_wind },
            honba,
            game_over: wraps && state.round_wind >= rule.last_round_wind,
        }
    }

    /// 写回场况
    pub fn apply(state: &mut GameState, progress: &RoundProgress) {
        state.dealer = progress.dealer;
        state.round_wind = progress.round_wind;
        state.honba = progress.honba;
        state.is_game_over = progress.game_over;
    }
}
