use crate::error::GameError;
use crate::game::claims::PendingClaims;
use crate::game::chow::ChowHandler;
use crate::game::constants::{MAX_QUADS_PER_HAND, NUM_PLAYERS, TOTAL_TILES};
use crate::game::kong::KongHandler;
use crate::game::player::Player;
use crate::game::pong::PongHandler;
use crate::tile::{Tile, Wall};

/// 风
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl Wind {
    pub fn from_index(index: u8) -> Wind {
        match index % 4 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            _ => Wind::North,
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// 下一个风（北之后回到东）
    pub fn next(&self) -> Wind {
        Wind::from_index(self.index() + 1)
    }

    /// 对应的字牌
    pub fn tile(&self) -> Tile {
        Tile::Honor(crate::tile::Honor::ALL[self.index() as usize])
    }
}

/// 对局阶段
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// 等待该座位打牌（或自摸、暗杠）
    Discarding { seat: u8 },
    /// 等待其他座位对舍牌的响应
    AwaitingClaims(PendingClaims),
}

/// 游戏状态
///
/// 可整体序列化，快照与恢复都基于它
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    /// 玩家（4 个座位）
    pub players: [Player; 4],
    /// 牌墙
    pub wall: Wall,
    /// 亲家座位
    pub dealer: u8,
    /// 场风
    pub round_wind: Wind,
    /// 本场数
    pub honba: u32,
    /// 当前阶段
    pub phase: Phase,
    /// 一发资格（立直宣言后到自己下一次打牌前，且无人鸣牌）
    pub first_turn_bonus: [bool; 4],
    /// 本局已形成的杠数
    pub quads_formed: u8,
    /// 已开始的局数
    pub hand_number: u32,
    /// 整场是否结束
    pub is_game_over: bool,
}

impl GameState {
    /// 创建新的游戏状态（尚未配牌）
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            players: [Player::new(0), Player::new(1), Player::new(2), Player::new(3)],
            wall: Wall::new(seed),
            dealer: 0,
            round_wind: Wind::East,
            honba: 0,
            phase: Phase::Discarding { seat: 0 },
            first_turn_bonus: [false; 4],
            quads_formed: 0,
            hand_number: 0,
            is_game_over: false,
        }
    }

    /// 下家座位
    pub fn next_seat(seat: u8) -> u8 {
        (seat + 1) % NUM_PLAYERS
    }

    /// 从 `from` 看 `to` 的座位距离（1 = 下家）
    pub fn seat_offset(from: u8, to: u8) -> u8 {
        (to + NUM_PLAYERS - from) % NUM_PLAYERS
    }

    /// 自风：亲家为东，按座位顺序依次为南、西、北
    pub fn seat_wind(&self, seat: u8) -> Wind {
        Wind::from_index(Self::seat_offset(self.dealer, seat))
    }

    /// 当前行动的座位（鸣牌窗口中为出牌者）
    pub fn current_seat(&self) -> u8 {
        match &self.phase {
            Phase::Discarding { seat } => *seat,
            Phase::AwaitingClaims(pending) => pending.discarder,
        }
    }

    /// 获取玩家（不可变引用）
    pub fn player_ref(&self, seat: u8) -> &Player {
        &self.players[seat as usize]
    }

    /// 获取玩家（可变引用）
    pub fn player_mut(&mut self, seat: u8) -> &mut Player {
        &mut self.players[seat as usize]
    }

    /// 当前鸣牌窗口
    pub fn pending_claims(&self) -> Option<&PendingClaims> {
        match &self.phase {
            Phase::AwaitingClaims(pending) => Some(pending),
            Phase::Discarding { .. } => None,
        }
    }

    /// 清除所有一发资格（任何鸣牌或暗杠都会打断）
    pub fn clear_first_turn_bonus(&mut self) {
        self.first_turn_bonus = [false; 4];
    }

    /// 牌的守恒计数：牌墙 + 王牌 + 手牌 + 副露 + 牌河
    ///
    /// 被鸣走的舍牌已计入鸣牌者的副露，不在牌河中重复计数
    pub fn conservation_count(&self) -> usize {
        self.wall.total_count() + self.players.iter().map(Player::visible_tile_count).sum::<usize>()
    }

    /// 检查状态一致性：座位编号、牌数守恒、手牌张数与阶段相符、鸣牌窗口与手牌相符
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |message: String| Err(GameError::Config { message });
        if self.dealer >= NUM_PLAYERS {
            return invalid(format!("dealer seat {} out of range", self.dealer));
        }
        if let Some((index, player)) = self.players.iter().enumerate().find(|(i, p)| p.seat as usize != *i) {
            return invalid(format!("player at index {} claims seat {}", index, player.seat));
        }
        if self.quads_formed > MAX_QUADS_PER_HAND {
            return invalid(format!("{} quads formed", self.quads_formed));
        }
        match &self.phase {
            Phase::Discarding { seat } if *seat >= NUM_PLAYERS => {
                return invalid(format!("acting seat {} out of range", seat));
            }
            Phase::Discarding { .. } => {}
            Phase::AwaitingClaims(pending) => self.validate_claim_window(pending)?,
        }

        let count = self.conservation_count();
        if count != TOTAL_TILES {
            return Err(GameError::Config {
                message: format!("tile count {} != {}", count, TOTAL_TILES),
            });
        }
        for player in &self.players {
            let expected = player.complete_hand_size();
            let size = player.hand.total_count();
            let is_acting = matches!(self.phase, Phase::Discarding { seat } if seat == player.seat);
            let ok = if is_acting { size == expected } else { size + 1 == expected };
            if !ok {
                return Err(GameError::Config {
                    message: format!("seat {} holds {} tiles with {} melds", player.seat, size, player.melds.len()),
                });
            }
        }
        Ok(())
    }

    /// 鸣牌窗口：出牌者的最后一张舍牌就是窗口中的牌，每个可选项都能用手牌完成
    fn validate_claim_window(&self, pending: &PendingClaims) -> Result<(), GameError> {
        let invalid = |message: String| Err(GameError::Config { message });
        let discarder = pending.discarder;
        if discarder >= NUM_PLAYERS {
            return invalid(format!("discarder seat {} out of range", discarder));
        }
        let last = self.player_ref(discarder).discards.last();
        if last.map(|r| (r.tile, r.claimed_by)) != Some((pending.tile, None)) {
            return invalid(format!("seat {} did not just discard {}", discarder, pending.tile));
        }
        for (i, e) in pending.eligible.iter().enumerate() {
            if e.seat >= NUM_PLAYERS || e.seat == discarder || e.offset != Self::seat_offset(discarder, e.seat) {
                return invalid(format!("claim window lists seat {} at offset {}", e.seat, e.offset));
            }
            if pending.eligible[..i].iter().any(|other| other.seat == e.seat) {
                return invalid(format!("claim window lists seat {} twice", e.seat));
            }
            let player = self.player_ref(e.seat);
            let tile = pending.tile;
            let held = (!e.options.can_triplet || PongHandler::can_pong(player, &tile))
                && (!e.options.can_quad || KongHandler::can_open_kong(player, &tile))
                && e.options.sequences.iter().all(|with| ChowHandler::sequences(player, &tile).contains(with));
            if !held {
                return invalid(format!("seat {} cannot form the offered claims on {}", e.seat, tile));
            }
        }
        Ok(())
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 恢复
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_cycle() {
        assert_eq!(Wind::East.next(), Wind::South);
        assert_eq!(Wind::North.next(), Wind::East);
        assert_eq!(Wind::West.tile(), Tile::Honor(crate::tile::Honor::West));
    }

    #[test]
    fn test_seat_wind_follows_dealer() {
        let mut state = GameState::new(None);
        state.dealer = 2;
        assert_eq!(state.seat_wind(2), Wind::East);
        assert_eq!(state.seat_wind(3), Wind::South);
        assert_eq!(state.seat_wind(0), Wind::West);
        assert_eq!(state.seat_wind(1), Wind::North);
    }

    #[test]
    fn test_seat_offset() {
        assert_eq!(GameState::seat_offset(3, 0), 1);
        assert_eq!(GameState::seat_offset(0, 3), 3);
        assert_eq!(GameState::next_seat(3), 0);
    }

    #[test]
    fn test_fresh_state_conserves_tiles() {
        let state = GameState::new(Some(1));
        assert_eq!(state.conservation_count(), TOTAL_TILES);
    }
}
