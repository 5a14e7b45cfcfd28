use smallvec::SmallVec;

use crate::error::GameError;
use crate::game::chow::ChowHandler;
use crate::game::kong::KongHandler;
use crate::game::player::Player;
use crate::game::pong::PongHandler;
use crate::game::ready::ReadyChecker;
use crate::tile::{Tile, WinChecker};

/// 鸣牌优先级：荣和 > 碰/大明杠 > 吃
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimTier {
    Sequence = 1,
    Exposing = 2,
    Win = 3,
}

/// 鸣牌种类（用于事件记录）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ClaimKind {
    Win,
    Triplet,
    Quad,
    Sequence,
}

/// 某个座位对一张舍牌可以做出的鸣牌
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClaimOptions {
    /// 荣和
    pub can_win: bool,
    /// 碰
    pub can_triplet: bool,
    /// 大明杠
    pub can_quad: bool,
    /// 吃：手中拿出的两张牌
    pub sequences: SmallVec<[[Tile; 2]; 3]>,
}

impl ClaimOptions {
    /// 是否有任何可选的鸣牌
    pub fn any(&self) -> bool {
        self.can_win || self.can_triplet || self.can_quad || !self.sequences.is_empty()
    }

    /// 能做出的最高优先级
    pub fn best_tier(&self) -> Option<ClaimTier> {
        if self.can_win {
            Some(ClaimTier::Win)
        } else if self.can_triplet || self.can_quad {
            Some(ClaimTier::Exposing)
        } else if !self.sequences.is_empty() {
            Some(ClaimTier::Sequence)
        } else {
            None
        }
    }

    /// 检查响应是否在可选项之内
    pub fn permits(&self, response: &ClaimResponse) -> bool {
        match response {
            ClaimResponse::Pass => true,
            ClaimResponse::Win => self.can_win,
            ClaimResponse::Triplet => self.can_triplet,
            ClaimResponse::Quad => self.can_quad,
            ClaimResponse::Sequence { with } => {
                let mut with = *with;
                with.sort();
                self.sequences.contains(&with)
            }
        }
    }
}

/// 对舍牌的响应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ClaimResponse {
    Pass,
    Win,
    Triplet,
    Quad,
    Sequence { with: [Tile; 2] },
}

impl ClaimResponse {
    pub fn tier(&self) -> Option<ClaimTier> {
        match self {
            ClaimResponse::Pass => None,
            ClaimResponse::Win => Some(ClaimTier::Win),
            ClaimResponse::Triplet | ClaimResponse::Quad => Some(ClaimTier::Exposing),
            ClaimResponse::Sequence { .. } => Some(ClaimTier::Sequence),
        }
    }

    pub fn kind(&self) -> Option<ClaimKind> {
        match self {
            ClaimResponse::Pass => None,
            ClaimResponse::Win => Some(ClaimKind::Win),
            ClaimResponse::Triplet => Some(ClaimKind::Triplet),
            ClaimResponse::Quad => Some(ClaimKind::Quad),
            ClaimResponse::Sequence { .. } => Some(ClaimKind::Sequence),
        }
    }
}

/// 鸣牌窗口中的一个座位
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EligibleSeat {
    pub seat: u8,
    /// 相对出牌者的座位距离（1 = 下家）
    pub offset: u8,
    pub options: ClaimOptions,
}

/// 仲裁结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    /// 还有座位的决定可能改变结果
    Undecided,
    Win { seat: u8 },
    Triplet { seat: u8 },
    Quad { seat: u8 },
    Sequence { seat: u8, with: [Tile; 2] },
    /// 所有座位都放弃
    AllPass,
}

/// 一张舍牌打出后的鸣牌窗口
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PendingClaims {
    /// 出牌者
    pub discarder: u8,
    /// 被打出的牌
    pub tile: Tile,
    /// 有可选鸣牌的座位，按出牌顺序排列
    pub eligible: SmallVec<[EligibleSeat; 3]>,
    /// 各座位已提交的响应
    responses: [Option<ClaimResponse>; 4],
}

impl PendingClaims {
    pub fn new(discarder: u8, tile: Tile, eligible: SmallVec<[EligibleSeat; 3]>) -> Self {
        Self {
            discarder,
            tile,
            eligible,
            responses: [None; 4],
        }
    }

    /// 该座位的可选项（不在窗口中时为 None）
    pub fn options_for(&self, seat: u8) -> Option<&ClaimOptions> {
        self.eligible.iter().find(|e| e.seat == seat).map(|e| &e.options)
    }

    /// 该座位已提交的响应
    pub fn response_of(&self, seat: u8) -> Option<ClaimResponse> {
        self.responses.get(seat as usize).copied().flatten()
    }

    /// 尚未响应的座位，按出牌顺序
    pub fn undecided(&self) -> SmallVec<[u8; 3]> {
        self.eligible
            .iter()
            .filter(|e| self.responses[e.seat as usize].is_none())
            .map(|e| e.seat)
            .collect()
    }

    /// 记录一个座位的响应
    ///
    /// 不在窗口中、已经响应过或请求不在可选项内时返回错误，窗口保持不变
    pub fn record(&mut self, seat: u8, response: ClaimResponse) -> Result<(), GameError> {
        let options = self.options_for(seat).ok_or(GameError::ClaimNotEligible { seat })?;
        if self.response_of(seat).is_some() {
            return Err(GameError::ClaimNotEligible { seat });
        }
        if !options.permits(&response) {
            return Err(GameError::InvalidClaimTiles);
        }
        self.responses[seat as usize] = Some(response);
        Ok(())
    }

    /// 仲裁
    ///
    /// 荣和立即成立。其余请求在没有未决座位可能提出更高优先级
    /// （或同优先级且离出牌者更近）的请求时成立。
    pub fn resolve(&self) -> Resolution {
        if let Some(e) = self
            .eligible
            .iter()
            .find(|e| self.responses[e.seat as usize] == Some(ClaimResponse::Win))
        {
            return Resolution::Win { seat: e.seat };
        }

        let mut best: Option<(ClaimTier, &EligibleSeat, ClaimResponse)> = None;
        for e in &self.eligible {
            let Some(response) = self.responses[e.seat as usize] else {
                continue;
            };
            let Some(tier) = response.tier() else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((best_tier, best_seat, _)) => {
                    tier > *best_tier || (tier == *best_tier && e.offset < best_seat.offset)
                }
            };
            if better {
                best = Some((tier, e, response));
            }
        }

        for e in self.eligible.iter().filter(|e| self.responses[e.seat as usize].is_none()) {
            let Some((best_tier, best_seat, _)) = &best else {
                return Resolution::Undecided;
            };
            let Some(potential) = e.options.best_tier() else {
                continue;
            };
            if potential > *best_tier || (potential == *best_tier && e.offset < best_seat.offset) {
                return Resolution::Undecided;
            }
        }

        match best {
            None => Resolution::AllPass,
            Some((_, e, response)) => match response {
                ClaimResponse::Triplet => Resolution::Triplet { seat: e.seat },
                ClaimResponse::Quad => Resolution::Quad { seat: e.seat },
                ClaimResponse::Sequence { with } => Resolution::Sequence { seat: e.seat, with },
                ClaimResponse::Win => Resolution::Win { seat: e.seat },
                ClaimResponse::Pass => Resolution::AllPass,
            },
        }
    }
}

/// 鸣牌资格判定
pub struct ClaimChecker;

impl ClaimChecker {
    /// 计算一个座位对舍牌的可选鸣牌
    ///
    /// - 荣和：加上这张牌后和牌，且不振听
    /// - 立直中的座位只能荣和
    /// - `allow_exposing` 为 false 时（最后一张舍牌）不能吃碰杠
    /// - `allow_quad` 为 false 时（无岭上牌可摸或杠数已满）不能大明杠
    /// - 吃只对下家开放
    ///
    /// # 参数
    ///
    /// - `player`: 响应的玩家
    /// - `tile`: 舍牌
    /// - `is_next_seat`: 是否为出牌者的下家
    pub fn legal_claims(
        checker: &mut WinChecker,
        player: &Player,
        tile: Tile,
        is_next_seat: bool,
        allow_exposing: bool,
        allow_quad: bool,
    ) -> ClaimOptions {
        let mut options = ClaimOptions::default();

        let mut test_hand = player.hand.clone();
        if test_hand.add_tile(tile) && checker.check_win_with_melds(&test_hand, player.melds.len()).is_win {
            let waits = if player.is_locked {
                player.locked_waits.clone()
            } else {
                ReadyChecker::check_ready_with(checker, &player.hand, &player.melds)
            };
            options.can_win = !player.is_furiten(&waits);
        }

        if player.is_locked || !allow_exposing {
            return options;
        }

        options.can_triplet = PongHandler::can_pong(player, &tile);
        options.can_quad = allow_quad && KongHandler::can_open_kong(player, &tile);
        if is_next_seat {
            options.sequences = ChowHandler::sequences(player, &tile);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(seat: u8, offset: u8, options: ClaimOptions) -> EligibleSeat {
        EligibleSeat { seat, offset, options }
    }

    fn win() -> ClaimOptions {
        ClaimOptions { can_win: true, ..Default::default() }
    }

    fn triplet() -> ClaimOptions {
        ClaimOptions { can_triplet: true, ..Default::default() }
    }

    fn sequence() -> ClaimOptions {
        ClaimOptions {
            sequences: SmallVec::from_vec(vec![[Tile::Man(2), Tile::Man(3)]]),
            ..Default::default()
        }
    }

    #[test]
    fn test_win_resolves_immediately() {
        let eligible = SmallVec::from_vec(vec![seat(1, 1, sequence()), seat(2, 2, win()), seat(3, 3, win())]);
        let mut pending = PendingClaims::new(0, Tile::Man(1), eligible);
        pending.record(3, ClaimResponse::Win).unwrap();
        assert_eq!(pending.resolve(), Resolution::Win { seat: 3 });
    }

    #[test]
    fn test_triplet_waits_for_undecided_win() {
        let eligible = SmallVec::from_vec(vec![seat(1, 1, win()), seat(2, 2, triplet())]);
        let mut pending = PendingClaims::new(0, Tile::Man(1), eligible);
        pending.record(2, ClaimResponse::Triplet).unwrap();
        assert_eq!(pending.resolve(), Resolution::Undecided, "荣和候选未决时碰要等待");
        pending.record(1, ClaimResponse::Pass).unwrap();
        assert_eq!(pending.resolve(), Resolution::Triplet { seat: 2 });
    }

    #[test]
    fn test_triplet_beats_sequence() {
        let eligible = SmallVec::from_vec(vec![seat(1, 1, sequence()), seat(2, 2, triplet())]);
        let mut pending = PendingClaims::new(0, Tile::Man(1), eligible);
        pending
            .record(1, ClaimResponse::Sequence { with: [Tile::Man(3), Tile::Man(2)] })
            .unwrap();
        assert_eq!(pending.resolve(), Resolution::Undecided);
        pending.record(2, ClaimResponse::Triplet).unwrap();
        assert_eq!(pending.resolve(), Resolution::Triplet { seat: 2 });
    }

    #[test]
    fn test_triplet_does_not_wait_for_sequence_seat() {
        let eligible = SmallVec::from_vec(vec![seat(1, 1, sequence()), seat(2, 2, triplet())]);
        let mut pending = PendingClaims::new(0, Tile::Man(1), eligible);
        pending.record(2, ClaimResponse::Triplet).unwrap();
        assert_eq!(pending.resolve(), Resolution::Triplet { seat: 2 });
    }

    #[test]
    fn test_all_pass() {
        let eligible = SmallVec::from_vec(vec![seat(1, 1, sequence()), seat(3, 3, triplet())]);
        let mut pending = PendingClaims::new(0, Tile::Man(1), eligible);
        pending.record(1, ClaimResponse::Pass).unwrap();
        assert_eq!(pending.resolve(), Resolution::Undecided);
        assert_eq!(pending.undecided().as_slice(), &[3]);
        pending.record(3, ClaimResponse::Pass).unwrap();
        assert_eq!(pending.resolve(), Resolution::AllPass);
    }

    #[test]
    fn test_record_validation() {
        let eligible = SmallVec::from_vec(vec![seat(1, 1, sequence())]);
        let mut pending = PendingClaims::new(0, Tile::Man(1), eligible);
        assert_eq!(pending.record(2, ClaimResponse::Pass), Err(GameError::ClaimNotEligible { seat: 2 }));
        assert_eq!(pending.record(1, ClaimResponse::Win), Err(GameError::InvalidClaimTiles));
        assert_eq!(
            pending.record(1, ClaimResponse::Sequence { with: [Tile::Man(2), Tile::Man(4)] }),
            Err(GameError::InvalidClaimTiles)
        );
        assert_eq!(pending.undecided().as_slice(), &[1], "失败的请求不改变窗口");
        pending.record(1, ClaimResponse::Pass).unwrap();
        assert_eq!(pending.record(1, ClaimResponse::Pass), Err(GameError::ClaimNotEligible { seat: 1 }));
    }

    #[test]
    fn test_legal_claims_for_locked_player() {
        let mut checker = WinChecker::new();
        let mut player = Player::new(1);
        for tile in crate::tile::parse_tiles("11m456p789s11122z").unwrap() {
            player.hand.add_tile(tile);
        }
        player.lock(vec![Tile::Man(1), Tile::Honor(crate::tile::Honor::South)]);
        let options = ClaimChecker::legal_claims(&mut checker, &player, Tile::Man(1), true, true, true);
        assert!(options.can_win);
        assert!(!options.can_triplet, "立直后不能碰");
        assert!(options.sequences.is_empty());
    }

    #[test]
    fn test_legal_claims_last_tile() {
        let mut checker = WinChecker::new();
        let mut player = Player::new(1);
        for tile in crate::tile::parse_tiles("55m23p").unwrap() {
            player.hand.add_tile(tile);
        }
        let options = ClaimChecker::legal_claims(&mut checker, &player, Tile::Man(5), true, true, true);
        assert!(options.can_triplet);
        let options = ClaimChecker::legal_claims(&mut checker, &player, Tile::Pin(4), true, true, true);
        assert_eq!(options.sequences.as_slice(), &[[Tile::Pin(2), Tile::Pin(3)]]);
        let options = ClaimChecker::legal_claims(&mut checker, &player, Tile::Pin(4), false, true, true);
        assert!(!options.any(), "只有下家能吃");
        let options = ClaimChecker::legal_claims(&mut checker, &player, Tile::Man(5), true, false, true);
        assert!(!options.any(), "最后一张舍牌不能鸣");
    }
}
