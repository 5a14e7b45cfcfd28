use crate::game::meld::Meld;
use crate::game::rules;
use crate::tile::{Hand, Tile};

/// 一次舍牌的记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DiscardRecord {
    /// 打出的牌
    pub tile: Tile,
    /// 是否为立直宣言牌
    pub is_lock_declaration: bool,
    /// 是否为立直后的自动摸切
    pub is_auto: bool,
    /// 被哪个座位鸣走（None 表示仍在牌河）
    pub claimed_by: Option<u8>,
}

impl DiscardRecord {
    pub fn new(tile: Tile) -> Self {
        Self {
            tile,
            is_lock_declaration: false,
            is_auto: false,
            claimed_by: None,
        }
    }
}

/// 玩家状态
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    /// 座位号（0-3，本场开局时 0 为起家）
    pub seat: u8,
    /// 暗手
    pub hand: Hand,
    /// 副露与暗杠
    pub melds: Vec<Meld>,
    /// 舍牌记录（按打出顺序）
    pub discards: Vec<DiscardRecord>,
    /// 是否已立直
    pub is_locked: bool,
    /// 立直时固定下来的听牌集合
    pub locked_waits: Vec<Tile>,
    /// 本回合摸到的牌（鸣牌后为 None）
    pub last_drawn: Option<Tile>,
}

impl Player {
    /// 创建新玩家
    pub fn new(seat: u8) -> Self {
        Self {
            seat,
            hand: Hand::new(),
            melds: Vec::new(),
            discards: Vec::new(),
            is_locked: false,
            locked_waits: Vec::new(),
            last_drawn: None,
        }
    }

    /// 新一局开始前清空本局状态
    pub fn reset_for_hand(&mut self) {
        self.hand.clear();
        self.melds.clear();
        self.discards.clear();
        self.is_locked = false;
        self.locked_waits.clear();
        self.last_drawn = None;
    }

    /// 是否门清（没有明副露，暗杠不算）
    pub fn is_menzen(&self) -> bool {
        self.melds.iter().all(|m| !m.is_open())
    }

    /// 副露与暗杠的组数
    pub fn meld_count(&self) -> usize {
        self.melds.len()
    }

    /// 副露中的牌数
    pub fn meld_tile_count(&self) -> usize {
        self.melds.iter().map(Meld::tile_count).sum()
    }

    /// 暗手在和牌形下应有的张数（14 - 3 × 组数）
    pub fn complete_hand_size(&self) -> usize {
        14 - 3 * self.melds.len()
    }

    /// 仍留在牌河中的舍牌数
    pub fn pond_count(&self) -> usize {
        self.discards.iter().filter(|d| d.claimed_by.is_none()).count()
    }

    /// 手牌、副露和牌河中的牌数
    pub fn visible_tile_count(&self) -> usize {
        self.hand.total_count() + self.meld_tile_count() + self.pond_count()
    }

    /// 打出一张牌并记录
    ///
    /// 调用方负责先确认手中有这张牌
    pub fn discard(&mut self, record: DiscardRecord) -> bool {
        if !self.hand.remove_tile(record.tile) {
            return false;
        }
        self.discards.push(record);
        self.last_drawn = None;
        true
    }

    /// 把最后一张舍牌标记为被鸣走
    pub fn mark_last_discard_claimed(&mut self, by: u8) {
        if let Some(record) = self.discards.last_mut() {
            record.claimed_by = Some(by);
        }
    }

    /// 对给定的听牌集合是否振听
    pub fn is_furiten(&self, waits: &[Tile]) -> bool {
        rules::is_furiten(&self.discards, waits)
    }

    /// 进入立直状态
    pub fn lock(&mut self, waits: Vec<Tile>) {
        self.is_locked = true;
        self.locked_waits = waits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(2);
        assert_eq!(player.seat, 2);
        assert!(player.hand.is_empty());
        assert!(player.is_menzen());
        assert_eq!(player.complete_hand_size(), 14);
    }

    #[test]
    fn test_menzen_with_closed_quad() {
        let mut player = Player::new(0);
        player.melds.push(Meld::Quad { tile: Tile::Man(1), from: None });
        assert!(player.is_menzen(), "暗杠不破坏门清");
        assert_eq!(player.complete_hand_size(), 11);
        player.melds.push(Meld::Triplet { tile: Tile::Pin(2), from: 1 });
        assert!(!player.is_menzen());
    }

    #[test]
    fn test_discard_and_claim_marking() {
        let mut player = Player::new(0);
        player.hand.add_tile(Tile::Sou(3));
        player.last_drawn = Some(Tile::Sou(3));
        assert!(player.discard(DiscardRecord::new(Tile::Sou(3))));
        assert_eq!(player.last_drawn, None);
        assert_eq!(player.pond_count(), 1);

        player.mark_last_discard_claimed(1);
        assert_eq!(player.pond_count(), 0);
        // 被鸣走的舍牌仍计入振听
        assert!(player.is_furiten(&[Tile::Sou(3)]));
        assert!(!player.discard(DiscardRecord::new(Tile::Sou(3))), "手中已无此牌");
    }
}
