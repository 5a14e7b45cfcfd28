use crate::tile::Tile;
use crate::game::meld::Meld;
use crate::game::player::Player;

/// 杠操作器
///
/// 只负责手牌与副露的变化；岭上摸牌和翻宝牌指示牌由引擎处理
pub struct KongHandler;

impl KongHandler {
    /// 检查是否可以大明杠：手牌中有三张与舍牌相同的牌
    pub fn can_open_kong(player: &Player, tile: &Tile) -> bool {
        player.hand.tile_count(*tile) >= 3
    }

    /// 检查是否可以暗杠：手牌中有四张相同的牌
    pub fn can_concealed_kong(player: &Player, tile: &Tile) -> bool {
        player.hand.tile_count(*tile) == 4
    }

    /// 手中所有可以暗杠的牌
    pub fn concealed_candidates(player: &Player) -> Vec<Tile> {
        player
            .hand
            .distinct_tiles()
            .into_iter()
            .filter(|t| Self::can_concealed_kong(player, t))
            .collect()
    }

    /// 执行大明杠
    ///
    /// # 参数
    ///
    /// - `player`: 玩家
    /// - `tile`: 别人打出的牌
    /// - `from`: 打出这张牌的座位
    ///
    /// # 返回
    ///
    /// 是否成功；失败时手牌不变
    pub fn open_kong(player: &mut Player, tile: Tile, from: u8) -> bool {
        if !player.hand.remove_n(tile, 3) {
            return false;
        }
        player.melds.push(Meld::Quad { tile, from: Some(from) });
        player.last_drawn = None;
        true
    }

    /// 执行暗杠
    pub fn concealed_kong(player: &mut Player, tile: Tile) -> bool {
        if !player.hand.remove_n(tile, 4) {
            return false;
        }
        player.melds.push(Meld::Quad { tile, from: None });
        player.last_drawn = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_kong() {
        let mut player = Player::new(2);
        for _ in 0..3 {
            player.hand.add_tile(Tile::Man(5));
        }
        assert!(KongHandler::can_open_kong(&player, &Tile::Man(5)));
        assert!(KongHandler::open_kong(&mut player, Tile::Man(5), 1));
        assert!(player.hand.is_empty());
        assert_eq!(player.melds, vec![Meld::Quad { tile: Tile::Man(5), from: Some(1) }]);
        assert!(!player.is_menzen());
    }

    #[test]
    fn test_concealed_kong() {
        let mut player = Player::new(0);
        for _ in 0..4 {
            player.hand.add_tile(Tile::Pin(9));
        }
        player.hand.add_tile(Tile::Man(1));
        assert_eq!(KongHandler::concealed_candidates(&player), vec![Tile::Pin(9)]);
        assert!(KongHandler::concealed_kong(&mut player, Tile::Pin(9)));
        assert_eq!(player.hand.total_count(), 1);
        assert_eq!(player.melds, vec![Meld::Quad { tile: Tile::Pin(9), from: None }]);
        assert!(player.is_menzen(), "暗杠保持门清");
    }

    #[test]
    fn test_concealed_kong_needs_four() {
        let mut player = Player::new(0);
        for _ in 0..3 {
            player.hand.add_tile(Tile::Pin(9));
        }
        assert!(!KongHandler::can_concealed_kong(&player, &Tile::Pin(9)));
        assert!(!KongHandler::concealed_kong(&mut player, Tile::Pin(9)));
        assert_eq!(player.hand.total_count(), 3);
    }
}
