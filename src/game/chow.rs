use smallvec::SmallVec;

use crate::tile::Tile;
use crate::game::meld::Meld;
use crate::game::player::Player;

/// 吃牌操作器
///
/// 只有下家可以吃，且只能吃数牌
pub struct ChowHandler;

impl ChowHandler {
    /// 列出可以与舍牌组成顺子的手牌组合
    ///
    /// 依次检查舍牌位于顺子末位、中间、首位三种形状：
    /// (n-2, n-1)、(n-1, n+1)、(n+1, n+2)
    ///
    /// # 返回
    ///
    /// 每个元素是手中需要拿出的两张牌
    pub fn sequences(player: &Player, tile: &Tile) -> SmallVec<[[Tile; 2]; 3]> {
        let mut result = SmallVec::new();
        if tile.is_honor() {
            return result;
        }
        for (low, high) in [(-2, -1), (-1, 1), (1, 2)] {
            let (Some(a), Some(b)) = (tile.offset(low), tile.offset(high)) else {
                continue;
            };
            if player.hand.has_tile(a) && player.hand.has_tile(b) {
                result.push([a, b]);
            }
        }
        result
    }

    /// 检查是否可以吃
    pub fn can_chow(player: &Player, tile: &Tile) -> bool {
        !Self::sequences(player, tile).is_empty()
    }

    /// 执行吃牌
    ///
    /// # 参数
    ///
    /// - `player`: 玩家
    /// - `tile`: 上家打出的牌
    /// - `with`: 手中拿出的两张牌
    /// - `from`: 上家座位
    ///
    /// # 返回
    ///
    /// 是否成功；组合不合法或手中缺牌时手牌不变
    pub fn chow(player: &mut Player, tile: Tile, with: [Tile; 2], from: u8) -> bool {
        let Some(meld) = Meld::sequence(tile, with, from) else {
            return false;
        };
        if !player.hand.has_tile(with[0]) || !player.hand.has_tile(with[1]) {
            return false;
        }
        player.hand.remove_tile(with[0]);
        player.hand.remove_tile(with[1]);
        player.melds.push(meld);
        player.last_drawn = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::parse_tiles;

    fn player_with(s: &str) -> Player {
        let mut player = Player::new(1);
        for tile in parse_tiles(s).unwrap() {
            player.hand.add_tile(tile);
        }
        player
    }

    #[test]
    fn test_all_three_shapes() {
        let player = player_with("12456m");
        let options = ChowHandler::sequences(&player, &Tile::Man(3));
        assert_eq!(
            options.as_slice(),
            &[
                [Tile::Man(1), Tile::Man(2)],
                [Tile::Man(2), Tile::Man(4)],
                [Tile::Man(4), Tile::Man(5)],
            ]
        );

        let player = player_with("12346m");
        assert_eq!(ChowHandler::sequences(&player, &Tile::Man(3)).len(), 2);
        // 边张：只有一种形状
        let edge = player_with("89p");
        assert_eq!(ChowHandler::sequences(&edge, &Tile::Pin(7)).as_slice(), &[[Tile::Pin(8), Tile::Pin(9)]]);
    }

    #[test]
    fn test_honors_cannot_be_chowed() {
        let player = player_with("11z22z");
        assert!(!ChowHandler::can_chow(&player, &Tile::Honor(crate::tile::Honor::East)));
    }

    #[test]
    fn test_chow_moves_tiles() {
        let mut player = player_with("78s1m");
        assert!(ChowHandler::chow(&mut player, Tile::Sou(9), [Tile::Sou(7), Tile::Sou(8)], 0));
        assert_eq!(player.hand.total_count(), 1);
        assert!(matches!(player.melds[0], Meld::Sequence { claimed_pos: 2, from: 0, .. }));
    }

    #[test]
    fn test_chow_rejects_missing_tiles() {
        let mut player = player_with("7s1m");
        assert!(!ChowHandler::chow(&mut player, Tile::Sou(9), [Tile::Sou(7), Tile::Sou(8)], 0));
        assert_eq!(player.hand.total_count(), 2);
        assert!(player.melds.is_empty());
    }
}
