use crate::tile::Tile;
use crate::game::meld::Meld;
use crate::game::player::Player;

/// 碰牌操作器
pub struct PongHandler;

impl PongHandler {
    /// 检查是否可以碰牌
    ///
    /// 碰牌条件：手牌中有两张与舍牌相同的牌
    ///
    /// # 参数
    ///
    /// - `player`: 玩家
    /// - `tile`: 别人打出的牌
    pub fn can_pong(player: &Player, tile: &Tile) -> bool {
        player.hand.tile_count(*tile) >= 2
    }

    /// 执行碰牌
    ///
    /// # 参数
    ///
    /// - `player`: 玩家（可变引用）
    /// - `tile`: 别人打出的牌
    /// - `from`: 打出这张牌的座位
    ///
    /// # 返回
    ///
    /// 是否成功碰牌；失败时手牌不变
    pub fn pong(player: &mut Player, tile: Tile, from: u8) -> bool {
        if !player.hand.remove_n(tile, 2) {
            return false;
        }
        player.melds.push(Meld::Triplet { tile, from });
        player.last_drawn = None;
        true
    }
}
