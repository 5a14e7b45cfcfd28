use crate::game::claims::ClaimResponse;
use crate::tile::Tile;

/// 动作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// 打牌，可同时宣言立直
    Discard { tile: Tile, declare_lock: bool },
    /// 自摸和
    SelfDrawWin,
    /// 暗杠
    ClosedQuad { tile: Tile },
    /// 对舍牌的响应（荣和、碰、杠、吃、过）
    Claim(ClaimResponse),
}

impl Action {
    /// 不宣言立直的打牌
    pub fn discard(tile: Tile) -> Self {
        Action::Discard { tile, declare_lock: false }
    }

    /// 是否为鸣牌窗口中的响应
    pub fn is_claim(&self) -> bool {
        matches!(self, Action::Claim(_))
    }
}
