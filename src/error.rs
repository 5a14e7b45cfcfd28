use std::fmt;

use crate::tile::Tile;

/// 引擎错误
///
/// 所有被拒绝的操作都在修改状态之前返回，状态保持不变
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 无效的座位号
    InvalidPlayer,
    /// 手牌位置越界
    InvalidIndex { index: usize, len: usize },
    /// 不是该座位的回合
    WrongTurn { seat: u8 },
    /// 手中没有这张牌
    TileNotInHand { tile: Tile },
    /// 立直后只能打出刚摸到的牌
    IllegalDiscard { tile: Tile },
    /// 立直或暗杠宣言不合法
    IllegalDeclaration { reason: &'static str },
    /// 当前没有等待响应的鸣牌窗口
    NoPendingClaim,
    /// 该座位不在本次鸣牌窗口中，或已经响应过
    ClaimNotEligible { seat: u8 },
    /// 鸣牌请求不在该座位的可选项中
    InvalidClaimTiles,
    /// 手牌未和牌
    NotAWinningHand,
    /// 整场游戏已结束
    GameAlreadyOver,
    /// 牌文字串解析错误
    Parse { input: String, message: String },
    /// 规则配置或快照反序列化错误
    Config { message: String },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidPlayer => write!(f, "Invalid seat"),
            GameError::InvalidIndex { index, len } => {
                write!(f, "Hand index {} out of range (hand has {} tiles)", index, len)
            }
            GameError::WrongTurn { seat } => write!(f, "Not seat {}'s turn", seat),
            GameError::TileNotInHand { tile } => write!(f, "Tile {} is not in hand", tile),
            GameError::IllegalDiscard { tile } => {
                write!(f, "Locked hand must discard the drawn tile, not {}", tile)
            }
            GameError::IllegalDeclaration { reason } => write!(f, "Illegal declaration: {}", reason),
            GameError::NoPendingClaim => write!(f, "No claim window is open"),
            GameError::ClaimNotEligible { seat } => {
                write!(f, "Seat {} has no pending decision in this claim window", seat)
            }
            GameError::InvalidClaimTiles => write!(f, "Requested claim is not among the legal options"),
            GameError::NotAWinningHand => write!(f, "Hand is not complete"),
            GameError::GameAlreadyOver => write!(f, "Game is already over"),
            GameError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            GameError::Config { message } => write!(f, "Configuration error: {}", message),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Config {
            message: err.to_string(),
        }
    }
}
