/// 牌相关模块
///
/// 包含牌（Tile）、牌墙（Wall）、手牌（Hand）和和牌判定（WinChecker）

pub mod tile;
pub mod wall;
pub mod hand;
pub mod win_check;

// 重新导出常用类型
pub use tile::{Tile, Suit, Honor, parse_tiles};
pub use wall::Wall;
pub use hand::Hand;
pub use win_check::{WinChecker, WinResult, WinType, Group, is_win, check_win};
