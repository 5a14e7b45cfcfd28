/// 游戏常量定义
///
/// 集中管理所有魔法数字

/// 玩家数量
pub const NUM_PLAYERS: u8 = 4;

/// 总牌数（136 张：数牌 108 张 + 字牌 28 张）
pub const TOTAL_TILES: usize = 136;

/// 牌的种类数（34 种）
pub const NUM_TILE_KINDS: usize = 34;

/// 每种牌的数量（4 张）
pub const COPIES_PER_TILE: u8 = 4;

/// 王牌张数
pub const DEAD_WALL_SIZE: usize = 14;

/// 配牌时每人的张数（亲家额外多摸 1 张）
pub const INITIAL_HAND_SIZE: usize = 13;

/// 杠最多追加翻开的宝牌指示牌数量
pub const MAX_QUAD_INDICATORS: usize = 4;

/// 一局中最多形成的杠数
pub const MAX_QUADS_PER_HAND: u8 = 4;

/// 手牌张数不合法时的向听数
pub const SHANTEN_FAR: i32 = 99;

/// 一般形的面子数
pub const MELDS_PER_HAND: usize = 4;

/// 自动对局的最大步数（防止无限循环）
pub const MAX_STEPS: usize = 100_000;
