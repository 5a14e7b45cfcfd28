use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// 麻将牌类型
///
/// 立直麻将使用 136 张牌：万、筒、索各 36 张（1-9 各 4 张），字牌 28 张（7 种各 4 张）
///
/// 派生的排序与 34 种牌的索引顺序一致：万 < 筒 < 索 < 字
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Tile {
    /// 万子（1-9）
    Man(u8),
    /// 筒子（1-9）
    Pin(u8),
    /// 索子（1-9）
    Sou(u8),
    /// 字牌（风牌、三元牌）
    Honor(Honor),
}

impl Tile {
    /// 总牌数：136 张
    pub const TOTAL_COUNT: usize = 136;

    /// 牌的种类数：34 种
    pub const KIND_COUNT: usize = 34;

    /// 数牌的数字范围：1-9
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 9;

    /// 创建一张牌，验证输入有效性
    ///
    /// 字牌的 rank 取 1-7（东南西北白发中）
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        match suit {
            Suit::Honor => Honor::from_rank(rank).map(Tile::Honor),
            _ if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) => None,
            Suit::Man => Some(Tile::Man(rank)),
            Suit::Pin => Some(Tile::Pin(rank)),
            Suit::Sou => Some(Tile::Sou(rank)),
        }
    }

    /// 获取花色
    pub fn suit(&self) -> Suit {
        match self {
            Tile::Man(_) => Suit::Man,
            Tile::Pin(_) => Suit::Pin,
            Tile::Sou(_) => Suit::Sou,
            Tile::Honor(_) => Suit::Honor,
        }
    }

    /// 获取数字（数牌 1-9，字牌 1-7）
    pub fn rank(&self) -> u8 {
        match self {
            Tile::Man(r) | Tile::Pin(r) | Tile::Sou(r) => *r,
            Tile::Honor(h) => h.rank(),
        }
    }

    /// 转换为种类索引（0-33）
    ///
    /// - 万子：0-8
    /// - 筒子：9-17
    /// - 索子：18-26
    /// - 字牌：27-33（东南西北白发中）
    pub fn to_index(&self) -> usize {
        self.suit() as usize * 9 + self.rank() as usize - 1
    }

    /// 从种类索引创建牌
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::KIND_COUNT {
            return None;
        }
        let rank = (index % 9) as u8 + 1;
        match index / 9 {
            0 => Some(Tile::Man(rank)),
            1 => Some(Tile::Pin(rank)),
            2 => Some(Tile::Sou(rank)),
            _ => Honor::from_rank(rank).map(Tile::Honor),
        }
    }

    /// 按索引顺序遍历全部 34 种牌
    pub fn all_kinds() -> impl Iterator<Item = Tile> {
        (0..Self::KIND_COUNT).filter_map(Tile::from_index)
    }

    /// 是否为数牌
    pub fn is_numbered(&self) -> bool {
        !self.is_honor()
    }

    /// 是否为字牌
    pub fn is_honor(&self) -> bool {
        matches!(self, Tile::Honor(_))
    }

    /// 是否为幺九牌（老头牌或字牌）
    pub fn is_terminal_or_honor(&self) -> bool {
        match self {
            Tile::Honor(_) => true,
            _ => self.rank() == Self::MIN_RANK || self.rank() == Self::MAX_RANK,
        }
    }

    /// 同花色偏移 `delta` 后的数牌；越界或字牌返回 None
    pub fn offset(&self, delta: i8) -> Option<Tile> {
        if self.is_honor() {
            return None;
        }
        let rank = self.rank() as i8 + delta;
        if rank < Self::MIN_RANK as i8 || rank > Self::MAX_RANK as i8 {
            return None;
        }
        Tile::new(self.suit(), rank as u8)
    }

    /// 宝牌指示牌所指示的牌
    ///
    /// 数牌 9 之后回到 1，风牌按东南西北循环，三元牌按白发中循环
    pub fn dora_successor(&self) -> Tile {
        match self {
            Tile::Man(r) => Tile::Man(r % 9 + 1),
            Tile::Pin(r) => Tile::Pin(r % 9 + 1),
            Tile::Sou(r) => Tile::Sou(r % 9 + 1),
            Tile::Honor(h) => Tile::Honor(h.successor()),
        }
    }

    /// 检查是否可以组成顺子（连续三张）
    pub fn can_form_sequence(&self, other1: &Tile, other2: &Tile) -> bool {
        if self.is_honor() || self.suit() != other1.suit() || self.suit() != other2.suit() {
            return false;
        }
        let mut ranks = [self.rank(), other1.rank(), other2.rank()];
        ranks.sort();
        ranks[0] + 1 == ranks[1] && ranks[1] + 1 == ranks[2]
    }
}

impl fmt::Display for Tile {
    /// mpsz 记法：`5m`、`3p`、`9s`、`1z`（东）…`7z`（中）
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit().symbol())
    }
}

impl FromStr for Tile {
    type Err = GameError;

    /// 解析单张牌：`"5m"`、`"7z"`，字牌也接受 `E S W N P F C`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiles = parse_tiles(s)?;
        match tiles.as_slice() {
            [tile] => Ok(*tile),
            _ => Err(GameError::Parse {
                input: s.to_string(),
                message: "expected exactly one tile".to_string(),
            }),
        }
    }
}

/// 解析 mpsz 记法的牌串，例如 `"123m456p789s11z"`
///
/// 数字累积到下一个花色字母时落地；字母 `E S W N P F C` 直接表示字牌
///
/// # 参数
///
/// - `input`: 牌串，允许空白
///
/// # 返回
///
/// 按书写顺序排列的牌
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>, GameError> {
    let parse_error = |message: &str| GameError::Parse {
        input: input.to_string(),
        message: message.to_string(),
    };

    let mut tiles = Vec::new();
    let mut pending: Vec<u8> = Vec::new();
    for ch in input.chars() {
        if ch.is_whitespace() {
            continue;
        }
        if let Some(digit) = ch.to_digit(10) {
            pending.push(digit as u8);
            continue;
        }
        if let Some(honor) = Honor::from_letter(ch) {
            if !pending.is_empty() {
                return Err(parse_error("digits without a suit before honor letter"));
            }
            tiles.push(Tile::Honor(honor));
            continue;
        }
        let suit = Suit::from_symbol(ch).ok_or_else(|| parse_error("unknown suit character"))?;
        if pending.is_empty() {
            return Err(parse_error("suit character without digits"));
        }
        for rank in pending.drain(..) {
            // 赤五记作 0
            let rank = if rank == 0 && suit != Suit::Honor { 5 } else { rank };
            tiles.push(Tile::new(suit, rank).ok_or_else(|| parse_error("rank out of range"))?);
        }
    }
    if !pending.is_empty() {
        return Err(parse_error("trailing digits without a suit"));
    }
    Ok(tiles)
}

/// 花色枚举
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    Man = 0,
    Pin = 1,
    Sou = 2,
    Honor = 3,
}

impl Suit {
    /// 获取所有花色
    pub fn all() -> [Suit; 4] {
        [Suit::Man, Suit::Pin, Suit::Sou, Suit::Honor]
    }

    /// 数牌花色
    pub fn numbered() -> [Suit; 3] {
        [Suit::Man, Suit::Pin, Suit::Sou]
    }

    /// mpsz 记法中的花色字母
    pub fn symbol(&self) -> char {
        match self {
            Suit::Man => 'm',
            Suit::Pin => 'p',
            Suit::Sou => 's',
            Suit::Honor => 'z',
        }
    }

    fn from_symbol(ch: char) -> Option<Suit> {
        match ch {
            'm' => Some(Suit::Man),
            'p' => Some(Suit::Pin),
            's' => Some(Suit::Sou),
            'z' => Some(Suit::Honor),
            _ => None,
        }
    }
}

/// 字牌
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Honor {
    East,
    South,
    West,
    North,
    White,
    Green,
    Red,
}

impl Honor {
    /// 按 1z-7z 顺序
    pub const ALL: [Honor; 7] = [
        Honor::East,
        Honor::South,
        Honor::West,
        Honor::North,
        Honor::White,
        Honor::Green,
        Honor::Red,
    ];

    pub fn rank(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn from_rank(rank: u8) -> Option<Honor> {
        Self::ALL.get((rank as usize).checked_sub(1)?).copied()
    }

    /// 是否为风牌
    pub fn is_wind(&self) -> bool {
        matches!(self, Honor::East | Honor::South | Honor::West | Honor::North)
    }

    fn successor(&self) -> Honor {
        match self {
            Honor::East => Honor::South,
            Honor::South => Honor::West,
            Honor::West => Honor::North,
            Honor::North => Honor::East,
            Honor::White => Honor::Green,
            Honor::Green => Honor::Red,
            Honor::Red => Honor::White,
        }
    }

    fn from_letter(ch: char) -> Option<Honor> {
        match ch {
            'E' => Some(Honor::East),
            'S' => Some(Honor::South),
            'W' => Some(Honor::West),
            'N' => Some(Honor::North),
            'P' => Some(Honor::White),
            'F' => Some(Honor::Green),
            'C' => Some(Honor::Red),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_creation() {
        assert_eq!(Tile::new(Suit::Man, 1), Some(Tile::Man(1)));
        assert_eq!(Tile::new(Suit::Sou, 9), Some(Tile::Sou(9)));
        assert_eq!(Tile::new(Suit::Honor, 7), Some(Tile::Honor(Honor::Red)));
        assert_eq!(Tile::new(Suit::Pin, 0), None);
        assert_eq!(Tile::new(Suit::Pin, 10), None);
        assert_eq!(Tile::new(Suit::Honor, 8), None);
    }

    #[test]
    fn test_index_roundtrip_covers_all_kinds() {
        let kinds: Vec<Tile> = Tile::all_kinds().collect();
        assert_eq!(kinds.len(), Tile::KIND_COUNT);
        for (i, tile) in kinds.iter().enumerate() {
            assert_eq!(tile.to_index(), i);
        }
        // 派生排序与索引一致
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(sorted, kinds);
        assert_eq!(Tile::from_index(34), None);
    }

    #[test]
    fn test_terminal_or_honor() {
        assert!(Tile::Man(1).is_terminal_or_honor());
        assert!(Tile::Sou(9).is_terminal_or_honor());
        assert!(Tile::Honor(Honor::Green).is_terminal_or_honor());
        assert!(!Tile::Pin(5).is_terminal_or_honor());
    }

    #[test]
    fn test_dora_successor_wraps() {
        assert_eq!(Tile::Man(9).dora_successor(), Tile::Man(1));
        assert_eq!(Tile::Pin(4).dora_successor(), Tile::Pin(5));
        assert_eq!(Tile::Honor(Honor::North).dora_successor(), Tile::Honor(Honor::East));
        assert_eq!(Tile::Honor(Honor::Red).dora_successor(), Tile::Honor(Honor::White));
    }

    #[test]
    fn test_parse_tiles() {
        let tiles = parse_tiles("123m 40p 9s E 77z").unwrap();
        assert_eq!(
            tiles,
            vec![
                Tile::Man(1),
                Tile::Man(2),
                Tile::Man(3),
                Tile::Pin(4),
                Tile::Pin(5),
                Tile::Sou(9),
                Tile::Honor(Honor::East),
                Tile::Honor(Honor::Red),
                Tile::Honor(Honor::Red),
            ]
        );
        assert!(parse_tiles("123").is_err(), "缺少花色应报错");
        assert!(parse_tiles("8z").is_err(), "字牌只有 1-7");
        assert!(parse_tiles("m").is_err());
    }

    #[test]
    fn test_display_matches_parser() {
        for tile in Tile::all_kinds() {
            let text = tile.to_string();
            assert_eq!(text.parse::<Tile>().unwrap(), tile);
        }
    }

    #[test]
    fn test_offset() {
        assert_eq!(Tile::Man(3).offset(-2), Some(Tile::Man(1)));
        assert_eq!(Tile::Man(3).offset(-3), None);
        assert_eq!(Tile::Sou(8).offset(1), Some(Tile::Sou(9)));
        assert_eq!(Tile::Honor(Honor::East).offset(1), None);
    }
}
