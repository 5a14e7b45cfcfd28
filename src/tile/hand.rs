use super::tile::Tile;
use smallvec::SmallVec;

/// 手牌（Hand）
///
/// 以 34 种牌的计数数组存储，添加、移除、查询均为 O(1)
///
/// 序列化时转换为排序后的牌列表
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "Vec<Tile>", try_from = "Vec<Tile>")]
pub struct Hand {
    /// 每种牌的数量（0-4），按 `Tile::to_index` 排列
    counts: [u8; Tile::KIND_COUNT],
    /// 总牌数（用于快速查询）
    total_count: usize,
}

impl Hand {
    /// 创建空手牌
    pub fn new() -> Self {
        Self {
            counts: [0; Tile::KIND_COUNT],
            total_count: 0,
        }
    }

    /// 从牌列表创建手牌；某种牌超过 4 张时返回 None
    pub fn from_tiles(tiles: &[Tile]) -> Option<Self> {
        let mut hand = Self::new();
        for &tile in tiles {
            if !hand.add_tile(tile) {
                return None;
            }
        }
        Some(hand)
    }

    /// 添加一张牌
    ///
    /// # 返回
    ///
    /// - `true`：成功添加
    /// - `false`：该牌已有 4 张
    pub fn add_tile(&mut self, tile: Tile) -> bool {
        let count = &mut self.counts[tile.to_index()];
        if *count >= 4 {
            return false;
        }
        *count += 1;
        self.total_count += 1;
        true
    }

    /// 移除一张牌
    ///
    /// # 返回
    ///
    /// - `true`：成功移除
    /// - `false`：手牌中没有该牌
    pub fn remove_tile(&mut self, tile: Tile) -> bool {
        let count = &mut self.counts[tile.to_index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        self.total_count -= 1;
        true
    }

    /// 移除 `n` 张同种牌；不足 `n` 张时不做任何修改
    pub fn remove_n(&mut self, tile: Tile, n: u8) -> bool {
        let count = &mut self.counts[tile.to_index()];
        if *count < n {
            return false;
        }
        *count -= n;
        self.total_count -= n as usize;
        true
    }

    /// 检查是否有某张牌
    pub fn has_tile(&self, tile: Tile) -> bool {
        self.tile_count(tile) > 0
    }

    /// 查询某张牌的数量
    pub fn tile_count(&self, tile: Tile) -> u8 {
        self.counts[tile.to_index()]
    }

    /// 获取总牌数
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// 转换为排序后的牌向量（万、筒、索、字，各自按数字）
    pub fn to_sorted_vec(&self) -> Vec<Tile> {
        let mut result = Vec::with_capacity(self.total_count);
        for (index, &count) in self.counts.iter().enumerate() {
            if let Some(tile) = Tile::from_index(index) {
                result.extend(std::iter::repeat(tile).take(count as usize));
            }
        }
        result
    }

    /// 按排序位置取牌
    pub fn tile_at(&self, index: usize) -> Option<Tile> {
        let mut remaining = index;
        for (kind, &count) in self.counts.iter().enumerate() {
            if remaining < count as usize {
                return Tile::from_index(kind);
            }
            remaining -= count as usize;
        }
        None
    }

    /// 检查手牌是否为空
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// 清空手牌
    pub fn clear(&mut self) {
        self.counts = [0; Tile::KIND_COUNT];
        self.total_count = 0;
    }

    /// 获取所有不同的牌（按索引顺序）
    pub fn distinct_tiles(&self) -> SmallVec<[Tile; 14]> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .filter_map(|(i, _)| Tile::from_index(i))
            .collect()
    }

    /// 34 种牌的计数数组
    pub fn counts(&self) -> &[u8; Tile::KIND_COUNT] {
        &self.counts
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Hand> for Vec<Tile> {
    fn from(hand: Hand) -> Self {
        hand.to_sorted_vec()
    }
}

impl TryFrom<Vec<Tile>> for Hand {
    type Error = String;

    fn try_from(tiles: Vec<Tile>) -> Result<Self, Self::Error> {
        Hand::from_tiles(&tiles).ok_or_else(|| "more than four copies of a tile".to_string())
    }
}
