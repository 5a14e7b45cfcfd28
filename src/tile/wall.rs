use super::tile::Tile;
use crate::game::constants::{DEAD_WALL_SIZE, MAX_QUAD_INDICATORS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// 牌墙（Wall）
///
/// 洗好的 136 张牌分为两部分：
/// - 活牌墙：摸牌来源，从末尾抽取
/// - 王牌（死墙）：固定 14 张，不参与摸牌，提供宝牌指示牌
///
/// 王牌布局：第 `4 + 2i` 张为第 i 张宝牌指示牌，第 `5 + 2i` 张为对应的里宝牌指示牌
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Wall {
    /// 活牌墙（从后往前抽取）
    live: Vec<Tile>,
    /// 王牌
    dead: Vec<Tile>,
    /// 已翻开的宝牌指示牌数量（1 + 杠数，最多 5）
    revealed: usize,
    /// 整局种子；None 时使用系统熵
    seed: Option<u64>,
    /// 本局序号，与种子一起派生每局的洗牌种子
    hand_index: u64,
}

impl Wall {
    /// 创建一副未洗的完整牌墙（136 张，尚未划分王牌）
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            live: Self::full_set(),
            dead: Vec::new(),
            revealed: 0,
            seed,
            hand_index: 0,
        }
    }

    /// 用指定的活牌墙与王牌构造牌墙（测试与复盘用）
    ///
    /// `live` 的最后一张最先被摸到
    pub fn from_parts(live: Vec<Tile>, dead: Vec<Tile>) -> Self {
        Self {
            live,
            dead,
            revealed: 1,
            seed: None,
            hand_index: 0,
        }
    }

    fn full_set() -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(Tile::TOTAL_COUNT);
        for tile in Tile::all_kinds() {
            for _ in 0..4 {
                tiles.push(tile);
            }
        }
        tiles
    }

    /// 重新生成 136 张牌、洗牌并切出王牌
    ///
    /// 有种子时每局种子为 `splitmix64(seed + hand_index)`，同一种子下牌局可复现
    pub fn shuffle(&mut self) {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(splitmix64(seed.wrapping_add(self.hand_index))),
            None => StdRng::from_entropy(),
        };
        self.hand_index = self.hand_index.wrapping_add(1);

        let mut tiles = Self::full_set();
        tiles.shuffle(&mut rng);
        self.dead = tiles.split_off(tiles.len() - DEAD_WALL_SIZE);
        self.live = tiles;
        self.revealed = 1;
    }

    /// 摸一张牌（从活牌墙末尾）
    ///
    /// # 返回
    ///
    /// - `Some(Tile)`：成功摸到一张牌
    /// - `None`：活牌墙已空（荒牌）
    pub fn draw(&mut self) -> Option<Tile> {
        self.live.pop()
    }

    /// 活牌墙剩余牌数
    pub fn remaining_count(&self) -> usize {
        self.live.len()
    }

    /// 活牌墙是否已空
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// 活牌墙与王牌的总牌数
    pub fn total_count(&self) -> usize {
        self.live.len() + self.dead.len()
    }

    /// 王牌
    pub fn dead_wall(&self) -> &[Tile] {
        &self.dead
    }

    /// 活牌墙（末尾为下一张）
    pub fn live_tiles(&self) -> &[Tile] {
        &self.live
    }

    /// 已翻开的宝牌指示牌数量
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// 当前翻开的宝牌指示牌（王牌第 4、6、8… 张）
    pub fn dora_indicators(&self) -> Vec<Tile> {
        self.indicators_at(4)
    }

    /// 与已翻开指示牌一一对应的里宝牌指示牌（王牌第 5、7、9… 张）
    pub fn ura_indicators(&self) -> Vec<Tile> {
        self.indicators_at(5)
    }

    fn indicators_at(&self, base: usize) -> Vec<Tile> {
        (0..self.revealed)
            .filter_map(|i| self.dead.get(base + 2 * i).copied())
            .collect()
    }

    /// 杠后翻开下一张宝牌指示牌
    ///
    /// # 返回
    ///
    /// 新翻开的指示牌；已达上限（4 次杠）时返回 None
    pub fn reveal_next_indicator(&mut self) -> Option<Tile> {
        if self.revealed >= 1 + MAX_QUAD_INDICATORS {
            return None;
        }
        let tile = self.dead.get(4 + 2 * self.revealed).copied()?;
        self.revealed += 1;
        Some(tile)
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
