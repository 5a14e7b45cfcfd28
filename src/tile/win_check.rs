use super::{Hand, Tile};
use std::collections::HashMap;
use smallvec::SmallVec;

/// 和牌判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinResult {
    /// 是否和牌
    pub is_win: bool,
    /// 和牌形状
    pub win_type: WinType,
    /// 雀头（一般形）
    pub pair: Option<Tile>,
    /// 暗手中拆出的面子
    pub groups: SmallVec<[Group; 4]>,
}

impl WinResult {
    fn not_win() -> Self {
        Self {
            is_win: false,
            win_type: WinType::Standard,
            pair: None,
            groups: SmallVec::new(),
        }
    }
}

/// 和牌形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WinType {
    /// 一般形（4 组面子 + 1 雀头，副露计入面子）
    Standard,
    /// 七对子（7 种不同的对子，仅门清 14 张）
    SevenPairs,
    /// 国士无双（13 种幺九牌各一张加其中一种成对，仅门清 14 张）
    ThirteenOrphans,
}

/// 面子（顺子或刻子）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// 顺子，`start` 为最小的一张
    Sequence { start: Tile },
    /// 刻子
    Triplet { tile: Tile },
}

type CacheKey = ([u8; Tile::KIND_COUNT], u8);

/// 和牌判定器（完整性判定的唯一依据）
///
/// 递归回溯拆解面子，结果按计数数组缓存。
/// 形状判定不限制每种牌的张数，向听数与听牌计算依赖这一点。
#[derive(Debug, Clone)]
pub struct WinChecker {
    /// 结果缓存（超过上限时整体清空）
    result_cache: HashMap<CacheKey, WinResult>,
    max_cache_size: usize,
}

impl WinChecker {
    /// 创建新的和牌判定器
    pub fn new() -> Self {
        Self::with_cache_size(4096)
    }

    /// 创建新的和牌判定器（自定义缓存大小）
    pub fn with_cache_size(max_cache_size: usize) -> Self {
        Self {
            result_cache: HashMap::new(),
            max_cache_size,
        }
    }

    /// 判定门清手牌是否和牌
    #[inline]
    pub fn check_win(&mut self, hand: &Hand) -> WinResult {
        self.check_win_with_melds(hand, 0)
    }

    /// 判定手牌是否和牌
    ///
    /// # 参数
    ///
    /// - `hand`: 暗手（必须恰好 `14 - 3 * meld_count` 张）
    /// - `meld_count`: 副露与暗杠的组数
    pub fn check_win_with_melds(&mut self, hand: &Hand, meld_count: usize) -> WinResult {
        self.check_counts(hand.counts(), meld_count)
    }

    /// 按计数数组判定是否和牌
    pub fn is_complete_counts(&mut self, counts: &[u8; Tile::KIND_COUNT], meld_count: usize) -> bool {
        self.check_counts(counts, meld_count).is_win
    }

    /// 按计数数组判定并返回拆解结果
    pub fn check_counts(&mut self, counts: &[u8; Tile::KIND_COUNT], meld_count: usize) -> WinResult {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if meld_count > 4 || total != 14 - 3 * meld_count {
            return WinResult::not_win();
        }

        let key = (*counts, meld_count as u8);
        if let Some(cached) = self.result_cache.get(&key) {
            return cached.clone();
        }

        let result = Self::evaluate(counts, meld_count);

        if self.result_cache.len() >= self.max_cache_size {
            self.result_cache.clear();
        }
        self.result_cache.insert(key, result.clone());
        result
    }

    fn evaluate(counts: &[u8; Tile::KIND_COUNT], meld_count: usize) -> WinResult {
        if meld_count == 0 {
            if let Some(result) = Self::check_thirteen_orphans(counts) {
                return result;
            }
        }
        if let Some(result) = Self::check_standard(counts) {
            return result;
        }
        if meld_count == 0 {
            if let Some(result) = Self::check_seven_pairs(counts) {
                return result;
            }
        }
        WinResult::not_win()
    }

    /// 一般形：枚举雀头后拆解剩余部分
    fn check_standard(counts: &[u8; Tile::KIND_COUNT]) -> Option<WinResult> {
        for pair_index in 0..Tile::KIND_COUNT {
            if counts[pair_index] < 2 {
                continue;
            }
            let mut work = *counts;
            work[pair_index] -= 2;
            let mut groups = SmallVec::new();
            if Self::decompose(&mut work, &mut groups) {
                return Some(WinResult {
                    is_win: true,
                    win_type: WinType::Standard,
                    pair: Tile::from_index(pair_index),
                    groups,
                });
            }
        }
        None
    }

    /// 从最小的非零索引开始拆刻子或顺子
    fn decompose(counts: &mut [u8; Tile::KIND_COUNT], groups: &mut SmallVec<[Group; 4]>) -> bool {
        let Some(i) = counts.iter().position(|&c| c > 0) else {
            return true;
        };
        let Some(tile) = Tile::from_index(i) else {
            return false;
        };

        if counts[i] >= 3 {
            counts[i] -= 3;
            groups.push(Group::Triplet { tile });
            if Self::decompose(counts, groups) {
                return true;
            }
            groups.pop();
            counts[i] += 3;
        }

        let is_sequence_start = i < 27 && i % 9 <= 6;
        if is_sequence_start && counts[i + 1] > 0 && counts[i + 2] > 0 {
            counts[i] -= 1;
            counts[i + 1] -= 1;
            counts[i + 2] -= 1;
            groups.push(Group::Sequence { start: tile });
            if Self::decompose(counts, groups) {
                return true;
            }
            groups.pop();
            counts[i] += 1;
            counts[i + 1] += 1;
            counts[i + 2] += 1;
        }

        false
    }

    /// 七对子：恰好 7 种牌各 2 张（四张同种不算两对）
    fn check_seven_pairs(counts: &[u8; Tile::KIND_COUNT]) -> Option<WinResult> {
        let mut pairs = 0;
        for &count in counts.iter() {
            match count {
                0 => {}
                2 => pairs += 1,
                _ => return None,
            }
        }
        (pairs == 7).then(|| WinResult {
            is_win: true,
            win_type: WinType::SevenPairs,
            pair: None,
            groups: SmallVec::new(),
        })
    }

    /// 国士无双：13 种幺九牌齐全，其中一种成对
    fn check_thirteen_orphans(counts: &[u8; Tile::KIND_COUNT]) -> Option<WinResult> {
        let mut pair = None;
        for (index, &count) in counts.iter().enumerate() {
            let tile = Tile::from_index(index)?;
            match (tile.is_terminal_or_honor(), count) {
                (false, 0) => {}
                (false, _) => return None,
                (true, 1) => {}
                (true, 2) if pair.is_none() => pair = Some(tile),
                _ => return None,
            }
        }
        pair.map(|pair| WinResult {
            is_win: true,
            win_type: WinType::ThirteenOrphans,
            pair: Some(pair),
            groups: SmallVec::new(),
        })
    }

    /// 清空缓存
    pub fn clear_cache(&mut self) {
        self.result_cache.clear();
    }

    /// 当前缓存条目数
    pub fn cache_size(&self) -> usize {
        self.result_cache.len()
    }
}

impl Default for WinChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数：判定门清手牌是否和牌
pub fn is_win(hand: &Hand) -> bool {
    WinChecker::new().check_win(hand).is_win
}

/// 便捷函数：判定门清手牌并返回拆解结果
pub fn check_win(hand: &Hand) -> WinResult {
    WinChecker::new().check_win(hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::parse_tiles;

    fn hand(s: &str) -> Hand {
        Hand::from_tiles(&parse_tiles(s).unwrap()).unwrap()
    }

    #[test]
    fn test_standard_win() {
        let result = check_win(&hand("123m456p789s111z22z"));
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::Standard);
        assert_eq!(result.pair, Some(parse_tiles("2z").unwrap()[0]));
        assert_eq!(result.groups.len(), 4);
    }

    #[test]
    fn test_seven_pairs() {
        let result = check_win(&hand("1155m2288p3377s11z"));
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::SevenPairs);
    }

    #[test]
    fn test_four_of_a_kind_is_not_two_pairs() {
        assert!(!is_win(&hand("1111m2288p3377s11z")));
    }

    #[test]
    fn test_thirteen_orphans() {
        let result = check_win(&hand("19m19p19s12345677z"));
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::ThirteenOrphans);
    }

    #[test]
    fn test_standard_preferred_over_seven_pairs() {
        // 两杯口同时满足七对子形状
        let result = check_win(&hand("112233m445566p77s"));
        assert!(result.is_win);
        assert_eq!(result.win_type, WinType::Standard);
    }

    #[test]
    fn test_not_win() {
        assert!(!is_win(&hand("123m456p789s1234z")));
    }

    #[test]
    fn test_wrong_count() {
        assert!(!is_win(&hand("123m456p789s11z")));
    }

    #[test]
    fn test_with_melds() {
        let mut checker = WinChecker::new();
        // 两组副露后暗手 8 张
        let result = checker.check_win_with_melds(&hand("123m456p55s"), 2);
        assert!(result.is_win);
        // 有副露时七对子不成立
        let result = checker.check_win_with_melds(&hand("1155m22p"), 2);
        assert!(!result.is_win);
        // 张数不符
        assert!(!checker.check_win_with_melds(&hand("123m456p55s"), 1).is_win);
    }

    #[test]
    fn test_counts_beyond_four_are_structural() {
        let mut checker = WinChecker::new();
        let mut counts = [0u8; Tile::KIND_COUNT];
        counts[0] = 5;
        for i in 9..18 {
            counts[i] = 1;
        }
        // 11111m + 123456789p：刻子 + 雀头 + 三组顺子
        assert!(checker.is_complete_counts(&counts, 0));
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut checker = WinChecker::with_cache_size(2);
        checker.check_win(&hand("123m456p789s111z22z"));
        checker.check_win(&hand("1155m2288p3377s11z"));
        checker.check_win(&hand("19m19p19s12345677z"));
        assert!(checker.cache_size() <= 2);
    }
}
