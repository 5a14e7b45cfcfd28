use std::collections::HashMap;

use crate::game::constants::{MELDS_PER_HAND, SHANTEN_FAR};
use crate::tile::{Hand, Tile, WinChecker};

/// 单一花色的拆解表：`table[m]` 为拆出 m 组面子时最多能同时保留的搭子数，-1 表示不可达
type SuitTable = [i8; MELDS_PER_HAND + 1];

/// 向听数计算器
///
/// 向听数（Shanten Number）：距离听牌还需要的有效进张次数
/// - -1: 已和牌
/// - 0: 听牌
/// - 1+: N 向听
///
/// 副露组数由暗手张数推断：张数 ≡ 2 (mod 3) 时 k = (14 - n) / 3，
/// ≡ 1 (mod 3) 时 k = (13 - n) / 3，其余张数返回 `SHANTEN_FAR`。
///
/// 一般形按「8 - 2×面子 - 搭子 - 雀头」搜索，面子与搭子合计不超过 4；
/// 搭子包括对子、两面/边张和嵌张。七对子与国士无双只在门清（k = 0）时参与取最小值。
#[derive(Debug, Clone, Default)]
pub struct ShantenCalculator {
    /// 每种花色计数 -> 拆解表
    suit_cache: HashMap<[u8; 9], SuitTable>,
    checker: WinChecker,
}

impl ShantenCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由暗手张数推断副露组数
    pub fn infer_meld_count(total: usize) -> Option<usize> {
        if total == 0 || total > 14 {
            return None;
        }
        match total % 3 {
            2 => Some((14 - total) / 3),
            1 => Some((13 - total) / 3),
            _ => None,
        }
    }

    /// 计算手牌的向听数
    pub fn shanten_of_hand(&mut self, hand: &Hand) -> i32 {
        self.shanten(hand.counts())
    }

    /// 计算向听数
    ///
    /// 完成与听牌两种情况先交给和牌判定确认，其余情况走组合搜索
    ///
    /// # 参数
    ///
    /// - `counts`: 34 种牌的计数（允许超过 4，只看形状）
    ///
    /// # 返回
    ///
    /// 向听数；张数不合法时为 `SHANTEN_FAR`
    pub fn shanten(&mut self, counts: &[u8; Tile::KIND_COUNT]) -> i32 {
        let total = Self::total(counts);
        let Some(meld_count) = Self::infer_meld_count(total) else {
            return SHANTEN_FAR;
        };

        if total % 3 == 2 {
            if self.checker.is_complete_counts(counts, meld_count) {
                return -1;
            }
            if self.is_tenpai_after_discard(counts, meld_count) {
                return 0;
            }
        } else if self.is_tenpai_counts(counts, meld_count) {
            return 0;
        }

        self.shanten_by_search(counts)
    }

    /// 只用组合搜索计算向听数（不经过和牌判定）
    pub fn shanten_by_search(&mut self, counts: &[u8; Tile::KIND_COUNT]) -> i32 {
        let total = Self::total(counts);
        let Some(meld_count) = Self::infer_meld_count(total) else {
            return SHANTEN_FAR;
        };

        let mut best = self.standard_shanten(counts, meld_count);
        if meld_count == 0 {
            best = best
                .min(Self::seven_pairs_shanten(counts))
                .min(Self::thirteen_orphans_shanten(counts));
        }
        best
    }

    /// 一般形向听数
    ///
    /// # 参数
    ///
    /// - `counts`: 暗手计数
    /// - `meld_count`: 已完成的副露组数
    pub fn standard_shanten(&mut self, counts: &[u8; Tile::KIND_COUNT], meld_count: usize) -> i32 {
        // 不取雀头
        let mut best = self.best_without_pair(counts, meld_count, 0);

        for index in 0..Tile::KIND_COUNT {
            if counts[index] < 2 {
                continue;
            }
            let mut rest = *counts;
            rest[index] -= 2;
            best = best.min(self.best_without_pair(&rest, meld_count, 1));
        }
        best
    }

    /// 七对子向听数：6 - 对子数 + max(0, 7 - 种类数)
    pub fn seven_pairs_shanten(counts: &[u8; Tile::KIND_COUNT]) -> i32 {
        let pairs = counts.iter().filter(|&&c| c >= 2).count() as i32;
        let kinds = counts.iter().filter(|&&c| c > 0).count() as i32;
        6 - pairs + (7 - kinds).max(0)
    }

    /// 国士无双向听数：13 - 幺九种类数 - (有幺九对子 ? 1 : 0)
    pub fn thirteen_orphans_shanten(counts: &[u8; Tile::KIND_COUNT]) -> i32 {
        let mut kinds = 0;
        let mut has_pair = false;
        for tile in Tile::all_kinds().filter(Tile::is_terminal_or_honor) {
            let count = counts[tile.to_index()];
            if count > 0 {
                kinds += 1;
            }
            if count >= 2 {
                has_pair = true;
            }
        }
        13 - kinds - i32::from(has_pair)
    }

    /// 13 型计数加一张后能否和牌
    fn is_tenpai_counts(&mut self, counts: &[u8; Tile::KIND_COUNT], meld_count: usize) -> bool {
        let mut work = *counts;
        for index in 0..Tile::KIND_COUNT {
            work[index] += 1;
            let complete = self.checker.is_complete_counts(&work, meld_count);
            work[index] -= 1;
            if complete {
                return true;
            }
        }
        false
    }

    /// 14 型计数打出某一张后能否听牌
    fn is_tenpai_after_discard(&mut self, counts: &[u8; Tile::KIND_COUNT], meld_count: usize) -> bool {
        let mut work = *counts;
        for index in 0..Tile::KIND_COUNT {
            if work[index] == 0 {
                continue;
            }
            work[index] -= 1;
            let tenpai = self.is_tenpai_counts(&work, meld_count);
            work[index] += 1;
            if tenpai {
                return true;
            }
        }
        false
    }

    /// 雀头已确定后，组合三种数牌和字牌的面子与搭子
    fn best_without_pair(&mut self, counts: &[u8; Tile::KIND_COUNT], meld_count: usize, pair: i32) -> i32 {
        let tables = [
            self.suit_table(counts, 0),
            self.suit_table(counts, 1),
            self.suit_table(counts, 2),
        ];

        let mut honor_melds = 0usize;
        let mut honor_partials = 0i32;
        for &count in &counts[27..Tile::KIND_COUNT] {
            if count >= 3 {
                honor_melds += 1;
            } else if count == 2 {
                honor_partials += 1;
            }
        }

        let mut best = SHANTEN_FAR;
        for (m0, &t0) in tables[0].iter().enumerate() {
            if t0 < 0 {
                continue;
            }
            for (m1, &t1) in tables[1].iter().enumerate() {
                if t1 < 0 {
                    continue;
                }
                for (m2, &t2) in tables[2].iter().enumerate() {
                    if t2 < 0 {
                        continue;
                    }
                    let melds = (meld_count + honor_melds + m0 + m1 + m2).min(MELDS_PER_HAND) as i32;
                    let partials = (t0 as i32 + t1 as i32 + t2 as i32 + honor_partials)
                        .min(MELDS_PER_HAND as i32 - melds);
                    best = best.min(8 - 2 * melds - partials - pair);
                }
            }
        }
        best
    }

    fn suit_table(&mut self, counts: &[u8; Tile::KIND_COUNT], suit: usize) -> SuitTable {
        let mut key = [0u8; 9];
        key.copy_from_slice(&counts[suit * 9..suit * 9 + 9]);
        if let Some(table) = self.suit_cache.get(&key) {
            return *table;
        }

        let mut table = [-1i8; MELDS_PER_HAND + 1];
        let mut work = key;
        Self::search_suit(&mut work, 0, 0, 0, &mut table);
        self.suit_cache.insert(key, table);
        table
    }

    /// 深度优先枚举一个花色内的面子与搭子
    fn search_suit(counts: &mut [u8; 9], pos: usize, melds: usize, partials: i8, table: &mut SuitTable) {
        let mut pos = pos;
        while pos < 9 && counts[pos] == 0 {
            pos += 1;
        }
        if pos == 9 {
            let slot = &mut table[melds.min(MELDS_PER_HAND)];
            *slot = (*slot).max(partials);
            return;
        }

        // 刻子
        if counts[pos] >= 3 {
            counts[pos] -= 3;
            Self::search_suit(counts, pos, melds + 1, partials, table);
            counts[pos] += 3;
        }
        // 顺子
        if pos + 2 < 9 && counts[pos + 1] > 0 && counts[pos + 2] > 0 {
            counts[pos] -= 1;
            counts[pos + 1] -= 1;
            counts[pos + 2] -= 1;
            Self::search_suit(counts, pos, melds + 1, partials, table);
            counts[pos] += 1;
            counts[pos + 1] += 1;
            counts[pos + 2] += 1;
        }
        // 对子
        if counts[pos] >= 2 {
            counts[pos] -= 2;
            Self::search_suit(counts, pos, melds, partials + 1, table);
            counts[pos] += 2;
        }
        // 两面或边张
        if pos + 1 < 9 && counts[pos + 1] > 0 {
            counts[pos] -= 1;
            counts[pos + 1] -= 1;
            Self::search_suit(counts, pos, melds, partials + 1, table);
            counts[pos] += 1;
            counts[pos + 1] += 1;
        }
        // 嵌张
        if pos + 2 < 9 && counts[pos + 2] > 0 {
            counts[pos] -= 1;
            counts[pos + 2] -= 1;
            Self::search_suit(counts, pos, melds, partials + 1, table);
            counts[pos] += 1;
            counts[pos + 2] += 1;
        }
        // 孤张
        counts[pos] -= 1;
        Self::search_suit(counts, pos, melds, partials, table);
        counts[pos] += 1;
    }

    fn total(counts: &[u8; Tile::KIND_COUNT]) -> usize {
        counts.iter().map(|&c| c as usize).sum()
    }
}

/// 便捷函数：计算手牌向听数
pub fn calculate_shanten(hand: &Hand) -> i32 {
    ShantenCalculator::new().shanten_of_hand(hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::parse_tiles;

    fn hand(s: &str) -> Hand {
        Hand::from_tiles(&parse_tiles(s).unwrap()).unwrap()
    }

    #[test]
    fn test_complete_hand_is_minus_one() {
        assert_eq!(calculate_shanten(&hand("123m456p789s111z22z")), -1);
        assert_eq!(calculate_shanten(&hand("1155m2288p3377s11z")), -1);
    }

    #[test]
    fn test_tenpai_is_zero() {
        // 123m456p789s111z2z 单骑
        assert_eq!(calculate_shanten(&hand("123m456p789s111z2z")), 0);
        // 1112345678999m 九莲宝灯形
        assert_eq!(calculate_shanten(&hand("1112345678999m")), 0);
    }

    #[test]
    fn test_kanchan_counts_as_partial() {
        let mut calc = ShantenCalculator::new();
        let h = hand("123m456m789m11p13s");
        assert_eq!(calc.shanten_by_search(h.counts()), 0);
        assert_eq!(calc.shanten_of_hand(&h), 0);
    }

    #[test]
    fn test_far_hands() {
        // 幺九牌 11 种加一对：国士一向听
        let h = hand("159m19p19s123455z");
        assert_eq!(ShantenCalculator::thirteen_orphans_shanten(h.counts()), 1);
        assert_eq!(calculate_shanten(&h), 1);

        let scattered = hand("147m258p369s1234z");
        assert!(calculate_shanten(&scattered) >= 4);
    }

    #[test]
    fn test_seven_pairs_formula() {
        let h = hand("1155m2288p3377s1z");
        assert_eq!(ShantenCalculator::seven_pairs_shanten(h.counts()), 0);
        assert_eq!(calculate_shanten(&h), 0);
    }

    #[test]
    fn test_illegal_sizes_are_far() {
        assert_eq!(calculate_shanten(&hand("123m456p789s")), SHANTEN_FAR);
        assert_eq!(calculate_shanten(&Hand::new()), SHANTEN_FAR);
    }

    #[test]
    fn test_meld_count_inference() {
        assert_eq!(ShantenCalculator::infer_meld_count(14), Some(0));
        assert_eq!(ShantenCalculator::infer_meld_count(13), Some(0));
        assert_eq!(ShantenCalculator::infer_meld_count(11), Some(1));
        assert_eq!(ShantenCalculator::infer_meld_count(10), Some(1));
        assert_eq!(ShantenCalculator::infer_meld_count(2), Some(4));
        assert_eq!(ShantenCalculator::infer_meld_count(1), Some(4));
        assert_eq!(ShantenCalculator::infer_meld_count(12), None);
    }

    #[test]
    fn test_with_melds_inferred() {
        // 两组副露后 8 张：123m456p + 5s5s -> 和牌
        assert_eq!(calculate_shanten(&hand("123m456p55s")), -1);
        // 7 张：123m456p5s -> 单骑听牌
        assert_eq!(calculate_shanten(&hand("123m456p5s")), 0);
    }
}
