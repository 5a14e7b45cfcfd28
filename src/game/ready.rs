use crate::game::meld::Meld;
use crate::tile::win_check::WinChecker;
use crate::tile::{Hand, Tile};

/// 听牌判定器
///
/// 听牌集合完全由和牌判定逐张验证得出
pub struct ReadyChecker;

/// `make_tenpai` 的结果：一副听牌手和能让它和牌的一张牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenpaiFixture {
    /// 去掉一张后的听牌手（13 型）
    pub hand: Hand,
    /// 被去掉的牌，摸回即和
    pub winning_tile: Tile,
}

impl ReadyChecker {
    /// 计算听牌集合
    ///
    /// - 暗手为 `14 - 3k - 1` 张：逐一尝试 34 种牌，能和的即为听牌
    /// - 暗手为 `14 - 3k` 张：对每种可打出的牌求听牌集合后取并集
    /// - 其余张数：空集
    ///
    /// 自己手牌与副露中已有 4 张的牌不计入听牌
    ///
    /// # 参数
    ///
    /// - `hand`: 暗手
    /// - `melds`: 副露与暗杠
    ///
    /// # 返回
    ///
    /// 按牌序排列、无重复的听牌
    pub fn check_ready(hand: &Hand, melds: &[Meld]) -> Vec<Tile> {
        Self::check_ready_with(&mut WinChecker::new(), hand, melds)
    }

    /// 同 `check_ready`，复用调用方的和牌判定器缓存
    pub fn check_ready_with(checker: &mut WinChecker, hand: &Hand, melds: &[Meld]) -> Vec<Tile> {
        let complete_size = 14 - 3 * melds.len().min(4);
        let mut marks = [false; Tile::KIND_COUNT];

        if hand.total_count() + 1 == complete_size {
            Self::mark_waits(checker, hand, melds, &mut marks);
        } else if hand.total_count() == complete_size {
            for tile in hand.distinct_tiles() {
                let mut rest = hand.clone();
                rest.remove_tile(tile);
                Self::mark_waits(checker, &rest, melds, &mut marks);
            }
        }

        marks
            .iter()
            .enumerate()
            .filter(|(_, &marked)| marked)
            .filter_map(|(index, _)| Tile::from_index(index))
            .collect()
    }

    fn mark_waits(checker: &mut WinChecker, hand: &Hand, melds: &[Meld], marks: &mut [bool; Tile::KIND_COUNT]) {
        for tile in Tile::all_kinds() {
            if marks[tile.to_index()] || Self::own_copies(hand, melds, tile) >= 4 {
                continue;
            }
            let mut test_hand = hand.clone();
            test_hand.add_tile(tile);
            if checker.check_win_with_melds(&test_hand, melds.len()).is_win {
                marks[tile.to_index()] = true;
            }
        }
    }

    fn own_copies(hand: &Hand, melds: &[Meld], tile: Tile) -> usize {
        let in_melds: usize = melds
            .iter()
            .map(|m| m.tiles().iter().filter(|&&t| t == tile).count())
            .sum();
        hand.tile_count(tile) as usize + in_melds
    }

    /// 检查是否听牌
    pub fn is_ready(hand: &Hand, melds: &[Meld]) -> bool {
        !ReadyChecker::check_ready(hand, melds).is_empty()
    }

    /// 打出每一张牌后仍听牌的选择（立直候选）
    ///
    /// # 返回
    ///
    /// `(打出的牌, 打出后的听牌集合)`，按牌序排列
    pub fn discard_candidates(checker: &mut WinChecker, hand: &Hand, melds: &[Meld]) -> Vec<(Tile, Vec<Tile>)> {
        if hand.total_count() != 14 - 3 * melds.len().min(4) {
            return Vec::new();
        }
        hand.distinct_tiles()
            .into_iter()
            .filter_map(|tile| {
                let mut rest = hand.clone();
                rest.remove_tile(tile);
                let waits = Self::check_ready_with(checker, &rest, melds);
                (!waits.is_empty()).then_some((tile, waits))
            })
            .collect()
    }

    /// 从一副和牌构造「差一张和牌」的测试手
    ///
    /// 依次尝试去掉每种牌，返回第一个剩余部分仍以该牌为听牌的组合
    ///
    /// # 参数
    ///
    /// - `tiles`: 14 张门清和牌
    ///
    /// # 返回
    ///
    /// 不是和牌时返回 None
    pub fn make_tenpai(tiles: &[Tile]) -> Option<TenpaiFixture> {
        let full = Hand::from_tiles(tiles)?;
        let mut checker = WinChecker::new();
        if !checker.check_win(&full).is_win {
            return None;
        }
        full.distinct_tiles().into_iter().find_map(|tile| {
            let mut hand = full.clone();
            hand.remove_tile(tile);
            Self::check_ready_with(&mut checker, &hand, &[])
                .contains(&tile)
                .then(|| TenpaiFixture { hand, winning_tile: tile })
        })
    }
}
