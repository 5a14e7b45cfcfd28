use crate::tile::Tile;
use smallvec::SmallVec;

/// 副露（吃、碰、杠）与暗杠
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Meld {
    /// 吃（顺子），`claimed_pos` 为鸣入的牌在顺子中的位置（0-2）
    Sequence { start: Tile, claimed_pos: u8, from: u8 },
    /// 碰（刻子）
    Triplet { tile: Tile, from: u8 },
    /// 杠；`from` 为 None 表示暗杠
    Quad { tile: Tile, from: Option<u8> },
}

impl Meld {
    /// 由鸣入的牌和手中两张牌组成吃；不成顺子时返回 None
    pub fn sequence(claimed: Tile, with: [Tile; 2], from: u8) -> Option<Meld> {
        if !claimed.can_form_sequence(&with[0], &with[1]) {
            return None;
        }
        let mut tiles = [claimed, with[0], with[1]];
        tiles.sort();
        let claimed_pos = tiles.iter().position(|&t| t == claimed)? as u8;
        Some(Meld::Sequence {
            start: tiles[0],
            claimed_pos,
            from,
        })
    }

    /// 组成该副露的全部牌
    pub fn tiles(&self) -> SmallVec<[Tile; 4]> {
        match *self {
            Meld::Sequence { start, .. } => (0..3).filter_map(|d| start.offset(d)).collect(),
            Meld::Triplet { tile, .. } => SmallVec::from_elem(tile, 3),
            Meld::Quad { tile, .. } => SmallVec::from_elem(tile, 4),
        }
    }

    /// 牌数（杠为 4，其余为 3）
    pub fn tile_count(&self) -> usize {
        match self {
            Meld::Quad { .. } => 4,
            _ => 3,
        }
    }

    /// 是否为明副露（暗杠不破坏门清）
    pub fn is_open(&self) -> bool {
        !matches!(self, Meld::Quad { from: None, .. })
    }

    /// 是否包含某张牌
    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles().contains(&tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_positions() {
        let meld = Meld::sequence(Tile::Man(4), [Tile::Man(2), Tile::Man(3)], 0).unwrap();
        assert_eq!(
            meld,
            Meld::Sequence {
                start: Tile::Man(2),
                claimed_pos: 2,
                from: 0
            }
        );
        assert_eq!(meld.tiles().as_slice(), &[Tile::Man(2), Tile::Man(3), Tile::Man(4)]);

        let middle = Meld::sequence(Tile::Sou(5), [Tile::Sou(4), Tile::Sou(6)], 3).unwrap();
        assert!(matches!(middle, Meld::Sequence { claimed_pos: 1, .. }));
    }

    #[test]
    fn test_sequence_rejects_non_runs() {
        assert!(Meld::sequence(Tile::Man(4), [Tile::Pin(5), Tile::Pin(6)], 0).is_none());
        assert!(Meld::sequence(Tile::Man(4), [Tile::Man(4), Tile::Man(5)], 0).is_none());
    }

    #[test]
    fn test_quad_openness() {
        let closed = Meld::Quad { tile: Tile::Pin(9), from: None };
        let open = Meld::Quad { tile: Tile::Pin(9), from: Some(1) };
        assert!(!closed.is_open());
        assert!(open.is_open());
        assert_eq!(closed.tile_count(), 4);
        assert_eq!(Meld::Triplet { tile: Tile::Man(1), from: 2 }.tiles().len(), 3);
    }
}
