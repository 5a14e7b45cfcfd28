use crate::game::meld::Meld;
use crate::game::state::Wind;
use crate::tile::{Hand, Tile, WinChecker};

/// 和牌时交给点数计算的上下文
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinContext {
    /// 和牌时的暗手（含和了牌，14 - 3k 张）
    pub concealed: Hand,
    /// 和了牌
    pub win_tile: Tile,
    /// 副露与暗杠
    pub melds: Vec<Meld>,
    /// 是否自摸
    pub is_self_draw: bool,
    /// 是否亲家
    pub is_dealer: bool,
    /// 自风
    pub seat_wind: Wind,
    /// 场风
    pub round_wind: Wind,
    /// 已翻开的宝牌指示牌
    pub bonus_indicators: Vec<Tile>,
    /// 里宝牌指示牌（仅立直者和牌时公开）
    pub ura_indicators: Vec<Tile>,
    /// 是否立直
    pub declared_lock: bool,
    /// 是否一发
    pub first_turn_bonus: bool,
    /// 本场数
    pub carry_over: u32,
}

/// 番符明细
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScoreBreakdown {
    pub han: u32,
    pub fu: u32,
    /// 基本点
    pub base_points: u32,
    /// 本场加点
    pub carry_over_points: u32,
}

/// 点数计算结果
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HandValue {
    pub valid: bool,
    pub error: Option<String>,
    /// 和牌者的总收入
    pub points: u32,
    pub breakdown: ScoreBreakdown,
    /// 成立的役与宝牌
    pub bonus_list: Vec<String>,
}

impl HandValue {
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// 点数计算接口
///
/// 引擎只负责在和牌时调用，不依赖具体的役种实现
pub trait HandEvaluator: Send + Sync {
    fn evaluate(&self, ctx: &WinContext) -> HandValue;
}

/// 内置的简化点数计算
///
/// 只统计立直、一发、门前清自摸、宝牌与里宝牌，固定 30 符，满贯封顶
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEvaluator;

impl BasicEvaluator {
    /// 宝牌数：每张指示牌所指的牌在和牌中的张数
    pub fn count_dora(ctx: &WinContext, indicators: &[Tile]) -> u32 {
        let all_tiles: Vec<Tile> = ctx
            .concealed
            .to_sorted_vec()
            .into_iter()
            .chain(ctx.melds.iter().flat_map(|m| m.tiles()))
            .collect();
        indicators
            .iter()
            .map(|indicator| {
                let dora = indicator.dora_successor();
                all_tiles.iter().filter(|&&t| t == dora).count() as u32
            })
            .sum()
    }

    /// 基本点：fu × 2^(han + 2)，按满贯、跳满、倍满、三倍满、役满封顶
    pub fn base_points(han: u32, fu: u32) -> u32 {
        match han {
            0..=4 => (fu * (1 << (han + 2))).min(2000),
            5 => 2000,
            6 | 7 => 3000,
            8..=10 => 4000,
            11 | 12 => 6000,
            _ => 8000,
        }
    }

    fn round_up_100(points: u32) -> u32 {
        points.div_ceil(100) * 100
    }
}

impl HandEvaluator for BasicEvaluator {
    fn evaluate(&self, ctx: &WinContext) -> HandValue {
        if !WinChecker::new().check_win_with_melds(&ctx.concealed, ctx.melds.len()).is_win {
            return HandValue::invalid("hand is not complete");
        }

        let menzen = ctx.melds.iter().all(|m| !m.is_open());
        let mut bonus_list = Vec::new();
        let mut han = 0;
        if ctx.declared_lock {
            bonus_list.push("Riichi".to_string());
            han += 1;
            if ctx.first_turn_bonus {
                bonus_list.push("Ippatsu".to_string());
                han += 1;
            }
        }
        if ctx.is_self_draw && menzen {
            bonus_list.push("Menzen Tsumo".to_string());
            han += 1;
        }
        let dora = Self::count_dora(ctx, &ctx.bonus_indicators);
        if dora > 0 {
            bonus_list.push(format!("Dora {}", dora));
            han += dora;
        }
        let ura = Self::count_dora(ctx, &ctx.ura_indicators);
        if ura > 0 {
            bonus_list.push(format!("Ura Dora {}", ura));
            han += ura;
        }
        // 无役时按一番计
        let han = han.max(1);

        let fu = 30;
        let base_points = Self::base_points(han, fu);
        let multiplier = if ctx.is_dealer { 6 } else { 4 };
        let carry_over_points = 300 * ctx.carry_over;
        let points = Self::round_up_100(base_points * multiplier) + carry_over_points;

        HandValue {
            valid: true,
            error: None,
            points,
            breakdown: ScoreBreakdown {
                han,
                fu,
                base_points,
                carry_over_points,
            },
            bonus_list,
        }
    }
}
