use std::sync::Arc;

use log::{debug, info, trace, warn};
use smallvec::SmallVec;

use crate::engine::action_mask::ActionMask;
use crate::game::action::Action;
use crate::game::action_callback::ActionCallback;
use crate::game::chow::ChowHandler;
use crate::game::claims::{ClaimChecker, ClaimKind, ClaimOptions, ClaimResponse, EligibleSeat, PendingClaims, Resolution};
use crate::game::constants::{MAX_QUADS_PER_HAND, MAX_STEPS, NUM_PLAYERS};
use crate::game::event::GameEvent;
use crate::game::kong::KongHandler;
use crate::game::player::DiscardRecord;
use crate::game::pong::PongHandler;
use crate::game::ready::ReadyChecker;
use crate::game::round::{RoundController, RoundProgress};
use crate::game::rules::{self, GameRule};
use crate::game::scoring::{BasicEvaluator, HandEvaluator, HandValue, WinContext};
use crate::game::state::{GameState, Phase};
use crate::tile::{Tile, WinChecker};

pub use crate::error::GameError;

/// 动作处理结果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActionResult {
    /// 轮到该座位打牌；`drawn` 为刚摸到的牌（鸣牌后为 None）
    NextTurn { seat: u8, drawn: Option<Tile> },
    /// 舍牌打出后等待其他座位响应
    AwaitingClaims {
        discarder: u8,
        tile: Tile,
        eligible: SmallVec<[u8; 3]>,
    },
    /// 响应已记录，仍在等待这些座位
    ClaimPending { undecided: SmallVec<[u8; 3]> },
    /// 本局结束（下一局已自动配牌，除非整场结束）
    HandEnded(HandResult),
}

/// 和牌记录
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinRecord {
    pub winner: u8,
    /// 放铳者（自摸为 None）
    pub discarder: Option<u8>,
    pub win_tile: Tile,
    pub value: HandValue,
    /// 公开的里宝牌指示牌（和牌者未立直时为空）
    pub ura_indicators: Vec<Tile>,
}

/// 一局的结局
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandOutcome {
    Win(WinRecord),
    /// 荒牌流局，列出听牌的座位
    ExhaustiveDraw { tenpai: Vec<u8> },
}

/// 一局的结果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HandResult {
    pub hand_number: u32,
    pub outcome: HandOutcome,
    /// 结束后的场况
    pub progress: RoundProgress,
}

/// 整场游戏结果
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameResult {
    /// 按顺序的每局结果
    pub hands: Vec<HandResult>,
}

/// 游戏引擎
///
/// 负责管理游戏流程和动作处理。所有被拒绝的操作都在修改状态前返回错误。
#[derive(Clone)]
pub struct GameEngine {
    /// 游戏状态
    pub state: GameState,
    rule: GameRule,
    evaluator: Arc<dyn HandEvaluator>,
    checker: WinChecker,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// 使用内置点数计算创建引擎
    pub fn new(rule: GameRule) -> Self {
        Self::with_evaluator(rule, Arc::new(BasicEvaluator))
    }

    /// 使用自定义点数计算创建引擎
    pub fn with_evaluator(rule: GameRule, evaluator: Arc<dyn HandEvaluator>) -> Self {
        Self {
            state: GameState::new(rule.seed),
            rule,
            evaluator,
            checker: WinChecker::new(),
            events: Vec::new(),
        }
    }

    pub fn rule(&self) -> &GameRule {
        &self.rule
    }

    /// 开始整场游戏：重置状态并配第一局
    pub fn start_game(&mut self) -> ActionResult {
        self.state = GameState::new(self.rule.seed);
        self.events.clear();
        self.start_hand()
    }

    /// 配牌开始新的一局，亲家先行动
    pub fn start_hand(&mut self) -> ActionResult {
        RoundController::deal(&mut self.state);
        let dealer = self.state.dealer;
        self.events.push(GameEvent::HandStarted {
            hand_number: self.state.hand_number,
            dealer,
            round_wind: self.state.round_wind,
            honba: self.state.honba,
            indicator: self.state.wall.dora_indicators().first().copied(),
        });
        ActionResult::NextTurn {
            seat: dealer,
            drawn: self.state.player_ref(dealer).last_drawn,
        }
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.state.is_game_over {
            return Err(GameError::GameAlreadyOver);
        }
        Ok(())
    }

    fn ensure_turn(&self, seat: u8) -> Result<(), GameError> {
        self.ensure_running()?;
        if seat >= NUM_PLAYERS {
            return Err(GameError::InvalidPlayer);
        }
        match self.state.phase {
            Phase::Discarding { seat: current } if current == seat => Ok(()),
            _ => Err(GameError::WrongTurn { seat }),
        }
    }

    /// 打牌
    ///
    /// # 参数
    ///
    /// - `seat`: 打牌的座位
    /// - `tile`: 打出的牌
    /// - `declare_lock`: 是否同时宣言立直
    ///
    /// # 返回
    ///
    /// 打出后的局面：等待鸣牌响应，或下一家摸牌后的回合，或本局结束
    pub fn submit_discard(&mut self, seat: u8, tile: Tile, declare_lock: bool) -> Result<ActionResult, GameError> {
        self.ensure_turn(seat)?;
        let player = self.state.player_ref(seat);
        if !player.hand.has_tile(tile) {
            return Err(GameError::TileNotInHand { tile });
        }
        if player.is_locked && player.last_drawn != Some(tile) {
            return Err(GameError::IllegalDiscard { tile });
        }
        let lock_waits = if declare_lock {
            Some(rules::check_lock_declaration(&mut self.checker, player, tile)?)
        } else {
            None
        };

        let player = self.state.player_mut(seat);
        let discarded = player.discard(DiscardRecord {
            is_lock_declaration: declare_lock,
            ..DiscardRecord::new(tile)
        });
        debug_assert!(discarded, "seat {} lost {} before discarding", seat, tile);
        self.events.push(GameEvent::Discarded {
            seat,
            tile,
            is_auto: false,
            declare_lock,
        });
        match lock_waits {
            Some(waits) => {
                info!("seat {} declares riichi waiting on {:?}", seat, waits);
                player.lock(waits.clone());
                self.state.first_turn_bonus[seat as usize] = true;
                self.events.push(GameEvent::LockDeclared { seat, waits });
            }
            None => self.state.first_turn_bonus[seat as usize] = false,
        }

        match self.open_claim_window(seat, tile) {
            Some(result) => Ok(result),
            None => Ok(self.advance_and_draw(GameState::next_seat(seat))),
        }
    }

    /// 按手牌排序后的位置打牌
    pub fn submit_discard_at(&mut self, seat: u8, index: usize, declare_lock: bool) -> Result<ActionResult, GameError> {
        self.ensure_turn(seat)?;
        let hand = &self.state.player_ref(seat).hand;
        let tile = hand.tile_at(index).ok_or(GameError::InvalidIndex {
            index,
            len: hand.total_count(),
        })?;
        self.submit_discard(seat, tile, declare_lock)
    }

    /// 计算舍牌的鸣牌资格；有座位可鸣牌时进入等待阶段
    ///
    /// 返回 None 表示无人可鸣，调用方继续摸牌
    fn open_claim_window(&mut self, discarder: u8, tile: Tile) -> Option<ActionResult> {
        let wall_empty = self.state.wall.is_empty();
        let allow_exposing = !wall_empty || self.rule.allow_claims_on_last_tile;
        let allow_quad = !wall_empty && self.state.quads_formed < MAX_QUADS_PER_HAND;

        let mut eligible: SmallVec<[EligibleSeat; 3]> = SmallVec::new();
        for offset in 1..NUM_PLAYERS {
            let seat = (discarder + offset) % NUM_PLAYERS;
            let options = ClaimChecker::legal_claims(
                &mut self.checker,
                self.state.player_ref(seat),
                tile,
                offset == 1,
                allow_exposing,
                allow_quad,
            );
            if options.any() {
                eligible.push(EligibleSeat { seat, offset, options });
            }
        }
        if eligible.is_empty() {
            return None;
        }

        let seats: SmallVec<[u8; 3]> = eligible.iter().map(|e| e.seat).collect();
        debug!("claim window on {} from seat {}: eligible {:?}", tile, discarder, seats);
        self.state.phase = Phase::AwaitingClaims(PendingClaims::new(discarder, tile, eligible));
        Some(ActionResult::AwaitingClaims {
            discarder,
            tile,
            eligible: seats,
        })
    }

    /// 摸牌并处理立直者的自动摸切
    ///
    /// 立直者摸到听牌之外的牌（且不能用它暗杠）时自动打出并重新计算鸣牌资格，
    /// 直到轮到一个需要自己决定的座位、有人可以鸣牌或牌墙摸空为止
    fn advance_and_draw(&mut self, mut seat: u8) -> ActionResult {
        loop {
            let Some(tile) = self.state.wall.draw() else {
                return self.finish_exhaustive_draw();
            };
            self.state.phase = Phase::Discarding { seat };
            let player = self.state.player_mut(seat);
            player.hand.add_tile(tile);
            player.last_drawn = Some(tile);
            self.events.push(GameEvent::Drew { seat, tile });

            let player = self.state.player_ref(seat);
            let decides = !player.is_locked
                || player.locked_waits.contains(&tile)
                || rules::check_closed_quad(
                    &mut self.checker,
                    player,
                    tile,
                    self.state.wall.is_empty(),
                    self.state.quads_formed,
                )
                .is_ok();
            if decides {
                return ActionResult::NextTurn { seat, drawn: Some(tile) };
            }

            trace!("seat {} auto-discards {}", seat, tile);
            let player = self.state.player_mut(seat);
            let discarded = player.discard(DiscardRecord {
                is_auto: true,
                ..DiscardRecord::new(tile)
            });
            debug_assert!(discarded, "seat {} lost its draw {}", seat, tile);
            self.state.first_turn_bonus[seat as usize] = false;
            self.events.push(GameEvent::Discarded {
                seat,
                tile,
                is_auto: true,
                declare_lock: false,
            });
            if let Some(result) = self.open_claim_window(seat, tile) {
                return result;
            }
            seat = GameState::next_seat(seat);
        }
    }

    /// 提交对舍牌的响应
    ///
    /// # 参数
    ///
    /// - `seat`: 响应的座位
    /// - `response`: 荣和、碰、杠、吃（附手中两张牌）或过
    pub fn submit_claim_response(&mut self, seat: u8, response: ClaimResponse) -> Result<ActionResult, GameError> {
        self.ensure_running()?;
        if seat >= NUM_PLAYERS {
            return Err(GameError::InvalidPlayer);
        }
        let Phase::AwaitingClaims(pending) = &mut self.state.phase else {
            return Err(GameError::NoPendingClaim);
        };
        pending.record(seat, response)?;
        trace!("seat {} responds {:?}", seat, response);

        let (resolution, discarder, tile) = (pending.resolve(), pending.discarder, pending.tile);
        Ok(self.execute_resolution(resolution, discarder, tile))
    }

    /// 执行仲裁结果；仍未决时只报告等待中的座位
    fn execute_resolution(&mut self, resolution: Resolution, discarder: u8, tile: Tile) -> ActionResult {
        if resolution != Resolution::Undecided {
            debug!("claim window on {} resolved: {:?}", tile, resolution);
        }
        let (seat, kind, applied) = match resolution {
            Resolution::Undecided => {
                return ActionResult::ClaimPending {
                    undecided: self.state.pending_claims().map(PendingClaims::undecided).unwrap_or_default(),
                };
            }
            Resolution::AllPass => return self.advance_and_draw(GameState::next_seat(discarder)),
            Resolution::Win { seat } => return self.finish_win(seat, Some(discarder), tile),
            Resolution::Triplet { seat } => {
                let applied = PongHandler::pong(self.state.player_mut(seat), tile, discarder);
                (seat, ClaimKind::Triplet, applied)
            }
            Resolution::Quad { seat } => {
                let applied = KongHandler::open_kong(self.state.player_mut(seat), tile, discarder);
                (seat, ClaimKind::Quad, applied)
            }
            Resolution::Sequence { seat, with } => {
                let applied = ChowHandler::chow(self.state.player_mut(seat), tile, with, discarder);
                (seat, ClaimKind::Sequence, applied)
            }
        };
        // 窗口中的可选项由手牌生成，恢复时也经过校验
        debug_assert!(applied, "seat {} cannot complete {:?} on {}", seat, kind, tile);

        self.state.player_mut(discarder).mark_last_discard_claimed(seat);
        self.state.clear_first_turn_bonus();
        self.events.push(GameEvent::Claimed {
            seat,
            from: discarder,
            tile,
            kind,
        });
        info!("seat {} claims {} from seat {} as {:?}", seat, tile, discarder, kind);

        if kind == ClaimKind::Quad {
            self.state.quads_formed += 1;
            self.reveal_indicator();
            return self.advance_and_draw(seat);
        }
        self.state.phase = Phase::Discarding { seat };
        ActionResult::NextTurn { seat, drawn: None }
    }

    fn reveal_indicator(&mut self) {
        if let Some(tile) = self.state.wall.reveal_next_indicator() {
            self.events.push(GameEvent::IndicatorRevealed { tile });
        }
    }

    /// 自摸和
    ///
    /// 只能在本回合摸牌之后宣言（鸣牌后的回合不能自摸）
    pub fn declare_self_draw_win(&mut self, seat: u8) -> Result<ActionResult, GameError> {
        self.ensure_turn(seat)?;
        let player = self.state.player_ref(seat);
        let tile = player.last_drawn.ok_or(GameError::NotAWinningHand)?;
        if !self.checker.check_win_with_melds(&player.hand, player.melds.len()).is_win {
            return Err(GameError::NotAWinningHand);
        }
        Ok(self.finish_win(seat, None, tile))
    }

    /// 暗杠
    ///
    /// 翻开一张新的宝牌指示牌，并从牌墙补摸一张
    pub fn declare_closed_quad(&mut self, seat: u8, tile: Tile) -> Result<ActionResult, GameError> {
        self.ensure_turn(seat)?;
        rules::check_closed_quad(
            &mut self.checker,
            self.state.player_ref(seat),
            tile,
            self.state.wall.is_empty(),
            self.state.quads_formed,
        )?;

        let applied = KongHandler::concealed_kong(self.state.player_mut(seat), tile);
        debug_assert!(applied, "seat {} cannot quad {}", seat, tile);
        self.state.quads_formed += 1;
        self.state.clear_first_turn_bonus();
        self.events.push(GameEvent::ClosedQuad { seat, tile });
        info!("seat {} declares a closed quad of {}", seat, tile);
        self.reveal_indicator();
        Ok(self.advance_and_draw(seat))
    }

    /// 和牌结算并推进到下一局
    fn finish_win(&mut self, winner: u8, from: Option<u8>, tile: Tile) -> ActionResult {
        if let Some(discarder) = from {
            self.state.player_mut(winner).hand.add_tile(tile);
            self.state.player_mut(discarder).mark_last_discard_claimed(winner);
        }
        self.state.phase = Phase::Discarding { seat: winner };

        let player = self.state.player_ref(winner);
        let ura_indicators = if player.is_locked {
            self.state.wall.ura_indicators()
        } else {
            Vec::new()
        };
        let ctx = WinContext {
            concealed: player.hand.clone(),
            win_tile: tile,
            melds: player.melds.clone(),
            is_self_draw: from.is_none(),
            is_dealer: winner == self.state.dealer,
            seat_wind: self.state.seat_wind(winner),
            round_wind: self.state.round_wind,
            bonus_indicators: self.state.wall.dora_indicators(),
            ura_indicators: ura_indicators.clone(),
            declared_lock: player.is_locked,
            first_turn_bonus: self.state.first_turn_bonus[winner as usize],
            carry_over: self.state.honba,
        };
        let value = self.evaluator.evaluate(&ctx);
        if !value.valid {
            warn!("evaluator rejected win by seat {}: {:?}", winner, value.error);
        }

        let progress = RoundController::after_win(&self.state, winner, &self.rule);
        info!(
            "hand {}: seat {} wins on {} ({}) for {} points",
            self.state.hand_number,
            winner,
            tile,
            if from.is_some() { "ron" } else { "tsumo" },
            value.points
        );
        self.events.push(GameEvent::Won {
            winner,
            from,
            tile,
            points: value.points,
        });
        let outcome = HandOutcome::Win(WinRecord {
            winner,
            discarder: from,
            win_tile: tile,
            value,
            ura_indicators,
        });
        self.end_hand(outcome, progress)
    }

    /// 荒牌流局
    fn finish_exhaustive_draw(&mut self) -> ActionResult {
        let mut tenpai = Vec::new();
        for player in &self.state.players {
            if player.is_locked || !ReadyChecker::check_ready_with(&mut self.checker, &player.hand, &player.melds).is_empty() {
                tenpai.push(player.seat);
            }
        }
        let dealer_tenpai = tenpai.contains(&self.state.dealer);
        let progress = RoundController::after_exhaustive_draw(&self.state, dealer_tenpai, &self.rule);
        info!("hand {}: exhaustive draw, tenpai {:?}", self.state.hand_number, tenpai);
        self.events.push(GameEvent::ExhaustiveDraw { tenpai: tenpai.clone() });
        self.end_hand(HandOutcome::ExhaustiveDraw { tenpai }, progress)
    }

    fn end_hand(&mut self, outcome: HandOutcome, progress: RoundProgress) -> ActionResult {
        let result = HandResult {
            hand_number: self.state.hand_number,
            outcome,
            progress,
        };
        RoundController::apply(&mut self.state, &progress);
        if self.state.is_game_over {
            info!("game over after hand {}", self.state.hand_number);
            self.events.push(GameEvent::GameOver);
        } else {
            self.start_hand();
        }
        ActionResult::HandEnded(result)
    }

    /// 查询座位的听牌集合
    ///
    /// 立直者返回立直时固定的集合；14 张形的手牌返回打出任意一张后的并集
    pub fn wait_set(&mut self, seat: u8) -> Result<Vec<Tile>, GameError> {
        if seat >= NUM_PLAYERS {
            return Err(GameError::InvalidPlayer);
        }
        let player = self.state.player_ref(seat);
        if player.is_locked {
            return Ok(player.locked_waits.clone());
        }
        Ok(ReadyChecker::check_ready_with(&mut self.checker, &player.hand, &player.melds))
    }

    /// 查询座位对当前行动者打出 `tile` 时的可选鸣牌
    ///
    /// 行动者本人没有可选项
    pub fn legal_claims(&mut self, seat: u8, tile: Tile) -> Result<ClaimOptions, GameError> {
        if seat >= NUM_PLAYERS {
            return Err(GameError::InvalidPlayer);
        }
        let discarder = self.state.current_seat();
        if seat == discarder {
            return Ok(ClaimOptions::default());
        }
        let wall_empty = self.state.wall.is_empty();
        Ok(ClaimChecker::legal_claims(
            &mut self.checker,
            self.state.player_ref(seat),
            tile,
            GameState::seat_offset(discarder, seat) == 1,
            !wall_empty || self.rule.allow_claims_on_last_tile,
            !wall_empty && self.state.quads_formed < MAX_QUADS_PER_HAND,
        ))
    }

    /// 座位当前的合法动作
    pub fn action_mask(&mut self, seat: u8) -> ActionMask {
        ActionMask::generate(&self.state, seat, &mut self.checker)
    }

    /// 状态快照
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// 从快照恢复
    pub fn restore(&mut self, state: GameState) -> Result<(), GameError> {
        state.validate()?;
        self.state = state;
        self.events.clear();
        Ok(())
    }

    pub fn snapshot_json(&self) -> Result<String, GameError> {
        self.state.to_json()
    }

    pub fn restore_json(&mut self, json: &str) -> Result<(), GameError> {
        self.restore(GameState::from_json(json)?)
    }

    /// 取走累计的事件
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over
    }

    /// 处理动作
    ///
    /// # 参数
    ///
    /// - `seat`: 执行动作的座位
    /// - `action`: 动作
    pub fn process_action(&mut self, seat: u8, action: Action) -> Result<ActionResult, GameError> {
        match action {
            Action::Discard { tile, declare_lock } => self.submit_discard(seat, tile, declare_lock),
            Action::SelfDrawWin => self.declare_self_draw_win(seat),
            Action::ClosedQuad { tile } => self.declare_closed_quad(seat, tile),
            Action::Claim(response) => self.submit_claim_response(seat, response),
        }
    }

    /// 需要做决定的座位：打牌阶段为行动者，鸣牌窗口中为第一个未响应的座位
    pub fn acting_seat(&self) -> Option<u8> {
        if self.state.is_game_over {
            return None;
        }
        match &self.state.phase {
            Phase::Discarding { seat } => Some(*seat),
            Phase::AwaitingClaims(pending) => pending.undecided().first().copied(),
        }
    }

    /// 向回调询问一个动作并执行
    pub fn step<C: ActionCallback + ?Sized>(&mut self, callback: &mut C) -> Result<ActionResult, GameError> {
        let seat = self.acting_seat().ok_or(GameError::GameAlreadyOver)?;
        let action = callback.get_action(&self.state, seat);
        self.process_action(seat, action)
    }

    /// 运行到本局结束
    pub fn run_hand<C: ActionCallback + ?Sized>(&mut self, callback: &mut C) -> Result<HandResult, GameError> {
        for _ in 0..MAX_STEPS {
            if let ActionResult::HandEnded(result) = self.step(callback)? {
                return Ok(result);
            }
        }
        Err(GameError::Config {
            message: format!("hand did not finish within {} steps", MAX_STEPS),
        })
    }

    /// 运行一场完整的游戏
    ///
    /// # 参数
    ///
    /// - `callback`: 动作回调，根据游戏状态返回座位的动作
    ///
    /// # 返回
    ///
    /// 每局的结果
    pub fn run<C: ActionCallback + ?Sized>(&mut self, callback: &mut C) -> Result<GameResult, GameError> {
        if self.state.hand_number == 0 {
            self.start_game();
        }
        let mut result = GameResult::default();
        while !self.state.is_game_over {
            result.hands.push(self.run_hand(callback)?);
        }
        Ok(result)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(GameRule::default())
    }
}
