/// 立直麻将规则引擎
///
/// 牌墙与王牌、向听数、听牌计算、鸣牌仲裁、立直后的自动摸切与局的推进

pub mod tile;
pub mod game;
pub mod engine;
pub mod error;

// 重新导出常用类型
pub use tile::{parse_tiles, Hand, Honor, Suit, Tile, Wall, WinChecker};
pub use error::GameError;
pub use game::meld::Meld;
pub use game::state::{GameState, Phase, Wind};
pub use game::action::Action;
pub use game::player::{DiscardRecord, Player};
pub use game::event::GameEvent;
pub use game::rules::{ExhaustiveDrawPolicy, GameRule};
pub use game::shanten::{calculate_shanten, ShantenCalculator};
pub use game::ready::ReadyChecker;
pub use game::kong::KongHandler;
pub use game::pong::PongHandler;
pub use game::chow::ChowHandler;
pub use game::claims::{ClaimOptions, ClaimResponse, PendingClaims, Resolution};
pub use game::round::{RoundController, RoundProgress};
pub use game::scoring::{BasicEvaluator, HandEvaluator, HandValue, WinContext};
pub use engine::action_mask::ActionMask;
pub use game::game_engine::{ActionResult, GameEngine, GameResult, HandOutcome, HandResult, WinRecord};
pub use game::action_callback::{ActionCallback, FnActionCallback, GreedyShantenCallback, RandomCallback};
