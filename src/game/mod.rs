/// 游戏逻辑模块
///
/// 包含游戏状态、玩家、鸣牌、向听与听牌计算、局的推进和对局引擎

pub mod constants;
pub mod meld;
pub mod player;
pub mod state;
pub mod action;
pub mod event;
pub mod rules;
pub mod shanten;
pub mod ready;
pub mod pong;
pub mod kong;
pub mod chow;
pub mod claims;
pub mod round;
pub mod scoring;
pub mod game_engine;
pub mod action_callback;
