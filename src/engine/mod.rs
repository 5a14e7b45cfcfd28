/// 面向 AI 的接口
///
/// 动作掩码与动作空间编码

pub mod action_mask;

pub use action_mask::{ActionMask, ACTION_SPACE_SIZE};
