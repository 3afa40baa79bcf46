//! # Presets 模块
//!
//! 常用的列表单元格效果，全部由 [`EffectStep`](crate::EffectStep) 组合而成。
//!
//! ```text
//! Preset + PresetContext ──build()──► EffectSequence ──► EffectPlayer::play
//! ```
//!
//! - [`registry`]：预设枚举、名称查找与默认参数
//! - [`builder`]：把预设展开为序列

mod builder;
mod registry;

pub use builder::PresetContext;
pub use registry::{Preset, defaults};
