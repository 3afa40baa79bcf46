//! # Effect Runtime
//!
//! 列表单元格动画效果的核心运行时库。
//!
//! ## 架构概述
//!
//! `effect-runtime` 只负责效果的描述与编排，不做任何渲染。
//! 具体的插值和绘制由宿主实现的 [`AnimationRunner`] 完成：
//!
//! ```text
//! Host                                 Runtime
//!   │                                     │
//!   │──── play(sequence, target) ───────►│ EffectPlayer
//!   │◄─── submit(step, target, cb) ──────│
//!   │──── cb(true / false) ─────────────►│ 下一步 / 重复 / 中止
//!   │◄─── on_complete(Result) ───────────│
//! ```
//!
//! ## 核心类型
//!
//! - [`EffectStep`]：单个动画阶段（目标值、时长、延迟、缓动、重复、自动反向）
//! - [`EffectSequence`]：有序的步骤列表
//! - [`EffectPlayer`]：逐步把序列交给 Runner 执行
//! - [`PlaybackHandle`]：查询与取消一次播放
//! - [`Preset`]：内置的常用效果
//!
//! ## 使用示例
//!
//! ```ignore
//! use std::rc::Rc;
//! use effect_runtime::{EffectPlayer, Preset, PresetContext, TimelineRunner, TransformTarget};
//!
//! let runner = Rc::new(TimelineRunner::new());
//! let player = EffectPlayer::new(Rc::clone(&runner));
//! let cell = Rc::new(TransformTarget::new());
//!
//! let sequence = Preset::SlideInFromLeft.build(&PresetContext::default())?;
//! let handle = player.play(&sequence, &cell, None);
//!
//! // 主循环
//! while !handle.is_finished() {
//!     runner.update(dt);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`property`]：可动画属性
//! - [`easing`]：缓动曲线
//! - [`step`] / [`sequence`]：效果描述
//! - [`target`]：动画目标接口
//! - [`runner`]：Runner 接口与内置实现
//! - [`player`]：播放器
//! - [`presets`]：预设效果
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod config;
pub mod easing;
pub mod error;
pub mod player;
pub mod presets;
pub mod property;
pub mod runner;
pub mod sequence;
pub mod step;
pub mod target;

// 重导出核心类型
pub use config::{EffectConfig, ScreenConfig, TimelineConfig};
pub use easing::Easing;
pub use error::{AbortReason, ConfigError, EffectError, EffectResult};
pub use player::{
    CompletionCallback, EffectPlayer, PlaybackHandle, PlaybackId, PlaybackState, PlaybackSummary,
};
pub use presets::{Preset, PresetContext};
pub use property::{Property, PropertyMap, identity_transform};
pub use runner::{
    AnimationRunner, RecordingMode, RecordingRunner, RunTicket, StepCallback, Submission,
    TimelineRunner,
};
pub use sequence::EffectSequence;
pub use step::{EffectStep, StepBuilder};
pub use target::{Animatable, TransformTarget};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let step = EffectStep::builder(0.3)
            .to(Property::Alpha, 0.0)
            .easing(Easing::Linear)
            .build()
            .unwrap();
        let sequence = EffectSequence::single(step);
        assert_eq!(sequence.len(), 1);

        let _config = EffectConfig::default();
        let _preset = Preset::from_name("fade_in");
        let _target = TransformTarget::new();
        let _runner = RecordingRunner::new(RecordingMode::AutoSucceed);
    }
}
