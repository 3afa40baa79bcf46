//! # Preset Builder
//!
//! 把 [`Preset`] 展开为 [`EffectSequence`]。

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::registry::{Preset, defaults};
use crate::config::{EffectConfig, ScreenConfig};
use crate::easing::Easing;
use crate::error::EffectResult;
use crate::property::Property;
use crate::sequence::EffectSequence;
use crate::step::EffectStep;

/// 预设构建上下文
///
/// 提供预设依赖的外部度量与参数。
#[derive(Debug, Clone, PartialEq)]
pub struct PresetContext {
    /// 屏幕尺寸
    pub screen: ScreenConfig,
    /// 起始延迟（秒）
    pub delay: f32,
    /// 目标自身宽度，用于左滑离场
    pub target_width: f32,
    /// 摇摆次数
    pub swing_times: u32,
}

impl Default for PresetContext {
    fn default() -> Self {
        Self::from_screen(ScreenConfig::default())
    }
}

impl PresetContext {
    /// 以屏幕尺寸创建，目标宽度默认与屏幕同宽
    pub fn from_screen(screen: ScreenConfig) -> Self {
        Self {
            target_width: screen.width,
            screen,
            delay: 0.0,
            swing_times: defaults::SWING_TIMES,
        }
    }

    /// 从配置创建
    pub fn from_config(config: &EffectConfig) -> Self {
        Self::from_screen(config.screen.clone())
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_target_width(mut self, width: f32) -> Self {
        self.target_width = width;
        self
    }

    pub fn with_swing_times(mut self, times: u32) -> Self {
        self.swing_times = times;
        self
    }
}

impl Preset {
    /// 构建预设序列
    ///
    /// # 错误
    /// 上下文中的延迟为负数或非有限数时返回 `InvalidStep`
    pub fn build(&self, ctx: &PresetContext) -> EffectResult<EffectSequence> {
        let sequence = match self {
            Preset::SlideInFromLeft => slide_in(
                self,
                Property::TranslateX,
                -ctx.screen.width,
                defaults::SLIDE_IN_DURATION,
            )?,
            Preset::SlideInFromRight => slide_in(
                self,
                Property::TranslateX,
                ctx.screen.width,
                defaults::SLIDE_IN_DURATION,
            )?,
            Preset::SlideInFromTop => slide_in(
                self,
                Property::TranslateY,
                -ctx.screen.height,
                defaults::SLIDE_IN_FROM_TOP_DURATION,
            )?,
            Preset::MoveUpWithFade => EffectSequence::single(
                EffectStep::builder(defaults::MOVE_UP_FADE_DURATION)
                    .id(self.name())
                    .snap(Property::Alpha, 0.0)
                    .snap(Property::TranslateY, defaults::MOVE_UP_OFFSET)
                    .to(Property::Alpha, 1.0)
                    .to(Property::TranslateY, 0.0)
                    .build()?,
            ),
            Preset::MoveUpWithBounce => EffectSequence::single(
                EffectStep::builder(defaults::MOVE_UP_BOUNCE_DURATION)
                    .id(self.name())
                    .snap(Property::TranslateY, defaults::MOVE_UP_OFFSET)
                    .to(Property::TranslateY, 0.0)
                    .easing(Easing::spring(0.5, 0.3)?)
                    .build()?,
            ),
            Preset::FadeIn => EffectSequence::single(
                EffectStep::builder(defaults::FADE_IN_DURATION)
                    .id(self.name())
                    .snap(Property::Alpha, 0.0)
                    .to(Property::Alpha, 1.0)
                    .build()?,
            ),
            Preset::ZoomIn => spring_scale_in(self, 0.8, defaults::ZOOM_IN_DURATION, 0.7, 0.5)?,
            Preset::Shake => keyframes(self, Property::TranslateX, defaults::SHAKE_DURATION)?,
            Preset::ShakeVertical => {
                keyframes(self, Property::TranslateY, defaults::SHAKE_VERTICAL_DURATION)?
            }
            Preset::Bounce => EffectSequence::new([
                EffectStep::builder(defaults::BOUNCE_LIFT_DURATION)
                    .id("bounce.lift")
                    .to(Property::TranslateY, -defaults::BOUNCE_HEIGHT)
                    .easing(Easing::spring(0.3, 0.5)?)
                    .build()?,
                EffectStep::builder(defaults::BOUNCE_SETTLE_DURATION)
                    .id("bounce.settle")
                    .to(Property::TranslateY, 0.0)
                    .build()?,
            ])?,
            Preset::Flip => EffectSequence::single(
                EffectStep::builder(defaults::FLIP_DURATION)
                    .id(self.name())
                    .snap(Property::RotationY, PI)
                    .to(Property::RotationY, 0.0)
                    .build()?,
            ),
            Preset::RotateIn => EffectSequence::single(
                EffectStep::builder(defaults::ROTATE_IN_DURATION)
                    .id(self.name())
                    .snap(Property::Rotation, -FRAC_PI_2)
                    .to(Property::Rotation, 0.0)
                    .build()?,
            ),
            Preset::Heartbeat => {
                let half = defaults::HEARTBEAT_DURATION * 0.3;
                EffectSequence::new([
                    EffectStep::builder(half)
                        .id("heartbeat.beat")
                        .snap_scale(0.8)
                        .scale_to(1.2)
                        .easing(Easing::Linear)
                        .build()?,
                    EffectStep::builder(half)
                        .id("heartbeat.rest")
                        .scale_to(1.0)
                        .easing(Easing::Linear)
                        .build()?,
                    // 关键帧只覆盖前 60%，完成时刻仍在总时长末尾
                    EffectStep::wait(defaults::HEARTBEAT_DURATION - half * 2.0)?,
                ])?
            }
            Preset::Swing => swing(ctx.swing_times)?,
            Preset::Pop => spring_scale_in(self, 1.2, defaults::POP_DURATION, 0.4, 0.3)?,
            Preset::TapBounce => press(self, 0.95, defaults::TAP_BOUNCE_DURATION)?,
            Preset::Scale => press(self, 0.9, defaults::SCALE_DURATION)?,
            Preset::Pulse => press(self, 1.05, defaults::PULSE_DURATION)?,
            Preset::FadeOut => EffectSequence::new([
                EffectStep::builder(defaults::EXIT_DURATION)
                    .id("fade_out")
                    .to(Property::Alpha, 0.0)
                    .build()?,
                EffectStep::builder(0.0)
                    .id("fade_out.restore")
                    .to(Property::Alpha, 1.0)
                    .build()?,
            ])?,
            Preset::SlideLeft => EffectSequence::new([
                EffectStep::builder(defaults::EXIT_DURATION)
                    .id("slide_left")
                    .to(Property::TranslateX, -ctx.target_width)
                    .build()?,
                EffectStep::builder(0.0)
                    .id("slide_left.restore")
                    .to(Property::TranslateX, 0.0)
                    .build()?,
            ])?,
            Preset::RotateOut => EffectSequence::new([
                EffectStep::builder(defaults::EXIT_DURATION)
                    .id("rotate_out")
                    .to(Property::Rotation, FRAC_PI_4)
                    .to(Property::Alpha, 0.0)
                    .build()?,
                EffectStep::builder(0.0)
                    .id("rotate_out.restore")
                    .to(Property::Rotation, 0.0)
                    .to(Property::Alpha, 1.0)
                    .build()?,
            ])?,
            Preset::Jiggle => EffectSequence::new([
                EffectStep::builder(defaults::JIGGLE_DURATION)
                    .id("jiggle")
                    .snap(Property::Rotation, -defaults::SWING_ANGLE)
                    .to(Property::Rotation, defaults::SWING_ANGLE)
                    .easing(Easing::Linear)
                    .autoreverse(true)
                    .repeat(defaults::JIGGLE_PLAYS - 1)
                    .build()?,
                EffectStep::builder(0.0)
                    .id("jiggle.reset")
                    .to(Property::Rotation, 0.0)
                    .build()?,
            ])?,
            Preset::Expand => spring_scale_in(self, 0.7, defaults::EXPAND_DURATION, 0.6, 0.5)?,
            Preset::SwipeInFromBottomRight => EffectSequence::single(
                EffectStep::builder(defaults::SWIPE_IN_DURATION)
                    .id(self.name())
                    .snap(Property::Alpha, 0.0)
                    .snap(Property::TranslateX, ctx.screen.width)
                    .snap(Property::TranslateY, ctx.screen.height)
                    .to(Property::Alpha, 1.0)
                    .to(Property::TranslateX, 0.0)
                    .to(Property::TranslateY, 0.0)
                    .build()?,
            ),
        };

        sequence.named(self.name()).with_start_delay(ctx.delay)
    }
}

/// 从偏移位置滑回原位
fn slide_in(
    preset: &Preset,
    property: Property,
    offset: f32,
    duration: f32,
) -> EffectResult<EffectSequence> {
    Ok(EffectSequence::single(
        EffectStep::builder(duration)
            .id(preset.name())
            .snap(property, offset)
            .to(property, 0.0)
            .build()?,
    ))
}

/// 从给定缩放以弹簧曲线回到 1
fn spring_scale_in(
    preset: &Preset,
    from: f32,
    duration: f32,
    damping: f32,
    velocity: f32,
) -> EffectResult<EffectSequence> {
    Ok(EffectSequence::single(
        EffectStep::builder(duration)
            .id(preset.name())
            .snap_scale(from)
            .scale_to(1.0)
            .easing(Easing::spring(damping, velocity)?)
            .build()?,
    ))
}

/// 缩放到 `scale` 再恢复，两段各 `duration`
fn press(preset: &Preset, scale: f32, duration: f32) -> EffectResult<EffectSequence> {
    EffectSequence::new([
        EffectStep::builder(duration)
            .id(format!("{}.press", preset.name()))
            .scale_to(scale)
            .build()?,
        EffectStep::builder(duration)
            .id(format!("{}.release", preset.name()))
            .scale_to(1.0)
            .build()?,
    ])
}

/// 关键帧抖动：首帧立即写入，之后每段等分总时长、线性插值
fn keyframes(preset: &Preset, property: Property, total: f32) -> EffectResult<EffectSequence> {
    let frames = defaults::SHAKE_KEYFRAMES;
    let segment = total / (frames.len() - 1) as f32;

    let steps = frames
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let builder = EffectStep::builder(segment)
                .id(format!("{}.{}", preset.name(), i))
                .to(property, pair[1])
                .easing(Easing::Linear);
            if i == 0 {
                builder.snap(property, pair[0]).build()
            } else {
                builder.build()
            }
        })
        .collect::<EffectResult<Vec<_>>>()?;

    EffectSequence::new(steps)
}

/// 摇摆 `times` 次后复位
///
/// 首次从当前角度出发；每次摇摆结束都把角度写到 `-SWING_ANGLE`，
/// 之后的摇摆和复位都从那里开始。
fn swing(times: u32) -> EffectResult<EffectSequence> {
    let reset = |from_swing: bool| {
        let builder = EffectStep::builder(defaults::SWING_RESET_DURATION)
            .id("swing.reset")
            .to(Property::Rotation, 0.0);
        if from_swing {
            builder.snap(Property::Rotation, -defaults::SWING_ANGLE).build()
        } else {
            builder.build()
        }
    };

    if times == 0 {
        return Ok(EffectSequence::single(reset(false)?));
    }

    let mut steps = vec![
        EffectStep::builder(defaults::SWING_DURATION)
            .id("swing.first")
            .to(Property::Rotation, defaults::SWING_ANGLE)
            .autoreverse(true)
            .build()?,
    ];
    if times > 1 {
        steps.push(
            EffectStep::builder(defaults::SWING_DURATION)
                .id("swing")
                .snap(Property::Rotation, -defaults::SWING_ANGLE)
                .to(Property::Rotation, defaults::SWING_ANGLE)
                .autoreverse(true)
                .repeat(times - 2)
                .build()?,
        );
    }
    steps.push(reset(true)?);

    EffectSequence::new(steps)
}
