//! # Step 模块
//!
//! 单个动画阶段的不可变描述。
//!
//! 步骤只描述"做什么"：哪些属性变到什么值、多久、什么曲线。
//! 如何把值写到屏幕上由 [`AnimationRunner`](crate::AnimationRunner) 决定。

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{EffectError, EffectResult};
use crate::property::{Property, PropertyMap};

/// 效果步骤
///
/// 通过 [`EffectStep::builder`] 构造，构造时校验全部参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStep")]
pub struct EffectStep {
    /// 步骤标识（可选，用于诊断）
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    /// 属性目标值
    targets: PropertyMap,
    /// 提交时立即写入目标的初始值
    #[serde(skip_serializing_if = "PropertyMap::is_empty")]
    initial: PropertyMap,
    /// 时长（秒）
    duration: f32,
    /// 延迟启动（秒）
    delay: f32,
    /// 缓动曲线
    easing: Easing,
    /// 额外重复次数
    repeat_count: u32,
    /// 播放完后是否反向回到起始值
    autoreverse: bool,
}

impl EffectStep {
    /// 创建步骤构造器
    pub fn builder(duration: f32) -> StepBuilder {
        StepBuilder::new(duration)
    }

    /// 创建只有时长的步骤
    pub fn new(duration: f32) -> EffectResult<Self> {
        Self::builder(duration).build()
    }

    /// 创建纯等待步骤（无属性变化）
    pub fn wait(delay: f32) -> EffectResult<Self> {
        Self::builder(0.0).delay(delay).build()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn targets(&self) -> &PropertyMap {
        &self.targets
    }

    pub fn initial(&self) -> &PropertyMap {
        &self.initial
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn autoreverse(&self) -> bool {
        self.autoreverse
    }

    /// 单次提交的活跃时长（不含延迟）
    ///
    /// 自动反向时正向、反向各占一个 `duration`。
    pub fn active_duration(&self) -> f32 {
        if self.autoreverse {
            self.duration * 2.0
        } else {
            self.duration
        }
    }

    /// 包含延迟与全部重复的总时长
    pub fn total_duration(&self) -> f32 {
        (self.delay + self.active_duration()) * (self.repeat_count as f32 + 1.0)
    }

    /// 替换延迟（重新校验）
    pub fn with_delay(&self, delay: f32) -> EffectResult<Self> {
        let mut step = self.clone();
        step.delay = delay;
        step.validate()?;
        Ok(step)
    }

    fn validate(&self) -> EffectResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(EffectError::invalid_step(format!(
                "时长必须是非负有限数，实际为 {}",
                self.duration
            )));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(EffectError::invalid_step(format!(
                "延迟必须是非负有限数，实际为 {}",
                self.delay
            )));
        }
        for (property, value) in self.targets.iter().chain(self.initial.iter()) {
            if !value.is_finite() {
                return Err(EffectError::invalid_step(format!(
                    "属性 {property} 的取值必须是有限数，实际为 {value}"
                )));
            }
        }
        self.easing.validate()
    }
}

/// 步骤构造器
#[derive(Debug, Clone)]
pub struct StepBuilder {
    step: EffectStep,
}

impl StepBuilder {
    fn new(duration: f32) -> Self {
        Self {
            step: EffectStep {
                id: None,
                targets: PropertyMap::new(),
                initial: PropertyMap::new(),
                duration,
                delay: 0.0,
                easing: Easing::default(),
                repeat_count: 0,
                autoreverse: false,
            },
        }
    }

    /// 设置步骤标识
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.step.id = Some(id.into());
        self
    }

    /// 设置属性目标值
    pub fn to(mut self, property: Property, value: f32) -> Self {
        self.step.targets.insert(property, value);
        self
    }

    /// 同时设置 X/Y 缩放目标值
    pub fn scale_to(self, value: f32) -> Self {
        self.to(Property::ScaleX, value).to(Property::ScaleY, value)
    }

    /// 设置提交时立即写入的初始值
    pub fn snap(mut self, property: Property, value: f32) -> Self {
        self.step.initial.insert(property, value);
        self
    }

    /// 同时设置 X/Y 缩放初始值
    pub fn snap_scale(self, value: f32) -> Self {
        self.snap(Property::ScaleX, value)
            .snap(Property::ScaleY, value)
    }

    /// 设置延迟（秒）
    pub fn delay(mut self, delay: f32) -> Self {
        self.step.delay = delay;
        self
    }

    /// 设置缓动曲线
    pub fn easing(mut self, easing: Easing) -> Self {
        self.step.easing = easing;
        self
    }

    /// 设置额外重复次数
    pub fn repeat(mut self, count: u32) -> Self {
        self.step.repeat_count = count;
        self
    }

    /// 设置是否自动反向
    pub fn autoreverse(mut self, autoreverse: bool) -> Self {
        self.step.autoreverse = autoreverse;
        self
    }

    /// 校验并生成步骤
    pub fn build(self) -> EffectResult<EffectStep> {
        self.step.validate()?;
        Ok(self.step)
    }
}

/// 反序列化用的原始步骤（数值未校验）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    targets: PropertyMap,
    #[serde(default)]
    initial: PropertyMap,
    duration: f32,
    #[serde(default)]
    delay: f32,
    #[serde(default)]
    easing: Easing,
    #[serde(default)]
    repeat_count: i64,
    #[serde(default)]
    autoreverse: bool,
}

impl TryFrom<RawStep> for EffectStep {
    type Error = EffectError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let repeat_count = u32::try_from(raw.repeat_count).map_err(|_| {
            EffectError::invalid_step(format!(
                "重复次数必须在 0..={} 之间，实际为 {}",
                u32::MAX,
                raw.repeat_count
            ))
        })?;

        let step = EffectStep {
            id: raw.id,
            targets: raw.targets,
            initial: raw.initial,
            duration: raw.duration,
            delay: raw.delay,
            easing: raw.easing,
            repeat_count,
            autoreverse: raw.autoreverse,
        };
        step.validate()?;
        Ok(step)
    }
}
