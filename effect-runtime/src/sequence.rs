//! # Sequence 模块
//!
//! 有序的步骤组合，构造后不可变。

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{EffectError, EffectResult};
use crate::step::EffectStep;

/// 效果序列
///
/// 至少包含一个步骤。步骤存放在共享切片中，克隆序列（例如每次 `play`）不复制步骤。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSequence", into = "RawSequence")]
pub struct EffectSequence {
    name: Option<String>,
    steps: Rc<[EffectStep]>,
}

impl EffectSequence {
    /// 创建序列
    ///
    /// # 错误
    /// 步骤为空时返回 [`EffectError::EmptySequence`]
    pub fn new(steps: impl IntoIterator<Item = EffectStep>) -> EffectResult<Self> {
        let steps: Vec<EffectStep> = steps.into_iter().collect();
        if steps.is_empty() {
            return Err(EffectError::EmptySequence);
        }
        Ok(Self {
            name: None,
            steps: steps.into(),
        })
    }

    /// 单步骤序列
    pub fn single(step: EffectStep) -> Self {
        Self {
            name: None,
            steps: Rc::from(vec![step]),
        }
    }

    /// 设置名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// 序列永远非空，保留此方法以配合 `len`
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&EffectStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[EffectStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EffectStep> {
        self.steps.iter()
    }

    /// 全部步骤（含延迟与重复）的总时长
    pub fn total_duration(&self) -> f32 {
        self.steps.iter().map(EffectStep::total_duration).sum()
    }

    /// 在本序列之后接上另一个序列，名称保留本序列的
    pub fn then(&self, other: &EffectSequence) -> Self {
        let steps: Vec<EffectStep> = self.steps.iter().chain(other.steps.iter()).cloned().collect();
        Self {
            name: self.name.clone(),
            steps: steps.into(),
        }
    }

    /// 给整个序列增加起始延迟
    ///
    /// 首步不重复时直接叠加到首步延迟上；首步会重复时在前面插入一个等待步骤，
    /// 避免每次重复都等待。
    pub fn with_start_delay(&self, delay: f32) -> EffectResult<Self> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(EffectError::invalid_step(format!(
                "起始延迟必须是非负有限数，实际为 {delay}"
            )));
        }
        if delay == 0.0 {
            return Ok(self.clone());
        }

        let first = &self.steps[0];
        let steps: Vec<EffectStep> = if first.repeat_count() == 0 {
            std::iter::once(first.with_delay(first.delay() + delay)?)
                .chain(self.steps[1..].iter().cloned())
                .collect()
        } else {
            std::iter::once(EffectStep::wait(delay)?)
                .chain(self.steps.iter().cloned())
                .collect()
        };

        Ok(Self {
            name: self.name.clone(),
            steps: steps.into(),
        })
    }
}

impl<'a> IntoIterator for &'a EffectSequence {
    type Item = &'a EffectStep;
    type IntoIter = std::slice::Iter<'a, EffectStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 序列的序列化形式
#[derive(Debug, Serialize, Deserialize)]
struct RawSequence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    steps: Vec<EffectStep>,
}

impl TryFrom<RawSequence> for EffectSequence {
    type Error = EffectError;

    fn try_from(raw: RawSequence) -> Result<Self, Self::Error> {
        let sequence = EffectSequence::new(raw.steps)?;
        Ok(match raw.name {
            Some(name) => sequence.named(name),
            None => sequence,
        })
    }
}

impl From<EffectSequence> for RawSequence {
    fn from(sequence: EffectSequence) -> Self {
        Self {
            name: sequence.name,
            steps: sequence.steps.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;

    fn fade(duration: f32) -> EffectStep {
        EffectStep::builder(duration)
            .to(Property::Alpha, 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert_eq!(
            EffectSequence::new(Vec::new()).unwrap_err(),
            EffectError::EmptySequence
        );
    }

    #[test]
    fn test_sequence_accessors() {
        let seq = EffectSequence::new([fade(0.2), fade(0.3)])
            .unwrap()
            .named("double_fade");
        assert_eq!(seq.len(), 2);
        assert!(!seq.is_empty());
        assert_eq!(seq.name(), Some("double_fade"));
        assert_eq!(seq.step(1).unwrap().duration(), 0.3);
        assert!(seq.step(2).is_none());
        assert!((seq.total_duration() - 0.5).abs() < 1e-6);
        assert_eq!(seq.iter().count(), 2);
    }

    #[test]
    fn test_then_concatenates() {
        let a = EffectSequence::single(fade(0.1)).named("a");
        let b = EffectSequence::new([fade(0.2), fade(0.3)]).unwrap();
        let joined = a.then(&b);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.name(), Some("a"));
        assert_eq!(joined.step(2).unwrap().duration(), 0.3);
    }

    #[test]
    fn test_start_delay_on_plain_first_step() {
        let seq = EffectSequence::single(fade(0.5));
        let delayed = seq.with_start_delay(0.25).unwrap();
        assert_eq!(delayed.len(), 1);
        assert_eq!(delayed.step(0).unwrap().delay(), 0.25);
    }

    #[test]
    fn test_start_delay_before_repeating_step() {
        let repeating = EffectStep::builder(0.3).repeat(2).build().unwrap();
        let seq = EffectSequence::single(repeating);
        let delayed = seq.with_start_delay(0.25).unwrap();
        assert_eq!(delayed.len(), 2);
        assert_eq!(delayed.step(0).unwrap().delay(), 0.25);
        assert!(delayed.step(0).unwrap().targets().is_empty());
        assert_eq!(delayed.step(1).unwrap().delay(), 0.0);
    }

    #[test]
    fn test_start_delay_negative_rejected() {
        let seq = EffectSequence::single(fade(0.5));
        assert!(seq.with_start_delay(-1.0).is_err());
        assert!(seq.with_start_delay(f32::NAN).is_err());
    }

    #[test]
    fn test_start_delay_negative_not_merged_into_existing_delay() {
        let step = EffectStep::builder(0.3).delay(0.5).build().unwrap();
        let seq = EffectSequence::single(step);

        let err = seq.with_start_delay(-0.2).unwrap_err();
        assert!(matches!(err, EffectError::InvalidStep { .. }));
        assert_eq!(seq.step(0).unwrap().delay(), 0.5);
    }

    #[test]
    fn test_serde_round_trip_keeps_name() {
        let seq = EffectSequence::new([fade(0.2)]).unwrap().named("fade");
        let json = serde_json::to_string(&seq).unwrap();
        let back: EffectSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
    }

    #[test]
    fn test_deserialize_empty_steps_rejected() {
        let err = serde_json::from_str::<EffectSequence>(r#"{ "steps": [] }"#).unwrap_err();
        assert!(err.to_string().contains("至少需要一个步骤"));
    }
}
