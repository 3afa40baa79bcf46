//! # Easing 模块
//!
//! 缓动曲线，用于步骤的时间插值。

use std::f32::consts::LN_10;

use serde::{Deserialize, Serialize};

use crate::error::{EffectError, EffectResult};

/// 弹簧包络在 t = 1 处衰减到的幅度（10^-3）
const SPRING_SETTLE_DECADES: f32 = 3.0;

/// 缓动曲线
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Easing {
    /// 线性（匀速）
    Linear,
    /// 缓入（先慢后快）
    EaseIn,
    /// 缓出（先快后慢）
    EaseOut,
    /// 缓入缓出（两头慢中间快）
    #[default]
    EaseInOut,
    /// 阻尼弹簧
    ///
    /// - `damping`: 阻尼比，取值 (0, 1]，1 为临界阻尼（不回弹）
    /// - `initial_velocity`: 初速度，以"每个时长走完全程"为单位
    #[serde(rename_all = "camelCase")]
    Spring { damping: f32, initial_velocity: f32 },
}

impl Easing {
    /// 创建弹簧曲线
    pub fn spring(damping: f32, initial_velocity: f32) -> EffectResult<Self> {
        let easing = Self::Spring {
            damping,
            initial_velocity,
        };
        easing.validate()?;
        Ok(easing)
    }

    /// 校验曲线参数
    pub fn validate(&self) -> EffectResult<()> {
        if let Self::Spring {
            damping,
            initial_velocity,
        } = *self
        {
            if !damping.is_finite() || damping <= 0.0 || damping > 1.0 {
                return Err(EffectError::invalid_step(format!(
                    "弹簧阻尼必须在 (0, 1] 之间，实际为 {damping}"
                )));
            }
            if !initial_velocity.is_finite() {
                return Err(EffectError::invalid_step("弹簧初速度必须是有限数"));
            }
        }
        Ok(())
    }

    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值；弹簧曲线在过冲时可能超出 1.0
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Spring {
                damping,
                initial_velocity,
            } => spring(t, damping, initial_velocity),
        }
    }
}

/// 阻尼弹簧位移（从 0 到 1）
///
/// 自然频率按"在 t = 1 时包络衰减到 1e-3"选取，保证在时长内收敛。
fn spring(t: f32, damping: f32, initial_velocity: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }

    let zeta = damping.clamp(f32::EPSILON, 1.0);
    let omega = SPRING_SETTLE_DECADES * LN_10 / zeta;
    let decay = zeta * omega;
    let envelope = (-decay * t).exp();

    if zeta >= 1.0 {
        // 临界阻尼
        1.0 - envelope * (1.0 + (omega - initial_velocity) * t)
    } else {
        let damped = omega * (1.0 - zeta * zeta).sqrt();
        let b = (decay - initial_velocity) / damped;
        1.0 - envelope * ((damped * t).cos() + b * (damped * t).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let easing = Easing::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_out() {
        let easing = Easing::EaseInOut;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        // 中点应该是 0.5
        let mid = easing.apply(0.5);
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_clamp() {
        let easing = Easing::Linear;
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_spring_endpoints() {
        let easing = Easing::spring(0.5, 0.3).unwrap();
        assert!(easing.apply(0.0).abs() < 1e-5);
        assert_eq!(easing.apply(1.0), 1.0);
        // 接近结束时应已基本收敛
        assert!((easing.apply(0.99) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_underdamped_spring_overshoots() {
        let easing = Easing::spring(0.3, 0.5).unwrap();
        let peak = (1..100)
            .map(|i| easing.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_critical_spring_does_not_overshoot() {
        let easing = Easing::spring(1.0, 0.0).unwrap();
        for i in 0..=100 {
            assert!(easing.apply(i as f32 / 100.0) <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_spring_rejects_bad_damping() {
        assert!(Easing::spring(0.0, 0.3).is_err());
        assert!(Easing::spring(1.5, 0.3).is_err());
        assert!(Easing::spring(f32::NAN, 0.3).is_err());
        assert!(Easing::spring(0.5, f32::INFINITY).is_err());
    }
}
