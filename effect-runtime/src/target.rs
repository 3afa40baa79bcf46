//! # Target 模块
//!
//! 动画目标接口。
//!
//! ## 核心概念
//!
//! - `Animatable`: 可动画对象接口，Runner 通过它读写属性
//! - `TransformTarget`: 基于 `RefCell` 的简单实现，用于测试和无界面回放

use std::cell::RefCell;

use crate::property::{Property, PropertyMap, identity_transform};

/// 可动画对象接口
///
/// 由宿主的视觉元素实现。播放器只持有目标的弱引用，目标生命周期由宿主决定。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct CellView {
///     layer: RefCell<Layer>,
/// }
///
/// impl Animatable for CellView {
///     fn get_property(&self, property: Property) -> Option<f32> {
///         let layer = self.layer.borrow();
///         match property {
///             Property::Alpha => Some(layer.opacity),
///             Property::TranslateX => Some(layer.offset.x),
///             _ => None,
///         }
///     }
///
///     fn set_property(&self, property: Property, value: f32) -> bool {
///         let mut layer = self.layer.borrow_mut();
///         match property {
///             Property::Alpha => { layer.opacity = value; true }
///             Property::TranslateX => { layer.offset.x = value; true }
///             _ => false,
///         }
///     }
///
///     fn property_list(&self) -> &'static [Property] {
///         &[Property::Alpha, Property::TranslateX]
///     }
/// }
/// ```
pub trait Animatable: 'static {
    /// 获取属性的当前值
    ///
    /// # 返回
    /// - `Some(value)`: 属性存在
    /// - `None`: 对象不支持该属性
    fn get_property(&self, property: Property) -> Option<f32>;

    /// 设置属性的新值
    ///
    /// # 返回
    /// - `true`: 设置成功
    /// - `false`: 对象不支持该属性
    fn set_property(&self, property: Property, value: f32) -> bool;

    /// 获取所有可动画属性的列表
    fn property_list(&self) -> &'static [Property];
}

/// 简单的变换目标
///
/// 支持全部 [`Property`]，初始为恒等变换、完全不透明。
#[derive(Debug, Default)]
pub struct TransformTarget {
    values: RefCell<PropertyMap>,
}

impl TransformTarget {
    /// 创建恒等变换的目标
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定属性值创建目标，未给出的属性取恒等值
    pub fn with_values(values: impl IntoIterator<Item = (Property, f32)>) -> Self {
        Self {
            values: RefCell::new(values.into_iter().collect()),
        }
    }

    /// 读取属性值（未设置过的属性返回恒等值）
    pub fn value(&self, property: Property) -> f32 {
        self.values
            .borrow()
            .get(&property)
            .copied()
            .unwrap_or_else(|| property.identity_value())
    }

    /// 当前全部属性值的快照
    pub fn snapshot(&self) -> PropertyMap {
        Property::ALL
            .into_iter()
            .map(|p| (p, self.value(p)))
            .collect()
    }

    /// 是否处于恒等变换且完全不透明
    pub fn is_identity(&self) -> bool {
        identity_transform()
            .into_iter()
            .chain([(Property::Alpha, 1.0)])
            .all(|(p, v)| (self.value(p) - v).abs() < 1e-4)
    }
}

impl Animatable for TransformTarget {
    fn get_property(&self, property: Property) -> Option<f32> {
        Some(self.value(property))
    }

    fn set_property(&self, property: Property, value: f32) -> bool {
        self.values.borrow_mut().insert(property, value);
        true
    }

    fn property_list(&self) -> &'static [Property] {
        &Property::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_target_defaults() {
        let target = TransformTarget::new();
        assert!(target.is_identity());
        assert_eq!(target.get_property(Property::ScaleX), Some(1.0));
        assert_eq!(target.property_list().len(), Property::ALL.len());
    }

    #[test]
    fn test_transform_target_set_and_get() {
        let target = TransformTarget::with_values([(Property::TranslateX, -320.0)]);
        assert_eq!(target.value(Property::TranslateX), -320.0);
        assert!(!target.is_identity());

        assert!(target.set_property(Property::TranslateX, 0.0));
        assert!(target.is_identity());
        assert_eq!(target.snapshot()[&Property::Alpha], 1.0);
    }

    // 只支持部分属性的对象
    struct FadeOnly {
        alpha: RefCell<f32>,
    }

    impl Animatable for FadeOnly {
        fn get_property(&self, property: Property) -> Option<f32> {
            match property {
                Property::Alpha => Some(*self.alpha.borrow()),
                _ => None,
            }
        }

        fn set_property(&self, property: Property, value: f32) -> bool {
            match property {
                Property::Alpha => {
                    *self.alpha.borrow_mut() = value;
                    true
                }
                _ => false,
            }
        }

        fn property_list(&self) -> &'static [Property] {
            &[Property::Alpha]
        }
    }

    #[test]
    fn test_partial_animatable() {
        let obj = FadeOnly {
            alpha: RefCell::new(0.0),
        };
        assert_eq!(obj.get_property(Property::Alpha), Some(0.0));
        assert_eq!(obj.get_property(Property::Rotation), None);
        assert!(obj.set_property(Property::Alpha, 0.5));
        assert!(!obj.set_property(Property::Rotation, 1.0));
        assert_eq!(obj.property_list(), &[Property::Alpha]);
    }
}
