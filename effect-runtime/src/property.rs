//! # Property 模块
//!
//! 可动画属性定义。步骤只描述属性的目标值，不假设对象类型。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 可动画属性
///
/// 覆盖单元格动画用到的全部变换分量与透明度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// X 方向位移
    TranslateX,
    /// Y 方向位移
    TranslateY,
    /// X 方向缩放
    ScaleX,
    /// Y 方向缩放
    ScaleY,
    /// 平面旋转（弧度）
    Rotation,
    /// 绕 Y 轴的三维旋转（弧度，用于翻转）
    RotationY,
    /// 透明度 (0.0 - 1.0)
    Alpha,
}

impl Property {
    /// 全部属性
    pub const ALL: [Property; 7] = [
        Property::TranslateX,
        Property::TranslateY,
        Property::ScaleX,
        Property::ScaleY,
        Property::Rotation,
        Property::RotationY,
        Property::Alpha,
    ];

    /// 恒等变换下的取值
    pub fn identity_value(&self) -> f32 {
        match self {
            Property::ScaleX | Property::ScaleY | Property::Alpha => 1.0,
            Property::TranslateX
            | Property::TranslateY
            | Property::Rotation
            | Property::RotationY => 0.0,
        }
    }

    /// 属性名（与序列化格式一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::TranslateX => "translateX",
            Property::TranslateY => "translateY",
            Property::ScaleX => "scaleX",
            Property::ScaleY => "scaleY",
            Property::Rotation => "rotation",
            Property::RotationY => "rotationY",
            Property::Alpha => "alpha",
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 属性值表（有序，保证遍历顺序确定）
pub type PropertyMap = BTreeMap<Property, f32>;

/// 恒等变换对应的属性表
///
/// 位移、旋转归零，缩放回到 1；不含透明度。
pub fn identity_transform() -> PropertyMap {
    [
        Property::TranslateX,
        Property::TranslateY,
        Property::ScaleX,
        Property::ScaleY,
        Property::Rotation,
        Property::RotationY,
    ]
    .into_iter()
    .map(|p| (p, p.identity_value()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_values() {
        assert_eq!(Property::TranslateX.identity_value(), 0.0);
        assert_eq!(Property::ScaleY.identity_value(), 1.0);
        assert_eq!(Property::Alpha.identity_value(), 1.0);
    }

    #[test]
    fn test_identity_transform_leaves_alpha_alone() {
        let identity = identity_transform();
        assert_eq!(identity.len(), 6);
        assert!(!identity.contains_key(&Property::Alpha));
        assert_eq!(identity[&Property::ScaleX], 1.0);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for property in Property::ALL {
            let json = serde_json::to_string(&property).unwrap();
            assert_eq!(json, format!("\"{}\"", property.as_str()));
        }
    }
}
