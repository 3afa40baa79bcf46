//! # Config 模块
//!
//! 效果配置：预设用到的屏幕尺寸、时间轴参数。
//!
//! ## 配置优先级
//!
//! 1. 代码中显式构造的值（最高）
//! 2. 配置文件 (effects.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// 效果配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectConfig {
    /// 屏幕配置
    #[serde(default)]
    pub screen: ScreenConfig,

    /// 时间轴配置
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// 屏幕配置
///
/// 滑入类预设以屏幕尺寸作为起始偏移。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// 屏幕宽度（点）
    #[serde(default = "default_screen_width")]
    pub width: f32,

    /// 屏幕高度（点）
    #[serde(default = "default_screen_height")]
    pub height: f32,
}

/// 时间轴配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// 时间缩放（1.0 为原速，2.0 为两倍速）
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,

    /// 预览采样帧率
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

// 默认值函数
fn default_screen_width() -> f32 {
    390.0
}

fn default_screen_height() -> f32 {
    844.0
}

fn default_time_scale() -> f32 {
    1.0
}

fn default_frame_rate() -> u32 {
    60
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl TimelineConfig {
    /// 每帧时长（秒）
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

impl EffectConfig {
    /// 加载配置文件
    ///
    /// 文件不存在、解析失败或验证失败时返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!(path = ?path, "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 读取并验证配置文件
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.screen.width.is_finite() || self.screen.width <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "屏幕宽度必须为正数，实际为 {}",
                self.screen.width
            )));
        }

        if !self.screen.height.is_finite() || self.screen.height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "屏幕高度必须为正数，实际为 {}",
                self.screen.height
            )));
        }

        if !self.timeline.time_scale.is_finite() || self.timeline.time_scale <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "时间缩放必须为正数，实际为 {}",
                self.timeline.time_scale
            )));
        }

        if self.timeline.frame_rate == 0 {
            return Err(ConfigError::Validation("帧率不能为 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EffectConfig::default();
        assert_eq!(config.screen.width, 390.0);
        assert_eq!(config.screen.height, 844.0);
        assert_eq!(config.timeline.time_scale, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EffectConfig::from_json(r#"{ "screen": { "width": 320 } }"#).unwrap();
        assert_eq!(config.screen.width, 320.0);
        assert_eq!(config.screen.height, 844.0);
        assert_eq!(config.timeline.frame_rate, 60);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = EffectConfig::from_json(r#"{ "screen": { "width": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = EffectConfig::from_json(r#"{ "timeline": { "time_scale": -2 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = EffectConfig::from_json(r#"{ "timeline": { "frame_rate": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = EffectConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = EffectConfig::load("definitely/not/here/effects.json");
        assert_eq!(config, EffectConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.json");

        let mut config = EffectConfig::default();
        config.screen.width = 428.0;
        config.timeline.time_scale = 0.5;
        config.save(&path).unwrap();

        assert_eq!(EffectConfig::read(&path).unwrap(), config);
        assert_eq!(EffectConfig::load(&path), config);
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.json");
        fs::write(&path, r#"{ "screen": { "height": -1 } }"#).unwrap();

        assert_eq!(EffectConfig::load(&path), EffectConfig::default());
    }

    #[test]
    fn test_frame_dt() {
        let timeline = TimelineConfig {
            time_scale: 1.0,
            frame_rate: 50,
        };
        assert!((timeline.frame_dt() - 0.02).abs() < 1e-6);
    }
}
