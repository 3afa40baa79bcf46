//! # Error 模块
//!
//! 定义 effect-runtime 中使用的错误类型。

use std::fmt;

use thiserror::Error;

/// 播放中止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Runner 回调报告失败
    RunnerFailed,
    /// 提交步骤时目标对象已被释放
    TargetReleased,
    /// 播放仍在进行时 Runner 已被释放
    RunnerReleased,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::RunnerFailed => write!(f, "runner 报告失败"),
            AbortReason::TargetReleased => write!(f, "目标对象已释放"),
            AbortReason::RunnerReleased => write!(f, "runner 已释放"),
        }
    }
}

/// 效果错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// 无效的步骤参数（构造时检测，不做静默修正）
    #[error("无效的步骤参数: {message}")]
    InvalidStep { message: String },

    /// 序列中没有任何步骤
    #[error("效果序列至少需要一个步骤")]
    EmptySequence,

    /// 播放中途被中止
    #[error("播放在第 {step_index} 步中止（{reason}）{}", step_suffix(.step_id))]
    PlaybackAborted {
        step_index: usize,
        step_id: Option<String>,
        reason: AbortReason,
    },

    /// 对已结束的播放执行取消
    #[error("播放已结束，取消无效")]
    AlreadyCompleted,
}

fn step_suffix(step_id: &Option<String>) -> String {
    step_id
        .as_deref()
        .map(|id| format!("，步骤 '{id}'"))
        .unwrap_or_default()
}

impl EffectError {
    pub(crate) fn invalid_step(message: impl Into<String>) -> Self {
        Self::InvalidStep {
            message: message.into(),
        }
    }

    /// 是否为播放中止错误
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::PlaybackAborted { .. })
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析或序列化失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// Result 类型别名
pub type EffectResult<T> = Result<T, EffectError>;
