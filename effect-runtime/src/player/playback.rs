//! 单次播放的状态与推进逻辑。
//!
//! 推进只做状态转换并返回下一个动作，真正调用 Runner 和完成回调的是
//! [`EffectPlayer`](super::EffectPlayer)，这样推进过程中不会持有外部借用。

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::error::{AbortReason, EffectError, EffectResult};
use crate::runner::RunTicket;
use crate::sequence::EffectSequence;
use crate::target::Animatable;

/// 播放完成回调
///
/// 成功时收到 [`PlaybackSummary`]，中止时收到 [`EffectError::PlaybackAborted`]。
/// 取消不会触发回调。
pub type CompletionCallback = Box<dyn FnOnce(EffectResult<PlaybackSummary>)>;

/// 播放 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(pub u64);

impl std::fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Playback({})", self.0)
    }
}

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// 已创建，尚未提交首步
    #[default]
    Pending,
    /// 有步骤在执行
    Running,
    /// 全部步骤完成
    Completed,
    /// 被取消
    Cancelled,
    /// 因失败中止
    Aborted,
}

impl PlaybackState {
    /// 是否为活跃状态
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Aborted)
    }
}

/// 成功播放的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// 向 Runner 提交的总次数（含重复）
    pub submissions: usize,
    /// 序列步骤数
    pub steps: usize,
}

/// 推进后需要执行的动作
pub(super) enum Action {
    /// 提交 `sequence` 的第 `index` 步
    Submit {
        sequence: EffectSequence,
        index: usize,
        target: Rc<dyn Animatable>,
        token: usize,
    },
    /// 播放结束，调用完成回调
    Finish {
        callback: Option<CompletionCallback>,
        result: EffectResult<PlaybackSummary>,
    },
    /// 等待 Runner 回调
    Idle,
}

pub(super) struct Playback {
    pub(super) id: PlaybackId,
    sequence: EffectSequence,
    /// 弱引用：播放器不决定目标的生命周期
    target: Weak<dyn Animatable>,
    pub(super) state: PlaybackState,
    step_index: usize,
    repeats_left: u32,
    /// 提交次数，同时作为回调令牌
    pub(super) submissions: usize,
    pub(super) in_flight: Option<RunTicket>,
    /// 尚未处理的 Runner 结果
    pub(super) pending: Option<bool>,
    /// 推进循环是否正在运行（用于消除同步回调引起的递归）
    pub(super) driving: bool,
    pub(super) on_complete: Option<CompletionCallback>,
}

impl Playback {
    pub(super) fn new(
        id: PlaybackId,
        sequence: EffectSequence,
        target: Weak<dyn Animatable>,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        Self {
            id,
            sequence,
            target,
            state: PlaybackState::Pending,
            step_index: 0,
            repeats_left: 0,
            submissions: 0,
            in_flight: None,
            pending: None,
            driving: false,
            on_complete,
        }
    }

    /// 根据当前状态与待处理结果推进一步
    pub(super) fn advance(&mut self, runner_available: bool) -> Action {
        match self.state {
            PlaybackState::Pending => {
                self.state = PlaybackState::Running;
                self.repeats_left = self.sequence.steps()[0].repeat_count();
                self.prepare_submit(runner_available)
            }
            PlaybackState::Running => match self.pending.take() {
                None => Action::Idle,
                Some(false) => self.abort(AbortReason::RunnerFailed),
                Some(true) => {
                    if self.repeats_left > 0 {
                        self.repeats_left -= 1;
                        return self.prepare_submit(runner_available);
                    }

                    self.step_index += 1;
                    match self.sequence.step(self.step_index) {
                        Some(step) => {
                            self.repeats_left = step.repeat_count();
                            self.prepare_submit(runner_available)
                        }
                        None => self.complete(),
                    }
                }
            },
            PlaybackState::Completed | PlaybackState::Cancelled | PlaybackState::Aborted => {
                Action::Idle
            }
        }
    }

    fn prepare_submit(&mut self, runner_available: bool) -> Action {
        if !runner_available {
            return self.abort(AbortReason::RunnerReleased);
        }
        let Some(target) = self.target.upgrade() else {
            return self.abort(AbortReason::TargetReleased);
        };

        self.submissions += 1;
        Action::Submit {
            sequence: self.sequence.clone(),
            index: self.step_index,
            target,
            token: self.submissions,
        }
    }

    fn abort(&mut self, reason: AbortReason) -> Action {
        self.state = PlaybackState::Aborted;
        self.in_flight = None;

        let step_id = self
            .sequence
            .step(self.step_index)
            .and_then(|step| step.id())
            .map(str::to_owned);
        warn!(
            playback = %self.id,
            step = self.step_index,
            step_id = ?step_id,
            reason = %reason,
            "效果播放中止"
        );

        Action::Finish {
            callback: self.on_complete.take(),
            result: Err(EffectError::PlaybackAborted {
                step_index: self.step_index,
                step_id,
                reason,
            }),
        }
    }

    fn complete(&mut self) -> Action {
        self.state = PlaybackState::Completed;
        self.in_flight = None;

        Action::Finish {
            callback: self.on_complete.take(),
            result: Ok(PlaybackSummary {
                submissions: self.submissions,
                steps: self.sequence.len(),
            }),
        }
    }
}

/// 播放句柄
///
/// 由 [`EffectPlayer::play`](super::EffectPlayer::play) 返回，用于查询进度和取消。
/// 丢弃句柄不会中断播放。
#[derive(Clone)]
pub struct PlaybackHandle {
    pub(super) inner: Rc<RefCell<Playback>>,
}

impl PlaybackHandle {
    pub fn id(&self) -> PlaybackId {
        self.inner.borrow().id
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.borrow().state
    }

    /// 当前步骤索引，完成后等于步骤数
    pub fn step_index(&self) -> usize {
        self.inner.borrow().step_index
    }

    /// 已提交次数（含重复）
    pub fn submissions(&self) -> usize {
        self.inner.borrow().submissions
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// 目标对象是否仍然存活
    pub fn target_alive(&self) -> bool {
        self.inner.borrow().target.strong_count() > 0
    }

    /// 正在播放的序列名称
    pub fn sequence_name(&self) -> Option<String> {
        self.inner.borrow().sequence.name().map(str::to_owned)
    }
}

impl std::fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let playback = self.inner.borrow();
        f.debug_struct("PlaybackHandle")
            .field("id", &playback.id)
            .field("state", &playback.state)
            .field("step_index", &playback.step_index)
            .field("submissions", &playback.submissions)
            .finish()
    }
}
