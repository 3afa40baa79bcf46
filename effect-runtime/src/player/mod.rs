//! # Player 模块
//!
//! 把 [`EffectSequence`] 逐步交给 [`AnimationRunner`] 执行。
//!
//! ## 执行流程
//!
//! ```text
//! play() ──► submit(step 0) ──► cb(true) ──► 重复未用完？──► submit(同一步)
//!                                   │                 └──► submit(下一步)
//!                                   │                 └──► 无下一步 ──► on_complete(Ok)
//!                                   └── cb(false) ──────────────────────► on_complete(Err)
//! ```
//!
//! - 每个播放同时最多只有一个步骤在执行
//! - 重复由计数器驱动，不递归
//! - Runner 在 `submit` 中同步回调时，结果被记录下来交给外层循环处理，调用栈不会增长
//! - 取消后的迟到回调按播放状态与提交令牌忽略

mod playback;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::{EffectError, EffectResult};
use crate::runner::{AnimationRunner, StepCallback};
use crate::sequence::EffectSequence;
use crate::target::Animatable;

use playback::{Action, Playback};
pub use playback::{
    CompletionCallback, PlaybackHandle, PlaybackId, PlaybackState, PlaybackSummary,
};

/// 效果播放器
///
/// 被动的状态推进器：只在 `play` 和 Runner 回调时推进，从不阻塞。
/// 单线程使用；不同播放之间没有共享的可变状态。
pub struct EffectPlayer<R: AnimationRunner + 'static> {
    runner: Rc<R>,
    next_id: Cell<u64>,
}

impl<R: AnimationRunner + 'static> std::fmt::Debug for EffectPlayer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectPlayer")
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

impl<R: AnimationRunner + 'static> EffectPlayer<R> {
    /// 创建播放器
    pub fn new(runner: Rc<R>) -> Self {
        Self {
            runner,
            next_id: Cell::new(1),
        }
    }

    /// 获取 Runner
    pub fn runner(&self) -> &Rc<R> {
        &self.runner
    }

    /// 开始播放序列
    ///
    /// 立即提交第 0 步。`on_complete` 为 `None` 时即发即忘。
    /// 播放器只保存 `target` 的弱引用；目标在下一次提交前被释放时播放会中止。
    pub fn play<T: Animatable>(
        &self,
        sequence: &EffectSequence,
        target: &Rc<T>,
        on_complete: Option<CompletionCallback>,
    ) -> PlaybackHandle {
        let id = PlaybackId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let target: Weak<T> = Rc::downgrade(target);
        let target: Weak<dyn Animatable> = target;
        let inner = Rc::new(RefCell::new(Playback::new(
            id,
            sequence.clone(),
            target,
            on_complete,
        )));

        debug!(
            playback = %id,
            sequence = ?sequence.name(),
            steps = sequence.len(),
            "开始播放效果"
        );

        let runner = Rc::downgrade(&self.runner);
        drive(&inner, &runner);

        PlaybackHandle { inner }
    }

    /// 取消播放
    ///
    /// 不再提交后续步骤，并请求 Runner 取消进行中的步骤。完成回调不会被调用。
    ///
    /// # 错误
    /// 播放已结束（完成、取消或中止）时返回 [`EffectError::AlreadyCompleted`]，
    /// 这只是无效操作，不影响任何状态。
    pub fn cancel(&self, handle: &PlaybackHandle) -> EffectResult<()> {
        let (ticket, discarded) = {
            let mut playback = handle.inner.borrow_mut();
            if !playback.state.is_active() {
                return Err(EffectError::AlreadyCompleted);
            }
            playback.state = PlaybackState::Cancelled;
            playback.pending = None;
            debug!(playback = %playback.id, "取消效果播放");
            (playback.in_flight.take(), playback.on_complete.take())
        };
        drop(discarded);

        if let Some(ticket) = ticket {
            self.runner.cancel(ticket);
        }
        Ok(())
    }
}

/// 推进循环
///
/// 同一播放同时只有一个推进循环；循环运行期间到达的回调只记录结果。
fn drive<R: AnimationRunner + 'static>(playback: &Rc<RefCell<Playback>>, runner: &Weak<R>) {
    {
        let mut inner = playback.borrow_mut();
        if inner.driving {
            return;
        }
        inner.driving = true;
    }

    let finish = loop {
        let runner_rc = runner.upgrade();
        let action = playback.borrow_mut().advance(runner_rc.is_some());

        match (action, runner_rc) {
            (
                Action::Submit {
                    sequence,
                    index,
                    target,
                    token,
                },
                Some(runner_rc),
            ) => {
                let Some(step) = sequence.step(index) else {
                    break None;
                };
                debug!(
                    playback = %playback.borrow().id,
                    step = index,
                    step_id = ?step.id(),
                    submission = token,
                    "提交效果步骤"
                );

                let callback_playback = Rc::clone(playback);
                let callback_runner = runner.clone();
                let on_finish: StepCallback = Box::new(move |success| {
                    on_step_finished(&callback_playback, &callback_runner, token, success);
                });

                let ticket = runner_rc.submit(step, target, on_finish);

                let cancelled_meanwhile = {
                    let mut inner = playback.borrow_mut();
                    let unresolved = inner.submissions == token && inner.pending.is_none();
                    match inner.state {
                        PlaybackState::Running if unresolved => {
                            inner.in_flight = Some(ticket);
                            false
                        }
                        PlaybackState::Cancelled => unresolved,
                        _ => false,
                    }
                };
                if cancelled_meanwhile {
                    runner_rc.cancel(ticket);
                }
            }
            (Action::Finish { callback, result }, _) => break Some((callback, result)),
            _ => break None,
        }
    };

    playback.borrow_mut().driving = false;

    if let Some((callback, result)) = finish {
        debug!(
            playback = %playback.borrow().id,
            ok = result.is_ok(),
            "效果播放结束"
        );
        if let Some(callback) = callback {
            callback(result);
        }
    }
}

/// Runner 回调入口
fn on_step_finished<R: AnimationRunner + 'static>(
    playback: &Rc<RefCell<Playback>>,
    runner: &Weak<R>,
    token: usize,
    success: bool,
) {
    {
        let mut inner = playback.borrow_mut();
        if inner.state != PlaybackState::Running || inner.submissions != token {
            debug!(
                playback = %inner.id,
                submission = token,
                "忽略过期的步骤回调"
            );
            return;
        }
        inner.in_flight = None;
        inner.pending = Some(success);
        if inner.driving {
            return;
        }
    }
    drive(playback, runner);
}
