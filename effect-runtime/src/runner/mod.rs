//! # Runner 模块
//!
//! 宿主提供的动画执行接口，以及两个内置实现。
//!
//! ## 回调约定
//!
//! ```text
//! EffectPlayer                    AnimationRunner
//!   │                                  │
//!   │──── submit(step, target, cb) ──►│ 写入初始值，按 delay/duration/easing 插值
//!   │◄─── RunTicket ───────────────────│
//!   │                                  │ ...
//!   │◄─── cb(true / false) ────────────│ 恰好一次：完成为 true，失败或取消为 false
//! ```
//!
//! 回调可以在 `submit` 内同步触发，播放器负责处理这种重入。
//! Runner 在触发回调前必须释放自身的内部借用，因为回调里可能会再次调用 `submit`。
//!
//! - [`TimelineRunner`]：按 `update(dt)` 推进的参考实现
//! - [`RecordingRunner`]：记录所有提交、由测试决定结果的替身

mod recording;
mod timeline;

use std::rc::Rc;

use crate::step::EffectStep;
use crate::target::Animatable;

pub use recording::{RecordingMode, RecordingRunner, Submission};
pub use timeline::TimelineRunner;

/// 步骤完成回调，参数为是否成功
pub type StepCallback = Box<dyn FnOnce(bool)>;

/// 一次提交的票据，用于取消
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunTicket(pub u64);

impl std::fmt::Display for RunTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RunTicket({})", self.0)
    }
}

/// 动画执行器
///
/// 对 `target` 执行一个步骤，并在结束时调用一次 `on_finish`。
/// 播放器只依赖这个单次回调约定，不关心渲染细节。
pub trait AnimationRunner {
    /// 提交一个步骤
    ///
    /// 实现需要在提交时立即写入 `step.initial()`，然后在 `step.delay()` 之后、
    /// 用 `step.duration()` 按 `step.easing()` 插值到 `step.targets()`。
    /// 重复由播放器负责，Runner 只处理单次提交（含 autoreverse）。
    fn submit(
        &self,
        step: &EffectStep,
        target: Rc<dyn Animatable>,
        on_finish: StepCallback,
    ) -> RunTicket;

    /// 取消一个进行中的步骤
    ///
    /// 若票据仍在执行，回调以 `false` 触发；已结束的票据忽略。
    fn cancel(&self, ticket: RunTicket);
}
