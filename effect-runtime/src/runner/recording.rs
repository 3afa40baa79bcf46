//! 记录型 Runner，不做任何插值，由调用方决定每次提交的结果。

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::{AnimationRunner, RunTicket, StepCallback};
use crate::step::EffectStep;
use crate::target::Animatable;

/// 结果决定方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// 回调挂起，由 `finish_next` / `finish` 手动触发
    Manual,
    /// 在 `submit` 内同步成功
    AutoSucceed,
    /// 第 n 次提交（从 0 开始）同步失败，其余同步成功
    FailAt(usize),
}

/// 一次提交记录
#[derive(Clone)]
pub struct Submission {
    pub ticket: RunTicket,
    pub step: EffectStep,
    pub target: Rc<dyn Animatable>,
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("ticket", &self.ticket)
            .field("step", &self.step)
            .finish()
    }
}

/// 记录型 Runner
pub struct RecordingRunner {
    mode: RecordingMode,
    /// 取消时是否以 `false` 回调
    callback_on_cancel: bool,
    next_ticket: Cell<u64>,
    submissions: RefCell<Vec<Submission>>,
    pending: RefCell<VecDeque<(RunTicket, StepCallback)>>,
    cancelled: RefCell<Vec<RunTicket>>,
}

impl RecordingRunner {
    pub fn new(mode: RecordingMode) -> Self {
        Self {
            mode,
            callback_on_cancel: true,
            next_ticket: Cell::new(1),
            submissions: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            cancelled: RefCell::new(Vec::new()),
        }
    }

    /// 取消时只记录，不触发回调
    pub fn ignore_cancel(mut self) -> Self {
        self.callback_on_cancel = false;
        self
    }

    /// 全部提交记录（按提交顺序）
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.borrow().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.borrow().len()
    }

    pub fn last_submission(&self) -> Option<Submission> {
        self.submissions.borrow().last().cloned()
    }

    /// 挂起中的回调数量
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// 被取消的票据
    pub fn cancelled(&self) -> Vec<RunTicket> {
        self.cancelled.borrow().clone()
    }

    /// 清空提交记录（释放记录中持有的目标）
    pub fn clear_history(&self) {
        self.submissions.borrow_mut().clear();
    }

    /// 以给定结果触发最早挂起的回调
    ///
    /// # 返回
    /// 没有挂起的回调时返回 `false`
    pub fn finish_next(&self, success: bool) -> bool {
        let next = self.pending.borrow_mut().pop_front();
        match next {
            Some((_, callback)) => {
                callback(success);
                true
            }
            None => false,
        }
    }

    /// 以给定结果触发指定票据的回调
    pub fn finish(&self, ticket: RunTicket, success: bool) -> bool {
        let callback = self.take(ticket);
        match callback {
            Some(callback) => {
                callback(success);
                true
            }
            None => false,
        }
    }

    /// 取走全部挂起的回调而不触发
    pub fn take_pending(&self) -> Vec<(RunTicket, StepCallback)> {
        self.pending.borrow_mut().drain(..).collect()
    }

    fn take(&self, ticket: RunTicket) -> Option<StepCallback> {
        let mut pending = self.pending.borrow_mut();
        let index = pending.iter().position(|(t, _)| *t == ticket)?;
        pending.remove(index).map(|(_, callback)| callback)
    }
}

impl AnimationRunner for RecordingRunner {
    fn submit(
        &self,
        step: &EffectStep,
        target: Rc<dyn Animatable>,
        on_finish: StepCallback,
    ) -> RunTicket {
        let ticket = RunTicket(self.next_ticket.get());
        self.next_ticket.set(ticket.0 + 1);

        let index = {
            let mut submissions = self.submissions.borrow_mut();
            submissions.push(Submission {
                ticket,
                step: step.clone(),
                target,
            });
            submissions.len() - 1
        };

        match self.mode {
            RecordingMode::Manual => self.pending.borrow_mut().push_back((ticket, on_finish)),
            RecordingMode::AutoSucceed => on_finish(true),
            RecordingMode::FailAt(n) => on_finish(index != n),
        }

        ticket
    }

    fn cancel(&self, ticket: RunTicket) {
        self.cancelled.borrow_mut().push(ticket);
        if !self.callback_on_cancel {
            return;
        }
        if let Some(callback) = self.take(ticket) {
            callback(false);
        }
    }
}
