//! 时间轴 Runner
//!
//! 参考实现：宿主每帧调用 [`TimelineRunner::update`]，Runner 推进所有进行中的步骤，
//! 把插值结果直接写入目标（通过 [`Animatable`]）。
//!
//! ```rust,ignore
//! let runner = Rc::new(TimelineRunner::new());
//! let player = EffectPlayer::new(Rc::clone(&runner));
//! player.play(&sequence, &cell, None);
//!
//! // 帧循环
//! runner.update(dt);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::{AnimationRunner, RunTicket, StepCallback};
use crate::config::TimelineConfig;
use crate::easing::Easing;
use crate::property::Property;
use crate::step::EffectStep;
use crate::target::Animatable;

/// 单个属性的插值区间
#[derive(Debug, Clone, Copy)]
struct Track {
    property: Property,
    from: f32,
    to: f32,
}

/// 步骤推进结果
enum Progress {
    Running,
    Finished,
    TargetLost,
}

/// 进行中的步骤
struct ActiveStep {
    ticket: RunTicket,
    target: Weak<dyn Animatable>,
    tracks: Vec<Track>,
    delay: f32,
    duration: f32,
    easing: Easing,
    autoreverse: bool,
    /// 已经过的时间（含延迟）
    elapsed: f32,
    on_finish: StepCallback,
}

impl ActiveStep {
    fn active_duration(&self) -> f32 {
        if self.autoreverse {
            self.duration * 2.0
        } else {
            self.duration
        }
    }

    fn advance(&mut self, dt: f32) -> Progress {
        let Some(target) = self.target.upgrade() else {
            return Progress::TargetLost;
        };

        self.elapsed += dt;
        let active_time = self.elapsed - self.delay;
        if active_time < 0.0 {
            return Progress::Running;
        }

        if active_time >= self.active_duration() {
            self.apply_final(target.as_ref());
            return Progress::Finished;
        }

        let raw = active_time / self.duration;
        let t = if self.autoreverse && raw > 1.0 {
            2.0 - raw
        } else {
            raw
        };
        self.apply(target.as_ref(), self.easing.apply(t));
        Progress::Running
    }

    fn apply(&self, target: &dyn Animatable, progress: f32) {
        for track in &self.tracks {
            target.set_property(track.property, track.from + (track.to - track.from) * progress);
        }
    }

    /// 写入结束值：自动反向时回到起始值
    fn apply_final(&self, target: &dyn Animatable) {
        for track in &self.tracks {
            let value = if self.autoreverse { track.from } else { track.to };
            target.set_property(track.property, value);
        }
    }
}

/// 时间轴 Runner
pub struct TimelineRunner {
    /// 时间缩放（1.0 为原速）
    time_scale: f32,
    next_ticket: Cell<u64>,
    active: RefCell<Vec<ActiveStep>>,
}

impl Default for TimelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineRunner")
            .field("time_scale", &self.time_scale)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl TimelineRunner {
    /// 创建原速 Runner
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    /// 创建指定时间缩放的 Runner（非正数或非有限数按 1.0 处理）
    pub fn with_time_scale(time_scale: f32) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale
        } else {
            warn!(time_scale, "无效的时间缩放，使用 1.0");
            1.0
        };
        Self {
            time_scale,
            next_ticket: Cell::new(1),
            active: RefCell::new(Vec::new()),
        }
    }

    /// 从配置创建
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self::with_time_scale(config.time_scale)
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// 进行中的步骤数
    pub fn in_flight(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.borrow().is_empty()
    }

    /// 推进所有步骤
    ///
    /// 结束的步骤在写入最终值后按提交顺序回调；回调中提交的新步骤从下一次 `update` 开始推进。
    pub fn update(&self, dt: f32) {
        let dt = dt.max(0.0) * self.time_scale;

        let finished: Vec<(RunTicket, StepCallback, bool)> = {
            let mut active = self.active.borrow_mut();
            let mut remaining = Vec::with_capacity(active.len());
            let mut finished = Vec::new();

            for mut step in active.drain(..) {
                match step.advance(dt) {
                    Progress::Running => remaining.push(step),
                    Progress::Finished => finished.push((step.ticket, step.on_finish, true)),
                    Progress::TargetLost => {
                        warn!(ticket = %step.ticket, "动画目标已释放，步骤失败");
                        finished.push((step.ticket, step.on_finish, false));
                    }
                }
            }

            *active = remaining;
            finished
        };

        for (ticket, on_finish, success) in finished {
            debug!(ticket = %ticket, success, "步骤结束");
            on_finish(success);
        }
    }

    /// 所有进行中的步骤立即跳到结束值并完成
    pub fn skip_all(&self) {
        let skipped: Vec<ActiveStep> = self.active.borrow_mut().drain(..).collect();

        for step in skipped {
            match step.target.upgrade() {
                Some(target) => {
                    step.apply_final(target.as_ref());
                    (step.on_finish)(true);
                }
                None => (step.on_finish)(false),
            }
        }
    }
}

impl AnimationRunner for TimelineRunner {
    fn submit(
        &self,
        step: &EffectStep,
        target: Rc<dyn Animatable>,
        on_finish: StepCallback,
    ) -> RunTicket {
        let ticket = RunTicket(self.next_ticket.get());
        self.next_ticket.set(ticket.0 + 1);

        for (&property, &value) in step.initial() {
            target.set_property(property, value);
        }

        let tracks = step
            .targets()
            .iter()
            .filter_map(|(&property, &to)| match target.get_property(property) {
                Some(from) => Some(Track { property, from, to }),
                None => {
                    warn!(property = %property, "目标不支持该属性，已忽略");
                    None
                }
            })
            .collect();

        debug!(
            ticket = %ticket,
            step_id = ?step.id(),
            duration = step.duration(),
            delay = step.delay(),
            "步骤开始"
        );

        self.active.borrow_mut().push(ActiveStep {
            ticket,
            target: Rc::downgrade(&target),
            tracks,
            delay: step.delay(),
            duration: step.duration(),
            easing: step.easing(),
            autoreverse: step.autoreverse(),
            elapsed: 0.0,
            on_finish,
        });

        ticket
    }

    fn cancel(&self, ticket: RunTicket) {
        let removed = {
            let mut active = self.active.borrow_mut();
            active
                .iter()
                .position(|step| step.ticket == ticket)
                .map(|index| active.remove(index))
        };

        if let Some(step) = removed {
            debug!(ticket = %ticket, "步骤被取消");
            (step.on_finish)(false);
        }
    }
}
