//! # Preset Registry
//!
//! 预设类型定义与默认参数。
//! 这是所有预设名称、默认值的**唯一来源**。

use tracing::warn;

/// 预设效果
///
/// ## 语义说明
///
/// - 入场类（`SlideIn*`、`FadeIn`、`ZoomIn` 等）：先把目标写到起始状态，再动画回到恒等变换
/// - 强调类（`Shake`、`Bounce`、`Heartbeat`、`Swing` 等）：从当前状态出发，结束时回到恒等值
/// - 离场类（`FadeOut`、`SlideLeft`、`RotateOut`）：动画结束后立即恢复原状，供列表删除等场景复用单元格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    SlideInFromLeft,
    SlideInFromRight,
    SlideInFromTop,
    MoveUpWithFade,
    MoveUpWithBounce,
    FadeIn,
    ZoomIn,
    Shake,
    Bounce,
    Flip,
    RotateIn,
    Heartbeat,
    Swing,
    Pop,
    /// 轻按回弹（缩小到 0.95 再恢复）
    TapBounce,
    Scale,
    FadeOut,
    SlideLeft,
    RotateOut,
    Jiggle,
    Pulse,
    ShakeVertical,
    Expand,
    SwipeInFromBottomRight,
}

impl Preset {
    /// 全部预设
    pub const ALL: [Preset; 24] = [
        Preset::SlideInFromLeft,
        Preset::SlideInFromRight,
        Preset::SlideInFromTop,
        Preset::MoveUpWithFade,
        Preset::MoveUpWithBounce,
        Preset::FadeIn,
        Preset::ZoomIn,
        Preset::Shake,
        Preset::Bounce,
        Preset::Flip,
        Preset::RotateIn,
        Preset::Heartbeat,
        Preset::Swing,
        Preset::Pop,
        Preset::TapBounce,
        Preset::Scale,
        Preset::FadeOut,
        Preset::SlideLeft,
        Preset::RotateOut,
        Preset::Jiggle,
        Preset::Pulse,
        Preset::ShakeVertical,
        Preset::Expand,
        Preset::SwipeInFromBottomRight,
    ];

    /// 预设名（snake_case）
    pub fn name(&self) -> &'static str {
        match self {
            Preset::SlideInFromLeft => "slide_in_from_left",
            Preset::SlideInFromRight => "slide_in_from_right",
            Preset::SlideInFromTop => "slide_in_from_top",
            Preset::MoveUpWithFade => "move_up_with_fade",
            Preset::MoveUpWithBounce => "move_up_with_bounce",
            Preset::FadeIn => "fade_in",
            Preset::ZoomIn => "zoom_in",
            Preset::Shake => "shake",
            Preset::Bounce => "bounce",
            Preset::Flip => "flip",
            Preset::RotateIn => "rotate_in",
            Preset::Heartbeat => "heartbeat",
            Preset::Swing => "swing",
            Preset::Pop => "pop",
            Preset::TapBounce => "tap_bounce",
            Preset::Scale => "scale",
            Preset::FadeOut => "fade_out",
            Preset::SlideLeft => "slide_left",
            Preset::RotateOut => "rotate_out",
            Preset::Jiggle => "jiggle",
            Preset::Pulse => "pulse",
            Preset::ShakeVertical => "shake_vertical",
            Preset::Expand => "expand",
            Preset::SwipeInFromBottomRight => "swipe_in_from_bottom_right",
        }
    }

    /// 按名称查找预设
    ///
    /// 大小写不敏感，同时接受 snake_case、kebab-case 和 camelCase
    /// （`slide_in_from_left` / `slide-in-from-left` / `slideInFromLeft`）。
    /// 未知名称返回 `None` 并记录警告。
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        let found = Self::ALL
            .into_iter()
            .find(|preset| normalize(preset.name()) == wanted);

        if found.is_none() {
            warn!(name = %name, "未知预设名");
        }
        found
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 各预设的默认时长（秒）与幅度
///
/// 任何需要默认参数的地方都应使用这些常量，而非硬编码数字。
pub mod defaults {
    /// 左右滑入时长
    pub const SLIDE_IN_DURATION: f32 = 0.5;
    /// 顶部滑入时长
    pub const SLIDE_IN_FROM_TOP_DURATION: f32 = 0.6;
    /// 上移淡入时长
    pub const MOVE_UP_FADE_DURATION: f32 = 0.5;
    /// 上移回弹时长
    pub const MOVE_UP_BOUNCE_DURATION: f32 = 0.6;
    /// 上移起始偏移
    pub const MOVE_UP_OFFSET: f32 = 20.0;
    /// 淡入时长
    pub const FADE_IN_DURATION: f32 = 0.5;
    /// 放大入场时长
    pub const ZOOM_IN_DURATION: f32 = 0.4;
    /// 水平抖动总时长
    pub const SHAKE_DURATION: f32 = 0.5;
    /// 垂直抖动总时长
    pub const SHAKE_VERTICAL_DURATION: f32 = 0.4;
    /// 抖动关键帧
    pub const SHAKE_KEYFRAMES: [f32; 7] = [-10.0, 10.0, -8.0, 8.0, -5.0, 5.0, 0.0];
    /// 弹跳：上抬时长
    pub const BOUNCE_LIFT_DURATION: f32 = 0.6;
    /// 弹跳：回落时长
    pub const BOUNCE_SETTLE_DURATION: f32 = 0.3;
    /// 弹跳上抬高度
    pub const BOUNCE_HEIGHT: f32 = 20.0;
    /// 翻转时长
    pub const FLIP_DURATION: f32 = 0.6;
    /// 旋转入场时长
    pub const ROTATE_IN_DURATION: f32 = 0.5;
    /// 心跳总时长（两段各占 30%，其余为静止）
    pub const HEARTBEAT_DURATION: f32 = 0.6;
    /// 摇摆单程时长
    pub const SWING_DURATION: f32 = 0.3;
    /// 摇摆复位时长
    pub const SWING_RESET_DURATION: f32 = 0.1;
    /// 摇摆角度（弧度）
    pub const SWING_ANGLE: f32 = 0.05;
    /// 默认摇摆次数
    pub const SWING_TIMES: u32 = 2;
    /// 弹出时长
    pub const POP_DURATION: f32 = 0.3;
    /// 轻按回弹单程时长
    pub const TAP_BOUNCE_DURATION: f32 = 0.1;
    /// 缩放单程时长
    pub const SCALE_DURATION: f32 = 0.2;
    /// 离场类时长（淡出 / 左滑 / 旋转离场）
    pub const EXIT_DURATION: f32 = 0.3;
    /// 晃动单程时长
    pub const JIGGLE_DURATION: f32 = 0.1;
    /// 晃动播放次数（含首次）
    pub const JIGGLE_PLAYS: u32 = 4;
    /// 脉冲单程时长
    pub const PULSE_DURATION: f32 = 0.2;
    /// 展开时长
    pub const EXPAND_DURATION: f32 = 0.4;
    /// 右下角滑入时长
    pub const SWIPE_IN_DURATION: f32 = 0.5;
}
