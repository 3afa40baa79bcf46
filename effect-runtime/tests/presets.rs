//! # 预设集成测试
//!
//! 用 TimelineRunner 逐帧推进每个预设，检查过程与结束状态。

use std::rc::Rc;

use effect_runtime::{
    EffectConfig, EffectPlayer, PlaybackState, Preset, PresetContext, Property, TimelineRunner,
    TransformTarget, identity_transform,
};

const DT: f32 = 1.0 / 60.0;

/// 播放预设并逐帧采样，返回每帧的属性值
fn sample(preset: Preset, ctx: &PresetContext, property: Property) -> (Vec<f32>, Rc<TransformTarget>) {
    let runner = Rc::new(TimelineRunner::new());
    let player = EffectPlayer::new(Rc::clone(&runner));
    let cell = Rc::new(TransformTarget::new());

    let sequence = preset.build(ctx).unwrap();
    let handle = player.play(&sequence, &cell, None);

    let mut values = vec![cell.value(property)];
    for _ in 0..600 {
        if handle.is_finished() {
            break;
        }
        runner.update(DT);
        values.push(cell.value(property));
    }
    assert_eq!(handle.state(), PlaybackState::Completed, "{preset} 未完成");
    (values, cell)
}

/// 所有预设结束时目标都回到恒等变换、完全不透明
#[test]
fn test_every_preset_ends_at_identity() {
    let ctx = PresetContext::default();
    for preset in Preset::ALL {
        let (_, cell) = sample(preset, &ctx, Property::Alpha);
        for (property, expected) in identity_transform() {
            let actual = cell.value(property);
            assert!(
                (actual - expected).abs() < 1e-4,
                "{preset} 结束时 {property} = {actual}"
            );
        }
        assert_eq!(cell.value(Property::Alpha), 1.0, "{preset}");
    }
}

#[test]
fn test_swing_crosses_to_negative_angle() {
    let ctx = PresetContext::default().with_swing_times(3);
    let (values, _) = sample(Preset::Swing, &ctx, Property::Rotation);

    let lowest = values.iter().copied().fold(f32::INFINITY, f32::min);
    let highest = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert!((lowest + 0.05).abs() < 1e-4, "摇摆最小角度 {lowest}");
    assert!((highest - 0.05).abs() < 1e-4, "摇摆最大角度 {highest}");
    // 三次摇摆 + 复位：3 × 0.6 + 0.1 秒
    assert!(values.len() >= 114, "只推进了 {} 帧", values.len());
    assert_eq!(*values.last().unwrap(), 0.0);
}

#[test]
fn test_heartbeat_completes_after_rest() {
    let (values, _) = sample(Preset::Heartbeat, &PresetContext::default(), Property::ScaleX);

    // 0.6 秒 = 36 帧，缩放在 0.36 秒后已回到 1
    assert!(values.len() >= 36, "心跳提前结束：{} 帧", values.len());
    assert!(values[25..].iter().all(|v| (*v - 1.0).abs() < 1e-4));
}

#[test]
fn test_slide_in_from_left_starts_offscreen() {
    let ctx = PresetContext::from_config(&EffectConfig::default());
    let (values, _) = sample(Preset::SlideInFromLeft, &ctx, Property::TranslateX);

    assert_eq!(values[0], -390.0);
    assert!(values.windows(2).all(|w| w[1] >= w[0]), "滑入应单调");
    assert_eq!(*values.last().unwrap(), 0.0);
}

#[test]
fn test_shake_stays_within_amplitude() {
    let (values, _) = sample(Preset::Shake, &PresetContext::default(), Property::TranslateX);

    assert!(values.iter().all(|v| v.abs() <= 10.0 + 1e-3));
    assert!(values.iter().any(|v| *v > 5.0));
    assert!(values.iter().any(|v| *v < -5.0));
}

#[test]
fn test_fade_out_restores_alpha() {
    let (values, _) = sample(Preset::FadeOut, &PresetContext::default(), Property::Alpha);

    let lowest = values.iter().copied().fold(f32::INFINITY, f32::min);
    assert!(lowest < 0.01, "淡出最低透明度 {lowest}");
    assert_eq!(*values.last().unwrap(), 1.0);
}

#[test]
fn test_start_delay_postpones_motion() {
    let ctx = PresetContext::default().with_delay(0.25);
    let (values, _) = sample(Preset::FadeIn, &ctx, Property::Alpha);

    // 前 0.25 秒保持初始透明度
    assert!(values[..14].iter().all(|v| *v == 0.0));
    assert!(values.len() > 45);
}

#[test]
fn test_heartbeat_peaks_above_one() {
    let (values, _) = sample(Preset::Heartbeat, &PresetContext::default(), Property::ScaleX);

    assert_eq!(values[0], 0.8);
    let peak = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert!((peak - 1.2).abs() < 1e-3, "心跳峰值 {peak}");
}
