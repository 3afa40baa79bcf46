//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 effect-runtime 覆盖率
//! - `effect-check`: 检查效果序列文件（JSON 结构与参数）
//! - `preview`: 用时间轴 Runner 推进预设并逐帧打印属性值

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use effect_runtime::{
    EffectConfig, EffectPlayer, EffectSequence, Preset, PresetContext, Property, TimelineRunner,
    TransformTarget,
};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "xtask", about = "xtask - 开发辅助工具")]
struct Cli {
    /// 输出调试日志
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行运行时库覆盖率报告（HTML 输出到 target/llvm-cov/html）
    CovRuntime,
    /// 检查效果序列文件
    ///
    /// 不带参数：检查 assets/effects/ 下所有 .json 文件；
    /// 带路径参数：检查指定文件或目录
    EffectCheck {
        path: Option<PathBuf>,
    },
    /// 逐帧预览预设
    Preview {
        /// 预设名（slide_in_from_left / slideInFromLeft 均可）
        preset: String,
        /// 配置文件
        #[arg(long, default_value = "effects.json")]
        config: PathBuf,
        /// 起始延迟（秒）
        #[arg(long, default_value_t = 0.0)]
        delay: f32,
        /// 每隔多少帧打印一次
        #[arg(long, default_value_t = 1)]
        every: usize,
    },
}

/// 覆盖率统计的运行时库
const RUNTIME_PACKAGE: &str = "effect-runtime";

/// `check-all` 依次执行的 cargo 命令
const CHECK_GATES: [&[&str]; 3] = [
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

/// 执行一条 cargo 命令，失败时带上完整命令行
fn cargo(args: &[&str]) -> anyhow::Result<()> {
    let step = format!("cargo {}", args.join(" "));
    eprintln!("\n==> {step}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let available = Command::new("cargo")
        .args(["llvm-cov", "--version"])
        .output()
        .is_ok_and(|out| out.status.success());
    if !available {
        anyhow::bail!(
            "cargo llvm-cov 不可用，请先执行 `cargo install cargo-llvm-cov` \
与 `rustup component add llvm-tools-preview`"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli.command) {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn real_main(task: Task) -> anyhow::Result<()> {
    match task {
        Task::CheckAll => {
            for gate in CHECK_GATES {
                cargo(gate)?;
            }
        }
        Task::CovRuntime => {
            ensure_cargo_llvm_cov_available()?;

            cargo(&["llvm-cov", "-p", RUNTIME_PACKAGE, "--all-features", "--html"])?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::EffectCheck { path } => effect_check(path.as_deref())?,
        Task::Preview {
            preset,
            config,
            delay,
            every,
        } => preview(&preset, &config, delay, every)?,
    }

    Ok(())
}

//=============================================================================
// effect-check 命令实现
//=============================================================================

/// 默认效果目录（相对于 workspace root）
const DEFAULT_EFFECTS_DIR: &str = "assets/effects";

/// 执行效果文件检查
fn effect_check(path: Option<&Path>) -> anyhow::Result<()> {
    let files = match path {
        Some(path) if path.is_file() => vec![path.to_path_buf()],
        Some(path) if path.is_dir() => collect_effect_files(path),
        Some(path) => anyhow::bail!("路径不存在: {}", path.display()),
        None => {
            let dir = Path::new(DEFAULT_EFFECTS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认效果目录不存在: {}\n请在 workspace 根目录运行，或指定文件路径",
                    dir.display()
                );
            }
            collect_effect_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到效果文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个效果文件...\n", files.len());

    let mut errors = 0;
    for file in &files {
        match check_effect_file(file) {
            Ok(sequence) => eprintln!(
                "[OK] {}: {} 步, 总时长 {:.2}s",
                file.display(),
                sequence.len(),
                sequence.total_duration()
            ),
            Err(e) => {
                eprintln!("[ERROR] {}: {e:#}", file.display());
                errors += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    if errors > 0 {
        eprintln!("❌ {} 个文件有错误", errors);
        anyhow::bail!("效果检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 收集目录下的所有效果文件
fn collect_effect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 解析单个效果文件（解析过程同时完成参数校验）
fn check_effect_file(file: &Path) -> anyhow::Result<EffectSequence> {
    let content = std::fs::read_to_string(file)?;
    let sequence = serde_json::from_str(&content)?;
    Ok(sequence)
}

//=============================================================================
// preview 命令实现
//=============================================================================

/// 预览的最长时间（秒）
const PREVIEW_LIMIT: f32 = 30.0;

fn preview(name: &str, config_path: &Path, delay: f32, every: usize) -> anyhow::Result<()> {
    let Some(preset) = Preset::from_name(name) else {
        let names: Vec<_> = Preset::ALL.iter().map(Preset::name).collect();
        anyhow::bail!("未知预设: {name}\n可用预设: {}", names.join(", "));
    };

    let config = EffectConfig::load(config_path);
    let ctx = PresetContext::from_config(&config).with_delay(delay);
    let sequence = preset.build(&ctx)?;

    let player = EffectPlayer::new(Rc::new(TimelineRunner::from_config(&config.timeline)));
    let cell = Rc::new(TransformTarget::new());

    // 只打印序列涉及的属性
    let properties: Vec<Property> = Property::ALL
        .into_iter()
        .filter(|p| {
            sequence
                .iter()
                .any(|step| step.targets().contains_key(p) || step.initial().contains_key(p))
        })
        .collect();

    let handle = player.play(&sequence, &cell, None);

    println!(
        "preset {}: {} 步, 总时长 {:.2}s",
        handle.sequence_name().unwrap_or_else(|| preset.to_string()),
        sequence.len(),
        sequence.total_duration()
    );
    let header: Vec<_> = properties.iter().map(|p| format!("{:>12}", p.as_str())).collect();
    println!("{:>5} {:>7} {}", "frame", "time", header.join(" "));

    let dt = config.timeline.frame_dt();
    let every = every.max(1);
    let mut frame = 0usize;
    loop {
        let finished = handle.is_finished();
        if frame % every == 0 || finished {
            let row: Vec<_> = properties
                .iter()
                .map(|p| format!("{:>12.3}", cell.value(*p)))
                .collect();
            println!("{frame:>5} {:>7.3} {}", frame as f32 * dt, row.join(" "));
        }
        if finished {
            break;
        }
        if frame as f32 * dt > PREVIEW_LIMIT {
            anyhow::bail!("预览超过 {PREVIEW_LIMIT} 秒仍未结束");
        }
        player.runner().update(dt);
        frame += 1;
    }

    println!("状态: {:?}", handle.state());
    Ok(())
}
