// apps/ch_cli/src/main.rs

//! Cholla 命令行界面
//!
//! `cholla <parameter-file> [key=value]…`
//!
//! 读取参数文件，应用命令行覆盖，构建求解器并推进到终止时间，按
//! 配置的节奏写出快照。完成返回 0，任何致命条件返回非零并打印可读
//! 的错误信息。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：零泛型语法，仅使用
//! `SolverConfig` 与 `Box<dyn DynSolver>`，精度经 `Precision` 枚举
//! 在运行时选择。

mod output;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use ch_config::{DynSolver, ParameterMap, SolverConfig};
use ch_physics::build_solver;
use ch_physics::traits::SnapshotWriter;
use output::CsvSnapshotWriter;

/// Cholla 可压缩流体/磁流体求解器
#[derive(Parser)]
#[command(name = "cholla")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cholla grid-based hydrodynamics solver", long_about = None)]
struct Cli {
    /// 参数文件路径
    parameter_file: PathBuf,

    /// 覆盖参数文件的 key=value 序列
    overrides: Vec<String>,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 把未使用的参数视为错误
    #[arg(long)]
    strict: bool,

    /// 快照输出目录
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let pm = ParameterMap::load(&cli.parameter_file, &cli.overrides).with_context(|| {
        format!("无法读取参数文件 {}", cli.parameter_file.display())
    })?;
    let config = SolverConfig::from_parameter_map(&pm).context("配置组装失败")?;

    let mut solver = build_solver(&config).context("求解器构建失败")?;
    let grid = solver.grid_info();
    info!(
        "网格 {}x{}x{} (+{} 幽灵), 精度 {}, 终止时间 {}",
        grid.dims[0],
        grid.dims[1],
        grid.dims[2],
        grid.ghost,
        solver.precision(),
        config.time.t_end
    );

    // 启动即报告从未读取的参数；严格模式下视为错误
    let unused = pm.warn_unused_parameters(&[]);
    if cli.strict && !unused.is_empty() {
        anyhow::bail!("存在 {} 个未知参数（--strict）", unused.len());
    }

    let mut writer = CsvSnapshotWriter::new(&cli.output_dir, "snapshot")?;
    let t_end = config.time.t_end;
    let output_interval = if config.time.n_outputs > 0 {
        t_end / config.time.n_outputs as f64
    } else {
        t_end
    };
    let mut next_output = 0.0f64;

    let wall_start = Instant::now();
    loop {
        let t = solver.time();

        if t >= next_output {
            writer.write_snapshot(&solver.export_snapshot())?;
            next_output += output_interval;
        }
        if t >= t_end {
            break;
        }
        if config.time.n_steps_max > 0 && solver.step_count() >= config.time.n_steps_max {
            warn!("达到最大步数 {}，提前结束", config.time.n_steps_max);
            break;
        }

        let dt = solver.recommended_dt()?.min(t_end - t);
        solver.step(dt)?;

        if solver.step_count() % 100 == 0 {
            info!(
                "step {:6}  t = {:.6e}  dt = {:.3e}",
                solver.step_count(),
                solver.time(),
                dt
            );
        }
    }

    // 终态快照（若尚未在循环里写出）
    writer.write_snapshot(&solver.export_snapshot())?;
    info!(
        "完成: {} 步, t = {:.6e}, 耗时 {:.2}s",
        solver.step_count(),
        solver.time(),
        wall_start.elapsed().as_secs_f64(),
    );
    Ok(())
}
