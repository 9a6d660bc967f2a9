// ==========================================
// 车间周排产系统 - 命令行主入口
// ==========================================
// 用法: workshop-aps <积压订单文件> [--start-day monday]
//       [--config-dir 目录] [--out-dir 目录] [--internal-only]
// ==========================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use workshop_aps::api::{CsvExporter, PlanApi};
use workshop_aps::config::ConfigStore;
use workshop_aps::domain::Weekday;
use workshop_aps::importer::ImportOptions;
use workshop_aps::logging;

#[derive(Parser)]
#[command(name = "workshop-aps")]
#[command(version)]
#[command(about = "车间周排产系统 - 产能分配与负荷分析")]
struct Cli {
    /// 积压订单文件 (.xlsx/.xls/.csv)
    backlog_path: PathBuf,

    /// 起始日 (monday..saturday), 起始日之前的产能不参与本次排产
    #[arg(long, default_value = "monday")]
    start_day: Weekday,

    /// 配置目录 (缺省为系统配置目录)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// 报表输出目录
    #[arg(long, default_value = "reports")]
    out_dir: PathBuf,

    /// 仅保留自产行, 排除采购行
    #[arg(long)]
    internal_only: bool,
}

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", workshop_aps::APP_NAME, workshop_aps::VERSION);
    tracing::info!("==================================================");

    let cli = Cli::parse();

    let config_dir = cli.config_dir.unwrap_or_else(ConfigStore::default_dir);
    tracing::info!("配置目录: {}", config_dir.display());

    let api = PlanApi::with_import_options(
        &config_dir,
        ImportOptions {
            internal_only: cli.internal_only,
        },
    )?;

    let run = api.run_from_file(&cli.backlog_path, cli.start_day)?;

    let assigned = run
        .schedule
        .assignments
        .iter()
        .filter(|a| !a.is_shortfall())
        .map(|a| a.assigned_hours)
        .sum::<f64>();
    let shortfall = run
        .schedule
        .assignments
        .iter()
        .map(|a| a.shortfall_hours)
        .sum::<f64>();
    tracing::info!(
        run_id = %run.run_id,
        start_day = %run.start_day,
        assigned_hours = assigned,
        shortfall_hours = shortfall,
        "排产完成"
    );

    let exporter = CsvExporter::new(&cli.out_dir)?;
    let files = exporter.export_run(&run)?;
    for file in &files {
        tracing::info!("已写出: {}", file.display());
    }

    Ok(())
}
