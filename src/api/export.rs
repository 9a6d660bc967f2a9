// ==========================================
// 车间周排产系统 - 报表导出
// ==========================================
// 职责: 排产结果与四张汇总报表的 CSV 导出
// 口径: 数值按原值写出, 不做四舍五入; 状态枚举逐字复现
// ==========================================

use crate::api::error::ApiError;
use crate::domain::types::AssignStatus;
use crate::engine::orchestrator::PlanningRun;
use crate::engine::priority::UNRANKED_RANK;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 排产明细文件名
pub const SCHEDULE_FILE: &str = "schedule.csv";
/// 部门负荷文件名
pub const DEPARTMENT_LOAD_FILE: &str = "department_load.csv";
/// 利用率文件名
pub const UTILIZATION_FILE: &str = "utilization.csv";
/// 订单完成度文件名
pub const ORDER_COMPLETION_FILE: &str = "order_completion.csv";
/// 缺口明细文件名
pub const UNASSIGNED_DETAIL_FILE: &str = "unassigned_detail.csv";

/// 完成度列中"未完成"的占位符
const NOT_COMPLETE: &str = "NOT_COMPLETE";

// ==========================================
// CsvExporter - CSV 导出器
// ==========================================
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    /// 在输出目录上创建导出器 (目录不存在时创建)
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }

    /// 导出一次运行的全部五张表
    ///
    /// # 返回
    /// 实际写出的文件路径列表
    pub fn export_run(&self, run: &PlanningRun) -> Result<Vec<PathBuf>, ApiError> {
        let paths = vec![
            self.export_schedule(run)?,
            self.export_department_load(run)?,
            self.export_utilization(run)?,
            self.export_order_completion(run)?,
            self.export_unassigned_detail(run)?,
        ];

        info!(
            run_id = %run.run_id,
            out_dir = %self.out_dir.display(),
            files = paths.len(),
            "报表导出完成"
        );
        Ok(paths)
    }

    /// 排产明细: 每条分配记录一行, 状态由结果推导
    fn export_schedule(&self, run: &PlanningRun) -> Result<PathBuf, ApiError> {
        let path = self.out_dir.join(SCHEDULE_FILE);
        let mut writer = self.writer(&path)?;

        // 状态按工作项推导一次, 行内复用
        let statuses: HashMap<usize, AssignStatus> = run
            .schedule
            .outcomes()
            .into_iter()
            .map(|o| (o.item_id, o.status))
            .collect();

        writer
            .write_record([
                "status",
                "day",
                "order_id",
                "launch_id",
                "department",
                "priority_rank",
                "quantity",
                "required_hours",
                "assigned_hours",
                "shortfall_hours",
            ])
            .map_err(|e| ApiError::Export(e.to_string()))?;

        for assignment in &run.schedule.assignments {
            let status = statuses
                .get(&assignment.item_id)
                .copied()
                .unwrap_or(AssignStatus::Unassigned);

            writer
                .write_record([
                    status.to_string(),
                    assignment
                        .day
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    assignment.order_key.order_id.clone(),
                    assignment.order_key.launch_id.clone(),
                    assignment.department.clone(),
                    rank_cell(assignment.priority_rank),
                    assignment.quantity.to_string(),
                    assignment.required_hours.to_string(),
                    assignment.assigned_hours.to_string(),
                    assignment.shortfall_hours.to_string(),
                ])
                .map_err(|e| ApiError::Export(e.to_string()))?;
        }

        self.finish(writer)?;
        Ok(path)
    }

    fn export_department_load(&self, run: &PlanningRun) -> Result<PathBuf, ApiError> {
        let path = self.out_dir.join(DEPARTMENT_LOAD_FILE);
        let mut writer = self.writer(&path)?;

        writer
            .write_record([
                "department",
                "assigned_hours",
                "assigned_units",
                "equivalent_headcount",
            ])
            .map_err(|e| ApiError::Export(e.to_string()))?;

        for row in &run.department_load {
            writer
                .write_record([
                    row.department.clone(),
                    row.assigned_hours.to_string(),
                    row.assigned_units.to_string(),
                    row.equivalent_headcount.to_string(),
                ])
                .map_err(|e| ApiError::Export(e.to_string()))?;
        }

        self.finish(writer)?;
        Ok(path)
    }

    fn export_utilization(&self, run: &PlanningRun) -> Result<PathBuf, ApiError> {
        let path = self.out_dir.join(UTILIZATION_FILE);
        let mut writer = self.writer(&path)?;

        writer
            .write_record([
                "day",
                "department",
                "assigned_hours",
                "assigned_units",
                "available_hours",
                "utilization_pct",
            ])
            .map_err(|e| ApiError::Export(e.to_string()))?;

        for row in &run.utilization {
            writer
                .write_record([
                    row.day.to_string(),
                    row.department.clone(),
                    row.assigned_hours.to_string(),
                    row.assigned_units.to_string(),
                    row.available_hours.to_string(),
                    row.utilization_pct.to_string(),
                ])
                .map_err(|e| ApiError::Export(e.to_string()))?;
        }

        self.finish(writer)?;
        Ok(path)
    }

    fn export_order_completion(&self, run: &PlanningRun) -> Result<PathBuf, ApiError> {
        let path = self.out_dir.join(ORDER_COMPLETION_FILE);
        let mut writer = self.writer(&path)?;

        writer
            .write_record(["order_id", "launch_id", "completion_day"])
            .map_err(|e| ApiError::Export(e.to_string()))?;

        for row in &run.order_completion {
            writer
                .write_record([
                    row.order_key.order_id.clone(),
                    row.order_key.launch_id.clone(),
                    row.completion_day
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| NOT_COMPLETE.to_string()),
                ])
                .map_err(|e| ApiError::Export(e.to_string()))?;
        }

        self.finish(writer)?;
        Ok(path)
    }

    fn export_unassigned_detail(&self, run: &PlanningRun) -> Result<PathBuf, ApiError> {
        let path = self.out_dir.join(UNASSIGNED_DETAIL_FILE);
        let mut writer = self.writer(&path)?;

        writer
            .write_record([
                "order_id",
                "launch_id",
                "department",
                "shortfall_hours",
                "shortfall_units",
            ])
            .map_err(|e| ApiError::Export(e.to_string()))?;

        for row in &run.unassigned_detail {
            writer
                .write_record([
                    row.order_key.order_id.clone(),
                    row.order_key.launch_id.clone(),
                    row.department.clone(),
                    row.shortfall_hours.to_string(),
                    row.shortfall_units.to_string(),
                ])
                .map_err(|e| ApiError::Export(e.to_string()))?;
        }

        self.finish(writer)?;
        Ok(path)
    }

    fn writer(&self, path: &Path) -> Result<csv::Writer<fs::File>, ApiError> {
        csv::Writer::from_path(path).map_err(|e| ApiError::Export(e.to_string()))
    }

    fn finish(&self, mut writer: csv::Writer<fs::File>) -> Result<(), ApiError> {
        writer.flush()?;
        Ok(())
    }
}

/// 未定级序号在导出中留空
fn rank_cell(rank: u32) -> String {
    if rank == UNRANKED_RANK {
        String::new()
    } else {
        rank.to_string()
    }
}
