// ==========================================
// 车间周排产系统 - 排产业务接口
// ==========================================
// 职责: 串联配置存储、积压订单导入与引擎编排
// 红线: 核心引擎不做 I/O, 所有文件访问止步于此层
// ==========================================

use crate::api::error::ApiError;
use crate::config::config_store::ConfigStore;
use crate::config::planning_config::PlanningConfig;
use crate::domain::types::Weekday;
use crate::domain::work_item::WorkItem;
use crate::engine::orchestrator::{PlanningRequest, PlanningRun, ScheduleOrchestrator};
use crate::importer::backlog_importer::{BacklogImporter, ImportOptions};
use std::path::Path;
use tracing::info;

// ==========================================
// PlanApi - 排产业务接口
// ==========================================
pub struct PlanApi {
    store: ConfigStore,
    importer: BacklogImporter,
    orchestrator: ScheduleOrchestrator,
}

impl PlanApi {
    /// 在指定配置目录上创建接口
    pub fn new(config_dir: impl Into<std::path::PathBuf>) -> Result<Self, ApiError> {
        Ok(Self {
            store: ConfigStore::new(config_dir)?,
            importer: BacklogImporter::default(),
            orchestrator: ScheduleOrchestrator::new(),
        })
    }

    /// 自定义导入选项的构造
    pub fn with_import_options(
        config_dir: impl Into<std::path::PathBuf>,
        options: ImportOptions,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            store: ConfigStore::new(config_dir)?,
            importer: BacklogImporter::new(options),
            orchestrator: ScheduleOrchestrator::new(),
        })
    }

    /// 从积压订单文件执行一次完整排产
    ///
    /// # 参数
    /// - `backlog_path`: 生产看板电子表格 (.xlsx/.xls/.csv)
    /// - `start_day`: 本次运行的起始日
    ///
    /// # 返回
    /// 完整的运行产出; 配置/导入/产能错误在任何分配开始前暴露
    pub fn run_from_file(
        &self,
        backlog_path: &Path,
        start_day: Weekday,
    ) -> Result<PlanningRun, ApiError> {
        let mut config = self.store.load()?;
        config.start_day = start_day;
        config.validate()?;

        let records = self.importer.load_records(backlog_path)?;
        let work_items = self.importer.to_work_items(&records, &config);
        info!(
            backlog = %backlog_path.display(),
            work_items = work_items.len(),
            "积压订单就绪, 进入排产"
        );

        self.run_with_config(&config, work_items)
    }

    /// 以内存中的配置与工作项执行一次排产
    pub fn run_with_config(
        &self,
        config: &PlanningConfig,
        work_items: Vec<WorkItem>,
    ) -> Result<PlanningRun, ApiError> {
        config.validate()?;

        let request = PlanningRequest {
            work_items,
            priority_entries: config.priority_entries(),
            capacity_entries: config.capacity_entries(),
            start_day: config.start_day,
            shift_hours: config.shift_hours,
        };

        Ok(self.orchestrator.run(request)?)
    }

    /// 读取当前持久化配置
    pub fn load_config(&self) -> Result<PlanningConfig, ApiError> {
        Ok(self.store.load()?)
    }

    /// 持久化配置 (运行前自动保存的口径与上游一致)
    pub fn save_config(&self, config: &PlanningConfig) -> Result<(), ApiError> {
        Ok(self.store.save(config)?)
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::planning_config::{PriorityEntry, ResourceEntry};
    use crate::domain::types::AssignStatus;
    use crate::domain::work_item::OrderKey;
    use std::collections::BTreeMap;

    fn config_with_capacity() -> PlanningConfig {
        let mut operators = BTreeMap::new();
        operators.insert(Weekday::Monday, 2.0); // 15h
        PlanningConfig {
            resources: vec![ResourceEntry {
                department: "PACK".to_string(),
                operators,
            }],
            priorities: vec![PriorityEntry {
                order_id: "C1".to_string(),
                launch_id: "1".to_string(),
                rank: 1,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_run_with_config_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let api = PlanApi::new(dir.path()).unwrap();

        let items = vec![WorkItem::new(
            0,
            OrderKey::new("C1", "1"),
            "PACK",
            40.0,
            8.0,
        )];
        let run = api.run_with_config(&config_with_capacity(), items).unwrap();

        assert_eq!(run.schedule.status_of(0), Some(AssignStatus::Assigned));
        assert_eq!(
            run.schedule.residual_board.residual("PACK", Weekday::Monday),
            7.0
        );
    }

    #[test]
    fn test_invalid_shift_hours_fails_before_allocation() {
        let dir = tempfile::tempdir().unwrap();
        let api = PlanApi::new(dir.path()).unwrap();

        let mut config = config_with_capacity();
        config.shift_hours = -1.0;
        let result = api.run_with_config(&config, Vec::new());
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_config_round_trip_through_api() {
        let dir = tempfile::tempdir().unwrap();
        let api = PlanApi::new(dir.path()).unwrap();

        let config = config_with_capacity();
        api.save_config(&config).unwrap();
        let loaded = api.load_config().unwrap();
        assert_eq!(loaded.resources, config.resources);
        assert_eq!(loaded.priorities, config.priorities);
    }
}
