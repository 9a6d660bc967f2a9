// ==========================================
// 车间周排产系统 - 核心库
// ==========================================
// 技术栈: Rust + 电子表格导入 + JSON 配置
// 系统定位: 产能分配决策支持 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AssignStatus, Assignment, CapacityBoard, CapacityConstraint, CapacityError, CapacitySlot,
    ItemOutcome, OrderKey, RawBacklogRecord, ScheduleResult, Weekday, WorkItem, HOUR_EPSILON,
};

// 引擎
pub use engine::{
    AllocatorEngine, PlanningRequest, PlanningRun, PriorityResolver, PrioritySorter, ReportEngine,
    ScheduleOrchestrator, UNRANKED_RANK,
};

// 配置
pub use config::{ConfigStore, PlanningConfig, DEFAULT_CYCLE_MINUTES, DEFAULT_SHIFT_HOURS};

// 导入
pub use importer::{BacklogImporter, ImportOptions};

// API
pub use api::{ApiError, CsvExporter, PlanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车间周排产系统";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
