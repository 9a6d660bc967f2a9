// ==========================================
// 车间周排产系统 - 配置层
// ==========================================
// 职责: 计划配置的建模、校验与 JSON 持久化
// ==========================================

pub mod config_store;
pub mod planning_config;

// 重导出核心配置类型
pub use config_store::{ConfigStore, CYCLE_TIMES_FILE, PRIORITIES_FILE, RESOURCES_FILE};
pub use planning_config::{
    ConfigError, CycleTimeEntry, PlanningConfig, PriorityEntry, ResourceEntry,
    DEFAULT_CYCLE_MINUTES, DEFAULT_SHIFT_HOURS,
};
