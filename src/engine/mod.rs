// ==========================================
// 车间周排产系统 - 引擎层
// ==========================================
// 职责: 实现排产业务规则引擎
// 红线: 引擎不做 I/O, 所有输入在运行前物化
// ==========================================

pub mod allocator;
pub mod orchestrator;
pub mod priority;
pub mod report;

// 重导出核心引擎
pub use allocator::AllocatorEngine;
pub use orchestrator::{PlanningRequest, PlanningRun, ScheduleOrchestrator};
pub use priority::{PriorityResolver, PrioritySorter, UNRANKED_RANK};
pub use report::{
    DepartmentLoadRow, OrderCompletionRow, ReportEngine, ShortfallRow, UtilizationRow,
};
