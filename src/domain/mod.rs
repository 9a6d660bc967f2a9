// ==========================================
// 车间周排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含文件访问逻辑, 不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod plan;
pub mod types;
pub mod work_item;

// 重导出核心类型
pub use capacity::{
    CapacityBoard, CapacityConstraint, CapacityError, CapacitySlot, HOUR_EPSILON,
};
pub use plan::{Assignment, ItemOutcome, ScheduleResult};
pub use types::{AssignStatus, Weekday};
pub use work_item::{OrderKey, RawBacklogRecord, WorkItem};
