// ==========================================
// 车间周排产系统 - 引擎编排器
// ==========================================
// 用途: 协调解析、排序、分配、汇总四步的执行顺序
// 红线: 全有或全无 - 致命错误发生在任何产出之前,
//       需求缺口属于成功运行
// ==========================================

use crate::domain::capacity::{CapacityBoard, CapacityError};
use crate::domain::plan::ScheduleResult;
use crate::domain::types::Weekday;
use crate::domain::work_item::{OrderKey, WorkItem};
use crate::engine::allocator::AllocatorEngine;
use crate::engine::priority::{PriorityResolver, PrioritySorter};
use crate::engine::report::{
    DepartmentLoadRow, OrderCompletionRow, ReportEngine, ShortfallRow, UtilizationRow,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// PlanningRequest - 单次运行的全部输入
// ==========================================
// 工作项、产能、优先级快照在运行前全部物化, 核心算法不做 I/O
#[derive(Debug, Clone)]
pub struct PlanningRequest {
    pub work_items: Vec<WorkItem>,                      // priority_rank 待解析
    pub priority_entries: Vec<(OrderKey, u32)>,         // 稀疏优先级表
    pub capacity_entries: Vec<(String, Weekday, f64)>,  // (部门, 工作日, 可用工时)
    pub start_day: Weekday,                             // 起始日选择器
    pub shift_hours: f64,                               // 单人单日班次时长
}

// ==========================================
// PlanningRun - 单次运行产出
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRun {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub start_day: Weekday,
    pub eligible_days: Vec<Weekday>,

    pub schedule: ScheduleResult,

    // 四张汇总报表
    pub department_load: Vec<DepartmentLoadRow>,
    pub utilization: Vec<UtilizationRow>,
    pub order_completion: Vec<OrderCompletionRow>,
    pub unassigned_detail: Vec<ShortfallRow>,
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator {
    sorter: PrioritySorter,
    allocator: AllocatorEngine,
    report: ReportEngine,
}

impl ScheduleOrchestrator {
    pub fn new() -> Self {
        Self {
            sorter: PrioritySorter::new(),
            allocator: AllocatorEngine::new(),
            report: ReportEngine::new(),
        }
    }

    /// 执行完整排产流程
    ///
    /// 步骤:
    /// 1) 构建产能看板 (负产能在此被拒绝)
    /// 2) 从起始日截取可排产日序列
    /// 3) 解析优先级并一次性排序
    /// 4) 贪心分配
    /// 5) 推导四张汇总报表
    ///
    /// # 返回
    /// - `Ok(PlanningRun)`: 完整结果, 即使存在缺口
    /// - `Err(CapacityError)`: 产能不变量被破坏, 无任何部分产出
    pub fn run(&self, request: PlanningRequest) -> Result<PlanningRun, CapacityError> {
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            items_count = request.work_items.len(),
            start_day = %request.start_day,
            "开始执行排产流程"
        );

        // ==========================================
        // 步骤1: 产能看板
        // ==========================================
        let mut board = CapacityBoard::from_entries(request.capacity_entries)?;

        // ==========================================
        // 步骤2: 可排产日序列
        // ==========================================
        let eligible_days = Weekday::week_from(request.start_day).to_vec();
        debug!(eligible_days = ?eligible_days, "可排产日序列确定");

        // ==========================================
        // 步骤3: 优先级解析与排序
        // ==========================================
        let resolver = PriorityResolver::from_entries(request.priority_entries);
        let mut items = request.work_items;
        resolver.attach(&mut items);
        let sorted_items = self.sorter.sort(items);
        debug!(sorted_count = sorted_items.len(), "优先级排序完成");

        // ==========================================
        // 步骤4: 产能分配
        // ==========================================
        let assignments = self
            .allocator
            .allocate(&sorted_items, &mut board, &eligible_days)?;
        let schedule = ScheduleResult {
            assignments,
            residual_board: board,
        };

        // ==========================================
        // 步骤5: 汇总报表
        // ==========================================
        let department_load =
            self.report
                .department_load(&schedule, eligible_days.len(), request.shift_hours);
        let utilization = self.report.utilization(&schedule);
        let order_completion = self.report.order_completion(&schedule);
        let unassigned_detail = self.report.unassigned_detail(&schedule);

        info!(
            run_id = %run_id,
            assignments_count = schedule.assignments.len(),
            shortfall_rows = unassigned_detail.len(),
            "排产流程完成"
        );

        Ok(PlanningRun {
            run_id,
            generated_at: Utc::now(),
            start_day: request.start_day,
            eligible_days,
            schedule,
            department_load,
            utilization,
            order_completion,
            unassigned_detail,
        })
    }
}

impl Default for ScheduleOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AssignStatus;

    fn request() -> PlanningRequest {
        PlanningRequest {
            work_items: vec![
                WorkItem::new(0, OrderKey::new("C1", "1"), "PACK", 40.0, 8.0),
                WorkItem::new(1, OrderKey::new("C2", "1"), "PACK", 30.0, 6.0),
            ],
            priority_entries: vec![
                (OrderKey::new("C1", "1"), 1),
                (OrderKey::new("C2", "1"), 2),
            ],
            capacity_entries: vec![
                ("PACK".to_string(), Weekday::Monday, 10.0),
                ("PACK".to_string(), Weekday::Tuesday, 10.0),
            ],
            start_day: Weekday::Monday,
            shift_hours: 7.5,
        }
    }

    #[test]
    fn test_run_end_to_end() {
        let run = ScheduleOrchestrator::new().run(request()).unwrap();

        assert_eq!(run.eligible_days, Weekday::ALL.to_vec());
        assert_eq!(run.schedule.status_of(0), Some(AssignStatus::Assigned));
        assert_eq!(run.schedule.status_of(1), Some(AssignStatus::Assigned));
        assert_eq!(
            run.schedule.residual_board.residual("PACK", Weekday::Monday),
            0.0
        );
        assert_eq!(
            run.schedule.residual_board.residual("PACK", Weekday::Tuesday),
            6.0
        );
        assert_eq!(run.department_load.len(), 1);
        assert_eq!(run.order_completion.len(), 2);
        assert!(run.unassigned_detail.is_empty());
        assert!(!run.run_id.is_empty());
    }

    #[test]
    fn test_run_is_idempotent_modulo_metadata() {
        let first = ScheduleOrchestrator::new().run(request()).unwrap();
        let second = ScheduleOrchestrator::new().run(request()).unwrap();

        // run_id / generated_at 以外的结果逐字节一致
        assert_eq!(first.schedule, second.schedule);
        assert_eq!(first.department_load, second.department_load);
        assert_eq!(first.utilization, second.utilization);
        assert_eq!(first.order_completion, second.order_completion);
        assert_eq!(first.unassigned_detail, second.unassigned_detail);
    }

    #[test]
    fn test_run_rejects_negative_capacity_before_output() {
        let mut bad = request();
        bad.capacity_entries
            .push(("PACK".to_string(), Weekday::Friday, -1.0));

        let result = ScheduleOrchestrator::new().run(bad);
        assert!(matches!(
            result,
            Err(CapacityError::NegativeAvailableHours { .. })
        ));
    }

    #[test]
    fn test_run_start_day_truncates_week() {
        let mut req = request();
        req.start_day = Weekday::Tuesday;

        let run = ScheduleOrchestrator::new().run(req).unwrap();
        assert_eq!(run.eligible_days.first(), Some(&Weekday::Tuesday));
        // 周一产能不可用: 两个工作项共 14h 只能落在周二 10h
        assert_eq!(
            run.schedule.residual_board.residual("PACK", Weekday::Monday),
            10.0
        );
        assert_eq!(run.schedule.status_of(0), Some(AssignStatus::Assigned));
        assert_eq!(run.schedule.status_of(1), Some(AssignStatus::Partial));
    }

    #[test]
    fn test_unranked_item_served_after_ranked() {
        // 未定级与已定级争抢周一 5h: 已定级先被满足, 与输入顺序无关
        let req = PlanningRequest {
            work_items: vec![
                WorkItem::new(0, OrderKey::new("NO_RANK", "1"), "PACK", 10.0, 4.0),
                WorkItem::new(1, OrderKey::new("RANKED", "1"), "PACK", 10.0, 4.0),
            ],
            priority_entries: vec![(OrderKey::new("RANKED", "1"), 3)],
            capacity_entries: vec![("PACK".to_string(), Weekday::Monday, 5.0)],
            start_day: Weekday::Monday,
            shift_hours: 7.5,
        };

        let run = ScheduleOrchestrator::new().run(req).unwrap();
        assert_eq!(run.schedule.status_of(1), Some(AssignStatus::Assigned));
        assert_eq!(run.schedule.status_of(0), Some(AssignStatus::Partial));
        assert_eq!(run.schedule.assigned_hours_of(0), 1.0);
    }
}
