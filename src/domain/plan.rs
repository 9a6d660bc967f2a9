// ==========================================
// 车间周排产系统 - 排产计划领域模型
// ==========================================
// 职责: 定义分配记录与排产结果
// 红线: Assignment 与 WorkItem 是两种值对象, 以 item_id 关联,
//       不通过改写共享行来表达部分分配
// ==========================================

use crate::domain::capacity::{CapacityBoard, HOUR_EPSILON};
use crate::domain::types::{AssignStatus, Weekday};
use crate::domain::work_item::OrderKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Assignment - 分配记录
// ==========================================
// 一个工作项可对应多条记录 (跨日拆分); 需求未满足时
// 追加一条 day=None 的合成缺口记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    // ===== 工作项快照 =====
    pub item_id: usize,
    pub order_key: OrderKey,
    pub department: String,
    pub quantity: f64,
    pub required_hours: f64,
    pub priority_rank: u32,

    // ===== 分配落位 =====
    pub day: Option<Weekday>, // None 表示缺口记录
    pub assigned_hours: f64,  // 本条记录落位的工时
    pub shortfall_hours: f64, // 仅缺口记录非零
}

impl Assignment {
    /// 是否为合成缺口记录
    pub fn is_shortfall(&self) -> bool {
        self.day.is_none()
    }
}

// ==========================================
// ItemOutcome - 单工作项汇总
// ==========================================
// 由 Assignment 序列推导的快照, 供报表与导出使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub item_id: usize,
    pub order_key: OrderKey,
    pub department: String,
    pub quantity: f64,
    pub required_hours: f64,
    pub priority_rank: u32,
    pub assigned_hours: f64,
    pub shortfall_hours: f64,
    pub status: AssignStatus,
}

// ==========================================
// ScheduleResult - 排产结果
// ==========================================
// 一次运行产出一份, 下次运行整体覆盖, 无增量合并
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub assignments: Vec<Assignment>,   // 按分配顺序
    pub residual_board: CapacityBoard,  // 分配完成后的剩余产能
}

impl ScheduleResult {
    /// 按工作项推导汇总 (保持工作项首次出现的顺序)
    ///
    /// 状态口径:
    /// - ASSIGNED: 累计落位 >= required - EPSILON
    /// - PARTIAL: 有落位但存在缺口
    /// - UNASSIGNED: 无任何落位
    pub fn outcomes(&self) -> Vec<ItemOutcome> {
        let mut order: Vec<usize> = Vec::new();
        let mut grouped: HashMap<usize, ItemOutcome> = HashMap::new();

        for assignment in &self.assignments {
            let entry = grouped.entry(assignment.item_id).or_insert_with(|| {
                order.push(assignment.item_id);
                ItemOutcome {
                    item_id: assignment.item_id,
                    order_key: assignment.order_key.clone(),
                    department: assignment.department.clone(),
                    quantity: assignment.quantity,
                    required_hours: assignment.required_hours,
                    priority_rank: assignment.priority_rank,
                    assigned_hours: 0.0,
                    shortfall_hours: 0.0,
                    status: AssignStatus::Unassigned,
                }
            });

            if assignment.is_shortfall() {
                entry.shortfall_hours += assignment.shortfall_hours;
            } else {
                entry.assigned_hours += assignment.assigned_hours;
            }
        }

        let mut outcomes = Vec::with_capacity(order.len());
        for item_id in order {
            if let Some(mut outcome) = grouped.remove(&item_id) {
                outcome.status =
                    derive_status(outcome.required_hours, outcome.assigned_hours);
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// 推导单个工作项的状态
    pub fn status_of(&self, item_id: usize) -> Option<AssignStatus> {
        let mut seen = false;
        let mut required = 0.0;
        let mut assigned = 0.0;

        for assignment in self.assignments.iter().filter(|a| a.item_id == item_id) {
            seen = true;
            required = assignment.required_hours;
            if !assignment.is_shortfall() {
                assigned += assignment.assigned_hours;
            }
        }

        seen.then(|| derive_status(required, assigned))
    }

    /// 工作项累计落位工时
    pub fn assigned_hours_of(&self, item_id: usize) -> f64 {
        self.assignments
            .iter()
            .filter(|a| a.item_id == item_id && !a.is_shortfall())
            .map(|a| a.assigned_hours)
            .sum()
    }
}

/// 状态推导 (容差口径, 不做精确零比较)
fn derive_status(required_hours: f64, assigned_hours: f64) -> AssignStatus {
    if assigned_hours >= required_hours - HOUR_EPSILON {
        AssignStatus::Assigned
    } else if assigned_hours > HOUR_EPSILON {
        AssignStatus::Partial
    } else {
        AssignStatus::Unassigned
    }
}
