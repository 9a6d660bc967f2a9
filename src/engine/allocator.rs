// ==========================================
// 车间周排产系统 - 产能分配引擎
// ==========================================
// 红线: 不可行需求不是错误, 以 PARTIAL/UNASSIGNED 口径出报表;
//       CapacityError 仅在内部不变量被破坏时出现
// 职责: 贪心单遍分配, 支持跨日拆分
// 输入: 已排序工作项列表 + 产能看板 + 可排产日序列
// 输出: Assignment 序列 (含合成缺口记录)
// ==========================================

use crate::domain::capacity::{CapacityBoard, CapacityError, HOUR_EPSILON};
use crate::domain::plan::Assignment;
use crate::domain::types::Weekday;
use crate::domain::work_item::WorkItem;
use tracing::{debug, instrument};

// ==========================================
// AllocatorEngine - 产能分配引擎
// ==========================================
pub struct AllocatorEngine {
    // 无状态引擎, 不需要注入依赖
}

impl AllocatorEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 按输入顺序为工作项分配产能
    ///
    /// 对每个工作项:
    /// 1) remaining = required_hours
    /// 2) 依序扫描可排产日, 槽位有剩余且 remaining > EPSILON 时
    ///    落位 min(remaining, residual) 并扣减看板
    /// 3) remaining <= EPSILON 即停止扫描后续日
    /// 4) 扫描完仍有 remaining > EPSILON 时追加一条缺口记录
    ///
    /// 排序由调用方在分配前完成一次, 分配途中不重排。
    /// 相同输入必然产出相同结果, 引擎自身不携带跨运行状态。
    ///
    /// # 返回
    /// - `Ok(Vec<Assignment>)`: 完整分配序列, 需求未满足也算成功
    /// - `Err(CapacityError)`: 看板不变量被破坏 (调用方数据缺陷)
    #[instrument(skip(self, items, board, eligible_days), fields(
        items_count = items.len(),
        eligible_days_count = eligible_days.len()
    ))]
    pub fn allocate(
        &self,
        items: &[WorkItem],
        board: &mut CapacityBoard,
        eligible_days: &[Weekday],
    ) -> Result<Vec<Assignment>, CapacityError> {
        let mut assignments = Vec::new();

        for item in items {
            let mut remaining = item.required_hours;
            let mut allocated_any = false;

            for &day in eligible_days {
                if remaining <= HOUR_EPSILON {
                    break;
                }

                let residual = board.residual(&item.department, day);
                if residual > 0.0 {
                    let take = remaining.min(residual);
                    board.consume(&item.department, day, take)?;

                    assignments.push(Assignment {
                        item_id: item.item_id,
                        order_key: item.order_key.clone(),
                        department: item.department.clone(),
                        quantity: item.quantity,
                        required_hours: item.required_hours,
                        priority_rank: item.priority_rank,
                        day: Some(day),
                        assigned_hours: take,
                        shortfall_hours: 0.0,
                    });

                    remaining -= take;
                    allocated_any = true;
                }
            }

            if remaining > HOUR_EPSILON {
                debug!(
                    item_id = item.item_id,
                    order_key = %item.order_key,
                    department = %item.department,
                    shortfall_hours = remaining,
                    allocated_any,
                    "工作项需求未满足"
                );

                assignments.push(Assignment {
                    item_id: item.item_id,
                    order_key: item.order_key.clone(),
                    department: item.department.clone(),
                    quantity: item.quantity,
                    required_hours: item.required_hours,
                    priority_rank: item.priority_rank,
                    day: None,
                    assigned_hours: 0.0,
                    shortfall_hours: remaining,
                });
            }
        }

        Ok(assignments)
    }
}

impl Default for AllocatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
