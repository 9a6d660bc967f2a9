// ==========================================
// 车间周排产系统 - 汇总报表引擎
// ==========================================
// 职责: 由排产结果推导部门负荷、日利用率、订单完成度、缺口明细
// 输入: ScheduleResult (含最终剩余看板)
// 输出: 四张可直接导出的报表
// ==========================================

use crate::domain::capacity::CapacityConstraint;
use crate::domain::plan::ScheduleResult;
use crate::domain::types::{AssignStatus, Weekday};
use crate::domain::work_item::OrderKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 报表行类型
// ==========================================

/// 部门负荷: 落位工时合计与等效人力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentLoadRow {
    pub department: String,
    pub assigned_hours: f64,
    pub assigned_units: f64,
    pub equivalent_headcount: f64, // assigned_hours / (可排产天数 x 班次时长)
}

/// 日 x 部门利用率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationRow {
    pub day: Weekday,
    pub department: String,
    pub assigned_hours: f64,
    pub assigned_units: f64,
    pub available_hours: f64,
    pub utilization_pct: f64, // available 为 0 时报 0, 不做除零
}

/// 订单完成度: 全部工作项 ASSIGNED 才给出完成日
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompletionRow {
    pub order_key: OrderKey,
    pub completion_day: Option<Weekday>, // None 表示未完成
}

/// 缺口明细: 缺口折算回件数口径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortfallRow {
    pub order_key: OrderKey,
    pub department: String,
    pub shortfall_hours: f64,
    pub shortfall_units: f64,
}

// ==========================================
// ReportEngine - 汇总报表引擎
// ==========================================
pub struct ReportEngine {
    // 无状态引擎, 不需要注入依赖
}

impl ReportEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 部门负荷报表
    ///
    /// # 参数
    /// - `eligible_day_count`: 本次运行的可排产天数
    /// - `shift_hours`: 单人单日班次时长
    ///
    /// # 返回
    /// 按落位工时降序 (同值按部门名) 的负荷行
    pub fn department_load(
        &self,
        result: &ScheduleResult,
        eligible_day_count: usize,
        shift_hours: f64,
    ) -> Vec<DepartmentLoadRow> {
        let mut grouped: BTreeMap<String, (f64, f64)> = BTreeMap::new();

        for assignment in result.assignments.iter().filter(|a| !a.is_shortfall()) {
            let entry = grouped
                .entry(assignment.department.clone())
                .or_insert((0.0, 0.0));
            entry.0 += assignment.assigned_hours;
            entry.1 += assigned_units(
                assignment.assigned_hours,
                assignment.required_hours,
                assignment.quantity,
            );
        }

        let day_hours = eligible_day_count as f64 * shift_hours;
        let mut rows: Vec<DepartmentLoadRow> = grouped
            .into_iter()
            .map(|(department, (hours, units))| DepartmentLoadRow {
                department,
                assigned_hours: hours,
                assigned_units: units,
                equivalent_headcount: if day_hours > 0.0 { hours / day_hours } else { 0.0 },
            })
            .collect();

        rows.sort_by(|a, b| {
            b.assigned_hours
                .total_cmp(&a.assigned_hours)
                .then_with(|| a.department.cmp(&b.department))
        });
        rows
    }

    /// 日 x 部门利用率报表
    ///
    /// 行全集取自看板槽位: 无工作项引用的部门照常出现, 利用率 0。
    /// 排序: 日升序, 同日按部门名。
    pub fn utilization(&self, result: &ScheduleResult) -> Vec<UtilizationRow> {
        let mut grouped: BTreeMap<(Weekday, String), (f64, f64)> = BTreeMap::new();

        for ((department, day), _) in result.residual_board.slots() {
            grouped.entry((*day, department.clone())).or_insert((0.0, 0.0));
        }

        for assignment in &result.assignments {
            let Some(day) = assignment.day else { continue };
            let entry = grouped
                .entry((day, assignment.department.clone()))
                .or_insert((0.0, 0.0));
            entry.0 += assignment.assigned_hours;
            entry.1 += assigned_units(
                assignment.assigned_hours,
                assignment.required_hours,
                assignment.quantity,
            );
        }

        grouped
            .into_iter()
            .map(|((day, department), (hours, units))| {
                let available = result.residual_board.available(&department, day);
                UtilizationRow {
                    day,
                    department,
                    assigned_hours: hours,
                    assigned_units: units,
                    available_hours: available,
                    utilization_pct: if available > 0.0 {
                        hours / available * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }

    /// 订单完成度报表
    ///
    /// 订单下任一工作项非 ASSIGNED 即视为未完成,
    /// 不从部分数据乐观推断完成日。完成日按可排产日顺序取最晚落位日。
    pub fn order_completion(&self, result: &ScheduleResult) -> Vec<OrderCompletionRow> {
        let mut all_assigned: BTreeMap<OrderKey, bool> = BTreeMap::new();
        for outcome in result.outcomes() {
            let entry = all_assigned.entry(outcome.order_key.clone()).or_insert(true);
            *entry &= outcome.status == AssignStatus::Assigned;
        }

        let mut latest_day: BTreeMap<OrderKey, Weekday> = BTreeMap::new();
        for assignment in &result.assignments {
            let Some(day) = assignment.day else { continue };
            latest_day
                .entry(assignment.order_key.clone())
                .and_modify(|latest| *latest = (*latest).max(day))
                .or_insert(day);
        }

        all_assigned
            .into_iter()
            .map(|(order_key, complete)| {
                let completion_day = if complete {
                    latest_day.get(&order_key).copied()
                } else {
                    None
                };
                OrderCompletionRow {
                    order_key,
                    completion_day,
                }
            })
            .collect()
    }

    /// 缺口明细报表
    ///
    /// 缺口件数 = shortfall_hours / required_hours x quantity;
    /// required_hours 为 0 时整个 quantity 计为缺口。
    /// 按 (订单键, 部门) 聚合。
    pub fn unassigned_detail(&self, result: &ScheduleResult) -> Vec<ShortfallRow> {
        let mut grouped: BTreeMap<(OrderKey, String), (f64, f64)> = BTreeMap::new();

        for outcome in result.outcomes() {
            if outcome.status == AssignStatus::Assigned {
                continue;
            }

            let units = if outcome.required_hours > 0.0 {
                outcome.shortfall_hours / outcome.required_hours * outcome.quantity
            } else {
                outcome.quantity
            };

            let entry = grouped
                .entry((outcome.order_key.clone(), outcome.department.clone()))
                .or_insert((0.0, 0.0));
            entry.0 += outcome.shortfall_hours;
            entry.1 += units;
        }

        grouped
            .into_iter()
            .map(|((order_key, department), (hours, units))| ShortfallRow {
                order_key,
                department,
                shortfall_hours: hours,
                shortfall_units: units,
            })
            .collect()
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// 工时落位折算回件数口径, required 为 0 时记 0 件
fn assigned_units(assigned_hours: f64, required_hours: f64, quantity: f64) -> f64 {
    if required_hours > 0.0 {
        assigned_hours / required_hours * quantity
    } else {
        0.0
    }
}
