// ==========================================
// 车间周排产系统 - 产能看板领域模型
// ==========================================
// 红线: 0 <= residual_hours <= available_hours 恒成立
// 口径: 缺失槽位等同零产能, 不是错误
// ==========================================

use crate::domain::types::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// 工时比较的统一容差 (小时)
///
/// 反复扣减会累积浮点漂移, 所有"是否还有剩余需求/产能"的判断
/// 一律走该容差, 永远不与零做精确比较。
pub const HOUR_EPSILON: f64 = 0.01;

// ==========================================
// CapacityError - 产能不变量错误
// ==========================================
// 属于调用方数据缺陷, 直接中止本次排产, 不产出部分结果
#[derive(Error, Debug)]
pub enum CapacityError {
    #[error("产能输入非法: 部门 {department} {day} available_hours={hours} 为负")]
    NegativeAvailableHours {
        department: String,
        day: Weekday,
        hours: f64,
    },

    #[error("扣减非法: 部门 {department} {day} 申请 {requested} 小时, 剩余仅 {residual} 小时")]
    ResidualExceeded {
        department: String,
        day: Weekday,
        requested: f64,
        residual: f64,
    },

    #[error("扣减非法: 部门 {department} {day} 申请的小时数 {requested} 为负")]
    NegativeConsume {
        department: String,
        day: Weekday,
        requested: f64,
    },
}

// ==========================================
// CapacitySlot - 产能槽位
// ==========================================
// 键为 (部门, 工作日), available_hours 为本次运行的只读口径
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacitySlot {
    pub available_hours: f64, // 可用工时 (操作工人数 x 班次时长), 运行内不变
    pub residual_hours: f64,  // 剩余工时, 随分配递减
}

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: Allocator / Report 的槽位约束检查接口
pub trait CapacityConstraint {
    /// 检查槽位能否吸收指定工时
    fn can_absorb(&self, hours: f64) -> bool;

    /// 检查槽位是否已耗尽 (容差口径)
    fn is_exhausted(&self) -> bool;

    /// 已消耗工时
    fn consumed_hours(&self) -> f64;

    /// 利用率 (0.0 - 1.0), 零产能槽位报 0, 不做除零
    fn utilization_ratio(&self) -> f64;
}

impl CapacityConstraint for CapacitySlot {
    fn can_absorb(&self, hours: f64) -> bool {
        hours <= self.residual_hours
    }

    fn is_exhausted(&self) -> bool {
        self.residual_hours <= HOUR_EPSILON
    }

    fn consumed_hours(&self) -> f64 {
        (self.available_hours - self.residual_hours).max(0.0)
    }

    fn utilization_ratio(&self) -> f64 {
        if self.available_hours <= 0.0 {
            return 0.0;
        }
        self.consumed_hours() / self.available_hours
    }
}

// ==========================================
// CapacityBoard - 产能看板
// ==========================================
// 运行级私有可变状态: 单次运行由唯一的分配引擎独占借用并扣减,
// 并发运行必须各自持有独立副本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityBoard {
    slots: HashMap<(String, Weekday), CapacitySlot>,
}

impl CapacityBoard {
    /// 创建空看板 (所有槽位零产能)
    pub fn empty() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// 由 (部门, 工作日, 可用工时) 快照构建看板
    ///
    /// 同一槽位出现多条记录时工时累加; 负的可用工时立即报错。
    ///
    /// # 返回
    /// - `Ok(CapacityBoard)`: residual 初始化为 available
    /// - `Err(CapacityError)`: 输入含负产能
    pub fn from_entries<I>(entries: I) -> Result<Self, CapacityError>
    where
        I: IntoIterator<Item = (String, Weekday, f64)>,
    {
        let mut slots: HashMap<(String, Weekday), CapacitySlot> = HashMap::new();

        for (department, day, hours) in entries {
            if hours < 0.0 {
                return Err(CapacityError::NegativeAvailableHours {
                    department,
                    day,
                    hours,
                });
            }

            let slot = slots.entry((department, day)).or_insert(CapacitySlot {
                available_hours: 0.0,
                residual_hours: 0.0,
            });
            slot.available_hours += hours;
            slot.residual_hours += hours;
        }

        Ok(Self { slots })
    }

    /// 查询槽位可用工时 (只读口径), 缺失槽位为 0
    pub fn available(&self, department: &str, day: Weekday) -> f64 {
        self.slots
            .get(&(department.to_string(), day))
            .map(|s| s.available_hours)
            .unwrap_or(0.0)
    }

    /// 查询槽位剩余工时, 缺失槽位为 0
    ///
    /// 缺失产能与耗尽产能不可区分, 均表现为 0。
    pub fn residual(&self, department: &str, day: Weekday) -> f64 {
        self.slots
            .get(&(department.to_string(), day))
            .map(|s| s.residual_hours)
            .unwrap_or(0.0)
    }

    /// 扣减槽位剩余工时
    ///
    /// # 参数
    /// - `hours`: 本次扣减的工时, 必须满足 0 <= hours <= residual
    ///
    /// # 返回
    /// - `Err(CapacityError)`: residual 将变负或扣减量为负, 属调用方缺陷
    pub fn consume(
        &mut self,
        department: &str,
        day: Weekday,
        hours: f64,
    ) -> Result<(), CapacityError> {
        if hours < 0.0 {
            return Err(CapacityError::NegativeConsume {
                department: department.to_string(),
                day,
                requested: hours,
            });
        }

        let residual = self.residual(department, day);
        if hours > residual {
            return Err(CapacityError::ResidualExceeded {
                department: department.to_string(),
                day,
                requested: hours,
                residual,
            });
        }

        if hours == 0.0 {
            return Ok(());
        }

        // residual > 0 蕴含槽位存在
        if let Some(slot) = self.slots.get_mut(&(department.to_string(), day)) {
            slot.residual_hours -= hours;
        }

        Ok(())
    }

    /// 遍历全部槽位快照 (用于利用率报表)
    pub fn slots(&self) -> impl Iterator<Item = (&(String, Weekday), &CapacitySlot)> {
        self.slots.iter()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(entries: &[(&str, Weekday, f64)]) -> CapacityBoard {
        CapacityBoard::from_entries(
            entries
                .iter()
                .map(|(d, day, h)| (d.to_string(), *day, *h)),
        )
        .unwrap()
    }

    #[test]
    fn test_from_entries_initializes_residual() {
        let board = board_with(&[("PACK", Weekday::Monday, 15.0)]);
        assert_eq!(board.available("PACK", Weekday::Monday), 15.0);
        assert_eq!(board.residual("PACK", Weekday::Monday), 15.0);
    }

    #[test]
    fn test_duplicate_entries_accumulate() {
        let board = board_with(&[
            ("PACK", Weekday::Monday, 7.5),
            ("PACK", Weekday::Monday, 7.5),
        ]);
        assert_eq!(board.available("PACK", Weekday::Monday), 15.0);
    }

    #[test]
    fn test_missing_slot_is_zero_capacity() {
        let board = board_with(&[("PACK", Weekday::Monday, 15.0)]);
        assert_eq!(board.residual("PAINT", Weekday::Monday), 0.0);
        assert_eq!(board.residual("PACK", Weekday::Tuesday), 0.0);
    }

    #[test]
    fn test_negative_available_is_rejected() {
        let result = CapacityBoard::from_entries(vec![(
            "PACK".to_string(),
            Weekday::Monday,
            -1.0,
        )]);
        assert!(matches!(
            result,
            Err(CapacityError::NegativeAvailableHours { .. })
        ));
    }

    #[test]
    fn test_consume_decrements_residual() {
        let mut board = board_with(&[("PACK", Weekday::Monday, 10.0)]);
        board.consume("PACK", Weekday::Monday, 4.0).unwrap();
        assert_eq!(board.residual("PACK", Weekday::Monday), 6.0);
        assert_eq!(board.available("PACK", Weekday::Monday), 10.0);
    }

    #[test]
    fn test_consume_exact_residual_reaches_zero() {
        let mut board = board_with(&[("PACK", Weekday::Monday, 10.0)]);
        board.consume("PACK", Weekday::Monday, 10.0).unwrap();
        assert_eq!(board.residual("PACK", Weekday::Monday), 0.0);
    }

    #[test]
    fn test_consume_over_residual_fails() {
        let mut board = board_with(&[("PACK", Weekday::Monday, 5.0)]);
        let result = board.consume("PACK", Weekday::Monday, 5.5);
        assert!(matches!(result, Err(CapacityError::ResidualExceeded { .. })));
        // 失败不得产生部分扣减
        assert_eq!(board.residual("PACK", Weekday::Monday), 5.0);
    }

    #[test]
    fn test_consume_from_missing_slot_fails() {
        let mut board = CapacityBoard::empty();
        let result = board.consume("PACK", Weekday::Monday, 1.0);
        assert!(matches!(result, Err(CapacityError::ResidualExceeded { .. })));
    }

    #[test]
    fn test_consume_negative_fails() {
        let mut board = board_with(&[("PACK", Weekday::Monday, 5.0)]);
        let result = board.consume("PACK", Weekday::Monday, -0.5);
        assert!(matches!(result, Err(CapacityError::NegativeConsume { .. })));
    }

    #[test]
    fn test_slot_constraint_utilization() {
        let mut board = board_with(&[("PACK", Weekday::Monday, 10.0)]);
        board.consume("PACK", Weekday::Monday, 2.5).unwrap();

        let (_, slot) = board.slots().next().unwrap();
        assert!((slot.utilization_ratio() - 0.25).abs() < 1e-9);
        assert_eq!(slot.consumed_hours(), 2.5);
        assert!(!slot.is_exhausted());
        assert!(slot.can_absorb(7.5));
        assert!(!slot.can_absorb(8.0));
    }

    #[test]
    fn test_zero_capacity_slot_reports_zero_utilization() {
        let board = board_with(&[("PACK", Weekday::Monday, 0.0)]);
        let (_, slot) = board.slots().next().unwrap();
        assert_eq!(slot.utilization_ratio(), 0.0);
        assert!(slot.is_exhausted());
    }
}
