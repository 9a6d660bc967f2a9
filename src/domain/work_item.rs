// ==========================================
// 车间周排产系统 - 工作项领域模型
// ==========================================
// 职责: 定义订单键与部门级需求行
// 红线: required_hours 在分配开始后不可变
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// OrderKey - 订单键
// ==========================================
// 复合键 (订单号, 投产批号), 跨部门聚合的完成度以它为口径
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderKey {
    pub order_id: String,  // 订单号 (commessa)
    pub launch_id: String, // 投产批号 (lancio)
}

impl OrderKey {
    pub fn new(order_id: impl Into<String>, launch_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            launch_id: launch_id.into(),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.order_id, self.launch_id)
    }
}

// ==========================================
// WorkItem - 工作项
// ==========================================
// 一条部门级需求行: 同一订单在不同部门各产生一个工作项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    // ===== 标识 =====
    pub item_id: usize,       // 输入行序号, 运行内唯一
    pub order_key: OrderKey,  // 所属订单键
    pub department: String,   // 承接部门

    // ===== 需求 =====
    pub quantity: f64,        // 件数 (仅用于缺口折算回件数口径)
    pub required_hours: f64,  // 需求工时 (数量 x 单件节拍, 上游换算完成)

    // ===== 优先级 =====
    pub priority_rank: u32,   // 解析后的优先级序号, 越小越优先
}

impl WorkItem {
    pub fn new(
        item_id: usize,
        order_key: OrderKey,
        department: impl Into<String>,
        quantity: f64,
        required_hours: f64,
    ) -> Self {
        Self {
            item_id,
            order_key,
            department: department.into(),
            quantity,
            required_hours,
            priority_rank: crate::engine::priority::UNRANKED_RANK,
        }
    }
}

// ==========================================
// RawBacklogRecord - 清洗后的积压订单原始行
// ==========================================
// 由导入层从电子表格解析而来, 已完成列名裁剪与向下填充
#[derive(Debug, Clone, PartialEq)]
pub struct RawBacklogRecord {
    pub order_id: String,
    pub launch_id: String,
    pub department: String,
    pub residual_quantity: f64, // 未完成件数
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::priority::UNRANKED_RANK;

    #[test]
    fn test_order_key_display() {
        let key = OrderKey::new("C100", "7");
        assert_eq!(key.to_string(), "C100/7");
    }

    #[test]
    fn test_order_key_equality() {
        assert_eq!(OrderKey::new("C1", "1"), OrderKey::new("C1", "1"));
        assert_ne!(OrderKey::new("C1", "1"), OrderKey::new("C1", "2"));
    }

    #[test]
    fn test_new_work_item_starts_unranked() {
        let item = WorkItem::new(0, OrderKey::new("C1", "1"), "PACKING", 40.0, 8.0);
        assert_eq!(item.priority_rank, UNRANKED_RANK);
        assert_eq!(item.department, "PACKING");
    }
}
