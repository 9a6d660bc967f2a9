// ==========================================
// 车间周排产系统 - 优先级解析与排序引擎
// ==========================================
// 职责: 订单键 -> 优先级序号的解析, 以及分配前的一次性全序排序
// 输入: 稀疏优先级表 + 工作项列表
// 输出: 携带 priority_rank 的有序工作项列表
// ==========================================

use crate::domain::work_item::{OrderKey, WorkItem};
use std::cmp::Ordering;
use std::collections::HashMap;

/// 未定级哨兵: 严格大于任何人工给定的序号,
/// 未定级订单永远排在已定级订单之后, 彼此保持输入相对顺序
pub const UNRANKED_RANK: u32 = u32::MAX;

// ==========================================
// PriorityResolver - 优先级解析器
// ==========================================
pub struct PriorityResolver {
    ranks: HashMap<OrderKey, u32>,
}

impl PriorityResolver {
    /// 由稀疏的 (订单键, 序号) 映射构建解析器
    ///
    /// 不是每个订单都定级; 同一订单键重复出现时取序号更小者。
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (OrderKey, u32)>,
    {
        let mut ranks: HashMap<OrderKey, u32> = HashMap::new();
        for (key, rank) in entries {
            ranks
                .entry(key)
                .and_modify(|existing| *existing = (*existing).min(rank))
                .or_insert(rank);
        }
        Self { ranks }
    }

    /// 解析订单键的优先级序号
    ///
    /// # 返回
    /// 人工给定的序号, 未定级时为 UNRANKED_RANK
    pub fn resolve(&self, key: &OrderKey) -> u32 {
        self.ranks.get(key).copied().unwrap_or(UNRANKED_RANK)
    }

    /// 为整张工作项表就地回填优先级
    pub fn attach(&self, items: &mut [WorkItem]) {
        for item in items.iter_mut() {
            item.priority_rank = self.resolve(&item.order_key);
        }
    }
}

// ==========================================
// PrioritySorter - 分配前排序引擎
// ==========================================
pub struct PrioritySorter {
    // 无状态引擎, 不需要注入依赖
}

impl PrioritySorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 排序工作项列表 (分配开始前执行一次, 中途不重排)
    ///
    /// 排序键:
    /// 1) priority_rank 升序 (未定级最后)
    /// 2) required_hours 降序 (同级内大单先占产能, 避免被碎片化饿死)
    /// 3) 稳定排序保持输入顺序, 保证可复现
    pub fn sort(&self, mut items: Vec<WorkItem>) -> Vec<WorkItem> {
        items.sort_by(|a, b| self.compare(a, b));
        items
    }

    fn compare(&self, a: &WorkItem, b: &WorkItem) -> Ordering {
        match a.priority_rank.cmp(&b.priority_rank) {
            Ordering::Equal => {}
            other => return other,
        }

        // 降序: b 与 a 对调; total_cmp 使 NaN 也有全序, 排序不 panic
        b.required_hours.total_cmp(&a.required_hours)
    }
}

impl Default for PrioritySorter {
    fn default() -> Self {
        Self::new()
    }
}
