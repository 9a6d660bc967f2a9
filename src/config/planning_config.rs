// ==========================================
// 车间周排产系统 - 计划配置模型
// ==========================================
// 职责: 资源表、优先级表、节拍表与运行参数
// 口径: 可用工时 = 操作工人数 x 班次时长
// ==========================================

use crate::domain::types::Weekday;
use crate::domain::work_item::OrderKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 单人单日默认班次时长 (小时)
pub const DEFAULT_SHIFT_HOURS: f64 = 7.5;

/// 默认单件节拍 (分钟/件)
pub const DEFAULT_CYCLE_MINUTES: f64 = 12.5;

// ==========================================
// ConfigError - 配置错误
// ==========================================
// 在任何分配开始之前暴露
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("未知的起始日选择器: {0}")]
    UnknownStartDay(String),

    #[error("班次时长非法: {0} (必须为正数)")]
    InvalidShiftHours(f64),

    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

// ==========================================
// ResourceEntry - 部门资源行
// ==========================================
// 每部门一行, 按工作日给出操作工人数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub department: String,
    pub operators: BTreeMap<Weekday, f64>, // 缺失的工作日视为 0 人
}

// ==========================================
// PriorityEntry - 订单优先级行
// ==========================================
// 稀疏表: 不是每个订单都定级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEntry {
    pub order_id: String,
    pub launch_id: String,
    pub rank: u32, // 1 = 最高
}

// ==========================================
// CycleTimeEntry - 部门节拍行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeEntry {
    pub department: String,
    pub minutes_per_unit: f64,
}

// ==========================================
// PlanningConfig - 计划配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub resources: Vec<ResourceEntry>,
    pub priorities: Vec<PriorityEntry>,
    pub cycle_times: Vec<CycleTimeEntry>,
    pub start_day: Weekday,
    pub shift_hours: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            priorities: Vec::new(),
            cycle_times: Vec::new(),
            start_day: Weekday::Monday,
            shift_hours: DEFAULT_SHIFT_HOURS,
        }
    }
}

impl PlanningConfig {
    /// 校验运行参数 (在任何分配开始之前调用)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.shift_hours > 0.0) {
            return Err(ConfigError::InvalidShiftHours(self.shift_hours));
        }
        Ok(())
    }

    /// 解析起始日选择器
    pub fn parse_start_day(value: &str) -> Result<Weekday, ConfigError> {
        Weekday::parse(value).ok_or_else(|| ConfigError::UnknownStartDay(value.to_string()))
    }

    /// 展开为 (部门, 工作日, 可用工时) 产能快照
    pub fn capacity_entries(&self) -> Vec<(String, Weekday, f64)> {
        let mut entries = Vec::new();
        for resource in &self.resources {
            for day in Weekday::ALL {
                let operators = resource.operators.get(&day).copied().unwrap_or(0.0);
                entries.push((
                    resource.department.clone(),
                    day,
                    operators * self.shift_hours,
                ));
            }
        }
        entries
    }

    /// 展开为稀疏 (订单键, 序号) 优先级快照
    pub fn priority_entries(&self) -> Vec<(OrderKey, u32)> {
        self.priorities
            .iter()
            .map(|p| {
                (
                    OrderKey::new(p.order_id.clone(), p.launch_id.clone()),
                    p.rank,
                )
            })
            .collect()
    }

    /// 查询部门单件节拍 (小时/件), 未配置走默认节拍
    pub fn cycle_hours_per_unit(&self, department: &str) -> f64 {
        self.cycle_times
            .iter()
            .find(|c| c.department == department)
            .map(|c| c.minutes_per_unit)
            .unwrap_or(DEFAULT_CYCLE_MINUTES)
            / 60.0
    }
}
