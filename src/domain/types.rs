// ==========================================
// 车间周排产系统 - 领域类型定义
// ==========================================
// 依据: 周计划口径 - 单周六个工作日 (周一至周六)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工作日 (Weekday)
// ==========================================
// 顺序即排产顺序: Monday < Tuesday < ... < Saturday
// 周日不参与排产
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// 一周内全部可排产日 (按排产顺序)
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 周内序号 (Monday = 0)
    pub fn index(&self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
        }
    }

    /// 从起始日截取到周末的可排产日序列
    ///
    /// 起始日之前的工作日不参与本次排产, 也不滚动到下一周。
    pub fn week_from(start: Weekday) -> &'static [Weekday] {
        &Self::ALL[start.index()..]
    }

    /// 解析起始日选择器 (忽略大小写)
    ///
    /// # 返回
    /// - `Some(Weekday)`: 合法的工作日名称
    /// - `None`: 无法识别
    pub fn parse(value: &str) -> Option<Weekday> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MONDAY" => Some(Weekday::Monday),
            "TUESDAY" => Some(Weekday::Tuesday),
            "WEDNESDAY" => Some(Weekday::Wednesday),
            "THURSDAY" => Some(Weekday::Thursday),
            "FRIDAY" => Some(Weekday::Friday),
            "SATURDAY" => Some(Weekday::Saturday),
            _ => None,
        }
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| format!("无法识别的工作日: {}", value))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Monday => write!(f, "MONDAY"),
            Weekday::Tuesday => write!(f, "TUESDAY"),
            Weekday::Wednesday => write!(f, "WEDNESDAY"),
            Weekday::Thursday => write!(f, "THURSDAY"),
            Weekday::Friday => write!(f, "FRIDAY"),
            Weekday::Saturday => write!(f, "SATURDAY"),
        }
    }
}

// ==========================================
// 分配状态 (Assign Status)
// ==========================================
// 红线: 状态永远由 Assignment 序列推导, 不单独落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignStatus {
    Assigned,   // 需求工时全部满足
    Partial,    // 部分满足, 存在缺口
    Unassigned, // 完全未分配
}

impl fmt::Display for AssignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignStatus::Assigned => write!(f, "ASSIGNED"),
            AssignStatus::Partial => write!(f, "PARTIAL"),
            AssignStatus::Unassigned => write!(f, "UNASSIGNED"),
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_from_monday_is_full_week() {
        assert_eq!(Weekday::week_from(Weekday::Monday), &Weekday::ALL);
    }

    #[test]
    fn test_week_from_thursday_truncates() {
        let days = Weekday::week_from(Weekday::Thursday);
        assert_eq!(
            days,
            &[Weekday::Thursday, Weekday::Friday, Weekday::Saturday]
        );
    }

    #[test]
    fn test_week_from_saturday_single_day() {
        assert_eq!(Weekday::week_from(Weekday::Saturday), &[Weekday::Saturday]);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Weekday::parse("monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse(" WEDNESDAY "), Some(Weekday::Wednesday));
        assert_eq!(Weekday::parse("Sunday"), None);
        assert_eq!(Weekday::parse(""), None);
    }

    #[test]
    fn test_weekday_ordering_follows_week() {
        assert!(Weekday::Monday < Weekday::Tuesday);
        assert!(Weekday::Friday < Weekday::Saturday);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AssignStatus::Assigned.to_string(), "ASSIGNED");
        assert_eq!(AssignStatus::Partial.to_string(), "PARTIAL");
        assert_eq!(AssignStatus::Unassigned.to_string(), "UNASSIGNED");
    }
}
