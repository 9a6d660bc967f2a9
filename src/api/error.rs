// ==========================================
// 车间周排产系统 - API 层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::config::planning_config::ConfigError;
use crate::domain::capacity::CapacityError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API 层错误类型: 聚合各层错误供外部调用方处理
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("产能不变量错误: {0}")]
    Capacity(#[from] CapacityError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导入错误: {0}")]
    Import(#[from] ImportError),

    #[error("导出失败: {0}")]
    Export(String),

    #[error("输出目录不可用: {0}")]
    Io(#[from] std::io::Error),
}
