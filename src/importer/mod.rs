// ==========================================
// 车间周排产系统 - 导入层
// ==========================================
// 职责: 外部电子表格 -> 清洗后的核心输入
// 红线: 畸形上游记录在此过滤/默认, 不进入核心
// ==========================================

pub mod backlog_importer;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use backlog_importer::{BacklogImporter, ImportOptions};
pub use error::ImportError;
pub use file_parser::{parser_for, CsvParser, ExcelParser, FileParser};
