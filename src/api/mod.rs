// ==========================================
// 车间周排产系统 - API 层
// ==========================================
// 职责: 面向外部调用方的业务接口与报表导出
// ==========================================

pub mod error;
pub mod export;
pub mod plan_api;

// 重导出核心类型
pub use error::ApiError;
pub use export::CsvExporter;
pub use plan_api::PlanApi;
