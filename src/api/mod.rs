// ==========================================
// 纺织厂库存报表系统 - API 层
// ==========================================
// 职责: 提供报表 API，供命令行与展示层调用
// ==========================================

pub mod error;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
