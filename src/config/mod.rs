// ==========================================
// 纺织厂库存报表系统 - 配置层
// ==========================================
// 职责: 报表抬头、格式、数据源参数
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod report_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use report_settings::{ReportSettings, DEFAULT_COMPANY_NAME, DEFAULT_LOCALE};
