// ==========================================
// 纺织厂库存报表系统 - 核心库
// ==========================================
// 职责: 成品出入库台账、包材回收、原料库存、票据汇总
// 技术栈: Rust + SQLite / CSV / Excel
// 系统定位: 只读报表（不回写上游）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 纯计算
pub mod engine;

// 导入层 - 松散记录解析
pub mod importer;

// 数据仓储层 - 事件数据源
pub mod repository;

// 配置层 - 报表设置
pub mod config;

// 报表层 - 格式化与导出
pub mod report;

// API 层 - 报表接口
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BillType, LedgerRowKind, PackageCategory, PackageOrigin, PackageStatus};

// 领域实体
pub use domain::{
    BillSummary, FabricProfile, FabricTotal, LedgerReport, LedgerRow, PackageReport,
    ReceiveEvent, RunningBalances, StockoutEvent, YarnStockReport,
};

// 引擎
pub use engine::{
    BillAggregator, DateRange, FabricLedgerBuilder, LedgerFilter, MonthYear, PackageReconciler,
    YarnStockReconciler,
};

// 数据源
pub use repository::{EventSource, FileEventSource, SqliteEventSource};

// API
pub use api::{ApiError, ApiResult, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "textile-inventory";
