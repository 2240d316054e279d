// ==========================================
// 纺织厂库存报表系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod fabric;
pub mod ledger;
pub mod package;
pub mod types;
pub mod yarn;

// 重导出核心类型
pub use fabric::{
    BillSummary, FabricIdentifiers, FabricProfile, FabricTotal, ReceiveEvent, StockoutEvent,
    UNKNOWN_FABRIC_KEY,
};
pub use ledger::{LedgerReport, LedgerRow, MonthKey, RunningBalances, SELECTED_FABRIC_KEY};
pub use package::{
    PackageCategoryTotals, PackageGrandTotal, PackageLine, PackageRecord, PackageRecordSet,
    PackageReport,
};
pub use types::{BillType, LedgerRowKind, PackageCategory, PackageOrigin, PackageStatus};
pub use yarn::{YarnMovement, YarnMovementSet, YarnStockLine, YarnStockReport, YarnTally};
