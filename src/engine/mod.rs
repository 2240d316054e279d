// ==========================================
// 纺织厂库存报表系统 - 引擎层
// ==========================================
// 职责: 纯计算的报表构建器（台账 / 包材 / 纱线 / 票据）
// 红线: Engine 不拼 SQL, 不做 I/O; 每次调用使用新的累加器
// ==========================================

pub mod bill;
pub mod filter;
pub mod grouping;
pub mod ledger;
pub mod package;
pub mod yarn;

// 重导出核心引擎
pub use bill::{BillAggregator, UNSPECIFIED_FABRIC};
pub use filter::{
    DateRange, FilterError, FilterResult, LedgerFilter, MonthYear, ResolvedFilter, ALL_FABRICS,
};
pub use grouping::{group_and_sum, try_group_and_sum, Group, Grouped};
pub use ledger::{BalanceScope, FabricLedgerBuilder, LedgerBuild};
pub use package::PackageReconciler;
pub use yarn::{is_valid_yarn_type, YarnStockReconciler};
