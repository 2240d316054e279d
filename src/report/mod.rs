// ==========================================
// 纺织厂库存报表系统 - 报表层
// ==========================================
// 职责: 领域结构 → 展示表格 → CSV
// 红线: 只做形状转换，不做计算
// ==========================================

pub mod export;
pub mod formatter;
pub mod header;

pub use export::{CsvExporter, ExportError, ExportResult, ReportDocument};
pub use formatter::{ReportFormatter, Table};
pub use header::{ledger_document, period_caption, range_document};
