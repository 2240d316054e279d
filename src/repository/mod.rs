// ==========================================
// 纺织厂库存报表系统 - 数据仓储层
// ==========================================
// 职责: 上游事件只读访问（SQLite 工厂库 / 导出文件目录）
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod event_source;
pub mod file_source;
pub mod sqlite_source;

// 重导出
pub use error::{RepositoryError, RepositoryResult};
pub use event_source::{collect_package_rows, tables, EventSource};
pub use file_source::FileEventSource;
pub use sqlite_source::{SqliteEventSource, DEFAULT_FETCH_LIMIT};
