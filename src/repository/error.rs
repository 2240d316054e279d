// ==========================================
// 纺织厂库存报表系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::importer::ImportError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据源错误 =====
    #[error("数据源不存在: {0}")]
    SourceNotFound(String),

    #[error("数据源读取失败 (table={table}): {message}")]
    SourceReadError { table: String, message: String },

    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("数据表不存在: {0}")]
    TableNotFound(String),

    // ===== 配置错误 =====
    #[error("配置值格式错误 (key={key}): {message}")]
    ConfigValueError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                match msg.strip_prefix("no such table: ") {
                    Some(table) => RepositoryError::TableNotFound(table.to_string()),
                    None => RepositoryError::DatabaseQueryError(msg),
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<ImportError>
impl From<ImportError> for RepositoryError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => RepositoryError::SourceNotFound(path),
            other => RepositoryError::SourceReadError {
                table: String::new(),
                message: other.to_string(),
            },
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_is_recognized() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .prepare("SELECT * FROM fabricouts")
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::TableNotFound(t) if t == "fabricouts"));
    }

    #[test]
    fn test_import_error_conversion() {
        let err: RepositoryError = ImportError::FileNotFound("x.csv".to_string()).into();
        assert!(matches!(err, RepositoryError::SourceNotFound(p) if p == "x.csv"));
    }
}
