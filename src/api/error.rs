// ==========================================
// 纺织厂库存报表系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把下层错误收敛为调用方可读的消息
// 红线: 上游失败原样上报，不重试、不兜底
// ==========================================

use crate::engine::FilterError;
use crate::report::ExportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据源错误
    // ==========================================
    #[error("数据源错误: {0}")]
    SourceError(String),

    #[error("数据源不存在: {0}")]
    SourceNotFound(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("报表导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::SourceNotFound(msg) => ApiError::SourceNotFound(msg),
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::ConfigValueError { key, message } => {
                ApiError::ConfigError(format!("{}: {}", key, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other @ (RepositoryError::SourceReadError { .. }
            | RepositoryError::DatabaseQueryError(_)
            | RepositoryError::TableNotFound(_)) => ApiError::SourceError(other.to_string()),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::TableNotFound("fabricouts".to_string()).into();
        match api_err {
            ApiError::SourceError(msg) => assert!(msg.contains("fabricouts")),
            other => panic!("Expected SourceError, got {:?}", other),
        }

        let api_err: ApiError = RepositoryError::SourceNotFound("/tmp/none".to_string()).into();
        assert!(matches!(api_err, ApiError::SourceNotFound(_)));

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        match api_err {
            ApiError::DatabaseConnectionError(msg) => assert!(msg.contains("poisoned")),
            other => panic!("Expected DatabaseConnectionError, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_error_is_invalid_input() {
        let api_err: ApiError = FilterError::InvalidMonth(13).into();
        match api_err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("13")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
