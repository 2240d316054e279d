// ==========================================
// 纺织厂库存报表系统 - 导入模块错误类型
// ==========================================
// 范围: 表文件级错误（找不到 / 格式 / 无法解析）
// 注: 字段级问题（数量/日期无法解析）不报错，按默认值处理
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("表文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的表文件扩展名: {0}（支持 csv / xlsx）")]
    UnsupportedFormat(String),

    #[error("表文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 工作簿无工作表: {0}")]
    NoWorksheet(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    /// line 为 CSV 物理行号（含表头），无法定位时为 None
    #[error("CSV 解析失败 (line={line:?}): {message}")]
    CsvParseError { line: Option<u64>, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError {
            line: err.position().map(|p| p.line()),
            message: err.to_string(),
        }
    }
}

// calamine 的通用错误与 xlsx 专用错误分别转换
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
