// ==========================================
// 纺织厂库存报表系统 - 导入层
// ==========================================
// 职责: 上游松散记录的解析与归一化（数量 / 日期 / 别名字段）
// 支持: Excel, CSV, 数据库行
// ==========================================

use std::collections::HashMap;

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod quantity;

/// 上游松散记录（列名 → 文本值）
pub type RawRecord = HashMap<String, String>;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use quantity::{parse_event_date, parse_event_date_opt, parse_quantity, parse_weight};
