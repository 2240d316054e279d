// ==========================================
// 纺织厂库存报表系统 - 报表设置
// ==========================================
// 来源: config_kv (scope_id='global')，缺失项取默认值
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认语言
pub const DEFAULT_LOCALE: &str = "th";

/// 默认企业名称（报表抬头）
pub const DEFAULT_COMPANY_NAME: &str = "บริษัท เอเชียเท็กซ์ไทล์ จำกัด";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    pub company_name: String,
    pub company_location: String,
    pub locale: String,
    pub thousands_separator: char,
    pub fetch_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            company_location: String::new(),
            locale: DEFAULT_LOCALE.to_string(),
            thousands_separator: ',',
            fetch_limit: crate::repository::DEFAULT_FETCH_LIMIT,
        }
    }
}

impl ReportSettings {
    /// 覆盖语言（命令行参数优先于库内配置）
    pub fn with_locale(mut self, locale: Option<&str>) -> Self {
        if let Some(locale) = locale.map(str::trim).filter(|l| !l.is_empty()) {
            self.locale = locale.to_string();
        }
        self
    }
}
