// ==========================================
// 纺织厂库存报表系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::report_settings::ReportSettings;
use crate::db::{configure_sqlite_connection, ensure_config_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（config_kv 不存在时自动创建）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_config_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_config_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        tracing::debug!(key, "配置已更新");
        Ok(())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值；缺失时返回默认值，格式错误时报错
    fn get_parsed_or<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| RepositoryError::ConfigValueError {
                    key: key.to_string(),
                    message: format!("{} ({})", e, raw),
                }),
        }
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    // ===== 报表配置 =====

    /// 组装报表设置
    pub fn get_report_settings(&self) -> RepositoryResult<ReportSettings> {
        let defaults = ReportSettings::default();

        let separator = self.get_config_or_default(
            config_keys::THOUSANDS_SEPARATOR,
            &defaults.thousands_separator.to_string(),
        )?;
        let mut chars = separator.chars();
        let thousands_separator = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(RepositoryError::ConfigValueError {
                    key: config_keys::THOUSANDS_SEPARATOR.to_string(),
                    message: format!("应为单个字符: {:?}", separator),
                })
            }
        };

        Ok(ReportSettings {
            company_name: self.get_config_or_default(config_keys::COMPANY_NAME, &defaults.company_name)?,
            company_location: self
                .get_config_or_default(config_keys::COMPANY_LOCATION, &defaults.company_location)?,
            locale: self.get_config_or_default(config_keys::LOCALE, &defaults.locale)?,
            thousands_separator,
            fetch_limit: self.get_parsed_or(config_keys::FETCH_LIMIT, defaults.fetch_limit)?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 报表抬头
    pub const COMPANY_NAME: &str = "report/company_name";
    pub const COMPANY_LOCATION: &str = "report/company_location";

    // 格式
    pub const LOCALE: &str = "report/locale";
    pub const THOUSANDS_SEPARATOR: &str = "report/thousands_separator";

    // 数据源
    pub const FETCH_LIMIT: &str = "source/fetch_limit";
}
