// ==========================================
// 纺织厂库存报表系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，上游系统写入时减少偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "TEXTILE_INVENTORY_DB";

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "textile_inventory.db";

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建 config_kv 表（已存在则跳过）
pub fn ensure_config_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

/// 解析数据库路径
///
/// 优先级: 显式参数 > 环境变量 TEXTILE_INVENTORY_DB > 平台数据目录
pub fn resolve_db_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path.trim());
        }
    }
    dirs::data_dir()
        .map(|dir| dir.join("textile-inventory"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DB_FILE)
}
