// ==========================================
// 纺织厂库存报表系统 - SQLite 事件数据源
// ==========================================
// 职责: 读取工厂库 fabricouts / stockfabrics / packageasts / htrpackages /
//       materials / materialstores 表，映射为领域事件
// 红线: 只读; 表结构归上游所有，按列名动态读取
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::fabric::{ReceiveEvent, StockoutEvent};
use crate::domain::package::PackageRecordSet;
use crate::domain::types::PackageOrigin;
use crate::domain::yarn::YarnMovementSet;
use crate::engine::filter::{DateRange, ResolvedFilter};
use crate::importer::{FieldMapper, RawRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::event_source::{collect_package_rows, tables, EventSource};
use async_trait::async_trait;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::sync::{Arc, Mutex};

/// 默认单表读取上限
pub const DEFAULT_FETCH_LIMIT: usize = 50_000;

/// 上游日期列
const DATE_COLUMN: &str = "createDate";

/// 非 ISO 日期（dd/mm/yyyy、yyyymmdd、Excel 序列号）SQLite 无法比较，
/// 这些行不在 SQL 中过滤，交给核心筛选
fn iso_guarded(predicate: &str) -> String {
    format!(
        "({col} NOT GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]*' OR {predicate})",
        col = DATE_COLUMN,
        predicate = predicate
    )
}

// ==========================================
// SelectQuery - 动态 WHERE 拼装
// ==========================================
struct SelectQuery {
    table: &'static str,
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl SelectQuery {
    fn from(table: &'static str) -> Self {
        Self {
            table,
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, clause: &str, values: impl IntoIterator<Item = Value>) {
        self.clauses.push(clause.to_string());
        self.params.extend(values);
    }

    fn date_range(mut self, range: &DateRange) -> Self {
        if let (Some(start), Some(end)) = (range.start(), range.end()) {
            self.push(
                &iso_guarded(&format!("date({col}) BETWEEN ? AND ?", col = DATE_COLUMN)),
                [
                    Value::Text(start.format("%Y-%m-%d").to_string()),
                    Value::Text(end.format("%Y-%m-%d").to_string()),
                ],
            );
        }
        self
    }

    /// 列表页的自然月 / 年过滤
    fn month_year(mut self, month: Option<u32>, year: Option<i32>) -> Self {
        if let Some(month) = month {
            self.push(
                &iso_guarded(&format!("CAST(strftime('%m', {col}) AS INTEGER) = ?", col = DATE_COLUMN)),
                [Value::Integer(i64::from(month))],
            );
        }
        if let Some(year) = year {
            self.push(
                &iso_guarded(&format!("CAST(strftime('%Y', {col}) AS INTEGER) = ?", col = DATE_COLUMN)),
                [Value::Integer(i64::from(year))],
            );
        }
        self
    }

    fn sql(&self, limit: usize) -> String {
        let mut sql = format!("SELECT * FROM {}", self.table);
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        sql.push_str(&format!(" LIMIT {}", limit));
        sql
    }
}

// ==========================================
// SqliteEventSource
// ==========================================
pub struct SqliteEventSource {
    conn: Arc<Mutex<Connection>>,
    mapper: FieldMapper,
    fetch_limit: usize,
}

impl SqliteEventSource {
    /// 打开数据库文件
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            mapper: FieldMapper,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    /// 设置单表读取上限
    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit.max(1);
        self
    }

    pub fn fetch_limit(&self) -> usize {
        self.fetch_limit
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 执行查询，每行转为松散记录（NULL / BLOB 列不写入）
    fn query_rows(&self, query: SelectQuery) -> RepositoryResult<Vec<RawRecord>> {
        let conn = self.get_conn()?;
        let sql = query.sql(self.fetch_limit);
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = RawRecord::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                let text = match row.get_ref(i)? {
                    ValueRef::Null | ValueRef::Blob(_) => continue,
                    ValueRef::Integer(n) => n.to_string(),
                    ValueRef::Real(f) => f.to_string(),
                    ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                };
                record.insert(name.clone(), text);
            }
            records.push(record);
        }

        if records.len() >= self.fetch_limit {
            tracing::warn!(table = query.table, limit = self.fetch_limit, "读取行数达到上限，结果可能被截断");
        }
        tracing::debug!(table = query.table, rows = records.len(), "读取完成");
        Ok(records)
    }

    fn fabric_query(&self, table: &'static str, filter: &ResolvedFilter) -> SelectQuery {
        SelectQuery::from(table)
            .date_range(&filter.range)
            .month_year(filter.month, filter.year)
    }
}

#[async_trait]
impl EventSource for SqliteEventSource {
    async fn fetch_receive_events(
        &self,
        filter: &ResolvedFilter,
    ) -> RepositoryResult<Vec<ReceiveEvent>> {
        let mut query = self.fabric_query(tables::RECEIVES, filter);
        if let Some(bill_type) = filter.bill_type {
            query.push("vatType = ?", [Value::Text(bill_type.code().to_string())]);
        }
        let rows = self.query_rows(query)?;
        Ok(rows.iter().map(|row| self.mapper.map_receive(row)).collect())
    }

    async fn fetch_stockout_events(
        &self,
        filter: &ResolvedFilter,
    ) -> RepositoryResult<Vec<StockoutEvent>> {
        let rows = self.query_rows(self.fabric_query(tables::STOCKOUTS, filter))?;
        Ok(rows.iter().map(|row| self.mapper.map_stockout(row)).collect())
    }

    async fn fetch_package_records(&self, range: &DateRange) -> RepositoryResult<PackageRecordSet> {
        let mut set = PackageRecordSet::default();
        for (table, origin) in [
            (tables::WAREHOUSE_PACKAGES, PackageOrigin::Warehouse),
            (tables::PARTNER_PACKAGES, PackageOrigin::Partner),
        ] {
            let rows = self.query_rows(SelectQuery::from(table).date_range(range))?;
            collect_package_rows(&self.mapper, origin, &rows, &mut set);
        }
        Ok(set)
    }

    async fn fetch_yarn_movements(&self, range: &DateRange) -> RepositoryResult<YarnMovementSet> {
        let imported = self.query_rows(SelectQuery::from(tables::YARN_IMPORTS).date_range(range))?;
        let issued = self.query_rows(SelectQuery::from(tables::YARN_ISSUES).date_range(range))?;
        Ok(YarnMovementSet {
            imported: imported.iter().map(|row| self.mapper.map_yarn(row)).collect(),
            issued: issued.iter().map(|row| self.mapper.map_yarn(row)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_select_query_sql() {
        let range = DateRange::between(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
        let query = SelectQuery::from(tables::RECEIVES)
            .date_range(&range)
            .month_year(Some(1), None);
        assert_eq!(
            query.sql(10),
            "SELECT * FROM fabricouts WHERE \
             (createDate NOT GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]*' OR date(createDate) BETWEEN ? AND ?) \
             AND (createDate NOT GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]*' \
             OR CAST(strftime('%m', createDate) AS INTEGER) = ?) LIMIT 10"
        );
        assert_eq!(query.params.len(), 3);

        let bare = SelectQuery::from(tables::STOCKOUTS);
        assert_eq!(bare.sql(5), "SELECT * FROM stockfabrics LIMIT 5");
    }

    #[tokio::test]
    async fn test_rows_become_raw_records() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE stockfabrics (fabricStruct TEXT, sumYard INTEGER, createDate TEXT, note BLOB);
             INSERT INTO stockfabrics VALUES ('TC', 40, '2025-01-20', NULL);
             INSERT INTO stockfabrics VALUES (NULL, 7, '2025-02-01', x'00');",
        )
        .unwrap();
        let source = SqliteEventSource::from_connection(Arc::new(Mutex::new(conn)));

        let events = source
            .fetch_stockout_events(&ResolvedFilter::accept_all())
            .await
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].quantity, 40);
        assert_eq!(events[0].fabric.identifiers.canonical(), Some("TC"));
        assert_eq!(events[1].fabric.identifiers.canonical(), None);
    }

    #[tokio::test]
    async fn test_missing_table_surfaces_error() {
        let conn = Connection::open_in_memory().unwrap();
        let source = SqliteEventSource::from_connection(Arc::new(Mutex::new(conn)));
        let err = source
            .fetch_yarn_movements(&DateRange::unbounded())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_non_iso_dates_survive_pushdown() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE stockfabrics (fabricStruct TEXT, sumYard INTEGER, createDate);
             INSERT INTO stockfabrics VALUES ('TC', 10, '20/01/2025');
             INSERT INTO stockfabrics VALUES ('TC', 20, '2025-01-21');
             INSERT INTO stockfabrics VALUES ('TC', 30, '20250122');
             INSERT INTO stockfabrics VALUES ('TC', 40, 45679);
             INSERT INTO stockfabrics VALUES ('TC', 50, '2025-02-03');",
        )
        .unwrap();
        let source = SqliteEventSource::from_connection(Arc::new(Mutex::new(conn)));

        let january = crate::engine::LedgerFilter {
            from: crate::engine::MonthYear::new(1, 2025).ok(),
            to: crate::engine::MonthYear::new(1, 2025).ok(),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        let by_month = crate::engine::LedgerFilter {
            month: Some(1),
            year: Some(2025),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        for filter in [january, by_month] {
            let events = source.fetch_stockout_events(&filter).await.unwrap();
            let accepted: Vec<i64> = events
                .iter()
                .filter(|e| filter.accepts_stockout(e))
                .map(|e| e.quantity)
                .collect();
            // ISO 的二月行在 SQL 中过滤，其余格式由核心筛选
            assert_eq!(events.len(), 4);
            assert_eq!(accepted, vec![10, 20, 30, 40]);
        }
    }
}
