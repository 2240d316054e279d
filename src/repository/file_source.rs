// ==========================================
// 纺织厂库存报表系统 - 文件目录事件数据源
// ==========================================
// 职责: 读取导出目录中的 <表名>.csv / <表名>.xlsx
// 说明: 文件源不做下推过滤，全部交给核心层
// ==========================================

use crate::domain::fabric::{ReceiveEvent, StockoutEvent};
use crate::domain::package::PackageRecordSet;
use crate::domain::types::PackageOrigin;
use crate::domain::yarn::YarnMovementSet;
use crate::engine::filter::{DateRange, ResolvedFilter};
use crate::importer::{FieldMapper, RawRecord, UniversalFileParser};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::event_source::{collect_package_rows, tables, EventSource};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 按优先级尝试的扩展名
const EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

// ==========================================
// FileEventSource
// ==========================================
pub struct FileEventSource {
    dir: PathBuf,
    mapper: FieldMapper,
    parser: UniversalFileParser,
}

impl FileEventSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> RepositoryResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(RepositoryError::SourceNotFound(dir.display().to_string()));
        }
        Ok(Self {
            dir,
            mapper: FieldMapper,
            parser: UniversalFileParser,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 定位表文件
    fn locate(&self, table: &str) -> RepositoryResult<PathBuf> {
        EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", table, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                RepositoryError::SourceNotFound(self.dir.join(table).display().to_string())
            })
    }

    fn read_table(&self, table: &str) -> RepositoryResult<Vec<RawRecord>> {
        let path = self.locate(table)?;
        let rows = self.parser.parse(&path).map_err(|e| match RepositoryError::from(e) {
            RepositoryError::SourceReadError { message, .. } => RepositoryError::SourceReadError {
                table: table.to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(table, path = %path.display(), rows = rows.len(), "读取表文件");
        Ok(rows)
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    async fn fetch_receive_events(
        &self,
        _filter: &ResolvedFilter,
    ) -> RepositoryResult<Vec<ReceiveEvent>> {
        let rows = self.read_table(tables::RECEIVES)?;
        Ok(rows.iter().map(|row| self.mapper.map_receive(row)).collect())
    }

    async fn fetch_stockout_events(
        &self,
        _filter: &ResolvedFilter,
    ) -> RepositoryResult<Vec<StockoutEvent>> {
        let rows = self.read_table(tables::STOCKOUTS)?;
        Ok(rows.iter().map(|row| self.mapper.map_stockout(row)).collect())
    }

    async fn fetch_package_records(&self, _range: &DateRange) -> RepositoryResult<PackageRecordSet> {
        let mut set = PackageRecordSet::default();
        for (table, origin) in [
            (tables::WAREHOUSE_PACKAGES, PackageOrigin::Warehouse),
            (tables::PARTNER_PACKAGES, PackageOrigin::Partner),
        ] {
            let rows = self.read_table(table)?;
            collect_package_rows(&self.mapper, origin, &rows, &mut set);
        }
        Ok(set)
    }

    async fn fetch_yarn_movements(&self, _range: &DateRange) -> RepositoryResult<YarnMovementSet> {
        let imported = self.read_table(tables::YARN_IMPORTS)?;
        let issued = self.read_table(tables::YARN_ISSUES)?;
        Ok(YarnMovementSet {
            imported: imported.iter().map(|row| self.mapper.map_yarn(row)).collect(),
            issued: issued.iter().map(|row| self.mapper.map_yarn(row)).collect(),
        })
    }
}
