// ==========================================
// 纺织厂库存报表系统 - 事件数据源 Trait
// ==========================================
// 职责: 定义上游事件的只读访问接口
// 红线: 数据源可以下推过滤条件，但核心层总会重新应用
// ==========================================

use crate::domain::fabric::{ReceiveEvent, StockoutEvent};
use crate::domain::package::PackageRecordSet;
use crate::domain::types::{PackageOrigin, PackageStatus};
use crate::domain::yarn::YarnMovementSet;
use crate::engine::filter::{DateRange, ResolvedFilter};
use crate::importer::{FieldMapper, RawRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 上游表名
pub mod tables {
    pub const RECEIVES: &str = "fabricouts";
    pub const STOCKOUTS: &str = "stockfabrics";
    pub const WAREHOUSE_PACKAGES: &str = "packageasts";
    pub const PARTNER_PACKAGES: &str = "htrpackages";
    pub const YARN_IMPORTS: &str = "materials";
    pub const YARN_ISSUES: &str = "materialstores";
}

// ==========================================
// EventSource Trait
// ==========================================
// 实现者: SqliteEventSource / FileEventSource
#[async_trait]
pub trait EventSource: Send + Sync {
    /// 面料入库事件 (fabricouts)
    async fn fetch_receive_events(&self, filter: &ResolvedFilter)
        -> RepositoryResult<Vec<ReceiveEvent>>;

    /// 面料出库事件 (stockfabrics)
    async fn fetch_stockout_events(
        &self,
        filter: &ResolvedFilter,
    ) -> RepositoryResult<Vec<StockoutEvent>>;

    /// 包材记录（入厂 / 应归还 / 已归还）
    async fn fetch_package_records(&self, range: &DateRange) -> RepositoryResult<PackageRecordSet>;

    /// 纱线入库与领用
    async fn fetch_yarn_movements(&self, range: &DateRange) -> RepositoryResult<YarnMovementSet>;
}

/// 将一张包材表的松散记录归入三组
///
/// - packageImport → 入厂; packageReturn → 应归还
/// - 每一行都参与已归还统计（按专属字段取值）
pub fn collect_package_rows(
    mapper: &FieldMapper,
    origin: PackageOrigin,
    rows: &[RawRecord],
    set: &mut PackageRecordSet,
) {
    for row in rows {
        match mapper.package_status(row) {
            Some(PackageStatus::Import) => set.imported.push(mapper.map_package_movement(row, origin)),
            Some(PackageStatus::Return) => {
                set.return_required.push(mapper.map_package_movement(row, origin))
            }
            Some(PackageStatus::History) | None => {}
        }

        let returned = mapper.map_returned(row, origin);
        if !returned.lines.is_empty() {
            set.returned.push(returned);
        }
    }
}
