// ==========================================
// 纺织厂库存报表系统 - 报表 API
// ==========================================
// 职责: 解析筛选 → 并发拉取事件 → 纯计算构建 → 返回报表结构
// 红线: 数据源只负责取数，计算一律在引擎层完成
// ==========================================

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::config::ReportSettings;
use crate::domain::{
    BillSummary, FabricTotal, LedgerReport, PackageReport, RunningBalances, YarnStockReport,
};
use crate::engine::{
    BillAggregator, DateRange, FabricLedgerBuilder, LedgerFilter, PackageReconciler,
    YarnStockReconciler,
};
use crate::report::ReportFormatter;
use crate::repository::EventSource;

// ==========================================
// ReportApi - 报表 API
// ==========================================

/// 报表API
///
/// 职责：
/// 1. 成品台账（入库 / 出库 / 月汇总 / 总计）
/// 2. 包材回收汇总
/// 3. 原料库存
/// 4. 票据汇总与面料合计
pub struct ReportApi {
    source: Arc<dyn EventSource>,
    settings: ReportSettings,
}

impl ReportApi {
    /// 创建新的ReportApi实例
    ///
    /// # 参数
    /// - source: 事件数据源（SQLite 或文件目录）
    /// - settings: 报表设置（语言、抬头、千分位）
    pub fn new(source: Arc<dyn EventSource>, settings: ReportSettings) -> Self {
        Self { source, settings }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// 按当前设置构造格式化器
    pub fn formatter(&self) -> ReportFormatter {
        ReportFormatter::from_settings(&self.settings)
    }

    // ==========================================
    // 成品台账
    // ==========================================

    /// 生成成品台账
    ///
    /// # 参数
    /// - filter: 原始筛选参数
    /// - opening: 期初累计余额（通常为空）
    ///
    /// # 返回
    /// - Ok(LedgerReport): 明细行 + 月汇总 + 总计，以及期末余额
    /// - Err(ApiError::InvalidInput): 筛选参数非法
    /// - Err(ApiError::SourceError): 取数失败
    #[instrument(skip(self, opening))]
    pub async fn fabric_ledger(
        &self,
        filter: &LedgerFilter,
        opening: RunningBalances,
    ) -> ApiResult<LedgerReport> {
        let resolved = filter.resolve()?;

        let (receives, stockouts) = futures::try_join!(
            self.source.fetch_receive_events(&resolved),
            self.source.fetch_stockout_events(&resolved),
        )?;

        let fabric_code = resolved.fabric_code.clone();
        let build = FabricLedgerBuilder::new(resolved).build(&receives, &stockouts, opening);

        let report = LedgerReport {
            report_id: Uuid::new_v4().to_string(),
            fabric_code,
            rows: build.rows,
            closing_balances: build.balances,
            skipped_undated: build.skipped_undated,
        };

        info!(
            report_id = %report.report_id,
            rows = report.rows.len(),
            skipped_undated = report.skipped_undated,
            "成品台账生成完成"
        );
        Ok(report)
    }

    // ==========================================
    // 包材回收
    // ==========================================

    /// 生成包材回收汇总（总是九个类别）
    #[instrument(skip(self))]
    pub async fn package_summary(&self, range: DateRange) -> ApiResult<PackageReport> {
        let records = self.source.fetch_package_records(&range).await?;

        let categories = PackageReconciler::new(range).reconcile(&records);
        let total = PackageReconciler::summarize(&categories);

        let report = PackageReport {
            report_id: Uuid::new_v4().to_string(),
            categories,
            total,
        };

        info!(
            report_id = %report.report_id,
            imported = report.total.imported,
            outstanding = report.total.outstanding_raw,
            "包材回收汇总生成完成"
        );
        Ok(report)
    }

    // ==========================================
    // 原料库存
    // ==========================================

    /// 生成原料（纱线）库存
    #[instrument(skip(self))]
    pub async fn yarn_stock(&self, range: DateRange) -> ApiResult<YarnStockReport> {
        let movements = self.source.fetch_yarn_movements(&range).await?;

        let lines = YarnStockReconciler::new(range).reconcile(&movements);
        let total = YarnStockReconciler::summarize(&lines);

        let report = YarnStockReport {
            report_id: Uuid::new_v4().to_string(),
            lines,
            total,
        };

        info!(report_id = %report.report_id, yarn_types = report.lines.len(), "原料库存生成完成");
        Ok(report)
    }

    // ==========================================
    // 票据 / 面料
    // ==========================================

    /// 按票据号汇总入库
    #[instrument(skip(self))]
    pub async fn bill_summary(&self, filter: &LedgerFilter) -> ApiResult<Vec<BillSummary>> {
        let resolved = filter.resolve()?;
        let receives = self.source.fetch_receive_events(&resolved).await?;

        let bills = BillAggregator::new(resolved).group_by_bill(&receives);
        info!(bills = bills.len(), "票据汇总生成完成");
        Ok(bills)
    }

    /// 按面料组织合计码数
    #[instrument(skip(self))]
    pub async fn fabric_totals(&self, filter: &LedgerFilter) -> ApiResult<Vec<FabricTotal>> {
        let resolved = filter.resolve()?;
        let receives = self.source.fetch_receive_events(&resolved).await?;

        let totals = BillAggregator::new(resolved).fabric_totals(&receives);
        info!(fabrics = totals.len(), "面料合计生成完成");
        Ok(totals)
    }

    /// 入库记录中出现过的面料代码（首次出现顺序）
    ///
    /// 忽略筛选中的面料代码，只按日期与票据类型过滤
    #[instrument(skip(self))]
    pub async fn fabric_codes(&self, filter: &LedgerFilter) -> ApiResult<Vec<String>> {
        let mut resolved = filter.resolve()?;
        resolved.fabric_code = None;

        let receives = self.source.fetch_receive_events(&resolved).await?;
        let accepted: Vec<_> = receives
            .into_iter()
            .filter(|e| resolved.accepts_receive(e))
            .collect();

        Ok(BillAggregator::fabric_codes(&accepted))
    }
}
