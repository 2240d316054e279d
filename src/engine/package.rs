// ==========================================
// 纺织厂库存报表系统 - 包材回收对账引擎
// ==========================================
// 职责: 入厂 / 应归还 / 已归还 → 9 类包材未归还余额
// 输入: PackageRecordSet（已归一化为类别明细行） + DateRange
// 输出: 固定顺序的 9 条 PackageCategoryTotals + 合计
// 红线: 输出必须恰好 9 类，即使全部为 0
// ==========================================

use crate::domain::package::{
    PackageCategoryTotals, PackageGrandTotal, PackageLine, PackageRecord, PackageRecordSet,
};
use crate::domain::types::PackageCategory;
use crate::engine::filter::DateRange;
use crate::engine::grouping::{group_and_sum, Grouped};
use std::num::Saturating;
use tracing::instrument;

// ==========================================
// PackageReconciler - 包材对账器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PackageReconciler {
    range: DateRange,
}

impl PackageReconciler {
    pub fn new(range: DateRange) -> Self {
        Self { range }
    }

    /// 对账
    ///
    /// 未归还 = 应归还 - 已归还（保留符号，展示时截为 0）
    #[instrument(skip_all, fields(
        imported = records.imported.len(),
        required = records.return_required.len(),
        returned = records.returned.len()
    ))]
    pub fn reconcile(&self, records: &PackageRecordSet) -> Vec<PackageCategoryTotals> {
        let imported = self.sum_by_category(&records.imported);
        let required = self.sum_by_category(&records.return_required);
        let returned = self.sum_by_category(&records.returned);

        let totals: Vec<PackageCategoryTotals> = PackageCategory::ALL
            .iter()
            .map(|&category| {
                let imported = imported.tally_of(&category).0;
                let required_return = required.tally_of(&category).0;
                let returned = returned.tally_of(&category).0;
                PackageCategoryTotals {
                    category,
                    imported,
                    required_return,
                    returned,
                    outstanding_raw: required_return.saturating_sub(returned),
                }
            })
            .collect();

        let over_returned = totals.iter().filter(|t| t.is_over_returned()).count();
        if over_returned > 0 {
            tracing::warn!(over_returned, "存在已归还多于应归还的包材类别");
        }

        totals
    }

    /// 全部类别合计（未归还按原始值求和）
    pub fn summarize(totals: &[PackageCategoryTotals]) -> PackageGrandTotal {
        totals.iter().fold(PackageGrandTotal::default(), |mut acc, t| {
            acc.imported = acc.imported.saturating_add(t.imported);
            acc.required_return = acc.required_return.saturating_add(t.required_return);
            acc.returned = acc.returned.saturating_add(t.returned);
            acc.outstanding_raw = acc.outstanding_raw.saturating_add(t.outstanding_raw);
            acc
        })
    }

    fn sum_by_category<'a>(
        &self,
        records: &'a [PackageRecord],
    ) -> Grouped<PackageCategory, &'a PackageLine, Saturating<i64>> {
        let lines = records
            .iter()
            .filter(|r| self.range.contains(r.recorded_on))
            .flat_map(|r| r.lines.iter());
        group_and_sum(lines, |line| line.category, |line| Saturating(line.quantity))
    }
}
