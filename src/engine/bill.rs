// ==========================================
// 纺织厂库存报表系统 - 票据汇总引擎
// ==========================================
// 职责: 入库事件按票据号汇总折数与码数；按面料汇总码数；面料代码清单
// ==========================================

use crate::domain::fabric::{BillSummary, FabricTotal, ReceiveEvent};
use crate::engine::filter::ResolvedFilter;
use crate::engine::grouping::{group_and_sum, try_group_and_sum};
use std::collections::HashSet;

/// 面料组织代码缺失时的汇总键
pub const UNSPECIFIED_FABRIC: &str = "UNSPECIFIED";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BillTally {
    fold: i64,
    quantity: i64,
}

impl std::ops::AddAssign for BillTally {
    fn add_assign(&mut self, rhs: Self) {
        self.fold += rhs.fold;
        self.quantity += rhs.quantity;
    }
}

// ==========================================
// BillAggregator - 票据汇总器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BillAggregator {
    filter: ResolvedFilter,
}

impl BillAggregator {
    pub fn new(filter: ResolvedFilter) -> Self {
        Self { filter }
    }

    fn accepted<'a>(&'a self, receives: &'a [ReceiveEvent]) -> impl Iterator<Item = &'a ReceiveEvent> {
        receives.iter().filter(move |e| self.filter.accepts_receive(e))
    }

    /// 按票据号（类型字母 + 单号）汇总
    ///
    /// 无票据号的记录不参与；结果按首行日期升序，无日期的排最后
    pub fn group_by_bill(&self, receives: &[ReceiveEvent]) -> Vec<BillSummary> {
        let grouped = try_group_and_sum(
            self.accepted(receives),
            |e| e.bill_number(),
            |e| BillTally {
                fold: e.fold,
                quantity: e.quantity,
            },
        );

        if grouped.skipped() > 0 {
            tracing::debug!(skipped = grouped.skipped(), "入库记录缺少票据号");
        }

        let mut bills: Vec<BillSummary> = grouped
            .into_entries()
            .into_iter()
            .filter_map(|(bill_number, group)| {
                let first = group.items.first()?;
                Some(BillSummary {
                    bill_number,
                    bill_type: first.bill_type,
                    fabric: first.fabric.clone(),
                    first_date: group.items.iter().filter_map(|e| e.occurred_at).min(),
                    fold: group.tally.fold,
                    quantity: group.tally.quantity,
                    line_count: group.items.len(),
                })
            })
            .collect();

        bills.sort_by_key(|b| (b.first_date.is_none(), b.first_date));
        bills
    }

    /// 按面料组织代码汇总码数，按代码升序
    pub fn fabric_totals(&self, receives: &[ReceiveEvent]) -> Vec<FabricTotal> {
        let grouped = group_and_sum(
            self.accepted(receives),
            |e| {
                e.fabric
                    .identifiers
                    .structure_code
                    .clone()
                    .unwrap_or_else(|| UNSPECIFIED_FABRIC.to_string())
            },
            |e| e.quantity,
        );

        let mut totals: Vec<FabricTotal> = grouped
            .iter()
            .map(|(code, group)| FabricTotal {
                fabric_code: code.clone(),
                quantity: group.tally,
            })
            .collect();
        totals.sort_by(|a, b| a.fabric_code.cmp(&b.fabric_code));
        totals
    }

    /// 去重后的面料代码（首次出现顺序），供筛选下拉使用
    pub fn fabric_codes(receives: &[ReceiveEvent]) -> Vec<String> {
        let mut seen = HashSet::new();
        receives
            .iter()
            .filter_map(|e| e.fabric.identifiers.canonical())
            .filter(|code| seen.insert(code.to_string()))
            .map(String::from)
            .collect()
    }
}
