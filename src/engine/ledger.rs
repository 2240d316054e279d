// ==========================================
// 纺织厂库存报表系统 - 面料台账构建引擎
// ==========================================
// 职责: 入库/出库事件 → 按月分组的流水台账
// 输入: ReceiveEvent[] + StockoutEvent[] + 期初 RunningBalances
// 输出: 台账行（明细 / 月汇总 / 总计） + 期末 RunningBalances
// 红线: 余额任何时刻不得为负; 同月内入库行全部排在出库行之前
// ==========================================

use crate::domain::fabric::{ReceiveEvent, StockoutEvent};
use crate::domain::ledger::{LedgerRow, MonthKey, RunningBalances, SELECTED_FABRIC_KEY};
use crate::domain::types::LedgerRowKind;
use crate::engine::filter::ResolvedFilter;
use crate::engine::grouping::try_group_and_sum;
use std::collections::BTreeSet;
use std::num::Saturating;
use tracing::instrument;

// ==========================================
// BalanceScope - 累计键策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceScope {
    /// 每种面料单独累计
    PerFabric,
    /// 已指定面料，全部合并到 SELECTED
    Selected,
}

// ==========================================
// LedgerBuild - 构建结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerBuild {
    pub rows: Vec<LedgerRow>,
    pub balances: RunningBalances,
    /// 日期缺失而未入账的事件数
    pub skipped_undated: usize,
}

// ==========================================
// FabricLedgerBuilder - 台账构建器
// ==========================================
pub struct FabricLedgerBuilder {
    filter: ResolvedFilter,
    scope: BalanceScope,
}

impl FabricLedgerBuilder {
    /// 按筛选条件创建（指定面料时自动切换为 SELECTED 累计）
    pub fn new(filter: ResolvedFilter) -> Self {
        let scope = if filter.has_fabric_filter() {
            BalanceScope::Selected
        } else {
            BalanceScope::PerFabric
        };
        Self { filter, scope }
    }

    pub fn scope(&self) -> BalanceScope {
        self.scope
    }

    /// 构建台账
    ///
    /// # 参数
    /// - `receives` / `stockouts`: 上游事件（构建器会重新应用筛选）
    /// - `balances`: 期初累计余额，构建后随结果返回
    ///
    /// # 返回
    /// 明细行与月汇总行按月升序排列，末尾总是一条总计行
    #[instrument(skip_all, fields(receives = receives.len(), stockouts = stockouts.len()))]
    pub fn build(
        &self,
        receives: &[ReceiveEvent],
        stockouts: &[StockoutEvent],
        mut balances: RunningBalances,
    ) -> LedgerBuild {
        let receives: Vec<&ReceiveEvent> = receives
            .iter()
            .filter(|e| self.filter.accepts_receive(e))
            .collect();
        let stockouts: Vec<&StockoutEvent> = stockouts
            .iter()
            .filter(|e| self.filter.accepts_stockout(e))
            .collect();

        // 出库行无标签时沿用日期最早的入库标签
        let fallback_label = receives
            .iter()
            .filter(|e| e.occurred_at.is_some())
            .min_by_key(|e| e.occurred_at)
            .or_else(|| receives.first())
            .map(|e| e.fabric.label())
            .unwrap_or_default();

        // 1. 按月分组
        let receive_months = try_group_and_sum(
            receives.iter().copied(),
            |e| e.occurred_at.map(MonthKey::of),
            |e| Saturating(e.quantity),
        );
        let stockout_months = try_group_and_sum(
            stockouts.iter().copied(),
            |e| e.occurred_at.map(MonthKey::of),
            |e| Saturating(e.quantity),
        );

        let skipped_undated = receive_months.skipped() + stockout_months.skipped();
        if skipped_undated > 0 {
            tracing::warn!(skipped_undated, "部分事件日期无法解析，未计入台账");
        }

        let months: BTreeSet<MonthKey> = receive_months
            .keys()
            .chain(stockout_months.keys())
            .copied()
            .collect();

        // 2. 逐月输出（月份升序）
        let mut rows = Vec::with_capacity(receives.len() + stockouts.len() + months.len() + 1);
        let mut grand_in = Saturating(0i64);
        let mut grand_out = Saturating(0i64);

        for month in months {
            let mut month_receives: Vec<&ReceiveEvent> = receive_months
                .get(&month)
                .map(|g| g.items.clone())
                .unwrap_or_default();
            let mut month_stockouts: Vec<&StockoutEvent> = stockout_months
                .get(&month)
                .map(|g| g.items.clone())
                .unwrap_or_default();

            // sort_by_key 为稳定排序，同日记录保持原顺序
            month_receives.sort_by_key(|e| e.occurred_at);
            month_stockouts.sort_by_key(|e| e.occurred_at);

            for event in month_receives {
                let key = self.balance_key(&event.fabric.balance_key());
                let balance = balances.credit(&key, event.quantity);
                rows.push(LedgerRow {
                    kind: LedgerRowKind::Receive,
                    label: event.fabric.label(),
                    month: Some(month),
                    date: event.occurred_at,
                    quantity_in: event.quantity,
                    quantity_out: 0,
                    balance,
                    note: event.bill_number(),
                });
            }

            for event in month_stockouts {
                let key = self.balance_key(&event.fabric.balance_key());
                let balance = balances.debit(&key, event.quantity);
                let label = match event.fabric.label() {
                    own if own.is_empty() => fallback_label.clone(),
                    own => own,
                };
                rows.push(LedgerRow {
                    kind: LedgerRowKind::Stockout,
                    label,
                    month: Some(month),
                    date: event.occurred_at,
                    quantity_in: 0,
                    quantity_out: event.quantity,
                    balance,
                    note: None,
                });
            }

            let month_in = receive_months.tally_of(&month);
            let month_out = stockout_months.tally_of(&month);

            // 月汇总: 余额取全部累计键之和（累计快照）
            rows.push(LedgerRow {
                kind: LedgerRowKind::MonthSummary,
                label: month.to_string(),
                month: Some(month),
                date: None,
                quantity_in: month_in.0,
                quantity_out: month_out.0,
                balance: balances.total().max(0),
                note: None,
            });

            grand_in += month_in;
            grand_out += month_out;
        }

        // 3. 总计行（空窗口也输出）
        rows.push(LedgerRow {
            kind: LedgerRowKind::GrandTotal,
            label: String::new(),
            month: None,
            date: None,
            quantity_in: grand_in.0,
            quantity_out: grand_out.0,
            balance: (grand_in - grand_out).0.max(0),
            note: None,
        });

        tracing::debug!(
            rows = rows.len(),
            accumulators = balances.len(),
            grand_in = grand_in.0,
            grand_out = grand_out.0,
            "台账构建完成"
        );

        LedgerBuild {
            rows,
            balances,
            skipped_undated,
        }
    }

    fn balance_key(&self, fabric_key: &str) -> String {
        match self.scope {
            BalanceScope::Selected => SELECTED_FABRIC_KEY.to_string(),
            BalanceScope::PerFabric => fabric_key.to_string(),
        }
    }
}
