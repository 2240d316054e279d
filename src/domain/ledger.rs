// ==========================================
// 纺织厂库存报表系统 - 面料台账领域模型
// ==========================================
// 职责: 台账行、年月键、累计余额表
// 红线: 余额任何时刻不得为负（负值一律截为 0）
// ==========================================

use crate::domain::types::LedgerRowKind;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 指定面料过滤时，所有面料合并到同一个累计键
pub const SELECTED_FABRIC_KEY: &str = "SELECTED";

// ==========================================
// MonthKey - 年月键
// ==========================================
// 字段顺序保证派生的 Ord 即时间顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// LedgerRow - 台账行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub kind: LedgerRowKind,
    pub label: String,              // 明细行: 面料标签; 月汇总: 年月; 总计: 空
    pub month: Option<MonthKey>,    // 总计行为 None
    pub date: Option<NaiveDate>,    // 仅明细行有值
    pub quantity_in: i64,
    pub quantity_out: i64,
    pub balance: i64,
    pub note: Option<String>,       // 入库行: 票据号
}

// ==========================================
// RunningBalances - 累计余额表
// ==========================================
// 显式传入/传出台账构建器，不保存在任何全局或对象字段中
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalances {
    balances: BTreeMap<String, i64>,
}

impl RunningBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带期初余额创建（负值截为 0）
    pub fn with_opening<I, K>(opening: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self {
            balances: opening
                .into_iter()
                .map(|(k, v)| (k.into(), v.max(0)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> i64 {
        self.balances.get(key).copied().unwrap_or(0)
    }

    /// 入账，返回新余额
    pub fn credit(&mut self, key: &str, quantity: i64) -> i64 {
        self.apply(key, quantity)
    }

    /// 出账，返回新余额（不足时截为 0）
    pub fn debit(&mut self, key: &str, quantity: i64) -> i64 {
        self.apply(key, quantity.saturating_neg())
    }

    fn apply(&mut self, key: &str, delta: i64) -> i64 {
        let slot = self.balances.entry(key.to_string()).or_insert(0);
        *slot = slot.saturating_add(delta).max(0);
        *slot
    }

    /// 所有键的余额之和
    pub fn total(&self) -> i64 {
        self.balances.values().fold(0i64, |acc, v| acc.saturating_add(*v))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ==========================================
// LedgerReport - 台账报表结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    pub report_id: String,
    pub fabric_code: Option<String>,
    pub rows: Vec<LedgerRow>,
    pub closing_balances: RunningBalances,
    pub skipped_undated: usize,
}

impl LedgerReport {
    /// 总计行（构建器保证总是存在且位于末尾）
    pub fn grand_total(&self) -> Option<&LedgerRow> {
        self.rows
            .last()
            .filter(|row| row.kind == LedgerRowKind::GrandTotal)
    }
}
