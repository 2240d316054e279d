// ==========================================
// 纺织厂库存报表系统 - 过滤与日期范围解析
// ==========================================
// 职责: 把用户输入的筛选参数解析为具体谓词
// 输入: 月份/年份、票据类型、面料代码、起止年月
// 输出: ResolvedFilter (in_range / matches_code / accepts_*)
// 红线: 日期无法解析的记录视为不匹配，不抛错
// ==========================================

use crate::domain::fabric::{FabricIdentifiers, ReceiveEvent, StockoutEvent};
use crate::domain::types::BillType;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 表示"全部面料"的代码
pub const ALL_FABRICS: &str = "ALL";

// ==========================================
// FilterError - 筛选参数错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("月份无效: {0}（应为 1-12）")]
    InvalidMonth(u32),

    #[error("年份无效: {0}")]
    InvalidYear(i32),

    #[error("年月格式错误: {0}（期望 YYYY-MM）")]
    MalformedMonthYear(String),

    #[error("日期范围颠倒: {start} > {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

pub type FilterResult<T> = Result<T, FilterError>;

// ==========================================
// MonthYear - 年月参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> FilterResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(FilterError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(FilterError::InvalidYear(year))?;
        Ok(Self { month, year })
    }

    /// 解析 "YYYY-MM"
    pub fn parse(value: &str) -> FilterResult<Self> {
        let malformed = || FilterError::MalformedMonthYear(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.trim().parse().map_err(|_| malformed())?;
        let month: u32 = month.trim().parse().map_err(|_| malformed())?;
        Self::new(month, year)
    }

    pub fn first_day(&self) -> NaiveDate {
        // new() 已校验
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .map(|d| d - Duration::days(1))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// DateRange - 闭区间日期范围
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    bounds: Option<(NaiveDate, NaiveDate)>,
}

impl DateRange {
    /// 不限日期
    pub fn unbounded() -> Self {
        Self { bounds: None }
    }

    /// 指定起止日期（含两端）
    pub fn between(start: NaiveDate, end: NaiveDate) -> FilterResult<Self> {
        if start > end {
            return Err(FilterError::InvertedRange { start, end });
        }
        Ok(Self {
            bounds: Some((start, end)),
        })
    }

    /// 由起止年月解析
    ///
    /// # 规则
    /// - 只有"起": 该月第一天 ~ 该月最后一天
    /// - 起止都有: 起始月第一天 ~ 结束月最后一天
    /// - 没有"起": 不限（单独的"止"被忽略）
    pub fn from_months(from: Option<MonthYear>, to: Option<MonthYear>) -> FilterResult<Self> {
        match (from, to) {
            (Some(from), Some(to)) => Self::between(from.first_day(), to.last_day()),
            (Some(from), None) => Self::between(from.first_day(), from.last_day()),
            (None, Some(to)) => {
                tracing::warn!(to = %to, "只指定了结束年月，忽略日期范围");
                Ok(Self::unbounded())
            }
            (None, None) => Ok(Self::unbounded()),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.bounds.map(|(s, _)| s)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.bounds.map(|(_, e)| e)
    }

    /// 日期是否落在范围内；有界范围下缺失日期视为不匹配
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match (self.bounds, date) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some((start, end)), Some(d)) => start <= d && d <= end,
        }
    }
}

// ==========================================
// LedgerFilter - 原始筛选参数
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub month: Option<u32>, // 列表页: 按自然月
    pub year: Option<i32>,  // 列表页: 按年
    pub bill_type: Option<BillType>,
    pub fabric_code: Option<String>,
    pub from: Option<MonthYear>,
    pub to: Option<MonthYear>,
}

impl LedgerFilter {
    /// 解析为谓词集合
    pub fn resolve(&self) -> FilterResult<ResolvedFilter> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(FilterError::InvalidMonth(month));
            }
        }

        let range = DateRange::from_months(self.from, self.to)?;

        let fabric_code = self
            .fabric_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty() && *code != ALL_FABRICS)
            .map(String::from);

        Ok(ResolvedFilter {
            range,
            month: self.month,
            year: self.year,
            bill_type: self.bill_type,
            fabric_code,
        })
    }
}

// ==========================================
// ResolvedFilter - 已解析的谓词
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFilter {
    pub range: DateRange,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub bill_type: Option<BillType>,
    pub fabric_code: Option<String>,
}

impl ResolvedFilter {
    /// 不做任何过滤
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn has_fabric_filter(&self) -> bool {
        self.fabric_code.is_some()
    }

    /// 日期谓词: 范围 + 自然月 + 年
    pub fn in_range(&self, date: Option<NaiveDate>) -> bool {
        if !self.range.contains(date) {
            return false;
        }
        if self.month.is_none() && self.year.is_none() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.month.map_or(true, |m| date.month() == m) && self.year.map_or(true, |y| date.year() == y)
    }

    /// 面料谓词: 三个标识任一匹配
    pub fn matches_code(&self, identifiers: &FabricIdentifiers) -> bool {
        match &self.fabric_code {
            None => true,
            Some(code) => identifiers.matches(code),
        }
    }

    pub fn accepts_receive(&self, event: &ReceiveEvent) -> bool {
        let bill_ok = match self.bill_type {
            None => true,
            Some(bill_type) => event.bill_type == Some(bill_type),
        };
        bill_ok && self.matches_code(&event.fabric.identifiers) && self.in_range(event.occurred_at)
    }

    /// 出库记录没有票据类型，票据过滤不作用于出库
    pub fn accepts_stockout(&self, event: &StockoutEvent) -> bool {
        self.matches_code(&event.fabric.identifiers) && self.in_range(event.occurred_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fabric::FabricProfile;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_year_bounds() {
        let feb = MonthYear::new(2, 2024).unwrap();
        assert_eq!(feb.first_day(), d(2024, 2, 1));
        assert_eq!(feb.last_day(), d(2024, 2, 29));

        let dec = MonthYear::new(12, 2025).unwrap();
        assert_eq!(dec.last_day(), d(2025, 12, 31));

        assert_eq!(MonthYear::new(13, 2025), Err(FilterError::InvalidMonth(13)));
        assert_eq!(MonthYear::new(0, 2025), Err(FilterError::InvalidMonth(0)));
    }

    #[test]
    fn test_month_year_parse() {
        assert_eq!(MonthYear::parse("2025-03").unwrap(), MonthYear { month: 3, year: 2025 });
        assert!(matches!(
            MonthYear::parse("2025/03"),
            Err(FilterError::MalformedMonthYear(_))
        ));
        assert_eq!(MonthYear::parse("2025-13"), Err(FilterError::InvalidMonth(13)));
    }

    #[test]
    fn test_range_from_single_month() {
        let from = MonthYear::new(1, 2025).ok();
        let range = DateRange::from_months(from, None).unwrap();
        assert_eq!(range.start(), Some(d(2025, 1, 1)));
        assert_eq!(range.end(), Some(d(2025, 1, 31)));
        assert!(range.contains(Some(d(2025, 1, 31))));
        assert!(!range.contains(Some(d(2025, 2, 1))));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_range_spanning_months() {
        let range = DateRange::from_months(
            MonthYear::new(11, 2024).ok(),
            MonthYear::new(2, 2025).ok(),
        )
        .unwrap();
        assert!(range.contains(Some(d(2024, 11, 1))));
        assert!(range.contains(Some(d(2025, 2, 28))));
        assert!(!range.contains(Some(d(2024, 10, 31))));
    }

    #[test]
    fn test_range_inverted_is_rejected() {
        let err = DateRange::from_months(MonthYear::new(5, 2025).ok(), MonthYear::new(1, 2025).ok())
            .unwrap_err();
        assert!(matches!(err, FilterError::InvertedRange { .. }));
    }

    #[test]
    fn test_unbounded_accepts_everything() {
        let range = DateRange::from_months(None, MonthYear::new(3, 2025).ok()).unwrap();
        assert!(!range.is_bounded());
        assert!(range.contains(None));
        assert!(range.contains(Some(d(1999, 1, 1))));
    }

    #[test]
    fn test_resolve_normalizes_all_code() {
        let filter = LedgerFilter {
            fabric_code: Some(" ALL ".to_string()),
            ..Default::default()
        };
        assert!(!filter.resolve().unwrap().has_fabric_filter());

        let filter = LedgerFilter {
            fabric_code: Some("TC-45".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.resolve().unwrap().fabric_code.as_deref(), Some("TC-45"));

        let bad = LedgerFilter {
            month: Some(14),
            ..Default::default()
        };
        assert_eq!(bad.resolve(), Err(FilterError::InvalidMonth(14)));
    }

    #[test]
    fn test_calendar_month_year_filter() {
        let filter = LedgerFilter {
            month: Some(3),
            year: Some(2025),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(filter.in_range(Some(d(2025, 3, 15))));
        assert!(!filter.in_range(Some(d(2024, 3, 15))));
        assert!(!filter.in_range(None));
    }

    #[test]
    fn test_receive_and_stockout_predicates() {
        let filter = LedgerFilter {
            bill_type: Some(BillType::A),
            fabric_code: Some("R-7".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let mut fabric = FabricProfile::from_code("S-1");
        fabric.identifiers.ref_id = Some("R-7".to_string());

        let receive = ReceiveEvent {
            fabric: fabric.clone(),
            bill_type: Some(BillType::A),
            bill_no: None,
            quantity: 1,
            fold: 0,
            occurred_at: None,
        };
        assert!(filter.accepts_receive(&receive));

        let other_bill = ReceiveEvent {
            bill_type: Some(BillType::B),
            ..receive.clone()
        };
        assert!(!filter.accepts_receive(&other_bill));

        let stockout = StockoutEvent {
            fabric,
            quantity: 1,
            occurred_at: None,
        };
        assert!(filter.accepts_stockout(&stockout));
    }
}
