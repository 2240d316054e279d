// ==========================================
// 成品台账构建器集成测试
// ==========================================
// 覆盖: 余额非负 / 进出守恒 / 月份升序 / 月内先入后出 / 幂等
// ==========================================

use chrono::NaiveDate;
use textile_inventory::domain::{
    FabricProfile, LedgerRow, LedgerRowKind, MonthKey, ReceiveEvent, RunningBalances,
    StockoutEvent,
};
use textile_inventory::engine::{FabricLedgerBuilder, LedgerFilter, ResolvedFilter};

fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, day)
}

fn receive(code: &str, quantity: i64, date: Option<NaiveDate>) -> ReceiveEvent {
    ReceiveEvent {
        fabric: FabricProfile::from_code(code),
        bill_type: None,
        bill_no: None,
        quantity,
        fold: 0,
        occurred_at: date,
    }
}

fn stockout(code: &str, quantity: i64, date: Option<NaiveDate>) -> StockoutEvent {
    StockoutEvent {
        fabric: FabricProfile::from_code(code),
        quantity,
        occurred_at: date,
    }
}

/// 多面料、多月份、含超额出库的混合数据
fn mixed_events() -> (Vec<ReceiveEvent>, Vec<StockoutEvent>) {
    let receives = vec![
        receive("TC-45", 120, d(2025, 3, 2)),
        receive("CVC-30", 75, d(2025, 1, 9)),
        receive("TC-45", 60, d(2025, 1, 3)),
        receive("T-100", 500, d(2024, 12, 28)),
        receive("CVC-30", 10, d(2025, 3, 30)),
    ];
    let stockouts = vec![
        stockout("TC-45", 90, d(2025, 1, 15)),
        stockout("T-100", 200, d(2025, 1, 2)),
        stockout("CVC-30", 40, d(2025, 3, 1)),
        stockout("T-100", 400, d(2025, 3, 31)),
    ];
    (receives, stockouts)
}

fn detail_rows(rows: &[LedgerRow]) -> impl Iterator<Item = &LedgerRow> {
    rows.iter()
        .filter(|r| matches!(r.kind, LedgerRowKind::Receive | LedgerRowKind::Stockout))
}

fn build(filter: ResolvedFilter) -> Vec<LedgerRow> {
    let (receives, stockouts) = mixed_events();
    FabricLedgerBuilder::new(filter)
        .build(&receives, &stockouts, RunningBalances::new())
        .rows
}

#[test]
fn test_balance_never_negative() {
    for filter in [
        ResolvedFilter::accept_all(),
        LedgerFilter {
            fabric_code: Some("T-100".to_string()),
            ..LedgerFilter::default()
        }
        .resolve()
        .unwrap(),
    ] {
        let rows = build(filter);
        assert!(rows.iter().all(|r| r.balance >= 0), "负余额: {:?}", rows);
    }
}

#[test]
fn test_grand_total_conserves_quantities() {
    let rows = build(ResolvedFilter::accept_all());
    let total = rows.last().unwrap();
    assert_eq!(total.kind, LedgerRowKind::GrandTotal);

    let sum_in: i64 = detail_rows(&rows).map(|r| r.quantity_in).sum();
    let sum_out: i64 = detail_rows(&rows).map(|r| r.quantity_out).sum();
    assert_eq!(total.quantity_in, sum_in);
    assert_eq!(total.quantity_out, sum_out);
    assert_eq!(sum_in, 765);
    assert_eq!(sum_out, 730);
    assert_eq!(total.balance, 35);

    // 月汇总之和同样守恒
    let month_in: i64 = rows
        .iter()
        .filter(|r| r.kind == LedgerRowKind::MonthSummary)
        .map(|r| r.quantity_in)
        .sum();
    assert_eq!(month_in, sum_in);
}

#[test]
fn test_months_are_union_of_inputs_ascending() {
    let rows = build(ResolvedFilter::accept_all());
    let months: Vec<MonthKey> = rows
        .iter()
        .filter(|r| r.kind == LedgerRowKind::MonthSummary)
        .filter_map(|r| r.month)
        .collect();

    assert_eq!(
        months,
        vec![
            MonthKey { year: 2024, month: 12 },
            MonthKey { year: 2025, month: 1 },
            MonthKey { year: 2025, month: 3 },
        ]
    );
}

#[test]
fn test_receives_precede_stockouts_within_month() {
    let rows = build(ResolvedFilter::accept_all());

    let mut seen_stockout = false;
    let mut current: Option<MonthKey> = None;
    for row in &rows {
        if row.month != current {
            current = row.month;
            seen_stockout = false;
        }
        match row.kind {
            LedgerRowKind::Stockout => seen_stockout = true,
            LedgerRowKind::Receive => assert!(!seen_stockout, "入库行出现在出库行之后: {:?}", row),
            _ => {}
        }
    }

    // 2025-01: 入库 01-03 / 01-09 在出库 01-02 之前
    let jan: Vec<LedgerRowKind> = rows
        .iter()
        .filter(|r| r.month == Some(MonthKey { year: 2025, month: 1 }))
        .map(|r| r.kind)
        .collect();
    assert_eq!(
        jan,
        vec![
            LedgerRowKind::Receive,
            LedgerRowKind::Receive,
            LedgerRowKind::Stockout,
            LedgerRowKind::Stockout,
            LedgerRowKind::MonthSummary,
        ]
    );
}

#[test]
fn test_builder_is_idempotent() {
    let (receives, stockouts) = mixed_events();
    let builder = FabricLedgerBuilder::new(ResolvedFilter::accept_all());

    let first = builder.build(&receives, &stockouts, RunningBalances::new());
    let second = builder.build(&receives, &stockouts, RunningBalances::new());
    assert_eq!(first, second);
}

#[test]
fn test_receive_then_partial_stockout() {
    let receives = vec![receive("TC-45", 100, d(2025, 1, 5))];
    let stockouts = vec![stockout("TC-45", 40, d(2025, 1, 20))];
    let rows = FabricLedgerBuilder::new(ResolvedFilter::accept_all())
        .build(&receives, &stockouts, RunningBalances::new())
        .rows;

    let shape: Vec<(LedgerRowKind, i64, i64, i64)> = rows
        .iter()
        .map(|r| (r.kind, r.quantity_in, r.quantity_out, r.balance))
        .collect();
    assert_eq!(
        shape,
        vec![
            (LedgerRowKind::Receive, 100, 0, 100),
            (LedgerRowKind::Stockout, 0, 40, 60),
            (LedgerRowKind::MonthSummary, 100, 40, 60),
            (LedgerRowKind::GrandTotal, 100, 40, 60),
        ]
    );
}

#[test]
fn test_oversold_stockout_clamps_to_zero() {
    let receives = vec![receive("TC-45", 50, d(2025, 2, 1))];
    let stockouts = vec![stockout("TC-45", 80, d(2025, 2, 15))];
    let rows = FabricLedgerBuilder::new(ResolvedFilter::accept_all())
        .build(&receives, &stockouts, RunningBalances::new())
        .rows;

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].balance, 0);
    assert_eq!(rows[2].kind, LedgerRowKind::MonthSummary);
    assert_eq!(rows[2].balance, 0);
    assert_eq!(rows[3].quantity_in, 50);
    assert_eq!(rows[3].quantity_out, 80);
    assert_eq!(rows[3].balance, 0);
}

#[test]
fn test_empty_window_yields_only_grand_total() {
    let filter = LedgerFilter {
        year: Some(2030),
        ..LedgerFilter::default()
    }
    .resolve()
    .unwrap();
    let rows = build(filter);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, LedgerRowKind::GrandTotal);
    assert_eq!((rows[0].quantity_in, rows[0].quantity_out, rows[0].balance), (0, 0, 0));
}
