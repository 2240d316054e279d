// ==========================================
// 纺织厂库存报表系统 - 报表行格式化
// ==========================================
// 职责: 类型化结果 → 展示用表格（仅做形状转换）
// 规则: 整数带千分位，重量保留两位小数，日期 dd/mm/yyyy
// 红线: 语言显式传入，不读取全局 locale
// ==========================================

use crate::config::ReportSettings;
use crate::domain::fabric::{BillSummary, FabricTotal};
use crate::domain::ledger::{LedgerRow, MonthKey};
use crate::domain::package::{PackageCategoryTotals, PackageGrandTotal};
use crate::domain::types::{LedgerRowKind, PackageCategory};
use crate::domain::yarn::{YarnStockLine, YarnTally};
use crate::i18n::{t_in, t_with_args_in};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Table - 展示用表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ==========================================
// ReportFormatter
// ==========================================
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    locale: String,
    separator: char,
}

impl ReportFormatter {
    pub fn new(locale: &str, separator: char) -> Self {
        Self {
            locale: locale.to_string(),
            separator,
        }
    }

    pub fn from_settings(settings: &ReportSettings) -> Self {
        Self::new(&settings.locale, settings.thousands_separator)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn t(&self, key: &str) -> String {
        t_in(key, &self.locale)
    }

    // ==========================================
    // 基础格式
    // ==========================================

    /// 整数，带千分位
    pub fn format_quantity(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let grouped = group_digits(&digits, self.separator);
        if value < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    /// 重量，两位小数，整数部分带千分位
    pub fn format_weight(&self, value: f64) -> String {
        let fixed = format!("{:.2}", value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{}{}.{}", sign, group_digits(int_part, self.separator), frac_part)
    }

    /// 日期 dd/mm/yyyy，缺失为空
    pub fn format_date(&self, date: Option<NaiveDate>) -> String {
        date.map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    }

    /// 本地化月份名 + 年
    pub fn month_name(&self, month: MonthKey) -> String {
        format!("{} {}", self.t(&format!("month.{}", month.month)), month.year)
    }

    /// 月汇总标题，如 "รวม มกราคม 2025"
    pub fn month_caption(&self, month: MonthKey) -> String {
        let month_name = self.t(&format!("month.{}", month.month));
        let year = month.year.to_string();
        t_with_args_in(
            "ledger.month_total",
            &self.locale,
            &[("month", month_name.as_str()), ("year", year.as_str())],
        )
    }

    pub fn package_label(&self, category: PackageCategory) -> String {
        self.t(category.label_key())
    }

    // ==========================================
    // 面料台账
    // ==========================================

    pub fn ledger_headers(&self) -> Vec<String> {
        [
            "ledger.col_fabric",
            "ledger.col_date",
            "ledger.col_in",
            "ledger.col_out",
            "ledger.col_balance",
            "ledger.col_note",
        ]
        .iter()
        .map(|key| self.t(key))
        .collect()
    }

    /// 入库行不填出库列，出库行不填入库列，汇总行不填日期
    pub fn ledger_row(&self, row: &LedgerRow) -> Vec<String> {
        let balance = self.format_quantity(row.balance);
        match row.kind {
            LedgerRowKind::Receive => {
                let caption = self.t("ledger.receive");
                let note = match &row.note {
                    Some(bill) => format!("{} {}", caption, bill),
                    None => caption,
                };
                vec![
                    row.label.clone(),
                    self.format_date(row.date),
                    self.format_quantity(row.quantity_in),
                    String::new(),
                    balance,
                    note,
                ]
            }
            LedgerRowKind::Stockout => vec![
                row.label.clone(),
                self.format_date(row.date),
                String::new(),
                self.format_quantity(row.quantity_out),
                balance,
                self.t("ledger.stockout"),
            ],
            LedgerRowKind::MonthSummary => vec![
                row.month
                    .map(|m| self.month_caption(m))
                    .unwrap_or_else(|| row.label.clone()),
                String::new(),
                self.format_quantity(row.quantity_in),
                self.format_quantity(row.quantity_out),
                balance,
                String::new(),
            ],
            LedgerRowKind::GrandTotal => vec![
                self.t("ledger.grand_total"),
                String::new(),
                self.format_quantity(row.quantity_in),
                self.format_quantity(row.quantity_out),
                balance,
                String::new(),
            ],
        }
    }

    pub fn ledger_table(&self, rows: &[LedgerRow]) -> Table {
        Table {
            headers: self.ledger_headers(),
            rows: rows.iter().map(|r| self.ledger_row(r)).collect(),
        }
    }

    // ==========================================
    // 包材回收
    // ==========================================

    pub fn package_headers(&self) -> Vec<String> {
        [
            "package.col_type",
            "package.col_imported",
            "package.col_required",
            "package.col_returned",
            "package.col_outstanding",
        ]
        .iter()
        .map(|key| self.t(key))
        .collect()
    }

    pub fn package_row(&self, totals: &PackageCategoryTotals) -> Vec<String> {
        vec![
            self.package_label(totals.category),
            self.format_quantity(totals.imported),
            self.format_quantity(totals.required_return),
            self.format_quantity(totals.returned),
            self.format_quantity(totals.outstanding()),
        ]
    }

    pub fn package_total_row(&self, total: &PackageGrandTotal) -> Vec<String> {
        vec![
            self.t("package.total"),
            self.format_quantity(total.imported),
            self.format_quantity(total.required_return),
            self.format_quantity(total.returned),
            self.format_quantity(total.outstanding_raw.max(0)),
        ]
    }

    pub fn package_table(&self, categories: &[PackageCategoryTotals], total: &PackageGrandTotal) -> Table {
        let mut rows: Vec<Vec<String>> = categories.iter().map(|t| self.package_row(t)).collect();
        rows.push(self.package_total_row(total));
        Table {
            headers: self.package_headers(),
            rows,
        }
    }

    // ==========================================
    // 纱线库存
    // ==========================================

    pub fn yarn_headers(&self) -> Vec<String> {
        let units = [
            self.t("yarn.col_spools"),
            self.t("yarn.pound"),
            self.t("yarn.kilogram"),
        ];
        let mut headers = vec![self.t("yarn.col_type")];
        for group in ["yarn.col_imported", "yarn.col_issued", "yarn.col_remaining"] {
            let group = self.t(group);
            headers.extend(units.iter().map(|unit| format!("{} {}", group, unit)));
        }
        headers
    }

    fn yarn_cells(&self, tally: &YarnTally) -> [String; 3] {
        [
            self.format_quantity(tally.spools),
            self.format_weight(tally.weight_lb_net),
            self.format_weight(tally.weight_kg_net),
        ]
    }

    pub fn yarn_row(&self, line: &YarnStockLine) -> Vec<String> {
        let mut row = vec![line.yarn_type.clone()];
        row.extend(self.yarn_cells(&line.imported));
        row.extend(self.yarn_cells(&line.issued));
        row.extend(self.yarn_cells(&line.remaining));
        row
    }

    pub fn yarn_table(&self, lines: &[YarnStockLine], total: &YarnStockLine) -> Table {
        let mut rows: Vec<Vec<String>> = lines.iter().map(|l| self.yarn_row(l)).collect();
        let mut total_row = self.yarn_row(total);
        total_row[0] = self.t("yarn.total");
        rows.push(total_row);
        Table {
            headers: self.yarn_headers(),
            rows,
        }
    }

    // ==========================================
    // 票据汇总 / 面料汇总
    // ==========================================

    pub fn bill_table(&self, bills: &[BillSummary]) -> Table {
        let headers = [
            "bill.col_bill",
            "bill.col_date",
            "bill.col_fabric",
            "bill.col_fold",
            "bill.col_yards",
        ]
        .iter()
        .map(|key| self.t(key))
        .collect();

        let rows = bills
            .iter()
            .map(|b| {
                vec![
                    b.bill_number.clone(),
                    self.format_date(b.first_date),
                    b.fabric.label(),
                    self.format_quantity(b.fold),
                    self.format_quantity(b.quantity),
                ]
            })
            .collect();

        Table { headers, rows }
    }

    /// 面料汇总；未指定组织代码的显示本地化"未指定"
    pub fn fabric_total_table(&self, totals: &[FabricTotal]) -> Table {
        let rows = totals
            .iter()
            .map(|t| {
                let code = if t.fabric_code == crate::engine::UNSPECIFIED_FABRIC {
                    self.t("common.unspecified")
                } else {
                    t.fabric_code.clone()
                };
                vec![code, self.format_quantity(t.quantity)]
            })
            .collect();
        Table {
            headers: vec![self.t("bill.col_fabric"), self.t("bill.col_yards")],
            rows,
        }
    }
}

/// 每三位插入分隔符（输入为纯数字串）
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> ReportFormatter {
        ReportFormatter::new("th", ',')
    }

    fn row(kind: LedgerRowKind, qin: i64, qout: i64, balance: i64) -> LedgerRow {
        LedgerRow {
            kind,
            label: "TC-45".to_string(),
            month: Some(MonthKey { year: 2025, month: 1 }),
            date: NaiveDate::from_ymd_opt(2025, 1, 5),
            quantity_in: qin,
            quantity_out: qout,
            balance,
            note: None,
        }
    }

    #[test]
    fn test_format_numbers() {
        let f = th();
        assert_eq!(f.format_quantity(0), "0");
        assert_eq!(f.format_quantity(999), "999");
        assert_eq!(f.format_quantity(1000), "1,000");
        assert_eq!(f.format_quantity(1234567), "1,234,567");
        assert_eq!(f.format_quantity(-45000), "-45,000");
        assert_eq!(f.format_weight(1234.5), "1,234.50");
        assert_eq!(f.format_weight(-0.004), "0.00");
        assert_eq!(f.format_weight(-12.5), "-12.50");
        assert_eq!(ReportFormatter::new("en", '.').format_quantity(12000), "12.000");
    }

    #[test]
    fn test_format_date() {
        let f = th();
        assert_eq!(f.format_date(NaiveDate::from_ymd_opt(2025, 1, 5)), "05/01/2025");
        assert_eq!(f.format_date(None), "");
    }

    #[test]
    fn test_ledger_row_blanks() {
        let f = th();
        let receive = f.ledger_row(&row(LedgerRowKind::Receive, 1200, 0, 1200));
        assert_eq!(receive, vec!["TC-45", "05/01/2025", "1,200", "", "1,200", "รับ"]);

        let stockout = f.ledger_row(&row(LedgerRowKind::Stockout, 0, 40, 1160));
        assert_eq!(stockout, vec!["TC-45", "05/01/2025", "", "40", "1,160", "จ่าย"]);

        let month = f.ledger_row(&row(LedgerRowKind::MonthSummary, 1200, 40, 1160));
        assert_eq!(month[0], "รวม มกราคม 2025");
        assert_eq!(month[1], "");

        let mut grand = row(LedgerRowKind::GrandTotal, 1200, 40, 1160);
        grand.month = None;
        assert_eq!(f.ledger_row(&grand)[0], "รวมทั้งหมดทุกเดือน");
    }

    #[test]
    fn test_receive_note_includes_bill() {
        let mut r = row(LedgerRowKind::Receive, 5, 0, 5);
        r.note = Some("A0042".to_string());
        assert_eq!(th().ledger_row(&r)[5], "รับ A0042");
    }

    #[test]
    fn test_package_table_shape() {
        let f = ReportFormatter::new("en", ',');
        let categories: Vec<_> = PackageCategory::ALL
            .iter()
            .map(|&c| PackageCategoryTotals::empty(c))
            .collect();
        let table = f.package_table(&categories, &PackageGrandTotal::default());
        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.rows.len(), 10);
        assert_eq!(table.rows[0][0], "Steel pallet");
        assert_eq!(table.rows[9][0], "Total");
    }

    #[test]
    fn test_package_row_clamps_outstanding() {
        let f = th();
        let over = PackageCategoryTotals {
            category: PackageCategory::Box,
            imported: 10,
            required_return: 5,
            returned: 8,
            outstanding_raw: -3,
        };
        assert_eq!(f.package_row(&over), vec!["กล่อง", "10", "5", "8", "0"]);
    }

    #[test]
    fn test_yarn_headers_and_row() {
        let f = ReportFormatter::new("en", ',');
        let headers = f.yarn_headers();
        assert_eq!(headers.len(), 10);
        assert_eq!(headers[1], "Imported Spools");

        let line = YarnStockLine {
            yarn_type: "T/C".to_string(),
            imported: YarnTally { spools: 1500, weight_lb_net: 2000.0, weight_kg_net: 907.18 },
            issued: YarnTally::default(),
            remaining: YarnTally { spools: 1500, weight_lb_net: 2000.0, weight_kg_net: 907.18 },
        };
        let row = f.yarn_row(&line);
        assert_eq!(row[1], "1,500");
        assert_eq!(row[2], "2,000.00");
        assert_eq!(row[6], "0.00");
    }
}
