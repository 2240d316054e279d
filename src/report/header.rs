// ==========================================
// 纺织厂库存报表系统 - 报表抬头
// ==========================================
// 职责: 由报表设置 + 筛选条件生成抬头键值对
// 输出: ReportDocument（标题 + 抬头 + 表格）
// ==========================================

use crate::config::ReportSettings;
use crate::domain::MonthKey;
use crate::engine::{DateRange, ResolvedFilter};
use crate::i18n::t_in;
use crate::report::export::ReportDocument;
use crate::report::formatter::{ReportFormatter, Table};

/// 期间描述
///
/// # 返回
/// - 有范围: "dd/mm/yyyy - dd/mm/yyyy"
/// - 仅月/年: "<月份> <年>" / "<年>"
/// - 否则: "全部"
pub fn period_caption(formatter: &ReportFormatter, range: &DateRange, month: Option<u32>, year: Option<i32>) -> String {
    if range.is_bounded() {
        return format!(
            "{} - {}",
            formatter.format_date(range.start()),
            formatter.format_date(range.end())
        );
    }

    match (month, year) {
        (Some(month), Some(year)) => formatter.month_name(MonthKey { year, month }),
        (Some(month), None) => t_in(&format!("month.{}", month), formatter.locale()),
        (None, Some(year)) => year.to_string(),
        (None, None) => t_in("common.all", formatter.locale()),
    }
}

fn company_meta(settings: &ReportSettings, locale: &str) -> Vec<(String, String)> {
    vec![
        (t_in("report.company_name", locale), settings.company_name.clone()),
        (t_in("report.company_location", locale), settings.company_location.clone()),
    ]
}

/// 成品台账报表
pub fn ledger_document(settings: &ReportSettings, filter: &ResolvedFilter, table: Table) -> ReportDocument {
    let formatter = ReportFormatter::from_settings(settings);
    let locale = formatter.locale();
    let all = t_in("common.all", locale);

    let mut meta = company_meta(settings, locale);
    meta.push((
        t_in("report.period", locale),
        period_caption(&formatter, &filter.range, filter.month, filter.year),
    ));
    meta.push((
        t_in("report.bill_type", locale),
        filter.bill_type.map(|b| b.code().to_string()).unwrap_or_else(|| all.clone()),
    ));
    meta.push((
        t_in("report.fabric_code", locale),
        filter.fabric_code.clone().unwrap_or(all),
    ));

    ReportDocument {
        title: t_in("report.ledger_title", locale),
        meta,
        table,
    }
}

/// 包材 / 原料报表（仅有期间）
pub fn range_document(settings: &ReportSettings, title_key: &str, range: &DateRange, table: Table) -> ReportDocument {
    let formatter = ReportFormatter::from_settings(settings);
    let locale = formatter.locale();

    let mut meta = company_meta(settings, locale);
    meta.push((t_in("report.period", locale), period_caption(&formatter, range, None, None)));

    ReportDocument {
        title: t_in(title_key, locale),
        meta,
        table,
    }
}
