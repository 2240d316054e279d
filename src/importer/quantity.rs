// ==========================================
// 纺织厂库存报表系统 - 数值/日期解析工具
// ==========================================
// 职责: 导入边界统一解析数量、重量、日期
// 红线: 解析失败不报错，数量取 0，日期取 None
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Excel 序列日期的纪元（1900 闰年 bug 已计入）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Excel 序列日期上限（9999-12-31）
const EXCEL_MAX_SERIAL: i64 = 2_958_465;

/// 解析整数数量
///
/// # 规则
/// - 去除首尾空白与千分位逗号
/// - 整数直接解析；小数向零截断
/// - 否则取前导数字部分（如 "120 หลา" → 120）
/// - 缺失或无法解析 → 0
pub fn parse_quantity(value: Option<&str>) -> i64 {
    let Some(raw) = value else {
        return 0;
    };
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return 0;
    }

    if let Ok(n) = cleaned.parse::<i64>() {
        return n;
    }
    if let Ok(f) = cleaned.parse::<f64>() {
        if f.is_finite() {
            return f.trunc() as i64;
        }
        return 0;
    }

    leading_integer(&cleaned).unwrap_or(0)
}

/// 解析重量（两位小数展示，内部保留 f64）
pub fn parse_weight(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return 0.0;
    };
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => 0.0,
    }
}

fn leading_integer(value: &str) -> Option<i64> {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// 解析事件日期
///
/// 支持: `YYYY-MM-DD`、带时间的 `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`、
/// RFC 3339（取 UTC 日期）、`YYYYMMDD`、`DD/MM/YYYY`、Excel 序列日期
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc().date());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    // Excel 序列日期（calamine 以数字形式给出）
    if let Ok(serial) = value.parse::<f64>() {
        let days = serial.trunc() as i64;
        if (1..=EXCEL_MAX_SERIAL).contains(&days) {
            let (y, m, d) = EXCEL_EPOCH;
            return NaiveDate::from_ymd_opt(y, m, d).map(|epoch| epoch + Duration::days(days));
        }
    }

    None
}

/// 可选字段版本
pub fn parse_event_date_opt(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(parse_event_date)
}
