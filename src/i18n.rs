// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持泰文（默认）、英文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 报表渲染一律显式传入 locale，不依赖全局语言设置
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"th" / "en" / "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 是否为已提供翻译的语言
pub fn is_supported(locale: &str) -> bool {
    rust_i18n::available_locales!().iter().any(|l| *l == locale)
}

/// 翻译消息（当前全局语言）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（指定语言）
///
/// # 示例
/// ```no_run
/// use textile_inventory::i18n::t_in;
/// let caption = t_in("ledger.grand_total", "th");
/// ```
pub fn t_in(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言，带参数）
///
/// # 示例
/// ```no_run
/// use textile_inventory::i18n::t_with_args_in;
/// let caption = t_with_args_in("ledger.month_total", "en", &[("month", "January"), ("year", "2025")]);
/// ```
pub fn t_with_args_in(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(key, locale);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
