// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（默认）和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "fr";

/// 支持的语言列表
pub const SUPPORTED_LOCALES: [&str; 2] = ["fr", "en"];

/// 规范化语言代码，不支持的语言回退到默认语言
pub fn normalize_locale(locale: &str) -> &'static str {
    let wanted = locale.trim().to_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| wanted == *l || wanted.starts_with(&format!("{}-", l)))
        .unwrap_or(DEFAULT_LOCALE)
}

/// 按指定语言翻译消息（无参数）
///
/// 不修改全局语言，导入/导出流水线都通过此函数取文案
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按指定语言翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use depot_inventory::i18n::t_with_args_in;
/// let msg = t_with_args_in("fr", "import.line_position", &[("line", "3")]);
/// ```
pub fn t_with_args_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
