// ==========================================
// 库存管理核心 - 导出文件名
// ==========================================
// 全部库存: inventaire-complet-YYYY-MM-DD.{csv,json}
// 当前视图: inventaire-<搜索词>-YYYY-MM-DD.{csv,json}（无搜索词用 filtre）
// 报表:     rapport-inventaire[-<搜索词>]-YYYY-MM-DD.txt
// 搜索词中 [A-Za-z0-9] 以外的字符一律替换为 '-'
// ==========================================

use chrono::NaiveDate;

use crate::domain::types::{ExportFormat, ExportScope};

/// 生成导出文件名
pub fn build_file_name(format: ExportFormat, scope: &ExportScope, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d");
    let ext = format.extension();

    match (format, scope) {
        (ExportFormat::Report, ExportScope::Full) => format!("rapport-inventaire-{stamp}.{ext}"),
        (ExportFormat::Report, ExportScope::Filtered { .. }) => {
            format!("rapport-inventaire-{}-{stamp}.{ext}", scope_suffix(scope))
        }
        (_, ExportScope::Full) => format!("inventaire-complet-{stamp}.{ext}"),
        (_, ExportScope::Filtered { .. }) => {
            format!("inventaire-{}-{stamp}.{ext}", scope_suffix(scope))
        }
    }
}

fn scope_suffix(scope: &ExportScope) -> String {
    scope
        .search_term()
        .map(sanitize_term)
        .unwrap_or_else(|| "filtre".to_string())
}

/// 非 ASCII 字母数字字符替换为 '-'
pub fn sanitize_term(term: &str) -> String {
    term.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_full_scope_names() {
        assert_eq!(
            build_file_name(ExportFormat::Csv, &ExportScope::Full, date()),
            "inventaire-complet-2026-10-18.csv"
        );
        assert_eq!(
            build_file_name(ExportFormat::Json, &ExportScope::Full, date()),
            "inventaire-complet-2026-10-18.json"
        );
        assert_eq!(
            build_file_name(ExportFormat::Report, &ExportScope::Full, date()),
            "rapport-inventaire-2026-10-18.txt"
        );
    }

    #[test]
    fn test_filtered_scope_names() {
        let scope = ExportScope::from_search(Some("Dell XPS/13".to_string()));
        assert_eq!(
            build_file_name(ExportFormat::Csv, &scope, date()),
            "inventaire-Dell-XPS-13-2026-10-18.csv"
        );
        assert_eq!(
            build_file_name(ExportFormat::Report, &scope, date()),
            "rapport-inventaire-Dell-XPS-13-2026-10-18.txt"
        );

        let scope = ExportScope::Filtered { search_term: None };
        assert_eq!(
            build_file_name(ExportFormat::Json, &scope, date()),
            "inventaire-filtre-2026-10-18.json"
        );
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_term("Électronique"), "-lectronique");
        assert_eq!(sanitize_term("a b_c"), "a-b-c");
    }
}
