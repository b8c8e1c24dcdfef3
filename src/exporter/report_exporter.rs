// ==========================================
// 库存管理核心 - 文本报表导出器
// ==========================================
// 固定分节:
// 1. 标题 + 报表日期 + 过滤说明
// 2. 总体统计（数量 / 总价值 / 预警数 / 分类数）
// 3. 分类汇总
// 4. 低库存商品
// 5. 商品明细
// 统计数据来自 StatsEngine
// ==========================================

use std::fmt::Write;

use super::{ExportContext, ExportError, ProductExporter};
use crate::domain::product::{Product, StockLine};
use crate::domain::types::ExportFormat;
use crate::engine::StatsEngine;
use crate::i18n::{t_in, t_with_args_in};

pub struct ReportExporter;

impl ReportExporter {
    fn heading(out: &mut String, title: &str, underline: char) -> std::fmt::Result {
        writeln!(out, "{}", title)?;
        writeln!(out, "{}", underline.to_string().repeat(title.chars().count()))
    }
}

impl ProductExporter for ReportExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Report
    }

    fn render(&self, products: &[Product], ctx: &ExportContext) -> Result<String, ExportError> {
        let loc = ctx.locale.as_str();
        let tr = |key: &str, name: &str, value: &str| t_with_args_in(loc, key, &[(name, value)]);
        let stats = StatsEngine::new().compute(products);
        let mut out = String::new();

        // === 1. 标题 ===
        Self::heading(&mut out, &t_in(loc, "report.title"), '=')?;
        writeln!(out)?;
        writeln!(out, "{}", tr("report.date", "date", &ctx.date(ctx.generated_at)))?;
        match ctx.scope.search_term() {
            Some(term) => writeln!(out, "{}", tr("report.filter_applied", "term", term))?,
            None => writeln!(out, "{}", t_in(loc, "report.full_inventory"))?,
        }
        writeln!(out)?;

        // === 2. 总体统计 ===
        Self::heading(&mut out, &t_in(loc, "report.general_stats"), '-')?;
        writeln!(
            out,
            "{}",
            tr("report.total_products", "count", &stats.total_products.to_string())
        )?;
        writeln!(
            out,
            "{}",
            tr("report.total_value", "value", &ctx.money(stats.total_stock_value))
        )?;
        writeln!(
            out,
            "{}",
            tr("report.alert_products", "count", &stats.low_stock_count.to_string())
        )?;
        writeln!(
            out,
            "{}",
            tr("report.category_count", "count", &stats.category_count.to_string())
        )?;
        writeln!(out)?;

        // === 3. 分类汇总 ===
        Self::heading(&mut out, &t_in(loc, "report.by_category"), '-')?;
        for cat in &stats.categories {
            let line = t_with_args_in(
                loc,
                "report.category_line",
                &[
                    ("category", &cat.category),
                    ("count", &cat.count.to_string()),
                    ("value", &ctx.money(cat.total_value)),
                ],
            );
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;

        // === 4. 低库存商品 ===
        Self::heading(&mut out, &t_in(loc, "report.stock_alerts"), '-')?;
        let alerts: Vec<&Product> = products.iter().filter(|p| p.is_low_stock()).collect();
        if alerts.is_empty() {
            writeln!(out, "{}", t_in(loc, "report.no_alerts"))?;
        }
        for p in alerts {
            writeln!(
                out,
                "- {} ({}): {}/{}",
                p.name, p.category, p.quantity, p.alert_threshold
            )?;
        }
        writeln!(out)?;

        // === 5. 商品明细 ===
        Self::heading(&mut out, &t_in(loc, "report.details"), '-')?;
        for p in products {
            writeln!(out)?;
            writeln!(out, "{}", p.name)?;
            let mut detail = vec![
                tr("report.detail_category", "value", &p.category),
                tr("report.detail_quantity", "value", &p.quantity.to_string()),
                tr("report.detail_unit_price", "value", &ctx.money(p.unit_price)),
                tr("report.detail_total_value", "value", &ctx.money(p.total_value())),
                tr("report.detail_threshold", "value", &p.alert_threshold.to_string()),
                tr("report.detail_status", "value", &p.stock_status().report_label(loc)),
            ];
            if let Some(meta) = &p.metadata {
                for (key, value) in [
                    ("report.detail_supplier", &meta.supplier),
                    ("report.detail_reference", &meta.reference),
                    ("report.detail_location", &meta.location),
                ] {
                    if let Some(value) = value {
                        detail.push(tr(key, "value", value));
                    }
                }
            }
            for line in detail {
                writeln!(out, "  {}", line)?;
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{NewProduct, ProductMetadata};
    use crate::domain::types::ExportScope;
    use crate::exporter::ExportSettings;
    use chrono::Utc;

    fn create_test_product(name: &str, category: &str, q: i64, price: f64, threshold: i64) -> Product {
        Product::from_new(
            NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                quantity: q,
                unit_price: price,
                alert_threshold: threshold,
                image: None,
                metadata: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_report_sections() {
        let ctx = ExportContext::new(ExportScope::Full, &ExportSettings::default());
        let mut b = create_test_product("B", "X", 20, 2.0, 5);
        b.metadata = Some(ProductMetadata {
            supplier: Some("Acme".to_string()),
            location: Some("R2".to_string()),
            ..Default::default()
        });
        let products = vec![create_test_product("A", "X", 5, 10.0, 10), b];

        let out = ReportExporter.render(&products, &ctx).unwrap();

        assert!(out.starts_with("RAPPORT D'INVENTAIRE\n====================\n"));
        assert!(out.contains("Inventaire complet"));
        assert!(out.contains("STATISTIQUES GÉNÉRALES\n----------------------\n"));
        assert!(out.contains("Nombre total de produits: 2"));
        assert!(out.contains("Valeur totale du stock: 90,00\u{A0}MAD"));
        assert!(out.contains("Produits en alerte: 1"));
        assert!(out.contains("Nombre de catégories: 1"));
        assert!(out.contains("X: 2 produits (90,00\u{A0}MAD)"));
        assert!(out.contains("- A (X): 5/10"));
        assert!(out.contains("  Statut: ALERTE"));
        assert!(out.contains("  Statut: OK"));
        assert!(out.contains("  Fournisseur: Acme"));
        assert!(out.contains("  Emplacement: R2"));
        assert!(!out.contains("Référence:"));
    }

    #[test]
    fn test_report_filtered_without_alerts() {
        let ctx = ExportContext::new(
            ExportScope::from_search(Some("Dell".to_string())),
            &ExportSettings::default(),
        );
        let products = vec![create_test_product("Dell XPS 13", "Électronique", 25, 1200.0, 10)];

        let out = ReportExporter.render(&products, &ctx).unwrap();
        assert!(out.contains("Filtre appliqué: \"Dell\""));
        assert!(out.contains("Aucun produit en alerte"));
        assert!(out.contains("  Prix unitaire: 1\u{202F}200,00\u{A0}MAD"));
        assert!(out.contains("  Valeur totale: 30\u{202F}000,00\u{A0}MAD"));
    }

    #[test]
    fn test_report_in_english() {
        let settings = ExportSettings {
            currency: "MAD".to_string(),
            locale: "en".to_string(),
        };
        let ctx = ExportContext::new(ExportScope::Full, &settings);
        let out = ReportExporter.render(&[], &ctx).unwrap();
        assert!(out.starts_with("INVENTORY REPORT\n================\n"));
        assert!(out.contains("No product on alert"));
    }
}
