// ==========================================
// 库存管理核心 - CSV 导出器
// ==========================================
// 列: ID, 名称, 分类, 数量, 单价, 总价值, 预警阈值, 状态,
//     供应商, 编号, 描述, 存放位置, 创建日期, 修改日期
// 引号: 非数值字段一律加引号（QuoteStyle::NonNumeric）
// 红线: 总价值现算 quantity × unit_price
// ==========================================

use csv::{QuoteStyle, WriterBuilder};

use super::{ExportContext, ExportError, ProductExporter};
use crate::domain::product::{Product, ProductMetadata, StockLine};
use crate::domain::types::ExportFormat;
use crate::i18n::t_in;

const HEADER_KEYS: [&str; 14] = [
    "csv.id",
    "csv.name",
    "csv.category",
    "csv.quantity",
    "csv.unit_price",
    "csv.total_value",
    "csv.alert_threshold",
    "csv.status",
    "csv.supplier",
    "csv.reference",
    "csv.description",
    "csv.location",
    "csv.created_at",
    "csv.updated_at",
];

pub struct CsvExporter;

impl ProductExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, products: &[Product], ctx: &ExportContext) -> Result<String, ExportError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .from_writer(Vec::new());

        let headers: Vec<String> = HEADER_KEYS.iter().map(|k| t_in(&ctx.locale, k)).collect();
        writer.write_record(&headers)?;

        for product in products {
            let meta = |pick: fn(&ProductMetadata) -> &Option<String>| {
                product.metadata_field(pick).unwrap_or_default().to_string()
            };
            writer.write_record([
                product.id.to_string(),
                product.name.clone(),
                product.category.clone(),
                product.quantity.to_string(),
                product.unit_price.to_string(),
                product.total_value().to_string(),
                product.alert_threshold.to_string(),
                product.stock_status().label(&ctx.locale),
                meta(|m| &m.supplier),
                meta(|m| &m.reference),
                meta(|m| &m.description),
                meta(|m| &m.location),
                ctx.date(product.created_at),
                ctx.date(product.updated_at),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::CsvWriteError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::CsvWriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::NewProduct;
    use crate::domain::types::ExportScope;
    use crate::exporter::ExportSettings;
    use chrono::{TimeZone, Utc};

    fn create_test_product(name: &str, q: i64, price: f64, threshold: i64) -> Product {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        Product::from_new(
            NewProduct {
                name: name.to_string(),
                category: "Électronique".to_string(),
                quantity: q,
                unit_price: price,
                alert_threshold: threshold,
                image: None,
                metadata: Some(ProductMetadata {
                    supplier: Some("Dell, Inc.".to_string()),
                    ..Default::default()
                }),
            },
            at,
        )
    }

    #[test]
    fn test_csv_layout() {
        let ctx = ExportContext::new(ExportScope::Full, &ExportSettings::default());
        let product = create_test_product("Dell XPS 13", 25, 1200.0, 10);
        let out = CsvExporter.render(std::slice::from_ref(&product), &ctx).unwrap();

        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"ID\",\"Nom\",\"Catégorie\",\"Quantité\",\"Prix Unitaire\",\"Valeur Totale\",\"Seuil d'Alerte\",\"Statut\",\"Fournisseur\",\"Référence\",\"Description\",\"Emplacement\",\"Date Création\",\"Date Modification\""
        );
        assert_eq!(
            lines.next().unwrap(),
            format!(
                "\"{}\",\"Dell XPS 13\",\"Électronique\",25,1200,30000,10,\"En Stock\",\"Dell, Inc.\",\"\",\"\",\"\",\"18/10/2026\",\"18/10/2026\"",
                product.id
            )
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_low_stock_label_and_parse_back() {
        let ctx = ExportContext::new(ExportScope::Full, &ExportSettings::default());
        let products = vec![
            create_test_product("Clavier", 10, 45.5, 10),
            create_test_product("Souris", 3, 19.9, 5),
        ];
        let out = CsvExporter.render(&products, &ctx).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][7], "Stock Faible");
        assert_eq!(&rows[0][5], "455");
        assert_eq!(&rows[1][8], "Dell, Inc.");
    }
}
