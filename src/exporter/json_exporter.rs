// ==========================================
// 库存管理核心 - JSON 导出器
// ==========================================
// 文档: { exportDate, totalProducts, totalValue, searchTerm, products: [...] }
// 每个商品追加 valeurTotale 与 statut 两个派生字段
// 产出可被 JSON 导入路径直接读回（{products: [...]} 形状）
// ==========================================

use chrono::SecondsFormat;
use serde::Serialize;

use super::{ExportContext, ExportError, ProductExporter};
use crate::domain::product::{Product, StockLine};
use crate::domain::types::ExportFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    export_date: String,
    total_products: usize,
    total_value: f64,
    search_term: Option<&'a str>,
    products: Vec<ExportedProduct<'a>>,
}

#[derive(Serialize)]
struct ExportedProduct<'a> {
    #[serde(flatten)]
    product: &'a Product,
    #[serde(rename = "valeurTotale")]
    total_value: f64,
    #[serde(rename = "statut")]
    status: String,
}

pub struct JsonExporter;

impl ProductExporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, products: &[Product], ctx: &ExportContext) -> Result<String, ExportError> {
        let document = ExportDocument {
            export_date: ctx.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_products: products.len(),
            total_value: products.iter().map(StockLine::total_value).sum(),
            search_term: ctx.scope.search_term(),
            products: products
                .iter()
                .map(|product| ExportedProduct {
                    product,
                    total_value: product.total_value(),
                    status: product.stock_status().label(&ctx.locale),
                })
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }
}
