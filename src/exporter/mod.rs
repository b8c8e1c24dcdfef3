// ==========================================
// 库存管理核心 - 导出层
// ==========================================
// 职责: 将商品集合渲染为 CSV / JSON / 文本报表
// 红线: 只产出文本载荷与文件名，不负责投递（写盘/下载由调用方完成）
// ==========================================

pub mod csv_exporter;
pub mod file_name;
pub mod json_exporter;
pub mod money;
pub mod report_exporter;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::product::Product;
use crate::domain::types::{ExportFormat, ExportScope};
use crate::i18n::DEFAULT_LOCALE;

pub use csv_exporter::CsvExporter;
pub use file_name::{build_file_name, sanitize_term};
pub use json_exporter::JsonExporter;
pub use money::{format_currency, format_date};
pub use report_exporter::ReportExporter;

/// 默认币种
pub const DEFAULT_CURRENCY: &str = "MAD";

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    #[error("JSON 序列化失败: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("报表生成失败: {0}")]
    RenderError(#[from] std::fmt::Error),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

/// 导出参数（由配置层加载）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub currency: String,
    pub locale: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// 单次导出的上下文
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub scope: ExportScope,
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub locale: String,
}

impl ExportContext {
    pub fn new(scope: ExportScope, settings: &ExportSettings) -> Self {
        Self {
            scope,
            generated_at: Utc::now(),
            currency: settings.currency.clone(),
            locale: settings.locale.clone(),
        }
    }

    pub fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.currency, &self.locale)
    }

    pub fn date(&self, at: DateTime<Utc>) -> String {
        format_date(at.date_naive(), &self.locale)
    }
}

/// 导出结果: 文件名 + MIME + 内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

// ==========================================
// ProductExporter Trait
// ==========================================
// 实现者: CsvExporter, JsonExporter, ReportExporter
pub trait ProductExporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// 渲染商品集合
    fn render(&self, products: &[Product], ctx: &ExportContext) -> Result<String, ExportError>;
}

/// 按格式选择导出器
pub fn exporter_for(format: ExportFormat) -> Box<dyn ProductExporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Report => Box::new(ReportExporter),
    }
}

/// 渲染并打包为 ExportPayload
#[instrument(skip(products, ctx), fields(count = products.len(), scope = ?ctx.scope))]
pub fn render_export(
    format: ExportFormat,
    products: &[Product],
    ctx: &ExportContext,
) -> Result<ExportPayload, ExportError> {
    let content = exporter_for(format).render(products, ctx)?;
    let file_name = build_file_name(format, &ctx.scope, ctx.generated_at.date_naive());
    debug!(%file_name, bytes = content.len(), "导出内容生成完成");

    Ok(ExportPayload {
        file_name,
        mime_type: format.mime_type().to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_export_packs_metadata() {
        let ctx = ExportContext::new(ExportScope::Full, &ExportSettings::default());
        let payload = render_export(ExportFormat::Json, &[], &ctx).unwrap();
        assert!(payload.file_name.starts_with("inventaire-complet-"));
        assert!(payload.file_name.ends_with(".json"));
        assert_eq!(payload.mime_type, "application/json");
        assert!(payload.content.contains("\"totalProducts\": 0"));
    }
}
