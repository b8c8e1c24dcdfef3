// ==========================================
// 库存管理核心 - 领域类型定义
// ==========================================
// 职责: 商品标识、库存状态、字段枚举、导入/导出格式
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::i18n::t_in;

// ==========================================
// 商品标识 (Product Id)
// ==========================================
// 存储为 16 字节 BLOB，对外暴露为带连字符的小写字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 生成新的随机标识
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// 从字符串解析（格式错误返回 Err）
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }

    /// 从数据库 BLOB 还原
    pub fn from_slice(bytes: &[u8]) -> Result<Self, uuid::Error> {
        Uuid::from_slice(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 红线: quantity <= alert_threshold 即为低库存（含相等）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,  // 库存充足
    LowStock, // 低库存预警
}

impl StockStatus {
    pub fn from_levels(quantity: i64, alert_threshold: i64) -> Self {
        if quantity <= alert_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// 导出表格/JSON 中使用的状态文案
    pub fn label(&self, locale: &str) -> String {
        match self {
            StockStatus::InStock => t_in(locale, "status.in_stock"),
            StockStatus::LowStock => t_in(locale, "status.low_stock"),
        }
    }

    /// 文本报表中使用的状态文案（OK / ALERTE）
    pub fn report_label(&self, locale: &str) -> String {
        match self {
            StockStatus::InStock => t_in(locale, "status.report_ok"),
            StockStatus::LowStock => t_in(locale, "status.report_alert"),
        }
    }
}

// ==========================================
// 商品字段 (Product Field)
// ==========================================
// 校验违规时用于定位字段；as_str 与外部 JSON 字段名一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Category,
    Quantity,
    UnitPrice,
    AlertThreshold,
}

impl ProductField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductField::Name => "nom",
            ProductField::Category => "categorie",
            ProductField::Quantity => "quantite",
            ProductField::UnitPrice => "prixUnitaire",
            ProductField::AlertThreshold => "seuilAlerte",
        }
    }

    /// 违规提示的 i18n key
    pub fn violation_key(&self) -> &'static str {
        match self {
            ProductField::Name => "validation.name_required",
            ProductField::Category => "validation.category_required",
            ProductField::Quantity => "validation.quantity_invalid",
            ProductField::UnitPrice => "validation.unit_price_invalid",
            ProductField::AlertThreshold => "validation.alert_threshold_invalid",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 导入载荷格式 (Payload Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    Csv,
    Json,
}

impl PayloadFormat {
    /// 按文件扩展名识别（大小写不敏感），无法识别返回 None
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(PayloadFormat::Csv),
            "json" => Some(PayloadFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::Csv => write!(f, "csv"),
            PayloadFormat::Json => write!(f, "json"),
        }
    }
}

// ==========================================
// 导出格式 (Export Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,    // 表格
    Json,   // 结构化文档
    Report, // 可读文本报表
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Report => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Report => "text/plain;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Report => write!(f, "report"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "report" | "txt" => Ok(ExportFormat::Report),
            other => Err(format!("未知导出格式: {}", other)),
        }
    }
}

// ==========================================
// 导出范围 (Export Scope)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// 全部库存
    #[default]
    Full,
    /// 当前视图（按搜索词过滤）
    Filtered { search_term: Option<String> },
}

impl ExportScope {
    /// 有搜索词（去空白后非空）则为过滤视图，否则为全部库存
    pub fn from_search(search_term: Option<String>) -> Self {
        match search_term.map(|s| s.trim().to_string()) {
            Some(term) if !term.is_empty() => ExportScope::Filtered {
                search_term: Some(term),
            },
            _ => ExportScope::Full,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        match self {
            ExportScope::Full => None,
            ExportScope::Filtered { search_term } => search_term
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, ExportScope::Filtered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_round_trip() {
        let id = ProductId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(ProductId::parse(&text).unwrap(), id);
        assert_eq!(ProductId::from_slice(id.as_bytes()).unwrap(), id);
    }

    #[test]
    fn test_product_id_rejects_malformed() {
        assert!(ProductId::parse("not-an-id").is_err());
        assert!(ProductId::parse("").is_err());
        assert!(ProductId::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_stock_status_boundary() {
        assert_eq!(StockStatus::from_levels(10, 10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_levels(3, 10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_levels(11, 10), StockStatus::InStock);
        assert_eq!(StockStatus::from_levels(0, 0), StockStatus::LowStock);
    }

    #[test]
    fn test_payload_format_from_extension() {
        assert_eq!(PayloadFormat::from_extension("CSV"), Some(PayloadFormat::Csv));
        assert_eq!(PayloadFormat::from_extension("json"), Some(PayloadFormat::Json));
        assert_eq!(PayloadFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn test_export_scope_from_search() {
        assert_eq!(ExportScope::from_search(None), ExportScope::Full);
        assert_eq!(ExportScope::from_search(Some("  ".to_string())), ExportScope::Full);

        let scope = ExportScope::from_search(Some(" Dell ".to_string()));
        assert!(scope.is_filtered());
        assert_eq!(scope.search_term(), Some("Dell"));

        let scope = ExportScope::Filtered { search_term: None };
        assert!(scope.is_filtered());
        assert_eq!(scope.search_term(), None);
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("report".parse::<ExportFormat>().unwrap(), ExportFormat::Report);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
