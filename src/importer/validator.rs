// ==========================================
// 库存管理核心 - 商品校验器实现
// ==========================================
// 规则（按顺序收集，不短路）:
// 1. nom: 字符串且去空白后非空
// 2. categorie: 字符串且去空白后非空
// 3. quantite: 整数且 >= 0
// 4. prixUnitaire: 有限数值且 > 0
// 5. seuilAlerte: 整数且 >= 0
// ==========================================

use serde_json::Value;

use crate::domain::import::{FieldViolation, ValidationOutcome};
use crate::domain::product::{NewProduct, ProductMetadata};
use crate::domain::types::ProductField;
use crate::i18n::{t_in, DEFAULT_LOCALE};
use crate::importer::product_importer_trait::RecordValidator;

pub struct ProductValidator {
    locale: String,
}

impl ProductValidator {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    fn violation(&self, field: ProductField) -> FieldViolation {
        FieldViolation {
            field,
            message: t_in(&self.locale, field.violation_key()),
        }
    }
}

impl Default for ProductValidator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl RecordValidator for ProductValidator {
    fn validate(&self, record: &Value) -> ValidationOutcome {
        let mut violations = Vec::new();

        let name = required_text(record, ProductField::Name);
        if name.is_none() {
            violations.push(self.violation(ProductField::Name));
        }

        let category = required_text(record, ProductField::Category);
        if category.is_none() {
            violations.push(self.violation(ProductField::Category));
        }

        let quantity = non_negative_integer(record, ProductField::Quantity);
        if quantity.is_none() {
            violations.push(self.violation(ProductField::Quantity));
        }

        let unit_price = number(record, ProductField::UnitPrice).filter(|p| *p > 0.0);
        if unit_price.is_none() {
            violations.push(self.violation(ProductField::UnitPrice));
        }

        let alert_threshold = non_negative_integer(record, ProductField::AlertThreshold);
        if alert_threshold.is_none() {
            violations.push(self.violation(ProductField::AlertThreshold));
        }

        match (name, category, quantity, unit_price, alert_threshold) {
            (Some(name), Some(category), Some(quantity), Some(unit_price), Some(alert_threshold))
                if violations.is_empty() =>
            {
                ValidationOutcome::valid(NewProduct {
                    name: name.to_string(),
                    category: category.to_string(),
                    quantity,
                    unit_price,
                    alert_threshold,
                    image: record.get("image").and_then(Value::as_str).map(str::to_string),
                    metadata: metadata(record),
                })
            }
            _ => ValidationOutcome::invalid(violations),
        }
    }
}

fn required_text(record: &Value, field: ProductField) -> Option<&str> {
    record
        .get(field.as_str())
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn number(record: &Value, field: ProductField) -> Option<f64> {
    record
        .get(field.as_str())
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
}

/// 整数（含 12.0 这类整值浮点）且 >= 0
fn non_negative_integer(record: &Value, field: ProductField) -> Option<i64> {
    let value = record.get(field.as_str())?;
    if let Some(i) = value.as_i64() {
        return (i >= 0).then_some(i);
    }
    if let Some(u) = value.as_u64() {
        return i64::try_from(u).ok();
    }
    let f = value.as_f64()?;
    // i64::MAX as f64 即 2^63，已超出 i64 范围
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// 只保留识别的四个附加属性（字符串）
fn metadata(record: &Value) -> Option<ProductMetadata> {
    let obj = record.get("metadata")?.as_object()?;
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
    let meta = ProductMetadata {
        supplier: text("fournisseur"),
        reference: text("reference"),
        description: text("description"),
        location: text("emplacement"),
    };
    (!meta.is_empty()).then_some(meta)
}
