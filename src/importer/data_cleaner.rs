// ==========================================
// 库存管理核心 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 附加信息归一
// ==========================================

use crate::domain::product::NewProduct;
use crate::importer::product_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn clean_product(&self, product: NewProduct) -> NewProduct {
        NewProduct {
            name: self.clean_text(&product.name),
            category: self.clean_text(&product.category),
            image: self.normalize_null(product.image),
            metadata: product.metadata.and_then(|m| m.normalized()),
            ..product
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductMetadata;

    #[test]
    fn test_clean_product() {
        let cleaner = DataCleaner;
        let product = NewProduct {
            name: "  Clavier AZERTY ".to_string(),
            category: "\tPériphériques".to_string(),
            quantity: 4,
            unit_price: 29.9,
            alert_threshold: 5,
            image: Some("   ".to_string()),
            metadata: Some(ProductMetadata {
                supplier: Some(" ".to_string()),
                ..Default::default()
            }),
        };

        let cleaned = cleaner.clean_product(product);
        assert_eq!(cleaned.name, "Clavier AZERTY");
        assert_eq!(cleaned.category, "Périphériques");
        assert_eq!(cleaned.image, None);
        assert_eq!(cleaned.metadata, None);
        assert_eq!(cleaned.quantity, 4);
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ".to_string())), None);
        assert_eq!(cleaner.normalize_null(None), None);
        assert_eq!(
            cleaner.normalize_null(Some(" img.png ".to_string())),
            Some("img.png".to_string())
        );
    }
}
