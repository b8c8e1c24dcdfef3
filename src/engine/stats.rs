// ==========================================
// 库存管理核心 - 库存统计引擎
// ==========================================
// 职责: 由商品集合计算 ProductStats
// 输入: 任意实现 StockLine 的商品集合
// 输出: 总数 / 总价值 / 低库存数 / 分类汇总
// ==========================================

use crate::domain::product::{CategoryStats, ProductStats, StockLine};
use std::collections::HashMap;

// ==========================================
// StatsEngine - 库存统计引擎
// ==========================================
// 红线: 无状态引擎，结果只取决于输入顺序与内容
// 分类汇总按首次出现顺序输出
#[derive(Debug, Default)]
pub struct StatsEngine;

impl StatsEngine {
    /// 创建新的统计引擎
    pub fn new() -> Self {
        Self
    }

    /// 计算库存统计
    ///
    /// # 参数
    /// - `products`: 商品集合
    ///
    /// # 返回
    /// ProductStats（空集合返回全零）
    pub fn compute<P: StockLine>(&self, products: &[P]) -> ProductStats {
        let mut categories: Vec<CategoryStats> = Vec::new();
        let mut slot_by_name: HashMap<&str, usize> = HashMap::new();
        let mut total_stock_value = 0.0;
        let mut low_stock_count = 0usize;

        // 单次遍历: 总价值 + 分类分组 + 低库存计数
        for product in products {
            let value = product.total_value();
            total_stock_value += value;

            if product.is_low_stock() {
                low_stock_count += 1;
            }

            let slot = *slot_by_name.entry(product.category()).or_insert_with(|| {
                categories.push(CategoryStats {
                    category: product.category().to_string(),
                    count: 0,
                    total_value: 0.0,
                });
                categories.len() - 1
            });
            categories[slot].count += 1;
            categories[slot].total_value += value;
        }

        ProductStats {
            total_products: products.len(),
            total_stock_value,
            category_count: categories.len(),
            low_stock_count,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::NewProduct;

    fn create_test_record(name: &str, category: &str, q: i64, price: f64, threshold: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            quantity: q,
            unit_price: price,
            alert_threshold: threshold,
            image: None,
            metadata: None,
        }
    }

    #[test]
    fn test_two_products_one_category() {
        let products = vec![
            create_test_record("A", "X", 5, 10.0, 10),
            create_test_record("B", "X", 20, 2.0, 5),
        ];

        let stats = StatsEngine::new().compute(&products);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_stock_value, 90.0);
        assert_eq!(stats.category_count, 1);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(
            stats.categories,
            vec![CategoryStats {
                category: "X".to_string(),
                count: 2,
                total_value: 90.0,
            }]
        );
    }

    #[test]
    fn test_empty_collection() {
        let stats = StatsEngine::new().compute::<NewProduct>(&[]);
        assert_eq!(stats, ProductStats::default());
    }

    #[test]
    fn test_first_seen_order_and_totals_agree() {
        let products = vec![
            create_test_record("Stylo", "Fournitures", 100, 0.8, 20),
            create_test_record("Écran", "Électronique", 3, 149.99, 5),
            create_test_record("Cahier", "Fournitures", 40, 1.25, 10),
            create_test_record("Câble", "électronique", 0, 4.5, 0),
        ];

        let stats = StatsEngine::new().compute(&products);
        let names: Vec<_> = stats.categories.iter().map(|c| c.category.as_str()).collect();
        // 分类名区分大小写
        assert_eq!(names, vec!["Fournitures", "Électronique", "électronique"]);

        let count_sum: usize = stats.categories.iter().map(|c| c.count).sum();
        let value_sum: f64 = stats.categories.iter().map(|c| c.total_value).sum();
        assert_eq!(count_sum, stats.total_products);
        assert!((value_sum - stats.total_stock_value).abs() < 1e-9);
        assert_eq!(stats.low_stock_count, 2);
    }
}
