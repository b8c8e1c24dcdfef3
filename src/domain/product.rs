// ==========================================
// 库存管理核心 - 商品实体
// ==========================================
// 职责: 商品主数据、待入库商品、局部更新、统计结果
// 序列化: 外部字段名沿用法语命名 (nom / categorie / quantite ...)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{ProductId, StockStatus};

// ==========================================
// ProductMetadata - 附加信息
// ==========================================
// 仅保留识别的四个属性；全部为空时整体视为缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(rename = "fournisseur", default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "emplacement", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProductMetadata {
    pub fn is_empty(&self) -> bool {
        self.supplier.is_none()
            && self.reference.is_none()
            && self.description.is_none()
            && self.location.is_none()
    }

    /// 去除首尾空白，空字符串视为缺失；全部缺失时返回 None
    pub fn normalized(self) -> Option<Self> {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        let meta = ProductMetadata {
            supplier: clean(self.supplier),
            reference: clean(self.reference),
            description: clean(self.description),
            location: clean(self.location),
        };
        if meta.is_empty() {
            None
        } else {
            Some(meta)
        }
    }
}

// ==========================================
// StockLine - 库存行为接口
// ==========================================
// Product 与 NewProduct 共享的派生计算
pub trait StockLine {
    fn name(&self) -> &str;
    fn category(&self) -> &str;
    fn quantity(&self) -> i64;
    fn unit_price(&self) -> f64;
    fn alert_threshold(&self) -> i64;

    /// 库存价值 = 数量 × 单价
    fn total_value(&self) -> f64 {
        self.quantity() as f64 * self.unit_price()
    }

    fn is_low_stock(&self) -> bool {
        self.stock_status() == StockStatus::LowStock
    }

    fn stock_status(&self) -> StockStatus {
        StockStatus::from_levels(self.quantity(), self.alert_threshold())
    }
}

// ==========================================
// Product - 已入库商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    // ===== 基础信息 =====
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    // ===== 库存数据 =====
    #[serde(rename = "quantite")]
    pub quantity: i64,
    #[serde(rename = "prixUnitaire")]
    pub unit_price: f64,
    #[serde(rename = "seuilAlerte")]
    pub alert_threshold: i64,

    // ===== 时间戳 =====
    #[serde(rename = "dateCreation")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "dateModification")]
    pub updated_at: DateTime<Utc>,

    // ===== 附加信息 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,
}

impl Product {
    /// 由待入库商品生成实体（分配标识与时间戳）
    pub fn from_new(new: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::generate(),
            name: new.name,
            category: new.category,
            image: new.image,
            quantity: new.quantity,
            unit_price: new.unit_price,
            alert_threshold: new.alert_threshold,
            created_at: now,
            updated_at: now,
            metadata: new.metadata,
        }
    }

    pub fn metadata_field(&self, pick: fn(&ProductMetadata) -> &Option<String>) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| pick(m).as_deref())
    }
}

impl StockLine for Product {
    fn name(&self) -> &str {
        &self.name
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn quantity(&self) -> i64 {
        self.quantity
    }
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
    fn alert_threshold(&self) -> i64 {
        self.alert_threshold
    }
}

// ==========================================
// NewProduct - 通过校验、等待入库的商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(rename = "quantite")]
    pub quantity: i64,
    #[serde(rename = "prixUnitaire")]
    pub unit_price: f64,
    #[serde(rename = "seuilAlerte")]
    pub alert_threshold: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,
}

impl StockLine for NewProduct {
    fn name(&self) -> &str {
        &self.name
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn quantity(&self) -> i64 {
        self.quantity
    }
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
    fn alert_threshold(&self) -> i64 {
        self.alert_threshold
    }
}

// ==========================================
// ProductPatch - 局部更新
// ==========================================
// 仅覆盖给出的字段；标识与时间戳不可由调用方修改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "categorie", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "quantite", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(rename = "prixUnitaire", default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(rename = "seuilAlerte", default, skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &ProductPatch::default()
    }

    /// 将补丁应用到商品（不修改时间戳）
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(category) = &self.category {
            product.category = category.trim().to_string();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            product.unit_price = unit_price;
        }
        if let Some(alert_threshold) = self.alert_threshold {
            product.alert_threshold = alert_threshold;
        }
        if let Some(image) = &self.image {
            let image = image.trim();
            product.image = if image.is_empty() {
                None
            } else {
                Some(image.to_string())
            };
        }
        if let Some(metadata) = &self.metadata {
            product.metadata = metadata.clone().normalized();
        }
    }
}

// ==========================================
// ProductStats - 库存统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    #[serde(rename = "totalProduits")]
    pub total_products: usize,
    #[serde(rename = "valeurTotaleStock")]
    pub total_stock_value: f64,
    #[serde(rename = "nombreCategories")]
    pub category_count: usize,
    #[serde(rename = "produitsEnAlerte")]
    pub low_stock_count: usize,
    #[serde(rename = "categoriesStats")]
    pub categories: Vec<CategoryStats>,
}

/// 单个分类的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(rename = "categorie")]
    pub category: String,
    pub count: usize,
    #[serde(rename = "valeurTotale")]
    pub total_value: f64,
}
