// ==========================================
// 库存管理核心 - 商品 API
// ==========================================
// 职责: 商品查询、增删改、统计与分类列表
// 约束: 写入前统一走 RecordValidator + DataCleaner，与导入管道同一套规则
// ==========================================

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::{NewProduct, Product, ProductPatch, ProductStats};
use crate::domain::types::ProductId;
use crate::engine::StatsEngine;
use crate::importer::{DataCleaner, RecordPosition, RecordValidator};
use crate::repository::{ProductFilter, ProductRepository, UpdateOutcome};

// ==========================================
// ProductApi - 商品 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<dyn ProductRepository>,
    validator: Arc<dyn RecordValidator>,
    cleaner: Arc<dyn DataCleaner>,
    stats_engine: StatsEngine,
    locale: String,
}

impl ProductApi {
    /// 创建新的 ProductApi 实例
    ///
    /// # 参数
    /// - product_repo: 商品仓储
    /// - validator: 字段校验器
    /// - cleaner: 数据清洗器
    /// - locale: 错误文案语言
    pub fn new(
        product_repo: Arc<dyn ProductRepository>,
        validator: Arc<dyn RecordValidator>,
        cleaner: Arc<dyn DataCleaner>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            product_repo,
            validator,
            cleaner,
            stats_engine: StatsEngine::new(),
            locale: locale.into(),
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 列出商品（最新创建在前）
    ///
    /// # 参数
    /// - search: 名称或分类包含的搜索词（可选）
    pub async fn list(&self, search: Option<String>) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.find_matching(&ProductFilter { search }).await?)
    }

    /// 按标识查询
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 标识格式错误
    /// - Err(ApiError::NotFound): 商品不存在
    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        let id = parse_id(id)?;
        self.product_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| not_found(&id))
    }

    /// 库存统计
    ///
    /// 无搜索词时由存储端聚合；有搜索词时对当前视图计算
    pub async fn stats(&self, search: Option<String>) -> ApiResult<ProductStats> {
        let filter = ProductFilter { search };
        if filter.normalized_term().is_none() {
            return Ok(self.product_repo.aggregate_stats().await?);
        }
        let products = self.product_repo.find_matching(&filter).await?;
        Ok(self.stats_engine.compute(&products))
    }

    /// 分类列表（升序去重）
    pub async fn categories(&self) -> ApiResult<Vec<String>> {
        Ok(self.product_repo.distinct_categories().await?)
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 新建商品
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: NewProduct) -> ApiResult<Product> {
        let product = self.check(product).map_err(ApiError::ValidationError)?;
        let created = self.product_repo.insert_one(product).await?;
        info!(id = %created.id, "商品已创建");
        Ok(created)
    }

    /// 批量新建（任一条不合格则整批拒绝）
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn bulk_create(&self, products: Vec<NewProduct>) -> ApiResult<Vec<Product>> {
        let mut accepted = Vec::with_capacity(products.len());
        let mut errors = Vec::new();

        for (idx, product) in products.into_iter().enumerate() {
            match self.check(product) {
                Ok(product) => accepted.push(product),
                Err(messages) => errors.push(format!(
                    "{}: {}",
                    RecordPosition::Item(idx + 1).label(&self.locale),
                    messages.join(", ")
                )),
            }
        }

        if !errors.is_empty() {
            warn!(invalid = errors.len(), "批量新建被拒绝");
            return Err(ApiError::ValidationError(errors));
        }

        let created = self.product_repo.insert_many(accepted).await?;
        info!(count = created.len(), "批量新建完成");
        Ok(created)
    }

    /// 局部更新（给出的字段须满足同样的字段规则）
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: ProductPatch) -> ApiResult<Product> {
        let id = parse_id(id)?;
        let guard = |merged: &Product| self.check(to_new_product(merged.clone())).map(|_| ());

        match self.product_repo.update_checked(&id, patch, &guard).await? {
            UpdateOutcome::Updated(updated) => {
                debug!(id = %updated.id, "商品已更新");
                Ok(updated)
            }
            UpdateOutcome::NotFound => Err(not_found(&id)),
            UpdateOutcome::Rejected(violations) => Err(ApiError::ValidationError(violations)),
        }
    }

    /// 删除商品
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let id = parse_id(id)?;
        if !self.product_repo.delete_by_id(&id).await? {
            return Err(not_found(&id));
        }
        info!(id = %id, "商品已删除");
        Ok(())
    }

    /// 校验 + 清洗；失败时返回全部违规文案
    fn check(&self, product: NewProduct) -> Result<NewProduct, Vec<String>> {
        let record = serde_json::to_value(&product).unwrap_or(Value::Null);
        match self.validator.validate(&record).into_result() {
            Ok(valid) => Ok(self.cleaner.clean_product(valid)),
            Err(violations) => Err(violations.into_iter().map(|v| v.message).collect()),
        }
    }
}

fn parse_id(raw: &str) -> ApiResult<ProductId> {
    ProductId::parse(raw).map_err(|e| ApiError::InvalidInput(format!("无效的商品标识 {}: {}", raw, e)))
}

fn not_found(id: &ProductId) -> ApiError {
    ApiError::NotFound(format!("Product(id={})不存在", id))
}

fn to_new_product(product: Product) -> NewProduct {
    NewProduct {
        name: product.name,
        category: product.category,
        quantity: product.quantity,
        unit_price: product.unit_price,
        alert_threshold: product.alert_threshold,
        image: product.image,
        metadata: product.metadata,
    }
}
