// ==========================================
// 库存管理核心 - 商品 Repository Trait
// ==========================================
// 职责: 定义商品存储的数据访问接口
// 红线: Repository 不含业务规则，校验与去重由导入层完成
// ==========================================

use crate::domain::product::{NewProduct, Product, ProductPatch, ProductStats};
use crate::domain::types::ProductId;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 更新前置检查：对合并后的商品返回 Err(违规文案) 时放弃写入
pub type UpdateGuard<'a> = &'a (dyn Fn(&Product) -> Result<(), Vec<String>> + Send + Sync);

/// 带检查的更新结果
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Product),
    NotFound,
    Rejected(Vec<String>),
}

fn accept_any(_: &Product) -> Result<(), Vec<String>> {
    Ok(())
}

// ==========================================
// ProductFilter - 列表查询条件
// ==========================================
/// 名称或分类包含搜索词（不区分大小写，按字面匹配）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    /// 归一化后的搜索词（去空白、小写；空串视为无条件）
    pub fn normalized_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self.normalized_term() {
            None => true,
            Some(term) => {
                product.name.to_lowercase().contains(&term)
                    || product.category.to_lowercase().contains(&term)
            }
        }
    }
}

// ==========================================
// ProductRepository Trait
// ==========================================
// 实现者: ProductRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ProductRepository: Send + Sync {
    // ===== 查询 =====

    /// 按条件列出商品
    ///
    /// # 返回
    /// 按创建时间倒序（最新在前），同一时间按插入顺序倒序
    async fn find_matching(&self, filter: &ProductFilter) -> RepositoryResult<Vec<Product>>;

    /// 按标识查询
    ///
    /// # 返回
    /// - Ok(Some(Product)): 找到
    /// - Ok(None): 不存在
    async fn find_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>>;

    // ===== 写入 =====

    /// 插入单个商品（创建/修改时间取当前时间）
    async fn insert_one(&self, product: NewProduct) -> RepositoryResult<Product>;

    /// 批量插入（单事务，全部成功或全部回滚）
    ///
    /// # 返回
    /// 按输入顺序返回已创建的商品
    async fn insert_many(&self, products: Vec<NewProduct>) -> RepositoryResult<Vec<Product>>;

    /// 局部更新
    ///
    /// # 返回
    /// - Ok(Some(Product)): 更新后的商品（修改时间已刷新）
    /// - Ok(None): 不存在
    async fn update_by_id(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> RepositoryResult<Option<Product>> {
        match self.update_checked(id, patch, &accept_any).await? {
            UpdateOutcome::Updated(product) => Ok(Some(product)),
            UpdateOutcome::NotFound | UpdateOutcome::Rejected(_) => Ok(None),
        }
    }

    /// 局部更新，读取、合并、检查、写入在同一次加锁内完成
    ///
    /// # 参数
    /// - guard: 对合并后的商品做检查（规则由调用方提供）
    ///
    /// # 返回
    /// - Updated: 已写入
    /// - NotFound: 不存在
    /// - Rejected: guard 拒绝，未写入
    async fn update_checked(
        &self,
        id: &ProductId,
        patch: ProductPatch,
        guard: UpdateGuard<'_>,
    ) -> RepositoryResult<UpdateOutcome>;

    /// 物理删除
    ///
    /// # 返回
    /// 是否删除了记录
    async fn delete_by_id(&self, id: &ProductId) -> RepositoryResult<bool>;

    // ===== 聚合 =====

    /// 存储端聚合统计（分类按首次插入顺序）
    async fn aggregate_stats(&self) -> RepositoryResult<ProductStats>;

    /// 去重后的分类列表（升序）
    async fn distinct_categories(&self) -> RepositoryResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_product(name: &str, category: &str) -> Product {
        Product::from_new(
            NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                quantity: 1,
                unit_price: 1.0,
                alert_threshold: 0,
                image: None,
                metadata: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_filter_matches_name_or_category() {
        let p = create_test_product("Dell XPS 13", "Électronique");
        assert!(ProductFilter::all().matches(&p));
        assert!(ProductFilter::search("xps").matches(&p));
        assert!(ProductFilter::search("ÉLEC").matches(&p));
        assert!(!ProductFilter::search("bureau").matches(&p));
    }

    #[test]
    fn test_filter_is_literal() {
        let p = create_test_product("Câble (USB-C)", "Accessoires");
        assert!(ProductFilter::search("(usb").matches(&p));
        assert!(!ProductFilter::search(".*").matches(&p));
        assert!(ProductFilter::search("   ").matches(&p));
    }
}
