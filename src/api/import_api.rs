// ==========================================
// 库存管理核心 - 导入 API
// ==========================================
// 职责: 两段式导入
// 1. validate_*: 解析 + 校验 + 去重，只生成 ImportResult（不落库）
// 2. confirm_import: 将 ImportResult 中的全部合格商品一次性写入
// 去重参照: 调用时刻存储中的全部商品
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::import::ImportResult;
use crate::domain::product::Product;
use crate::domain::types::PayloadFormat;
use crate::importer::{ImportPayload, ProductImporter};
use crate::repository::{ProductFilter, ProductRepository};

// ==========================================
// ImportApi - 导入 API
// ==========================================
pub struct ImportApi {
    importer: Arc<dyn ProductImporter>,
    product_repo: Arc<dyn ProductRepository>,
}

impl ImportApi {
    pub fn new(importer: Arc<dyn ProductImporter>, product_repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            importer,
            product_repo,
        }
    }

    async fn existing_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.find_matching(&ProductFilter::all()).await?)
    }

    /// 校验文本载荷（CSV 文本或粘贴的 JSON）
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn validate_payload(
        &self,
        format: PayloadFormat,
        content: String,
    ) -> ApiResult<ImportResult> {
        let existing = self.existing_products().await?;
        let payload = ImportPayload::new(format, content);
        Ok(self.importer.import_payload(&payload, &existing))
    }

    /// 校验单个文件
    ///
    /// # 返回
    /// - Ok(ImportResult): 含不支持格式的整体拒绝结果
    /// - Err(ApiError::ImportError): 文件不存在或不可读
    #[instrument(skip(self), fields(file = %path.display()))]
    pub async fn validate_file(&self, path: &Path) -> ApiResult<ImportResult> {
        let existing = self.existing_products().await?;
        Ok(self.importer.import_file(path, &existing).await?)
    }

    /// 并发读取多个文件，结果与输入顺序一致
    ///
    /// 同一批次内跨文件去重：同名商品只在首个文件的结果中被接受，
    /// 因此逐个确认这些结果不会写入大小写不同的重名商品
    pub async fn validate_files(&self, paths: &[PathBuf]) -> ApiResult<Vec<ApiResult<ImportResult>>> {
        let existing = self.existing_products().await?;
        let results = self.importer.import_files(paths, &existing).await;
        Ok(results
            .into_iter()
            .map(|r| r.map_err(ApiError::from))
            .collect())
    }

    /// 确认导入: 单事务写入全部合格商品
    ///
    /// # 返回
    /// - Ok: 按导入顺序返回已创建商品；无合格商品时返回空列表
    /// - Err(ApiError::InvalidInput): 结果不含完整的合格集合（例如经序列化后重建）
    #[instrument(skip(self, result), fields(imported = result.imported))]
    pub async fn confirm_import(&self, result: ImportResult) -> ApiResult<Vec<Product>> {
        if !result.is_complete() {
            warn!(
                imported = result.imported,
                carried = result.accepted().len(),
                "导入结果缺少合格商品集合，拒绝确认"
            );
            return Err(ApiError::InvalidInput(format!(
                "导入结果不完整: 声明 {} 条合格商品，实际携带 {} 条，请重新校验",
                result.imported,
                result.accepted().len()
            )));
        }

        let accepted = result.into_accepted();
        if accepted.is_empty() {
            return Ok(Vec::new());
        }

        let created = self.product_repo.insert_many(accepted).await?;
        info!(count = created.len(), "导入商品已入库");
        Ok(created)
    }
}
