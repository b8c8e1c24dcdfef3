// ==========================================
// 库存管理核心 - 导出 API
// ==========================================
// 职责: 取全部库存或当前视图（搜索词），渲染为 CSV / JSON / 文本报表
// 红线: 只返回 ExportPayload，不写盘
// ==========================================

use std::sync::Arc;

use tracing::instrument;

use crate::api::error::ApiResult;
use crate::domain::types::{ExportFormat, ExportScope};
use crate::exporter::{render_export, ExportContext, ExportPayload, ExportSettings};
use crate::repository::{ProductFilter, ProductRepository};

pub struct ExportApi {
    product_repo: Arc<dyn ProductRepository>,
    settings: ExportSettings,
}

impl ExportApi {
    pub fn new(product_repo: Arc<dyn ProductRepository>, settings: ExportSettings) -> Self {
        Self {
            product_repo,
            settings,
        }
    }

    /// 导出
    ///
    /// # 参数
    /// - format: 导出格式
    /// - search: 搜索词；None 或空白表示全部库存
    #[instrument(skip(self))]
    pub async fn export(
        &self,
        format: ExportFormat,
        search: Option<String>,
    ) -> ApiResult<ExportPayload> {
        let scope = ExportScope::from_search(search);
        let filter = ProductFilter {
            search: scope.search_term().map(str::to_string),
        };
        let products = self.product_repo.find_matching(&filter).await?;

        let ctx = ExportContext::new(scope, &self.settings);
        Ok(render_export(format, &products, &ctx)?)
    }
}
