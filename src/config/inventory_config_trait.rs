// ==========================================
// 库存管理核心 - 配置读取 Trait
// ==========================================
// 职责: 定义导入/导出所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::exporter::ExportSettings;
use crate::importer::ImportSettings;
use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// InventoryConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait InventoryConfigReader: Send + Sync {
    // ===== 导入配置 =====

    /// 导入预览条数
    ///
    /// # 默认值
    /// - 5
    async fn get_preview_limit(&self) -> ConfigResult<usize>;

    /// CSV 数据行最少列数
    ///
    /// # 默认值
    /// - 6
    async fn get_csv_min_columns(&self) -> ConfigResult<usize>;

    // ===== 导出配置 =====

    /// 金额币种
    ///
    /// # 默认值
    /// - MAD
    async fn get_currency(&self) -> ConfigResult<String>;

    /// 消息与报表语言（fr / en）
    ///
    /// # 默认值
    /// - fr
    async fn get_locale(&self) -> ConfigResult<String>;

    // ===== 组合读取 =====

    async fn load_import_settings(&self) -> ConfigResult<ImportSettings> {
        Ok(ImportSettings {
            preview_limit: self.get_preview_limit().await?,
            csv_min_columns: self.get_csv_min_columns().await?,
            locale: self.get_locale().await?,
        })
    }

    async fn load_export_settings(&self) -> ConfigResult<ExportSettings> {
        Ok(ExportSettings {
            currency: self.get_currency().await?,
            locale: self.get_locale().await?,
        })
    }
}
