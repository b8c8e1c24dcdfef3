// ==========================================
// 库存管理核心 - 应用状态
// ==========================================
// 职责: 组装共享连接、仓储、配置与 API 实例
// 约束: 进程内只打开一个 SQLite 连接，各组件通过 Arc<Mutex<Connection>> 共享
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, ExportApi, ImportApi, ProductApi};
use crate::config::{ConfigManager, InventoryConfigReader};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::importer::{DataCleanerImpl, ProductImporterImpl, ProductValidator};
use crate::repository::{ProductRepository, ProductRepositoryImpl};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "DEPOT_INVENTORY_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 商品API
    pub product_api: Arc<ProductApi>,

    /// 导入API
    pub import_api: Arc<ImportApi>,

    /// 导出API
    pub export_api: Arc<ExportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 消息语言
    pub locale: String,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开共享连接并确保 schema
    /// 2. 从 config_kv 读取导入/导出参数
    /// 3. 创建 API 实例
    pub async fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseError(format!("无法打开数据库: {}", e)))?;
        ensure_schema(&conn)
            .map_err(|e| ApiError::DatabaseError(format!("schema 初始化失败: {}", e)))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| ApiError::InternalError(format!("无法创建ConfigManager: {}", e)))?,
        );
        let import_settings = config_manager
            .load_import_settings()
            .await
            .map_err(|e| ApiError::InternalError(format!("导入配置读取失败: {}", e)))?;
        let export_settings = config_manager
            .load_export_settings()
            .await
            .map_err(|e| ApiError::InternalError(format!("导出配置读取失败: {}", e)))?;
        let locale = export_settings.locale.clone();

        // ==========================================
        // Repository / Importer
        // ==========================================
        let product_repo: Arc<dyn ProductRepository> =
            Arc::new(ProductRepositoryImpl::from_connection(conn));
        let importer = Arc::new(ProductImporterImpl::with_settings(&import_settings));

        // ==========================================
        // API
        // ==========================================
        let product_api = Arc::new(ProductApi::new(
            product_repo.clone(),
            Arc::new(ProductValidator::new(locale.clone())),
            Arc::new(DataCleanerImpl),
            locale.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(importer, product_repo.clone()));
        let export_api = Arc::new(ExportApi::new(product_repo, export_settings));

        tracing::info!(locale = %locale, "AppState 初始化完成");

        Ok(Self {
            db_path,
            product_api,
            import_api,
            export_api,
            config_manager,
            locale,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./depot_inventory.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("depot-inventory");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("depot_inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}
