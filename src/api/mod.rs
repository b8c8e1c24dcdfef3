// ==========================================
// 库存管理核心 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行与上层调用
// ==========================================

pub mod error;
pub mod export_api;
pub mod import_api;
pub mod product_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export_api::ExportApi;
pub use import_api::ImportApi;
pub use product_api::ProductApi;
