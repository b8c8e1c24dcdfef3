// ==========================================
// 库存管理核心 - 配置层
// ==========================================
// 职责: 导入/导出参数管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod inventory_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use inventory_config_trait::{ConfigResult, InventoryConfigReader};
