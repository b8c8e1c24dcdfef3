// ==========================================
// 库存管理核心 - 应用层
// ==========================================
// 职责: 组装各层组件，供命令行入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
