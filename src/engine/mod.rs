// ==========================================
// 库存管理核心 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// ==========================================

pub mod stats;

// 重导出核心引擎
pub use stats::StatsEngine;
