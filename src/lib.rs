// ==========================================
// 库存管理核心 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 仓库商品台账（批量导入 / 统计 / 导出）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 统计
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - CSV / JSON / 报表
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ExportFormat, ExportScope, PayloadFormat, ProductId, StockStatus};

// 领域实体
pub use domain::{
    CategoryStats, ImportResult, NewProduct, Product, ProductMetadata, ProductPatch, ProductStats,
};

// 引擎
pub use engine::StatsEngine;

// API
pub use api::{ExportApi, ImportApi, ProductApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "depot-inventory";
