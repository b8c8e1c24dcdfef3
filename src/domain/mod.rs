// ==========================================
// 库存管理核心 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含导入/导出逻辑
// ==========================================

pub mod import;
pub mod product;
pub mod types;

// 重导出核心类型
pub use import::{FieldViolation, ImportResult, ValidationOutcome};
pub use product::{
    CategoryStats, NewProduct, Product, ProductMetadata, ProductPatch, ProductStats, StockLine,
};
pub use types::{
    ExportFormat, ExportScope, PayloadFormat, ProductField, ProductId, StockStatus,
};
