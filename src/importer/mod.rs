// ==========================================
// 库存管理核心 - 导入层
// ==========================================
// 职责: 外部数据导入，生成待入库商品
// 支持: CSV, JSON
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod deduplicator;
pub mod error;
pub mod file_parser;
pub mod product_importer_impl;
pub mod product_importer_trait;
pub mod validator;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use deduplicator::{Deduplicator, NameIndex};
pub use error::ImportError;
pub use file_parser::{
    CsvParser, JsonParser, ParsedRecord, PayloadRejection, RecordPosition, RowIssue,
    DEFAULT_CSV_MIN_COLUMNS,
};
pub use product_importer_impl::{ImportSettings, ProductImporterImpl, DEFAULT_PREVIEW_LIMIT};
pub use validator::ProductValidator;

// 重导出 Trait 接口
pub use product_importer_trait::{
    DataCleaner, DuplicateChecker, ImportPayload, PayloadParser, ProductImporter, RecordValidator,
};
