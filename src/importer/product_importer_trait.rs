// ==========================================
// 库存管理核心 - 商品导入 Trait
// ==========================================
// 职责: 定义商品导入接口（不包含实现）
// 流水线: 解析 → 校验 → 清洗 → 去重 → 汇总
// ==========================================

use crate::domain::import::{ImportResult, ValidationOutcome};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::PayloadFormat;
use crate::importer::deduplicator::NameIndex;
use crate::importer::error::ImportError;
use crate::importer::file_parser::{ParsedRecord, PayloadRejection};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// 待导入的原始载荷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportPayload {
    Csv(String),
    Json(String),
}

impl ImportPayload {
    pub fn new(format: PayloadFormat, content: String) -> Self {
        match format {
            PayloadFormat::Csv => ImportPayload::Csv(content),
            PayloadFormat::Json => ImportPayload::Json(content),
        }
    }

    pub fn format(&self) -> PayloadFormat {
        match self {
            ImportPayload::Csv(_) => PayloadFormat::Csv,
            ImportPayload::Json(_) => PayloadFormat::Json,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ImportPayload::Csv(c) | ImportPayload::Json(c) => c,
        }
    }
}

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 商品导入主接口
// 实现者: ProductImporterImpl
// 说明: 只产出 ImportResult，不落库；确认导入由 API 层负责
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 导入内存中的载荷
    ///
    /// # 参数
    /// - payload: CSV 或 JSON 文本
    /// - existing: 已入库商品（去重参照集合）
    ///
    /// # 返回
    /// - ImportResult: 数据质量问题全部体现在结果中，从不返回错误
    fn import_payload(&self, payload: &ImportPayload, existing: &[Product]) -> ImportResult;

    /// 从文件导入（按扩展名识别格式）
    ///
    /// # 返回
    /// - Ok(ImportResult): 扩展名不支持时为整体拒绝的结果
    /// - Ok(ImportResult): 非 UTF-8 内容同样为整体拒绝的结果
    /// - Err(ImportError): 文件不存在或不可读（唯一向外传播的失败）
    async fn import_file(
        &self,
        file_path: &Path,
        existing: &[Product],
    ) -> Result<ImportResult, ImportError>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 文件并发读取，按输入顺序依次去重
    /// - 前序文件已接受的名称并入参照集合，同名商品只在首个文件中被接受
    /// - 结果顺序与输入路径顺序一致
    async fn import_files(
        &self,
        file_paths: &[PathBuf],
        existing: &[Product],
    ) -> Vec<Result<ImportResult, ImportError>>;
}

// ==========================================
// PayloadParser Trait
// ==========================================
// 用途: 载荷解析接口（阶段 0）
// 实现者: CsvParser, JsonParser
pub trait PayloadParser: Send + Sync {
    fn format(&self) -> PayloadFormat;

    /// 解析为候选记录列表
    ///
    /// # 返回
    /// - Ok(Vec<ParsedRecord>): 候选记录与行级拒绝，保持原始顺序
    /// - Err(PayloadRejection): 载荷整体不可用
    fn parse(&self, content: &str) -> Result<Vec<ParsedRecord>, PayloadRejection>;
}

// ==========================================
// RecordValidator Trait
// ==========================================
// 用途: 候选记录校验接口（阶段 1）
// 实现者: ProductValidator
pub trait RecordValidator: Send + Sync {
    /// 校验一条未定型的候选记录，收集全部违规（不短路）
    fn validate(&self, record: &Value) -> ValidationOutcome;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 数据清洗接口（阶段 2）
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 清洗整条商品记录
    fn clean_product(&self, product: NewProduct) -> NewProduct;
}

// ==========================================
// DuplicateChecker Trait
// ==========================================
// 用途: 名称去重接口（阶段 3）
// 实现者: Deduplicator
pub trait DuplicateChecker: Send + Sync {
    /// 候选名称是否与参照集合中任一名称大小写不敏感相等
    fn is_duplicate(&self, candidate: &str, reference: &NameIndex) -> bool;
}
