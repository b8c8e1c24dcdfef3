// ==========================================
// 库存管理核心 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为面向调用方的错误消息
// 约束: 存储层错误在转换时记录 error 日志
// ==========================================

use crate::exporter::ExportError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;
use tracing::error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 商品数据不满足字段规则（携带全部违规文案）
    #[error("数据验证失败: {}", .0.join(", "))]
    ValidationError(Vec<String>),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        error!(error = %err, "存储操作失败");
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::InvalidId(msg) => ApiError::InvalidInput(msg),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
