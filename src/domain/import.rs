// ==========================================
// 库存管理核心 - 导入结果
// ==========================================
// 职责: 导入流水线的汇总输出
// 红线: imported == accepted.len()；preview 为 accepted 的前缀
// ==========================================

use serde::{Deserialize, Serialize};

use super::product::NewProduct;
use super::types::ProductField;

/// 单个字段的校验违规
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: ProductField,
    pub message: String,
}

/// 单条候选记录的校验结论
///
/// 通过时携带类型化的商品，否则携带全部违规（按字段顺序）
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    violations: Vec<FieldViolation>,
    product: Option<NewProduct>,
}

impl ValidationOutcome {
    pub fn valid(product: NewProduct) -> Self {
        Self {
            violations: Vec::new(),
            product: Some(product),
        }
    }

    pub fn invalid(violations: Vec<FieldViolation>) -> Self {
        Self {
            violations,
            product: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.product.is_some()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }

    pub fn into_result(self) -> Result<NewProduct, Vec<FieldViolation>> {
        match self.product {
            Some(product) if self.violations.is_empty() => Ok(product),
            _ => Err(self.violations),
        }
    }
}

/// 导入结果
///
/// success 当且仅当没有任何错误；`accepted` 保存完整的通过集合，确认导入时持久化的是它而不是预览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub imported: usize,
    pub errors: Vec<String>,
    pub duplicates: usize,
    pub preview: Vec<NewProduct>,
    #[serde(skip)]
    accepted: Vec<NewProduct>,
}

impl ImportResult {
    /// 由流水线产出构造结果
    ///
    /// # 参数
    /// - accepted: 通过校验与去重的商品（保持输入顺序）
    /// - errors: 逐行错误信息
    /// - duplicates: 重复数量
    /// - preview_limit: 预览条数上限
    pub fn from_pipeline(
        accepted: Vec<NewProduct>,
        errors: Vec<String>,
        duplicates: usize,
        preview_limit: usize,
    ) -> Self {
        let preview = accepted.iter().take(preview_limit).cloned().collect();
        Self {
            success: errors.is_empty(),
            imported: accepted.len(),
            errors,
            duplicates,
            preview,
            accepted,
        }
    }

    /// 整体拒绝（不可解析、格式不支持、读取失败）
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            imported: 0,
            errors: vec![error.into()],
            duplicates: 0,
            preview: Vec::new(),
            accepted: Vec::new(),
        }
    }

    /// 合格集合是否与 imported 一致
    ///
    /// 反序列化得到的结果不携带合格集合，只有流水线产出的结果是完整的
    pub fn is_complete(&self) -> bool {
        self.accepted.len() == self.imported
    }

    pub fn accepted(&self) -> &[NewProduct] {
        &self.accepted
    }

    pub fn into_accepted(self) -> Vec<NewProduct> {
        self.accepted
    }
}
