// ==========================================
// 库存管理核心 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 格式不支持、编码无效被转换为整体拒绝的 ImportResult；
//       文件不存在/不可读向调用方传播，localized() 提供面向用户的文案
// ==========================================

use thiserror::Error;

use crate::i18n::{t_in, t_with_args_in};

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件不是有效的 UTF-8 编码: {0}")]
    InvalidEncoding(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),
}

impl ImportError {
    /// 面向用户的本地化错误文案
    pub fn localized(&self, locale: &str) -> String {
        match self {
            ImportError::UnsupportedFormat(_) => t_in(locale, "import.unsupported_format"),
            ImportError::InvalidEncoding(_) => t_in(locale, "import.invalid_encoding"),
            ImportError::FileNotFound(path) => {
                t_with_args_in(locale, "import.file_not_found", &[("path", path)])
            }
            ImportError::FileReadError(message) => {
                t_with_args_in(locale, "import.file_read_error", &[("message", message)])
            }
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}
