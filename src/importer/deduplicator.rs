// ==========================================
// 库存管理核心 - 名称去重器实现
// ==========================================
// 规则: 名称大小写不敏感精确匹配（不做空白/标点归一）
// 说明: 导入过程中将新接受的名称并入参照集合，
//       同批次内的后续重复行也会被识别
// ==========================================

use std::collections::HashSet;

use crate::importer::product_importer_trait::DuplicateChecker;

/// 参照名称集合（小写存储）
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: HashSet<String>,
}

impl NameIndex {
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            names: names.into_iter().map(fold_case).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&fold_case(name))
    }

    /// 并入一个名称；已存在时返回 false
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(fold_case(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Debug, Default)]
pub struct Deduplicator;

impl DuplicateChecker for Deduplicator {
    fn is_duplicate(&self, candidate: &str, reference: &NameIndex) -> bool {
        reference.contains(candidate)
    }
}
