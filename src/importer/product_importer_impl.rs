// ==========================================
// 库存管理核心 - 商品导入器实现
// ==========================================
// 职责: 整合导入流程，从原始载荷到 ImportResult
// 流程: 解析 → 校验 → 清洗 → 去重 → 汇总
// 红线: 数据质量问题只进入结果，不以错误形式抛出
// ==========================================

use crate::domain::import::ImportResult;
use crate::domain::product::Product;
use crate::domain::types::PayloadFormat;
use crate::i18n::DEFAULT_LOCALE;
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::deduplicator::{Deduplicator, NameIndex};
use crate::importer::error::ImportError;
use crate::importer::file_parser::{CsvParser, JsonParser, ParsedRecord, DEFAULT_CSV_MIN_COLUMNS};
use crate::importer::product_importer_trait::{
    DataCleaner, DuplicateChecker, ImportPayload, PayloadParser, ProductImporter, RecordValidator,
};
use crate::importer::validator::ProductValidator;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// 默认预览条数
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;

/// 导入参数（由配置层加载）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub preview_limit: usize,
    pub csv_min_columns: usize,
    pub locale: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            csv_min_columns: DEFAULT_CSV_MIN_COLUMNS,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

// ==========================================
// ProductImporterImpl - 商品导入器实现
// ==========================================
pub struct ProductImporterImpl {
    // 导入组件
    csv_parser: Box<dyn PayloadParser>,
    json_parser: Box<dyn PayloadParser>,
    validator: Box<dyn RecordValidator>,
    data_cleaner: Box<dyn DataCleaner>,
    duplicate_checker: Box<dyn DuplicateChecker>,

    // 参数
    preview_limit: usize,
    locale: String,
}

impl ProductImporterImpl {
    /// 创建新的 ProductImporter 实例
    ///
    /// # 参数
    /// - csv_parser / json_parser: 载荷解析器
    /// - validator: 候选记录校验器
    /// - data_cleaner: 数据清洗器
    /// - duplicate_checker: 名称去重器
    /// - preview_limit: 预览条数
    /// - locale: 错误文案语言
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        csv_parser: Box<dyn PayloadParser>,
        json_parser: Box<dyn PayloadParser>,
        validator: Box<dyn RecordValidator>,
        data_cleaner: Box<dyn DataCleaner>,
        duplicate_checker: Box<dyn DuplicateChecker>,
        preview_limit: usize,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            csv_parser,
            json_parser,
            validator,
            data_cleaner,
            duplicate_checker,
            preview_limit,
            locale: locale.into(),
        }
    }

    /// 使用默认组件构造
    pub fn with_settings(settings: &ImportSettings) -> Self {
        Self::new(
            Box::new(CsvParser::new(settings.csv_min_columns)),
            Box::new(JsonParser),
            Box::new(ProductValidator::new(settings.locale.clone())),
            Box::new(DataCleanerImpl),
            Box::new(Deduplicator),
            settings.preview_limit,
            settings.locale.clone(),
        )
    }

    fn parser_for(&self, format: PayloadFormat) -> &dyn PayloadParser {
        match format {
            PayloadFormat::Csv => self.csv_parser.as_ref(),
            PayloadFormat::Json => self.json_parser.as_ref(),
        }
    }

    /// 校验 → 清洗 → 去重 → 汇总
    ///
    /// reference 会并入本次接受的名称
    fn run_pipeline(&self, records: Vec<ParsedRecord>, reference: &mut NameIndex) -> ImportResult {
        let mut accepted = Vec::new();
        let mut errors = Vec::new();
        let mut duplicates = 0usize;

        for record in records {
            match record {
                ParsedRecord::Rejected { position, issue } => {
                    let message = format!(
                        "{}: {}",
                        position.label(&self.locale),
                        issue.message(&self.locale)
                    );
                    warn!(?issue, %message, "行级解析失败");
                    errors.push(message);
                }
                ParsedRecord::Candidate { position, fields } => {
                    // === 步骤 1: 校验 ===
                    let outcome = self.validator.validate(&fields);
                    let product = match outcome.into_result() {
                        Ok(product) => product,
                        Err(violations) => {
                            let joined = violations
                                .iter()
                                .map(|v| v.message.as_str())
                                .collect::<Vec<_>>()
                                .join(", ");
                            let message = format!("{}: {}", position.label(&self.locale), joined);
                            warn!(%message, "候选记录未通过校验");
                            errors.push(message);
                            continue;
                        }
                    };

                    // === 步骤 2: 清洗 ===
                    let product = self.data_cleaner.clean_product(product);

                    // === 步骤 3: 去重（参照集合含本批已接受的名称）===
                    if self.duplicate_checker.is_duplicate(&product.name, reference) {
                        debug!(name = %product.name, "跳过重复商品");
                        duplicates += 1;
                        continue;
                    }
                    reference.insert(&product.name);

                    accepted.push(product);
                }
            }
        }

        // === 步骤 4: 汇总 ===
        ImportResult::from_pipeline(accepted, errors, duplicates, self.preview_limit)
    }

    /// 读取文件并识别格式
    async fn read_payload(&self, file_path: &Path) -> Result<ImportPayload, ImportError> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = PayloadFormat::from_extension(ext)
            .ok_or_else(|| ImportError::UnsupportedFormat(ext.to_string()))?;

        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImportError::FileNotFound(file_path.display().to_string())
            } else {
                ImportError::from(e)
            }
        })?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ImportError::InvalidEncoding(file_path.display().to_string()))?;

        // 去掉 UTF-8 BOM（表格软件导出的 CSV 常见）
        let content = if content.starts_with('\u{feff}') {
            content['\u{feff}'.len_utf8()..].to_string()
        } else {
            content
        };

        Ok(ImportPayload::new(format, content))
    }

    /// 解析并跑完整流水线，reference 为去重参照集合
    fn import_against(&self, payload: &ImportPayload, reference: &mut NameIndex) -> ImportResult {
        // === 步骤 0: 解析 ===
        let records = match self.parser_for(payload.format()).parse(payload.content()) {
            Ok(records) => records,
            Err(rejection) => {
                let message = rejection.message(&self.locale);
                warn!(%message, "载荷整体被拒绝");
                return ImportResult::rejected(message);
            }
        };

        let result = self.run_pipeline(records, reference);
        info!(
            imported = result.imported,
            duplicates = result.duplicates,
            errors = result.errors.len(),
            success = result.success,
            "载荷导入校验完成"
        );
        result
    }

    /// 读取结果 → ImportResult
    ///
    /// 格式不支持、编码无效转为整体拒绝；其余读取错误向外传播
    fn resolve_file(
        &self,
        loaded: Result<ImportPayload, ImportError>,
        reference: &mut NameIndex,
    ) -> Result<ImportResult, ImportError> {
        match loaded {
            Ok(payload) => Ok(self.import_against(&payload, reference)),
            Err(e @ (ImportError::UnsupportedFormat(_) | ImportError::InvalidEncoding(_))) => {
                warn!(error = %e, "文件内容无法导入");
                Ok(ImportResult::rejected(e.localized(&self.locale)))
            }
            Err(e) => {
                error!(error = %e, "文件读取失败");
                Err(e)
            }
        }
    }
}

fn reference_for(existing: &[Product]) -> NameIndex {
    NameIndex::from_names(existing.iter().map(|p| p.name.as_str()))
}

impl Default for ProductImporterImpl {
    fn default() -> Self {
        Self::with_settings(&ImportSettings::default())
    }
}

#[async_trait]
impl ProductImporter for ProductImporterImpl {
    #[instrument(skip(self, payload, existing), fields(format = %payload.format(), existing = existing.len()))]
    fn import_payload(&self, payload: &ImportPayload, existing: &[Product]) -> ImportResult {
        self.import_against(payload, &mut reference_for(existing))
    }

    #[instrument(skip(self, file_path, existing), fields(file = %file_path.display()))]
    async fn import_file(
        &self,
        file_path: &Path,
        existing: &[Product],
    ) -> Result<ImportResult, ImportError> {
        info!("开始导入文件");
        let loaded = self.read_payload(file_path).await;
        self.resolve_file(loaded, &mut reference_for(existing))
    }

    async fn import_files(
        &self,
        file_paths: &[PathBuf],
        existing: &[Product],
    ) -> Vec<Result<ImportResult, ImportError>> {
        info!(count = file_paths.len(), "开始批量导入文件");

        // 并发读取所有文件
        let loaded = join_all(file_paths.iter().map(|path| self.read_payload(path))).await;

        // 按输入顺序依次去重，前序文件接受的名称并入参照集合
        let mut reference = reference_for(existing);
        let results: Vec<_> = loaded
            .into_iter()
            .zip(file_paths)
            .map(|(loaded, path)| {
                debug!(file = %path.display(), "校验文件内容");
                self.resolve_file(loaded, &mut reference)
            })
            .collect();

        info!(
            total = results.len(),
            success = results.iter().filter(|r| matches!(r, Ok(res) if res.success)).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::NewProduct;
    use chrono::Utc;

    fn create_test_product(name: &str) -> Product {
        Product::from_new(
            NewProduct {
                name: name.to_string(),
                category: "Électronique".to_string(),
                quantity: 5,
                unit_price: 100.0,
                alert_threshold: 2,
                image: None,
                metadata: None,
            },
            Utc::now(),
        )
    }

    const HEADER: &str = "ID,Nom,Catégorie,Quantité,Prix Unitaire,Valeur Totale,Seuil d'Alerte\n";

    #[test]
    fn test_csv_mixed_rows() {
        let importer = ProductImporterImpl::default();
        let content = format!(
            "{}1,Souris,Périphériques,10,15.5,155,3\n2,,Périphériques,1,1,1,1\n3,Clavier,X\n4,souris,Périphériques,2,3,6,1\n",
            HEADER
        );

        let result = importer.import_payload(&ImportPayload::Csv(content), &[]);
        assert!(!result.success);
        assert_eq!(result.imported, 1);
        assert_eq!(result.duplicates, 1);
        assert_eq!(
            result.errors,
            vec![
                "Ligne 3: Le nom est requis et doit être une chaîne de caractères".to_string(),
                "Ligne 4: Données insuffisantes".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicates_against_existing() {
        let importer = ProductImporterImpl::default();
        let existing = vec![create_test_product("Dell XPS 13")];
        let payload = ImportPayload::Json(
            r#"[{"nom":"dell xps 13","categorie":"PC","quantite":1,"prixUnitaire":10,"seuilAlerte":0}]"#
                .to_string(),
        );

        let result = importer.import_payload(&payload, &existing);
        assert!(result.success);
        assert_eq!(result.imported, 0);
        assert_eq!(result.duplicates, 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_json_errors_aggregated_per_item() {
        let importer = ProductImporterImpl::default();
        let payload = ImportPayload::Json(
            r#"{"products":[{"nom":"A","categorie":"X","quantite":-1,"prixUnitaire":0,"seuilAlerte":1}]}"#
                .to_string(),
        );

        let result = importer.import_payload(&payload, &[]);
        assert_eq!(
            result.errors,
            vec![
                "Produit 1: La quantité doit être un nombre positif, Le prix unitaire doit être un nombre positif"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_header_only_csv_is_empty_success() {
        let importer = ProductImporterImpl::default();
        let result = importer.import_payload(&ImportPayload::Csv(HEADER.to_string()), &[]);
        assert!(result.success);
        assert_eq!(result.imported, 0);
        assert_eq!(result.duplicates, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_wholesale_rejection() {
        let importer = ProductImporterImpl::default();
        let result = importer.import_payload(&ImportPayload::Json("{\"a\":1}".to_string()), &[]);
        assert!(!result.success);
        assert_eq!(result.imported, 0);
        assert_eq!(result.duplicates, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.preview.is_empty());
    }

    #[test]
    fn test_preview_bounded_but_accepted_complete() {
        let settings = ImportSettings {
            preview_limit: 2,
            ..Default::default()
        };
        let importer = ProductImporterImpl::with_settings(&settings);
        let rows: String = (1..=4)
            .map(|i| format!("{i},P{i},Cat,{i},1.5,0,0\n"))
            .collect();

        let result = importer.import_payload(&ImportPayload::Csv(format!("{}{}", HEADER, rows)), &[]);
        assert_eq!(result.imported, 4);
        assert_eq!(result.preview.len(), 2);
        assert_eq!(result.accepted().len(), 4);
    }

    #[test]
    fn test_accepted_records_are_trimmed() {
        let importer = ProductImporterImpl::default();
        let payload = ImportPayload::Json(
            r#"[{"nom":"  Écran 24 ","categorie":" Moniteurs","quantite":3,"prixUnitaire":150,"seuilAlerte":1,"extra":"x"}]"#
                .to_string(),
        );
        let result = importer.import_payload(&payload, &[]);
        assert_eq!(result.preview[0].name, "Écran 24");
        assert_eq!(result.preview[0].category, "Moniteurs");
    }
}
