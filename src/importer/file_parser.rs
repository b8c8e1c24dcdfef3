// ==========================================
// 库存管理核心 - 载荷解析器实现
// ==========================================
// 阶段 0: 原始文本 → 候选记录（未校验的 JSON 对象）
// 支持: CSV（按列位置映射） / JSON（数组或 {products: [...]}）
// ==========================================

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::domain::types::PayloadFormat;
use crate::i18n::{t_in, t_with_args_in};
use crate::importer::product_importer_trait::PayloadParser;

// ==========================================
// 候选记录类型
// ==========================================

/// 记录在原始载荷中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPosition {
    /// CSV 文件行号（表头为第 1 行）
    Line(usize),
    /// JSON 数组下标（从 1 开始）
    Item(usize),
}

impl RecordPosition {
    /// 错误信息前缀，如 "Ligne 3" / "Produit 2"
    pub fn label(&self, locale: &str) -> String {
        match self {
            RecordPosition::Line(line) => {
                t_with_args_in(locale, "import.line_position", &[("line", &line.to_string())])
            }
            RecordPosition::Item(index) => {
                t_with_args_in(locale, "import.item_position", &[("index", &index.to_string())])
            }
        }
    }
}

/// 行级解析问题（不进入校验阶段）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    InsufficientColumns { found: usize, required: usize },
    Undecodable(String),
}

impl RowIssue {
    pub fn message(&self, locale: &str) -> String {
        match self {
            RowIssue::InsufficientColumns { .. } => t_in(locale, "import.insufficient_columns"),
            RowIssue::Undecodable(_) => t_in(locale, "import.row_parse_error"),
        }
    }
}

/// 解析阶段产出的单条记录
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    Candidate {
        position: RecordPosition,
        fields: Value,
    },
    Rejected {
        position: RecordPosition,
        issue: RowIssue,
    },
}

/// 载荷整体被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadRejection {
    /// JSON 语法错误
    JsonSyntax(String),
    /// 既不是数组，也没有 products 数组字段
    UnrecognizedShape,
}

impl PayloadRejection {
    pub fn message(&self, locale: &str) -> String {
        match self {
            PayloadRejection::JsonSyntax(msg) => {
                t_with_args_in(locale, "import.json_parse_error", &[("message", msg)])
            }
            PayloadRejection::UnrecognizedShape => t_in(locale, "import.json_unrecognized"),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 列位置映射:
// 0 ID(忽略) | 1 名称 | 2 分类 | 3 数量 | 4 单价 | 5 总价值(忽略)
// 6 预警阈值 | 7 状态(忽略) | 8 供应商 | 9 编号 | 10 描述 | 11 存放位置
const COL_NAME: usize = 1;
const COL_CATEGORY: usize = 2;
const COL_QUANTITY: usize = 3;
const COL_UNIT_PRICE: usize = 4;
const COL_ALERT_THRESHOLD: usize = 6;
const METADATA_COLUMNS: [(usize, &str); 4] = [
    (8, "fournisseur"),
    (9, "reference"),
    (10, "description"),
    (11, "emplacement"),
];

/// 默认最少列数
pub const DEFAULT_CSV_MIN_COLUMNS: usize = 6;

pub struct CsvParser {
    min_columns: usize,
}

impl CsvParser {
    pub fn new(min_columns: usize) -> Self {
        Self { min_columns }
    }

    /// 将一行映射为候选对象
    ///
    /// 空单元格视为缺失；数值列无法解析时保留原文本，由校验器报告
    fn map_row(&self, row: &StringRecord) -> Value {
        let mut obj = Map::new();

        let cell = |idx: usize| row.get(idx).filter(|v| !v.is_empty());

        if let Some(name) = row.get(COL_NAME) {
            obj.insert("nom".to_string(), Value::String(name.to_string()));
        }
        if let Some(category) = row.get(COL_CATEGORY) {
            obj.insert("categorie".to_string(), Value::String(category.to_string()));
        }
        for (idx, key) in [
            (COL_QUANTITY, "quantite"),
            (COL_UNIT_PRICE, "prixUnitaire"),
            (COL_ALERT_THRESHOLD, "seuilAlerte"),
        ] {
            if let Some(raw) = cell(idx) {
                obj.insert(key.to_string(), numeric_cell(raw));
            }
        }

        let mut metadata = Map::new();
        for (idx, key) in METADATA_COLUMNS {
            if let Some(raw) = cell(idx) {
                metadata.insert(key.to_string(), Value::String(raw.to_string()));
            }
        }
        if !metadata.is_empty() {
            obj.insert("metadata".to_string(), Value::Object(metadata));
        }

        Value::Object(obj)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(DEFAULT_CSV_MIN_COLUMNS)
    }
}

impl PayloadParser for CsvParser {
    fn format(&self) -> PayloadFormat {
        PayloadFormat::Csv
    }

    fn parse(&self, content: &str) -> Result<Vec<ParsedRecord>, PayloadRejection> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        // 表头占第 1 行
        let mut last_line = 1usize;

        for result in reader.records() {
            match result {
                Ok(row) => {
                    let line = row
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(last_line + 1);
                    last_line = line;

                    // 跳过完全空白的行
                    if row.iter().all(|v| v.is_empty()) {
                        continue;
                    }

                    let position = RecordPosition::Line(line);
                    if row.len() < self.min_columns {
                        debug!(line, found = row.len(), "CSV 行列数不足");
                        records.push(ParsedRecord::Rejected {
                            position,
                            issue: RowIssue::InsufficientColumns {
                                found: row.len(),
                                required: self.min_columns,
                            },
                        });
                        continue;
                    }

                    records.push(ParsedRecord::Candidate {
                        position,
                        fields: self.map_row(&row),
                    });
                }
                Err(err) => {
                    let line = err
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(last_line + 1);
                    last_line = line;
                    debug!(line, error = %err, "CSV 行解析失败");
                    records.push(ParsedRecord::Rejected {
                        position: RecordPosition::Line(line),
                        issue: RowIssue::Undecodable(err.to_string()),
                    });
                }
            }
        }

        Ok(records)
    }
}

/// 数值单元格: 整数优先，其次浮点；都失败则保留文本
fn numeric_cell(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

// ==========================================
// JSON Parser 实现
// ==========================================

/// 支持的两种顶层形状
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Array(Vec<Value>),
    Wrapped { products: Vec<Value> },
}

impl ImportDocument {
    fn into_items(self) -> Vec<Value> {
        match self {
            ImportDocument::Array(items) => items,
            ImportDocument::Wrapped { products } => products,
        }
    }
}

#[derive(Debug, Default)]
pub struct JsonParser;

impl PayloadParser for JsonParser {
    fn format(&self) -> PayloadFormat {
        PayloadFormat::Json
    }

    fn parse(&self, content: &str) -> Result<Vec<ParsedRecord>, PayloadRejection> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| PayloadRejection::JsonSyntax(e.to_string()))?;

        let document: ImportDocument =
            serde_json::from_value(value).map_err(|_| PayloadRejection::UnrecognizedShape)?;

        Ok(document
            .into_items()
            .into_iter()
            .enumerate()
            .map(|(idx, fields)| ParsedRecord::Candidate {
                position: RecordPosition::Item(idx + 1),
                fields,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(records: &[ParsedRecord]) -> Vec<&Value> {
        records
            .iter()
            .filter_map(|r| match r {
                ParsedRecord::Candidate { fields, .. } => Some(fields),
                ParsedRecord::Rejected { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_csv_column_mapping() {
        let content = "\
ID,Nom,Catégorie,Quantité,Prix,Valeur,Seuil,Statut,Fournisseur,Référence,Description,Emplacement
x, Stylo bleu ,Fournitures,120,0.8,96,20,En Stock,Bic,,Stylo à bille,A-12
";
        let records = CsvParser::default().parse(content).unwrap();
        assert_eq!(records.len(), 1);

        let fields = candidates(&records)[0];
        assert_eq!(fields["nom"], "Stylo bleu");
        assert_eq!(fields["categorie"], "Fournitures");
        assert_eq!(fields["quantite"], 120);
        assert_eq!(fields["prixUnitaire"], 0.8);
        assert_eq!(fields["seuilAlerte"], 20);
        assert_eq!(fields["metadata"]["fournisseur"], "Bic");
        assert!(fields["metadata"].get("reference").is_none());
        assert_eq!(fields["metadata"]["emplacement"], "A-12");
    }

    #[test]
    fn test_csv_short_row_rejected_with_line_number() {
        let content = "ID,Nom,Catégorie,Quantité,Prix,Valeur,Seuil\n1,A,X,5\n2,B,X,5,1.5,7.5,2\n";
        let records = CsvParser::default().parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ParsedRecord::Rejected {
                position: RecordPosition::Line(2),
                issue: RowIssue::InsufficientColumns { found: 4, required: 6 },
            }
        );
        assert!(matches!(
            records[1],
            ParsedRecord::Candidate { position: RecordPosition::Line(3), .. }
        ));
    }

    #[test]
    fn test_csv_non_numeric_cell_kept_as_text() {
        let content = "h0,h1,h2,h3,h4,h5,h6\n1,A,X,beaucoup,2,0,1\n";
        let records = CsvParser::default().parse(content).unwrap();
        let fields = candidates(&records)[0];
        assert_eq!(fields["quantite"], "beaucoup");
    }

    #[test]
    fn test_csv_quoted_field_with_separator() {
        let content = "h0,h1,h2,h3,h4,h5,h6\n\"1\",\"Vis, écrou\",\"Quincaillerie\",10,0.1,1,2\n";
        let records = CsvParser::default().parse(content).unwrap();
        let fields = candidates(&records)[0];
        assert_eq!(fields["nom"], "Vis, écrou");
    }

    #[test]
    fn test_csv_header_only() {
        let records = CsvParser::default().parse("ID,Nom,Catégorie\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_json_accepts_array_and_wrapped() {
        let parser = JsonParser;
        let records = parser.parse(r#"[{"nom":"A"},{"nom":"B"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[1],
            ParsedRecord::Candidate { position: RecordPosition::Item(2), .. }
        ));

        let records = parser.parse(r#"{"exportDate":"x","products":[{"nom":"A"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_json_rejections() {
        let parser = JsonParser;
        assert_eq!(
            parser.parse(r#"{"items":[]}"#).unwrap_err(),
            PayloadRejection::UnrecognizedShape
        );
        assert_eq!(
            parser.parse(r#"{"products":"nope"}"#).unwrap_err(),
            PayloadRejection::UnrecognizedShape
        );
        assert!(matches!(
            parser.parse("[{").unwrap_err(),
            PayloadRejection::JsonSyntax(_)
        ));
    }

    #[test]
    fn test_position_labels() {
        assert_eq!(RecordPosition::Line(4).label("fr"), "Ligne 4");
        assert_eq!(RecordPosition::Item(2).label("fr"), "Produit 2");
        assert_eq!(
            PayloadRejection::JsonSyntax("EOF".to_string()).message("fr"),
            "Erreur de parsing JSON: EOF"
        );
    }
}
