// ==========================================
// 库存管理核心 - 商品 Repository 实现
// ==========================================
// 职责: 基于 rusqlite 的 products 表访问
// 存储: product_id 以 16 字节 BLOB 保存；时间戳为定宽 RFC3339（微秒, Z）
// 排序: date_creation DESC, rowid DESC
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::product::{
    CategoryStats, NewProduct, Product, ProductMetadata, ProductPatch, ProductStats,
};
use crate::domain::types::ProductId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::{ProductFilter, ProductRepository, UpdateGuard, UpdateOutcome};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

const SELECT_PRODUCT: &str = r#"
    SELECT
        product_id, nom, categorie, quantite, prix_unitaire, seuil_alerte, image,
        fournisseur, reference, description, emplacement,
        date_creation, date_modification
    FROM products
"#;

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (
        product_id, nom, categorie, quantite, prix_unitaire, seuil_alerte, image,
        fournisseur, reference, description, emplacement,
        date_creation, date_modification
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

/// 存储时间戳格式
fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError {
            field: field.to_string(),
            message: e.to_string(),
        })
}

/// 与存储精度一致的当前时间
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// ==========================================
// ProductRow - 行映射中间结构
// ==========================================
struct ProductRow {
    product_id: Vec<u8>,
    nom: String,
    categorie: String,
    quantite: i64,
    prix_unitaire: f64,
    seuil_alerte: i64,
    image: Option<String>,
    fournisseur: Option<String>,
    reference: Option<String>,
    description: Option<String>,
    emplacement: Option<String>,
    date_creation: String,
    date_modification: String,
}

impl ProductRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            product_id: row.get(0)?,
            nom: row.get(1)?,
            categorie: row.get(2)?,
            quantite: row.get(3)?,
            prix_unitaire: row.get(4)?,
            seuil_alerte: row.get(5)?,
            image: row.get(6)?,
            fournisseur: row.get(7)?,
            reference: row.get(8)?,
            description: row.get(9)?,
            emplacement: row.get(10)?,
            date_creation: row.get(11)?,
            date_modification: row.get(12)?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let metadata = ProductMetadata {
            supplier: row.fournisseur,
            reference: row.reference,
            description: row.description,
            location: row.emplacement,
        };
        Ok(Product {
            id: ProductId::from_slice(&row.product_id)?,
            name: row.nom,
            category: row.categorie,
            image: row.image,
            quantity: row.quantite,
            unit_price: row.prix_unitaire,
            alert_threshold: row.seuil_alerte,
            created_at: decode_timestamp("date_creation", &row.date_creation)?,
            updated_at: decode_timestamp("date_modification", &row.date_modification)?,
            metadata: if metadata.is_empty() {
                None
            } else {
                Some(metadata)
            },
        })
    }
}

// ==========================================
// ProductRepositoryImpl
// ==========================================
pub struct ProductRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepositoryImpl {
    /// 打开数据库并确保 schema 存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责 schema）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn fetch_by_id(conn: &Connection, id: &ProductId) -> RepositoryResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE product_id = ?1");
        let row = conn
            .query_row(&sql, params![&id.as_bytes()[..]], ProductRow::from_row)
            .optional()?;
        row.map(Product::try_from).transpose()
    }

    fn insert_tx(conn: &Connection, product: &Product) -> RepositoryResult<()> {
        let meta = |pick: fn(&ProductMetadata) -> &Option<String>| product.metadata_field(pick);
        conn.execute(
            INSERT_PRODUCT,
            params![
                &product.id.as_bytes()[..],
                product.name,
                product.category,
                product.quantity,
                product.unit_price,
                product.alert_threshold,
                product.image,
                meta(|m| &m.supplier),
                meta(|m| &m.reference),
                meta(|m| &m.description),
                meta(|m| &m.location),
                encode_timestamp(&product.created_at),
                encode_timestamp(&product.updated_at),
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn find_matching(&self, filter: &ProductFilter) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("{SELECT_PRODUCT} ORDER BY date_creation DESC, rowid DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], ProductRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let product = Product::try_from(row)?;
            if filter.matches(&product) {
                products.push(product);
            }
        }
        debug!(count = products.len(), search = ?filter.search, "商品列表查询完成");
        Ok(products)
    }

    async fn find_by_id(&self, id: &ProductId) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        Self::fetch_by_id(&conn, id)
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn insert_one(&self, product: NewProduct) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        let product = Product::from_new(product, now());
        Self::insert_tx(&conn, &product)?;
        Ok(product)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn insert_many(&self, products: Vec<NewProduct>) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let at = now();
        let mut created = Vec::with_capacity(products.len());
        for new in products {
            let product = Product::from_new(new, at);
            Self::insert_tx(&tx, &product)?;
            created.push(product);
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(count = created.len(), "批量插入提交完成");
        Ok(created)
    }

    #[instrument(skip(self, patch, guard), fields(id = %id))]
    async fn update_checked(
        &self,
        id: &ProductId,
        patch: ProductPatch,
        guard: UpdateGuard<'_>,
    ) -> RepositoryResult<UpdateOutcome> {
        let conn = self.get_conn()?;
        let Some(mut product) = Self::fetch_by_id(&conn, id)? else {
            return Ok(UpdateOutcome::NotFound);
        };

        patch.apply_to(&mut product);
        if let Err(violations) = guard(&product) {
            debug!(id = %id, count = violations.len(), "更新被拒绝");
            return Ok(UpdateOutcome::Rejected(violations));
        }
        product.updated_at = now();

        let meta = |pick: fn(&ProductMetadata) -> &Option<String>| product.metadata_field(pick);
        conn.execute(
            r#"
            UPDATE products SET
                nom = ?2, categorie = ?3, quantite = ?4, prix_unitaire = ?5,
                seuil_alerte = ?6, image = ?7, fournisseur = ?8, reference = ?9,
                description = ?10, emplacement = ?11, date_modification = ?12
            WHERE product_id = ?1
            "#,
            params![
                &id.as_bytes()[..],
                product.name,
                product.category,
                product.quantity,
                product.unit_price,
                product.alert_threshold,
                product.image,
                meta(|m| &m.supplier),
                meta(|m| &m.reference),
                meta(|m| &m.description),
                meta(|m| &m.location),
                encode_timestamp(&product.updated_at),
            ],
        )?;
        Ok(UpdateOutcome::Updated(product))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_by_id(&self, id: &ProductId) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM products WHERE product_id = ?1",
            params![&id.as_bytes()[..]],
        )?;
        Ok(affected > 0)
    }

    async fn aggregate_stats(&self) -> RepositoryResult<ProductStats> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                categorie,
                COUNT(*),
                COALESCE(SUM(quantite * prix_unitaire), 0.0),
                SUM(CASE WHEN quantite <= seuil_alerte THEN 1 ELSE 0 END),
                MIN(rowid) AS first_row
            FROM products
            GROUP BY categorie
            ORDER BY first_row
            "#,
        )?;

        let mut stats = ProductStats::default();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;
        for row in rows {
            let (category, count, total_value, low) = row?;
            stats.total_products += count as usize;
            stats.total_stock_value += total_value;
            stats.low_stock_count += low as usize;
            stats.categories.push(CategoryStats {
                category,
                count: count as usize,
                total_value,
            });
        }
        stats.category_count = stats.categories.len();
        Ok(stats)
    }

    async fn distinct_categories(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT categorie FROM products ORDER BY categorie ASC")?;
        let categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}
