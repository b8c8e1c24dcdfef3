// ==========================================
// 库存管理核心 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表语句集中在此处，仓储与配置共用同一份 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;
use tracing::{info, warn};

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表语句（幂等）
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    product_id BLOB PRIMARY KEY NOT NULL,
    nom TEXT NOT NULL,
    categorie TEXT NOT NULL,
    quantite INTEGER NOT NULL CHECK (quantite >= 0),
    prix_unitaire REAL NOT NULL CHECK (prix_unitaire > 0),
    seuil_alerte INTEGER NOT NULL CHECK (seuil_alerte >= 0),
    image TEXT,
    fournisseur TEXT,
    reference TEXT,
    description TEXT,
    emplacement TEXT,
    date_creation TEXT NOT NULL,
    date_modification TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_nom ON products(nom);
CREATE INDEX IF NOT EXISTS idx_products_categorie ON products(categorie);
CREATE INDEX IF NOT EXISTS idx_products_date_creation ON products(date_creation);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL DEFAULT 'global',
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 确保 schema 存在，并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    match read_schema_version(conn)? {
        None => {
            conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
                [CURRENT_SCHEMA_VERSION],
            )?;
            info!(version = CURRENT_SCHEMA_VERSION, "数据库 schema 初始化完成");
        }
        Some(v) if v != CURRENT_SCHEMA_VERSION => {
            warn!(
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema_version 与当前代码不一致"
            );
        }
        Some(_) => {}
    }

    Ok(())
}

/// 读取 schema_version（若表不存在或为空则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
