// ==========================================
// 库存管理核心 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 缺省: 键缺失或取值格式错误时回退默认值（格式错误记 warn）
// ==========================================

use crate::config::inventory_config_trait::{ConfigResult, InventoryConfigReader};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::exporter::DEFAULT_CURRENCY;
use crate::i18n::{normalize_locale, DEFAULT_LOCALE, SUPPORTED_LOCALES};
use crate::importer::{DEFAULT_CSV_MIN_COLUMNS, DEFAULT_PREVIEW_LIMIT};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?)
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取配置值，缺失时返回默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key, value, "配置已写入");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON 格式，按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取数值配置；格式错误时告警并回退
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(config_key = key, raw_value = %raw, fallback = %default, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// InventoryConfigReader Trait 实现
// ==========================================
#[async_trait]
impl InventoryConfigReader for ConfigManager {
    async fn get_preview_limit(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::IMPORT_PREVIEW_LIMIT, DEFAULT_PREVIEW_LIMIT)
    }

    async fn get_csv_min_columns(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::IMPORT_CSV_MIN_COLUMNS, DEFAULT_CSV_MIN_COLUMNS)
    }

    async fn get_currency(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::EXPORT_CURRENCY, DEFAULT_CURRENCY)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            warn!(config_key = config_keys::EXPORT_CURRENCY, "币种为空，使用默认值");
            return Ok(DEFAULT_CURRENCY.to_string());
        }
        Ok(trimmed.to_uppercase())
    }

    async fn get_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::EXPORT_LOCALE, DEFAULT_LOCALE)?;
        let wanted = value.trim().to_lowercase();
        if !SUPPORTED_LOCALES.contains(&wanted.as_str()) {
            warn!(
                config_key = config_keys::EXPORT_LOCALE,
                raw_value = %value,
                resolved = normalize_locale(&wanted),
                "不支持的语言配置"
            );
        }
        Ok(normalize_locale(&wanted).to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const IMPORT_PREVIEW_LIMIT: &str = "import/preview_limit";
    pub const IMPORT_CSV_MIN_COLUMNS: &str = "import/csv_min_columns";

    // 导出
    pub const EXPORT_CURRENCY: &str = "export/currency";
    pub const EXPORT_LOCALE: &str = "export/locale";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let manager = setup_manager();
        let import = manager.load_import_settings().await.unwrap();
        assert_eq!(import.preview_limit, 5);
        assert_eq!(import.csv_min_columns, 6);
        assert_eq!(import.locale, "fr");

        let export = manager.load_export_settings().await.unwrap();
        assert_eq!(export.currency, "MAD");
        assert_eq!(export.locale, "fr");
    }

    #[tokio::test]
    async fn test_overrides_and_malformed_values() {
        let manager = setup_manager();
        manager.set_config_value(config_keys::IMPORT_PREVIEW_LIMIT, "10").unwrap();
        manager.set_config_value(config_keys::IMPORT_CSV_MIN_COLUMNS, "six").unwrap();
        manager.set_config_value(config_keys::EXPORT_CURRENCY, " eur ").unwrap();
        manager.set_config_value(config_keys::EXPORT_LOCALE, "EN").unwrap();

        assert_eq!(manager.get_preview_limit().await.unwrap(), 10);
        assert_eq!(manager.get_csv_min_columns().await.unwrap(), 6);
        assert_eq!(manager.get_currency().await.unwrap(), "EUR");
        assert_eq!(manager.get_locale().await.unwrap(), "en");

        manager.set_config_value(config_keys::EXPORT_LOCALE, "de").unwrap();
        assert_eq!(manager.get_locale().await.unwrap(), "fr");
    }

    #[test]
    fn test_upsert_and_snapshot() {
        let manager = setup_manager();
        manager.set_config_value(config_keys::EXPORT_CURRENCY, "MAD").unwrap();
        manager.set_config_value(config_keys::EXPORT_CURRENCY, "EUR").unwrap();
        manager.set_config_value(config_keys::IMPORT_PREVIEW_LIMIT, "3").unwrap();

        let snapshot: serde_json::Value =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["export/currency"], "EUR");
        assert_eq!(snapshot["import/preview_limit"], "3");
        assert_eq!(snapshot.as_object().unwrap().len(), 2);
    }
}
