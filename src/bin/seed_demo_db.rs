// ==========================================
// 库存管理核心 - 演示数据初始化
// ==========================================
// 用法: seed_demo_db [DB_PATH] [--reset]
// --reset: 先备份（<db>.bak.<时间戳>）再删除原库
// 示例商品走导入管道写入，已存在的同名商品（不区分大小写）跳过
// ==========================================

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use depot_inventory::app::get_default_db_path;
use depot_inventory::domain::types::PayloadFormat;
use depot_inventory::importer::{ImportPayload, ProductImporter, ProductImporterImpl};
use depot_inventory::logging;
use depot_inventory::repository::{ProductFilter, ProductRepository, ProductRepositoryImpl};

const SAMPLE_CATALOGUE: &str = include_str!("../../data/sample_catalogue.json");

#[derive(Parser)]
#[command(name = "seed_demo_db")]
#[command(about = "Initialise une base de démonstration avec le catalogue d'exemple")]
struct Cli {
    /// Chemin de la base SQLite
    db_path: Option<String>,

    /// Sauvegarder puis réinitialiser la base avant l'insertion
    #[arg(long)]
    reset: bool,
}

fn backup_and_reset_db(db_path: &str) -> anyhow::Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path).with_context(|| format!("备份失败: {}", backup_path))?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let db_path = cli.db_path.unwrap_or_else(get_default_db_path);

    if cli.reset {
        backup_and_reset_db(&db_path)?;
    }

    let repo = ProductRepositoryImpl::new(&db_path).context("无法打开数据库")?;
    let existing = repo.find_matching(&ProductFilter::all()).await?;

    let importer = ProductImporterImpl::default();
    let payload = ImportPayload::new(PayloadFormat::Json, SAMPLE_CATALOGUE.to_string());
    let result = importer.import_payload(&payload, &existing);
    anyhow::ensure!(result.success, "示例数据校验失败: {:?}", result.errors);

    let skipped = result.duplicates;
    let created = repo.insert_many(result.into_accepted()).await?;
    for product in &created {
        println!("+ {}", product.name);
    }

    let stats = repo.aggregate_stats().await?;
    println!();
    println!("Produits insérés: {}", created.len());
    println!("Produits ignorés: {}", skipped);
    println!("Total produits: {}", stats.total_products);
    println!("Valeur totale du stock: {:.2}", stats.total_stock_value);
    println!("Nombre de catégories: {}", stats.category_count);

    Ok(())
}
