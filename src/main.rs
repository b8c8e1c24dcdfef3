// ==========================================
// 库存管理核心 - 命令行入口
// ==========================================
// 子命令: list / stats / categories / import / export / delete
// 数据库: --db 或环境变量 DEPOT_INVENTORY_DB_PATH，缺省为用户数据目录
// ==========================================

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use depot_inventory::app::{get_default_db_path, AppState, DB_PATH_ENV};
use depot_inventory::domain::types::ExportFormat;
use depot_inventory::logging;

#[derive(Parser)]
#[command(name = "depot-inventory")]
#[command(about = "Inventaire de dépôt: import, statistiques et export des produits")]
#[command(version)]
struct Cli {
    /// Chemin de la base SQLite
    #[arg(long, env = DB_PATH_ENV)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lister les produits (les plus récents en premier)
    List {
        #[arg(long)]
        search: Option<String>,
    },

    /// Statistiques du stock
    Stats {
        #[arg(long)]
        search: Option<String>,
    },

    /// Catégories distinctes
    Categories,

    /// Valider (et optionnellement enregistrer) des fichiers CSV / JSON
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Enregistrer les produits acceptés
        #[arg(long)]
        confirm: bool,
    },

    /// Exporter l'inventaire (csv, json, report)
    Export {
        format: ExportFormat,

        #[arg(long)]
        search: Option<String>,

        /// Dossier de sortie
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Supprimer un produit
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path)
        .await
        .context("无法初始化AppState")?;

    match cli.command {
        Commands::List { search } => {
            for p in state.product_api.list(search).await? {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    p.id, p.name, p.category, p.quantity, p.unit_price, p.alert_threshold
                );
            }
        }
        Commands::Stats { search } => {
            let stats = state.product_api.stats(search).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Categories => {
            for category in state.product_api.categories().await? {
                println!("{}", category);
            }
        }
        Commands::Import { files, confirm } => {
            let results = state.import_api.validate_files(&files).await?;
            for (path, result) in files.iter().zip(results) {
                let result = result.with_context(|| format!("导入失败: {}", path.display()))?;
                println!("# {}", path.display());
                println!("{}", serde_json::to_string_pretty(&result)?);

                if confirm {
                    let created = state.import_api.confirm_import(result).await?;
                    println!("{} produit(s) enregistré(s)", created.len());
                }
            }
        }
        Commands::Export {
            format,
            search,
            out,
        } => {
            let payload = state.export_api.export(format, search).await?;
            tokio::fs::create_dir_all(&out)
                .await
                .with_context(|| format!("无法创建目录: {}", out.display()))?;
            let target = out.join(&payload.file_name);
            tokio::fs::write(&target, payload.content.as_bytes())
                .await
                .with_context(|| format!("无法写入文件: {}", target.display()))?;
            println!("{}", target.display());
        }
        Commands::Delete { id } => {
            state.product_api.delete(&id).await?;
            println!("{}", id);
        }
    }

    Ok(())
}
