// ==========================================
// 商品仓储集成测试
// ==========================================
// 覆盖: 文件数据库上的增删改查、排序、局部更新、聚合
// ==========================================

use std::time::Duration;

use depot_inventory::domain::product::{Product, ProductMetadata, ProductPatch};
use depot_inventory::domain::types::ProductId;
use depot_inventory::logging;
use depot_inventory::repository::{ProductFilter, ProductRepository, UpdateOutcome};

use test_helpers::{create_test_db, create_test_record, create_test_record_with_supplier, create_test_repo};

#[tokio::test]
async fn test_listing_order_and_search() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let repo = create_test_repo(&db_path);

    repo.insert_one(create_test_record("Stylo bille", "Bureau", 100, 0.5, 20))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    repo.insert_one(create_test_record("Dell XPS 13", "Électronique", 25, 1200.0, 10))
        .await
        .unwrap();

    let all = repo.find_matching(&ProductFilter::all()).await.unwrap();
    assert_eq!(all[0].name, "Dell XPS 13");
    assert_eq!(all[1].name, "Stylo bille");

    let hits = repo.find_matching(&ProductFilter::search("bur")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Stylo bille");

    let hits = repo.find_matching(&ProductFilter::search("élec")).await.unwrap();
    assert_eq!(hits.len(), 1);
    println!("✓ 最新在前；名称/分类不区分大小写搜索");
}

#[tokio::test]
async fn test_partial_update_refreshes_modification_time() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let repo = create_test_repo(&db_path);

    let created = repo
        .insert_one(create_test_record_with_supplier("Souris", "Logitech"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let patch = ProductPatch {
        quantity: Some(3),
        metadata: Some(ProductMetadata {
            location: Some("Entrepôt B".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let updated = repo
        .update_by_id(&created.id, patch)
        .await
        .unwrap()
        .expect("商品应存在");

    assert_eq!(updated.quantity, 3);
    assert_eq!(updated.name, "Souris");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    let meta = updated.metadata.as_ref().unwrap();
    assert!(meta.supplier.is_none());
    assert_eq!(meta.location.as_deref(), Some("Entrepôt B"));

    let reloaded = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(reloaded, updated);
    println!("✓ 局部更新只改给出字段，修改时间刷新，创建时间不变");
}

#[tokio::test]
async fn test_delete_and_missing_ids() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let repo = create_test_repo(&db_path);

    let created = repo
        .insert_one(create_test_record("Agrafeuse", "Bureau", 2, 12.0, 3))
        .await
        .unwrap();

    assert!(repo.delete_by_id(&created.id).await.unwrap());
    assert!(!repo.delete_by_id(&created.id).await.unwrap());
    assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
    assert!(repo
        .update_by_id(&ProductId::generate(), ProductPatch::default())
        .await
        .unwrap()
        .is_none());
    println!("✓ 删除不存在的商品返回 false");
}

#[tokio::test]
async fn test_stats_and_categories() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let repo = create_test_repo(&db_path);

    repo.insert_many(vec![
        create_test_record("A", "X", 5, 10.0, 10),
        create_test_record("B", "Y", 20, 2.0, 5),
        create_test_record("C", "Bureau", 1, 1.0, 0),
    ])
    .await
    .unwrap();

    let stats = repo.aggregate_stats().await.unwrap();
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.total_stock_value, 91.0);
    assert_eq!(stats.low_stock_count, 1);
    assert_eq!(stats.category_count, 3);
    let order: Vec<&str> = stats.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(order, vec!["X", "Y", "Bureau"]);

    let categories = repo.distinct_categories().await.unwrap();
    assert_eq!(categories, vec!["Bureau", "X", "Y"]);
    println!("✓ 存储端聚合与分类列表");
}

#[tokio::test]
async fn test_checked_update_rejects_without_writing() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let repo = create_test_repo(&db_path);

    let created = repo
        .insert_one(create_test_record("Classeur", "Bureau", 8, 3.5, 2))
        .await
        .unwrap();

    let guard = |merged: &Product| {
        if merged.quantity > 100 {
            Err(vec!["trop de stock".to_string()])
        } else {
            Ok(())
        }
    };

    let outcome = repo
        .update_checked(
            &created.id,
            ProductPatch {
                quantity: Some(500),
                ..Default::default()
            },
            &guard,
        )
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Rejected(vec!["trop de stock".to_string()]));
    assert_eq!(repo.find_by_id(&created.id).await.unwrap().unwrap(), created);

    let outcome = repo
        .update_checked(
            &created.id,
            ProductPatch {
                quantity: Some(50),
                ..Default::default()
            },
            &guard,
        )
        .await
        .unwrap();
    match outcome {
        UpdateOutcome::Updated(product) => assert_eq!(product.quantity, 50),
        other => panic!("期望 Updated，实际: {:?}", other),
    }

    let outcome = repo
        .update_checked(&ProductId::generate(), ProductPatch::default(), &guard)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::NotFound);
    println!("✓ 带检查的更新: 拒绝时不写入");
}
