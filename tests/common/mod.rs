#![allow(dead_code)]

use doc_catalog::models::{NewAuthor, NewDocument};
use doc_catalog::{Catalog, SqliteCatalog};
use tempfile::TempDir;

/// 임시 디렉토리의 SQLite 파일 위에 스키마까지 만든 카탈로그.
/// `_dir`이 drop되면 데이터베이스 파일도 지워집니다.
pub struct TestCatalog {
    pub catalog: SqliteCatalog,
    _dir: TempDir,
}

pub async fn test_catalog() -> TestCatalog {
    let test = unmigrated_catalog().await;
    test.catalog.initialize().await.unwrap();
    test
}

pub async fn unmigrated_catalog() -> TestCatalog {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("catalog.db").display());
    let catalog = SqliteCatalog::connect(&url, 5).await.unwrap();
    TestCatalog { catalog, _dir: dir }
}

pub async fn count_rows(catalog: &SqliteCatalog, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(catalog.pool())
        .await
        .unwrap()
}

pub async fn insert_tagged(catalog: &SqliteCatalog, title: &str, tags: &[&str]) -> i64 {
    let doc = NewDocument::new(title, format!("file://{}.txt", title.replace(' ', "_")))
        .with_tags(tags.iter().copied())
        .with_authors([NewAuthor::new("Author", "")]);
    catalog.insert_document(&doc).await.unwrap()
}
