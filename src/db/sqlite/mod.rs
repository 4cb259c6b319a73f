//! # SQLite 카탈로그 구현
//!
//! `sqlx`의 SQLite 연결 풀 위에서 `Catalog` 트레이트를 구현합니다.
//! 스키마는 `migrations/sqlite/` 폴더의 SQL을 컴파일 타임에 포함시켜 적용합니다.

pub mod authors;
pub mod documents;
pub mod filter;
pub mod kinds;
pub mod tags;

use super::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Document, ListDocumentsRequest, ListDocumentsResponse, NewDocument};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

// sqlx::migrate!: ./migrations/sqlite 폴더의 SQL 파일들을 바이너리에 포함시킵니다.
// 이미 적용된 마이그레이션은 `_sqlx_migrations` 테이블로 추적되어 다시 실행되지 않습니다.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// SQLite 기반 카탈로그 저장소
///
/// `SqlitePool`은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// 이미 만들어진 연결 풀로 저장소를 만듭니다.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `sqlite:` URL로 연결 풀을 열고 저장소를 만듭니다.
    ///
    /// 데이터베이스 파일이 없으면 새로 만들고, 외래 키 검사와 WAL 저널을 켭니다.
    /// 스키마는 만들지 않으므로 이어서 `initialize()`를 호출해야 합니다.
    pub async fn connect(database_url: &str, max_connections: u32) -> CatalogResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::debug!("Opened SQLite pool ({} connections max)", max_connections);
        Ok(Self::new(pool))
    }

    /// 내부 연결 풀. 스키마 밖의 점검 쿼리(테스트 등)에 씁니다.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn initialize(&self) -> CatalogResult<()> {
        tracing::info!("Running catalog schema migrations...");
        MIGRATOR.run(&self.pool).await.map_err(|err| {
            tracing::error!("Catalog schema initialization failed: {}", err);
            CatalogError::from(err)
        })?;
        Ok(())
    }

    async fn insert_document(&self, document: &NewDocument) -> CatalogResult<i64> {
        documents::insert_document(&self.pool, document).await
    }

    async fn get_document(&self, id: i64) -> CatalogResult<Document> {
        documents::get_document(&self.pool, id).await
    }

    async fn list_documents(
        &self,
        request: &ListDocumentsRequest,
    ) -> CatalogResult<ListDocumentsResponse> {
        documents::list_documents(&self.pool, request).await
    }

    /// 풀을 닫습니다. 진행 중인 연결이 반환될 때까지 기다립니다.
    async fn close(&self) {
        self.pool.close().await;
    }
}
