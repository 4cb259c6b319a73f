//! # PostgreSQL 카탈로그 구현
//!
//! `sqlx`의 PostgreSQL 연결 풀 위에서 `Catalog` 트레이트를 구현합니다.
//! 테이블 구성은 SQLite 구현과 같고, 스키마는 `migrations/postgres/`에 있습니다.
//!
//! SQLite와 다른 점:
//! - 쓰기가 동시에 일어나므로 태그/저자는 `ON CONFLICT ... RETURNING`으로 한 문장에 찾거나 만듭니다.
//! - 목록 조회 트랜잭션은 `REPEATABLE READ`로 열어 건수와 페이지가 같은 스냅샷을 봅니다.

pub mod documents;
pub mod filter;
pub mod relations;

use super::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Document, ListDocumentsRequest, ListDocumentsResponse, NewDocument};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");

/// PostgreSQL 기반 카탈로그 저장소
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// 이미 만들어진 연결 풀로 저장소를 만듭니다.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `postgres://` URL로 연결 풀을 엽니다. 스키마는 `initialize()`가 만듭니다.
    pub async fn connect(database_url: &str, max_connections: u32) -> CatalogResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::debug!("Opened PostgreSQL pool ({} connections max)", max_connections);
        Ok(Self::new(pool))
    }

    /// 내부 연결 풀. 스키마 밖의 점검 쿼리(테스트 등)에 씁니다.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn initialize(&self) -> CatalogResult<()> {
        tracing::info!("Running catalog schema migrations (postgres)...");
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

    async fn close(&self) {
        self.pool.close().await;
    }
}
