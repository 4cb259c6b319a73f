//! # 데이터베이스 접근 계층 (Catalog Store)
//!
//! 문서와 그 다대다 관계(태그, 저자)를 저장하고,
//! 필터와 페이지네이션이 적용된 조회에 답하는 저장소 계층입니다.
//!
//! 각 하위 모듈:
//! - `sqlite`: 파일 하나로 동작하는 임베디드 구현 (기본)
//! - `postgres`: 클라이언트/서버 데이터베이스 구현
//!
//! 두 구현 모두 같은 내부 구성을 가집니다.
//! - `documents`: 문서 삽입/단건 조회/목록 조회 쿼리
//! - `filter`: 목록 조회의 건수 쿼리와 페이지 쿼리가 공유하는 WHERE 절
//! - 태그/저자/종류: 자연 키 조회/생성과 일괄 로딩
//!
//! 저장소는 연결 풀 외에 어떤 가변 상태도 갖지 않습니다.
//! 삽입의 원자성과 건수/페이지의 일관성은 트랜잭션에 맡깁니다.

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresCatalog;
pub use sqlite::SqliteCatalog;

use crate::error::CatalogResult;
use crate::models::{
    Author, Document, DocumentKind, ListDocumentsRequest, ListDocumentsResponse, NewDocument, Tag,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// 전송 계층(HTTP 등)이 사용하는 카탈로그 저장소 계약
///
/// 모든 연산은 요청 단위의 단발 호출입니다. 반환된 future를 drop하면 연산이
/// 취소되며, 진행 중이던 삽입 트랜잭션은 롤백됩니다. 시간 제한은
/// [`crate::services::deadline::with_deadline`]으로 씌웁니다.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 스키마가 없으면 만듭니다. 여러 번 호출해도 안전합니다.
    async fn initialize(&self) -> CatalogResult<()>;

    /// 새 문서를 저장하고 부여된 ID를 돌려줍니다.
    async fn insert_document(&self, document: &NewDocument) -> CatalogResult<i64>;

    /// 태그와 저자가 채워진 문서를 조회합니다. 없으면 `NotFound`.
    async fn get_document(&self, id: i64) -> CatalogResult<Document>;

    /// 필터와 페이지네이션을 적용한 문서 목록을 조회합니다.
    async fn list_documents(
        &self,
        request: &ListDocumentsRequest,
    ) -> CatalogResult<ListDocumentsResponse>;

    /// 연결을 정리합니다. 이후의 호출은 `Storage` 에러가 됩니다.
    async fn close(&self) {}
}

/// `documents` 테이블 한 행 (관계가 채워지기 전)
///
/// 두 백엔드의 조회 쿼리가 같은 컬럼 이름으로 돌려줍니다.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DocumentRow {
    pub id: i64,
    pub title: String,
    pub uri: String,
    pub document_kind_id: Option<i64>,
    pub kind_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 문서 행들에 미리 불러온 태그와 저자를 붙입니다. 행의 순서는 그대로 유지됩니다.
pub(crate) fn assemble_documents(
    rows: Vec<DocumentRow>,
    mut tags_by_document: HashMap<i64, Vec<Tag>>,
    mut authors_by_document: HashMap<i64, Vec<Author>>,
) -> Vec<Document> {
    rows.into_iter()
        .map(|row| {
            let kind = match (row.document_kind_id, row.kind_name) {
                (Some(id), Some(name)) => Some(DocumentKind { id, name }),
                _ => None,
            };
            Document {
                id: row.id,
                title: row.title,
                uri: row.uri,
                kind,
                authors: authors_by_document.remove(&row.id).unwrap_or_default(),
                tags: tags_by_document.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
            }
        })
        .collect()
}
