//! # 문서 데이터베이스 쿼리 모듈
//!
//! `documents` 테이블에 대한 삽입, 단건 조회, 목록 조회 함수들입니다.
//! 문서는 한 번 저장되면 바뀌지 않으므로 수정/삭제 쿼리는 없습니다.
//!
//! 모든 함수는 `async`이며 `SqlitePool`을 받아 데이터베이스와 상호작용합니다.

use super::{authors, filter, kinds, tags};
use crate::db::{assemble_documents, DocumentRow};
use crate::error::{CatalogError, CatalogResult};
use crate::models::*;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

// 목록/단건 조회가 공유하는 SELECT 절.
// 문서 종류는 LEFT JOIN으로 함께 가져옵니다. (종류가 없는 문서도 포함)
const DOCUMENT_COLUMNS: &str = r#"
    SELECT d.id, d.title, d.uri, d.document_kind_id, k.name AS kind_name, d.created_at
    FROM documents d
    LEFT JOIN document_kinds k ON k.id = d.document_kind_id
"#;

/// 새 문서를 저장하고 부여된 ID를 반환합니다.
///
/// ## 처리 흐름 (하나의 트랜잭션)
/// 1. 문서 행 삽입 → ID와 생성 시각 부여
/// 2. 문서 종류를 이름으로 찾거나 만들어 연결
/// 3. 태그/저자를 자연 키로 찾거나 만들고 관계 테이블에 연결
/// 4. 커밋
///
/// 중간에 하나라도 실패하면 `tx`가 커밋 없이 drop되어 전체가 롤백됩니다.
/// 호출자가 future를 drop(취소)해도 마찬가지입니다.
pub async fn insert_document(pool: &SqlitePool, document: &NewDocument) -> CatalogResult<i64> {
    let (title, uri) = document.validate()?;

    let mut tx = pool.begin().await?;

    // 첫 문장을 쓰기로 시작해야 SQLite가 곧바로 쓰기 잠금을 잡습니다.
    // (읽기로 시작한 트랜잭션은 나중에 쓰기로 올라갈 때 SQLITE_BUSY가 날 수 있음)
    let created_at = Utc::now();
    let document_id = sqlx::query("INSERT INTO documents (title, uri, created_at) VALUES (?, ?, ?)")
        .bind(title)
        .bind(uri)
        .bind(created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    if let Some(kind) = &document.kind {
        let kind_id = kinds::find_or_create_kind(&mut *tx, kind).await?;
        sqlx::query("UPDATE documents SET document_kind_id = ? WHERE id = ?")
            .bind(kind_id)
            .bind(document_id)
            .execute(&mut *tx)
            .await?;
    }

    for label in &document.tags {
        let tag_id = tags::find_or_create_tag(&mut *tx, label).await?;
        tags::link_tag(&mut *tx, document_id, tag_id).await?;
    }

    for author in &document.authors {
        let author_id = authors::find_or_create_author(&mut *tx, author).await?;
        authors::link_author(&mut *tx, document_id, author_id).await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Inserted document {} ({} tags, {} authors)",
        document_id,
        document.tags.len(),
        document.authors.len()
    );
    Ok(document_id)
}

/// ID로 단일 문서를 조회합니다. 태그와 저자를 함께 불러옵니다.
///
/// # 반환값
/// - `Ok(Document)`: 문서를 찾은 경우
/// - `Err(CatalogError::NotFound)`: 해당 ID의 문서가 없는 경우
pub async fn get_document(pool: &SqlitePool, id: i64) -> CatalogResult<Document> {
    let mut conn = pool.acquire().await?;

    let row = sqlx::query_as::<_, DocumentRow>(&format!("{DOCUMENT_COLUMNS} WHERE d.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(CatalogError::NotFound(id))?;

    let mut documents = attach_relations(&mut *conn, vec![row]).await?;
    tracing::debug!("Loaded document {}", id);
    documents.pop().ok_or(CatalogError::NotFound(id))
}

/// 필터와 페이지네이션을 적용한 문서 목록을 조회합니다.
///
/// 전체 건수와 페이지를 같은 읽기 트랜잭션에서 같은 조건절로 조회하므로,
/// 동시에 삽입이 일어나도 `totalElements`와 페이지 내용이 어긋나지 않습니다.
///
/// 정렬: 제목 오름차순, 제목이 같으면 ID 오름차순 (페이지를 잘라도 순서가 안정적)
pub async fn list_documents(
    pool: &SqlitePool,
    request: &ListDocumentsRequest,
) -> CatalogResult<ListDocumentsResponse> {
    let pagination = request.pagination;
    pagination.validate()?;
    let offset = pagination.offset()?;

    let mut tx = pool.begin().await?;

    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM documents d");
    filter::push_document_filter(&mut count_query, request);
    let total: i64 = count_query
        .build_query_scalar()
        .fetch_one(&mut *tx)
        .await?;
    // COUNT(*)는 음수가 될 수 없습니다.
    let total_elements = u64::try_from(total).unwrap_or_default();

    let mut page_query = QueryBuilder::<Sqlite>::new(DOCUMENT_COLUMNS);
    filter::push_document_filter(&mut page_query, request);
    page_query.push(" ORDER BY d.title ASC, d.id ASC LIMIT ");
    page_query.push_bind(pagination.limit());
    page_query.push(" OFFSET ");
    page_query.push_bind(offset);

    let rows: Vec<DocumentRow> = page_query.build_query_as().fetch_all(&mut *tx).await?;
    let items = attach_relations(&mut *tx, rows).await?;

    tx.commit().await?;

    tracing::debug!(
        "Listed {} of {} documents (page {}, size {})",
        items.len(),
        total_elements,
        pagination.page,
        pagination.page_size
    );

    Ok(ListDocumentsResponse {
        items,
        pagination: PageInfo {
            total_elements,
            page: pagination.page,
            pages: pagination.page_count(total_elements),
        },
    })
}

/// 문서 행들에 태그와 저자를 채워 `Document`로 변환합니다.
///
/// 관계는 관계 종류마다 쿼리 한 번으로 불러옵니다.
async fn attach_relations(
    conn: &mut SqliteConnection,
    rows: Vec<DocumentRow>,
) -> Result<Vec<Document>, sqlx::Error> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let tags_by_document = tags::tags_for_documents(conn, &ids).await?;
    let authors_by_document = authors::authors_for_documents(conn, &ids).await?;

    Ok(assemble_documents(rows, tags_by_document, authors_by_document))
}
