//! 문서 삽입/단건 조회/목록 조회 (PostgreSQL)

use super::{filter, relations};
use crate::db::{assemble_documents, DocumentRow};
use crate::error::{CatalogError, CatalogResult};
use crate::models::*;
use chrono::Utc;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

const DOCUMENT_COLUMNS: &str = r#"
    SELECT d.id, d.title, d.uri, d.document_kind_id, k.name AS kind_name, d.created_at
    FROM documents d
    LEFT JOIN document_kinds k ON k.id = d.document_kind_id
"#;

/// 새 문서를 저장하고 부여된 ID를 반환합니다.
///
/// 문서 행, 종류, 태그/저자 연결이 하나의 트랜잭션입니다.
/// 중간에 실패하거나 future가 drop되면 `tx`가 커밋 없이 drop되어 롤백됩니다.
pub async fn insert_document(pool: &PgPool, document: &NewDocument) -> CatalogResult<i64> {
    let (title, uri) = document.validate()?;

    let mut tx = pool.begin().await?;

    let kind_id = match &document.kind {
        Some(kind) => Some(relations::find_or_create_kind(&mut *tx, kind).await?),
        None => None,
    };

    let document_id: i64 = sqlx::query_scalar(
        "INSERT INTO documents (title, uri, document_kind_id, created_at) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(title)
    .bind(uri)
    .bind(kind_id)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    // 동시에 삽입하는 트랜잭션끼리 같은 순서로 행 잠금을 잡도록 정렬합니다. (교착 방지)
    let mut labels: Vec<&str> = document.tags.iter().map(String::as_str).collect();
    labels.sort_unstable();
    labels.dedup();
    let mut authors: Vec<&NewAuthor> = document.authors.iter().collect();
    authors.sort_unstable_by(|a, b| (&a.name, &a.surname).cmp(&(&b.name, &b.surname)));

    for label in labels {
        let tag_id = relations::find_or_create_tag(&mut *tx, label).await?;
        relations::link_tag(&mut *tx, document_id, tag_id).await?;
    }

    for author in authors {
        let author_id = relations::find_or_create_author(&mut *tx, author).await?;
        relations::link_author(&mut *tx, document_id, author_id).await?;
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

pub async fn get_document(pool: &PgPool, id: i64) -> CatalogResult<Document> {
    let mut conn = pool.acquire().await?;

    let row = sqlx::query_as::<_, DocumentRow>(&format!("{DOCUMENT_COLUMNS} WHERE d.id = $1"))
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
/// `READ COMMITTED`(기본값)에서는 문장마다 스냅샷이 달라지므로,
/// 건수와 페이지가 같은 데이터를 보도록 `REPEATABLE READ`로 엽니다.
pub async fn list_documents(
    pool: &PgPool,
    request: &ListDocumentsRequest,
) -> CatalogResult<ListDocumentsResponse> {
    let pagination = request.pagination;
    pagination.validate()?;
    let offset = pagination.offset()?;

    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents d");
    filter::push_document_filter(&mut count_query, request);
    let total: i64 = count_query
        .build_query_scalar()
        .fetch_one(&mut *tx)
        .await?;
    let total_elements = u64::try_from(total).unwrap_or_default();

    let mut page_query = QueryBuilder::<Postgres>::new(DOCUMENT_COLUMNS);
    filter::push_document_filter(&mut page_query, request);
    // 바이트 순서 정렬 (SQLite의 기본 BINARY 정렬과 같음)
    page_query.push(r#" ORDER BY d.title COLLATE "C" ASC, d.id ASC LIMIT "#);
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

async fn attach_relations(
    conn: &mut PgConnection,
    rows: Vec<DocumentRow>,
) -> Result<Vec<Document>, sqlx::Error> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let tags_by_document = relations::tags_for_documents(conn, &ids).await?;
    let authors_by_document = relations::authors_for_documents(conn, &ids).await?;

    Ok(assemble_documents(rows, tags_by_document, authors_by_document))
}
