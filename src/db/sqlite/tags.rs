//! # 태그 데이터베이스 쿼리 모듈
//!
//! 문서 삽입 트랜잭션 안에서 태그를 자연 키(라벨)로 찾거나 만들고,
//! 조회 시 여러 문서의 태그를 한 번에 불러옵니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, tag) — `tag`는 UNIQUE
//! - `document_tags`: 문서와 태그의 다대다(N:M) 관계 테이블

use crate::models::Tag;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

/// 라벨로 태그를 찾고, 없으면 새로 만들어 ID를 반환합니다.
///
/// `&mut SqliteConnection`을 받으므로 트랜잭션(`&mut *tx`)을 그대로 넘길 수 있습니다.
pub async fn find_or_create_tag(
    conn: &mut SqliteConnection,
    label: &str,
) -> Result<i64, sqlx::Error> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM tags WHERE tag = ?")
        .bind(label)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO tags (tag) VALUES (?)")
        .bind(label)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// 문서에 태그를 연결합니다.
///
/// `INSERT OR IGNORE`: 같은 요청에 같은 라벨이 두 번 들어와도
/// (document_id, tag_id) 복합키 충돌을 무시하여 한 번만 연결됩니다.
pub async fn link_tag(
    conn: &mut SqliteConnection,
    document_id: i64,
    tag_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO document_tags (document_id, tag_id) VALUES (?, ?)")
        .bind(document_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// 여러 문서의 태그를 한 번의 쿼리로 불러옵니다. (문서 ID → 태그 목록)
///
/// 문서마다 쿼리를 따로 날리는 N+1 문제를 피하기 위해 `IN (...)`으로 묶습니다.
/// 각 문서의 태그는 라벨순으로 정렬됩니다.
pub async fn tags_for_documents(
    conn: &mut SqliteConnection,
    document_ids: &[i64],
) -> Result<HashMap<i64, Vec<Tag>>, sqlx::Error> {
    let mut by_document: HashMap<i64, Vec<Tag>> = HashMap::new();
    if document_ids.is_empty() {
        return Ok(by_document);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT dt.document_id, t.id, t.tag \
         FROM document_tags dt \
         JOIN tags t ON t.id = dt.tag_id \
         WHERE dt.document_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in document_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY t.tag");

    let rows: Vec<(i64, i64, String)> = qb.build_query_as().fetch_all(&mut *conn).await?;
    for (document_id, id, tag) in rows {
        by_document
            .entry(document_id)
            .or_default()
            .push(Tag { id, tag });
    }

    Ok(by_document)
}
