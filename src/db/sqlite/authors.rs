//! # 저자 데이터베이스 쿼리 모듈
//!
//! 태그와 같은 방식으로, (name, surname) 쌍을 자연 키로 저자를 찾거나 만들고
//! `document_authors` 관계 테이블로 문서와 연결합니다.

use crate::models::{Author, NewAuthor};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

/// (name, surname)으로 저자를 찾고, 없으면 새로 만들어 ID를 반환합니다.
pub async fn find_or_create_author(
    conn: &mut SqliteConnection,
    author: &NewAuthor,
) -> Result<i64, sqlx::Error> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM authors WHERE name = ? AND surname = ?")
            .bind(&author.name)
            .bind(&author.surname)
            .fetch_optional(&mut *conn)
            .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let result = sqlx::query("INSERT INTO authors (name, surname) VALUES (?, ?)")
        .bind(&author.name)
        .bind(&author.surname)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn link_author(
    conn: &mut SqliteConnection,
    document_id: i64,
    author_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO document_authors (document_id, author_id) VALUES (?, ?)")
        .bind(document_id)
        .bind(author_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// 여러 문서의 저자를 한 번의 쿼리로 불러옵니다. (성, 이름 순)
pub async fn authors_for_documents(
    conn: &mut SqliteConnection,
    document_ids: &[i64],
) -> Result<HashMap<i64, Vec<Author>>, sqlx::Error> {
    let mut by_document: HashMap<i64, Vec<Author>> = HashMap::new();
    if document_ids.is_empty() {
        return Ok(by_document);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT da.document_id, a.id, a.name, a.surname \
         FROM document_authors da \
         JOIN authors a ON a.id = da.author_id \
         WHERE da.document_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in document_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY a.surname, a.name");

    let rows: Vec<(i64, i64, String, String)> =
        qb.build_query_as().fetch_all(&mut *conn).await?;
    for (document_id, id, name, surname) in rows {
        by_document
            .entry(document_id)
            .or_default()
            .push(Author { id, name, surname });
    }

    Ok(by_document)
}
