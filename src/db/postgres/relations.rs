//! 태그, 저자, 문서 종류 쿼리 (PostgreSQL)
//!
//! 여러 트랜잭션이 같은 새 라벨을 동시에 만들 수 있으므로,
//! 태그와 저자는 `INSERT ... ON CONFLICT DO UPDATE ... RETURNING id` 한 문장으로
//! 찾거나 만듭니다. (`DO NOTHING`은 충돌 시 행을 돌려주지 않음)

use crate::models::{Author, NewAuthor, Tag};
use sqlx::PgConnection;
use std::collections::HashMap;

pub async fn find_or_create_tag(conn: &mut PgConnection, label: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO tags (tag) VALUES ($1) \
         ON CONFLICT (tag) DO UPDATE SET tag = EXCLUDED.tag \
         RETURNING id",
    )
    .bind(label)
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_or_create_author(
    conn: &mut PgConnection,
    author: &NewAuthor,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO authors (name, surname) VALUES ($1, $2) \
         ON CONFLICT (name, surname) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
    )
    .bind(&author.name)
    .bind(&author.surname)
    .fetch_one(&mut *conn)
    .await
}

/// 종류 이름은 UNIQUE가 아니므로 가장 먼저 만든 행을 재사용합니다.
pub async fn find_or_create_kind(conn: &mut PgConnection, name: &str) -> Result<i64, sqlx::Error> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM document_kinds WHERE name = $1 ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        Some(id) => Ok(id),
        None => {
            sqlx::query_scalar("INSERT INTO document_kinds (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&mut *conn)
                .await
        }
    }
}

/// 같은 요청에 같은 라벨이 두 번 와도 복합키 충돌을 무시해 한 번만 연결됩니다.
pub async fn link_tag(
    conn: &mut PgConnection,
    document_id: i64,
    tag_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO document_tags (document_id, tag_id) VALUES ($1, $2) \
         ON CONFLICT DO NOTHING",
    )
    .bind(document_id)
    .bind(tag_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn link_author(
    conn: &mut PgConnection,
    document_id: i64,
    author_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO document_authors (document_id, author_id) VALUES ($1, $2) \
         ON CONFLICT DO NOTHING",
    )
    .bind(document_id)
    .bind(author_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// 여러 문서의 태그를 한 번의 쿼리로 불러옵니다. (라벨순, 바이트 순서)
pub async fn tags_for_documents(
    conn: &mut PgConnection,
    document_ids: &[i64],
) -> Result<HashMap<i64, Vec<Tag>>, sqlx::Error> {
    let mut by_document: HashMap<i64, Vec<Tag>> = HashMap::new();
    if document_ids.is_empty() {
        return Ok(by_document);
    }

    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        "SELECT dt.document_id, t.id, t.tag \
         FROM document_tags dt \
         JOIN tags t ON t.id = dt.tag_id \
         WHERE dt.document_id = ANY($1) \
         ORDER BY t.tag COLLATE \"C\"",
    )
    .bind(document_ids)
    .fetch_all(&mut *conn)
    .await?;

    for (document_id, id, tag) in rows {
        by_document
            .entry(document_id)
            .or_default()
            .push(Tag { id, tag });
    }

    Ok(by_document)
}

/// 여러 문서의 저자를 한 번의 쿼리로 불러옵니다. (성, 이름 순)
pub async fn authors_for_documents(
    conn: &mut PgConnection,
    document_ids: &[i64],
) -> Result<HashMap<i64, Vec<Author>>, sqlx::Error> {
    let mut by_document: HashMap<i64, Vec<Author>> = HashMap::new();
    if document_ids.is_empty() {
        return Ok(by_document);
    }

    let rows: Vec<(i64, i64, String, String)> = sqlx::query_as(
        "SELECT da.document_id, a.id, a.name, a.surname \
         FROM document_authors da \
         JOIN authors a ON a.id = da.author_id \
         WHERE da.document_id = ANY($1) \
         ORDER BY a.surname COLLATE \"C\", a.name COLLATE \"C\"",
    )
    .bind(document_ids)
    .fetch_all(&mut *conn)
    .await?;

    for (document_id, id, name, surname) in rows {
        by_document
            .entry(document_id)
            .or_default()
            .push(Author { id, name, surname });
    }

    Ok(by_document)
}
