//! 문서 종류(`document_kinds`) 쿼리.
//!
//! 종류 이름은 UNIQUE가 아니므로, 같은 이름이 여러 행이면 가장 먼저 만든 행을 씁니다.

use sqlx::SqliteConnection;

pub async fn find_or_create_kind(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, sqlx::Error> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM document_kinds WHERE name = ? ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

    match existing {
        Some((id,)) => Ok(id),
        None => {
            let result = sqlx::query("INSERT INTO document_kinds (name) VALUES (?)")
                .bind(name)
                .execute(&mut *conn)
                .await?;
            Ok(result.last_insert_rowid())
        }
    }
}
