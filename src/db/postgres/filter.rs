//! 목록 조회 필터 (PostgreSQL)
//!
//! SQLite 쪽 필터와 같은 의미입니다.
//! - 제목: `strpos(d.title, $n) > 0`, 대소문자를 구분하고 `%`, `_`를 글자 그대로 봅니다.
//! - 태그: 주어진 라벨 중 하나라도 달린 문서 (OR). 라벨 목록은 배열 하나로 바인딩합니다.

use crate::models::ListDocumentsRequest;
use sqlx::{Postgres, QueryBuilder};

/// 요청의 필터를 WHERE 절로 쿼리 빌더에 덧붙입니다.
pub fn push_document_filter(qb: &mut QueryBuilder<'_, Postgres>, request: &ListDocumentsRequest) {
    qb.push(" WHERE 1 = 1");

    if let Some(title) = request.title_filter() {
        qb.push(" AND strpos(d.title, ");
        qb.push_bind(title.to_string());
        qb.push(") > 0");
    }

    if !request.tags.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM document_tags dt \
             JOIN tags t ON t.id = dt.tag_id \
             WHERE dt.document_id = d.id AND t.tag = ANY(",
        );
        qb.push_bind(request.tags.clone());
        qb.push("))");
    }
}
