//! # 목록 조회 필터
//!
//! 전체 건수(`COUNT(*)`) 쿼리와 페이지 쿼리는 반드시 같은 WHERE 절을 써야
//! `totalElements`/`pages`가 실제 페이지 내용과 맞습니다.
//! 그래서 조건절은 이 모듈 한 곳에서만 만듭니다.
//!
//! 두 쿼리 모두 `documents` 테이블을 별칭 `d`로 참조해야 합니다.
//!
//! ## 필터 의미
//! - 제목: `instr(d.title, ?) > 0` — 대소문자를 구분하는 부분 문자열 일치.
//!   `LIKE`와 달리 `%`, `_`가 와일드카드로 해석되지 않습니다.
//! - 태그: 주어진 라벨 중 **하나라도** 달린 문서 (OR).
//!   JOIN 대신 EXISTS를 써서 태그가 여러 개 일치해도 문서가 중복되지 않습니다.

use crate::models::ListDocumentsRequest;
use sqlx::{QueryBuilder, Sqlite};

/// 요청의 필터를 WHERE 절로 쿼리 빌더에 덧붙입니다.
pub fn push_document_filter(qb: &mut QueryBuilder<'_, Sqlite>, request: &ListDocumentsRequest) {
    qb.push(" WHERE 1 = 1");

    if let Some(title) = request.title_filter() {
        qb.push(" AND instr(d.title, ");
        qb.push_bind(title.to_string());
        qb.push(") > 0");
    }

    if !request.tags.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM document_tags dt \
             JOIN tags t ON t.id = dt.tag_id \
             WHERE dt.document_id = d.id AND t.tag IN (",
        );
        let mut labels = qb.separated(", ");
        for tag in &request.tags {
            labels.push_bind(tag.clone());
        }
        labels.push_unseparated("))");
    }
}
