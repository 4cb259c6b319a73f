use serde::{Deserialize, Serialize};

/// 저자 엔티티 — `authors` 테이블의 한 행. (name, surname) 쌍이 자연 키입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

/// 문서 삽입 요청에 포함되는 저자 정보
///
/// 성(surname)은 생략할 수 있으며, 생략하면 빈 문자열로 저장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub surname: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
        }
    }
}
