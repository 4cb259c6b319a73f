//! # 태그 모델 정의
//!
//! 태그는 문서를 분류하는 텍스트 라벨입니다.
//! 같은 라벨은 카탈로그 전체에서 한 행만 존재하며 여러 문서가 공유합니다.

use serde::{Deserialize, Serialize};

/// 태그 엔티티 — DB의 `tags` 테이블 한 행(row)에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 저장소가 부여한 정수 식별자
    pub id: i64,
    /// 태그 라벨 (자연 키, 예: "book")
    pub tag: String,
}
