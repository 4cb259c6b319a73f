//! # 데이터 모델 모듈
//!
//! 카탈로그에서 사용하는 데이터 구조체들을 정의합니다.
//! - `document`: 문서(Document)와 문서 종류(DocumentKind), 삽입 요청
//! - `tag`: 태그
//! - `author`: 저자
//! - `page`: 목록 조회 필터와 페이지네이션
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Document`처럼 짧게 접근합니다.

pub mod author;
pub mod document;
pub mod page;
pub mod tag;

pub use author::*;
pub use document::*;
pub use page::*;
pub use tag::*;
