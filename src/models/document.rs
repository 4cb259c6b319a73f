//! # 문서 모델 정의
//!
//! - `Document`: 태그와 저자가 모두 채워진 조회 결과 (응답용)
//! - `DocumentKind`: 문서 종류 (예: "file", "web")
//! - `NewDocument`: 문서 삽입 요청. 클라이언트는 ID를 넘기지 않습니다.

use super::{Author, NewAuthor, Tag};
use crate::error::{CatalogError, CatalogResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 문서 종류 — `document_kinds` 테이블의 한 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentKind {
    pub id: i64,
    pub name: String,
}

/// 카탈로그에 저장된 문서
///
/// 응답 JSON은 camelCase를 사용합니다. (`createdAt`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// 저장소가 삽입 시 부여한 ID (이후 변경되지 않음)
    pub id: i64,
    pub title: String,
    pub uri: String,
    /// 문서 종류. 지정하지 않은 문서는 None
    pub kind: Option<DocumentKind>,
    pub authors: Vec<Author>,
    pub tags: Vec<Tag>,
    /// 삽입 시각 (UTC)
    pub created_at: DateTime<Utc>,
}

/// 문서 삽입 요청 — `POST /catalog/documents`의 요청 본문
///
/// `title`과 `uri`가 Option인 이유: 누락된 필드를 역직렬화 단계가 아니라
/// 저장소의 검증 단계에서 `Validation` 에러로 거절하기 위해서입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: Option<String>,
    pub uri: Option<String>,
    /// 문서 종류 이름 (선택)
    pub kind: Option<String>,
    #[serde(default)]
    pub authors: Vec<NewAuthor>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewDocument {
    /// 제목과 URI만 채운 요청을 만듭니다.
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_authors<I>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = NewAuthor>,
    {
        self.authors = authors.into_iter().collect();
        self
    }

    /// 저장 전에 요청을 검증하고, 검증을 통과한 필수 필드를 돌려줍니다.
    ///
    /// 공백만 있는 값은 누락으로 취급합니다.
    pub fn validate(&self) -> CatalogResult<(&str, &str)> {
        let title = required(self.title.as_deref(), "title")?;
        let uri = required(self.uri.as_deref(), "uri")?;

        if let Some(kind) = &self.kind {
            if kind.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "kind must not be blank when present".to_string(),
                ));
            }
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(CatalogError::Validation(
                "tags must not contain blank labels".to_string(),
            ));
        }
        if self.authors.iter().any(|a| a.name.trim().is_empty()) {
            return Err(CatalogError::Validation(
                "author name is required".to_string(),
            ));
        }

        Ok((title, uri))
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> CatalogResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CatalogError::Validation(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_title_or_uri_is_rejected() {
        let no_title = NewDocument {
            uri: Some("file://a.txt".into()),
            ..NewDocument::default()
        };
        let no_uri = NewDocument {
            title: Some("A".into()),
            ..NewDocument::default()
        };
        let blank_title = NewDocument::new("   ", "file://a.txt");

        for doc in [no_title, no_uri, blank_title] {
            assert!(matches!(doc.validate(), Err(CatalogError::Validation(_))));
        }
    }

    #[test]
    fn blank_tag_or_author_is_rejected() {
        let doc = NewDocument::new("A", "file://a.txt").with_tags(["ok", " "]);
        assert!(matches!(doc.validate(), Err(CatalogError::Validation(_))));

        let doc = NewDocument::new("A", "file://a.txt").with_authors([NewAuthor::new("", "X")]);
        assert!(matches!(doc.validate(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn request_body_defaults_empty_relations() {
        let doc: NewDocument =
            serde_json::from_str(r#"{"title":"T","uri":"web://t"}"#).unwrap();
        assert!(doc.tags.is_empty());
        assert!(doc.authors.is_empty());
        assert_eq!(doc.validate().unwrap(), ("T", "web://t"));
    }

    #[test]
    fn author_surname_is_optional_in_json() {
        let doc: NewDocument = serde_json::from_str(
            r#"{"title":"T","uri":"u","authors":[{"name":"Author"}],"tags":["book"]}"#,
        )
        .unwrap();
        assert_eq!(doc.authors, vec![NewAuthor::new("Author", "")]);
    }
}
