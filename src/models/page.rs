//! # 목록 조회 필터와 페이지네이션
//!
//! `page`는 1부터 시작합니다. 실제 오프셋은 `(page - 1) * page_size`입니다.
//! 두 값 중 하나라도 0이면 `Validation` 에러로 거절합니다. (0으로 나누기 방지)
//! 오프셋이 SQL 정수(`i64`) 범위를 넘는 조합도 같은 에러로 거절합니다.

use super::Document;
use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// 페이지 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if self.page == 0 {
            return Err(CatalogError::Validation(
                "page must be a positive number".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(CatalogError::Validation(
                "page_size must be a positive number".to_string(),
            ));
        }
        self.offset().map(|_| ())
    }

    /// SQL `OFFSET`에 들어갈 값
    ///
    /// u32 두 개의 곱은 u64에 항상 들어가지만 i64에는 들어가지 않을 수 있습니다.
    pub fn offset(&self) -> CatalogResult<i64> {
        self.page
            .checked_sub(1)
            .and_then(|skipped| u64::from(skipped).checked_mul(u64::from(self.page_size)))
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or_else(|| {
                CatalogError::Validation(format!(
                    "page {} with page_size {} is out of range",
                    self.page, self.page_size
                ))
            })
    }

    /// SQL `LIMIT`에 들어갈 값
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// 전체 건수로부터 페이지 수를 계산합니다. (올림 나눗셈)
    pub fn page_count(&self, total_elements: u64) -> u64 {
        total_elements.div_ceil(u64::from(self.page_size))
    }
}

/// 목록 조회 요청
///
/// - `title`: 제목 부분 문자열 (대소문자 구분)
/// - `tags`: 이 중 하나라도 달린 문서만 통과 (OR)
///
/// 비어 있는 필터는 모든 문서와 일치합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDocumentsRequest {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub pagination: Pagination,
}

impl ListDocumentsRequest {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
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

    /// 실제로 적용할 제목 필터. 빈 문자열은 필터 없음으로 취급합니다.
    pub fn title_filter(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// 목록 응답에 포함되는 페이지 메타데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 페이지네이션을 무시한 전체 일치 건수
    pub total_elements: u64,
    /// 요청한 페이지 번호 (그대로 돌려줌)
    pub page: u32,
    /// `ceil(total_elements / page_size)`
    pub pages: u64,
}

/// 목록 조회 결과
///
/// JSON 형태: `{ "items": [...], "totalElements": 10, "page": 1, "pages": 5 }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDocumentsResponse {
    pub items: Vec<Document>,
    #[serde(flatten)]
    pub pagination: PageInfo,
}
