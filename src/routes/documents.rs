//! # 카탈로그 문서 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /catalog/documents`      → 문서 삽입, `201 { "id": n }`
//! - `GET  /catalog/documents`      → 필터 + 페이지네이션 목록
//! - `GET  /catalog/documents/{id}` → 단일 문서 조회
//!
//! 목록 조회 쿼리 파라미터:
//! - `title`: 제목 부분 문자열
//! - `tags`: 여러 번 반복 가능 (`?tags=a&tags=b`), 하나라도 달린 문서가 일치
//! - `page`, `page_size`: 1부터 시작하는 페이지 번호와 크기 (기본값 1, 100)
//!
//! 모든 저장소 호출은 `AppState::request_timeout` 안에 끝나야 하며,
//! 넘기면 504로 응답합니다.

use crate::{
    db::Catalog,
    error::AppError,
    models::*,
    services::with_deadline,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

/// 애플리케이션 공유 상태
///
/// `Arc<dyn Catalog>`: 저장소 구현을 트레이트 객체로 들고 있어서,
/// 테스트나 다른 백엔드로 바꿔 끼울 수 있습니다. clone해도 Arc 카운트만 늘어납니다.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    /// 저장소 호출 한 번에 허용하는 시간
    pub request_timeout: Duration,
    /// 있으면 요청 지표를 수집하고 `/metrics`로 내보냅니다.
    pub metrics: Option<PrometheusHandle>,
}

/// `POST /catalog/documents` — 새 문서를 저장합니다.
///
/// 필수 필드(`title`, `uri`)가 빠지면 저장소가 `Validation` 에러를 내고 400이 됩니다.
pub async fn insert_document(
    State(state): State<AppState>,
    Json(req): Json<NewDocument>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = with_deadline(state.request_timeout, state.catalog.insert_document(&req)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// `GET /catalog/documents/{id}` — 단일 문서를 조회합니다.
///
/// 숫자가 아닌 ID는 `Path` 추출 단계에서 400으로 거절됩니다.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Document>, AppError> {
    let document = with_deadline(state.request_timeout, state.catalog.get_document(id)).await?;
    Ok(Json(document))
}

/// `GET /catalog/documents` — 문서 목록을 조회합니다.
///
/// `tags`는 반복되는 키이므로 구조체 대신 (키, 값) 쌍 목록으로 받아 직접 해석합니다.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ListDocumentsResponse>, AppError> {
    let request = parse_list_query(params)?;
    let response =
        with_deadline(state.request_timeout, state.catalog.list_documents(&request)).await?;
    Ok(Json(response))
}

/// 쿼리 파라미터 쌍을 `ListDocumentsRequest`로 변환합니다.
///
/// 알 수 없는 키는 무시합니다. `page`/`page_size`가 숫자가 아니면 400.
/// 0은 여기서 통과시키고 저장소의 검증에 맡깁니다.
pub fn parse_list_query(params: Vec<(String, String)>) -> Result<ListDocumentsRequest, AppError> {
    let mut request = ListDocumentsRequest::default();

    for (key, value) in params {
        match key.as_str() {
            "title" => {
                // 첫 번째 값만 사용합니다.
                if request.title.is_none() && !value.is_empty() {
                    request.title = Some(value);
                }
            }
            "tags" => request.tags.push(value),
            "page" => request.pagination.page = parse_number("page", &value)?,
            "page_size" => request.pagination.page_size = parse_number("page_size", &value)?,
            _ => {}
        }
    }

    Ok(request)
}

fn parse_number(name: &str, value: &str) -> Result<u32, AppError> {
    value.parse().map_err(|_| {
        AppError::BadRequest(format!("invalid '{}' parameter value: {}", name, value))
    })
}
