//! # 에러 처리 모듈
//!
//! 카탈로그에서 발생할 수 있는 에러 타입을 두 계층으로 나누어 정의합니다.
//!
//! - `CatalogError`: 저장소(Catalog Store) 계층의 에러. 호출자가 404/400/500을
//!   구분할 수 있도록 검증 실패, 조회 실패, 스키마 실패, 저장소 실패를 구분합니다.
//! - `AppError`: HTTP 계층의 에러. `IntoResponse`를 구현하여
//!   핸들러에서 `?`로 반환하면 자동으로 JSON 에러 응답이 됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// 카탈로그 저장소 연산이 반환하는 에러
///
/// 저장소는 에러를 내부에서 재시도하거나 삼키지 않습니다.
/// 모든 실패는 이 타입으로 호출자에게 그대로 전달됩니다.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 호출자가 넘긴 값이 전제 조건을 어김 (필수 필드 누락, 0 이하의 페이지 값 등)
    #[error("validation failed: {0}")]
    Validation(String),

    /// 해당 ID의 문서가 없음
    #[error("document {0} not found")]
    NotFound(i64),

    /// 초기화 단계에서 스키마를 만들거나 확인하지 못함
    #[error("schema error: {0}")]
    Schema(String),

    /// 그 밖의 모든 저장소 실패 (연결 끊김, 제약 조건 위반, 디스크 I/O 등)
    /// #[from]: sqlx 함수 결과에 `?`를 쓰면 자동으로 Storage로 변환됩니다.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// 호출자가 지정한 시간 안에 연산이 끝나지 않음
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl From<sqlx::migrate::MigrateError> for CatalogError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CatalogError::Schema(err.to_string())
    }
}

/// 저장소 계층 전용 Result 별칭
pub type CatalogResult<T> = Result<T, CatalogError>;

/// HTTP 계층에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 제한 시간 초과 (HTTP 504)
    #[error("Request timed out")]
    GatewayTimeout,
}

// 저장소 에러를 HTTP 에러로 옮깁니다.
// NotFound와 Validation은 클라이언트 잘못이므로 메시지를 그대로 돌려주고,
// 나머지는 내부 정보가 노출되지 않도록 Internal로 감쌉니다.
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::NotFound,
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::DeadlineExceeded(_) => AppError::GatewayTimeout,
            CatalogError::Schema(_) | CatalogError::Storage(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::GatewayTimeout => {
                tracing::warn!("Catalog call exceeded the request deadline");
                (StatusCode::GATEWAY_TIMEOUT, "timeout", self.to_string())
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_distinct_statuses() {
        let cases = [
            (CatalogError::NotFound(7), StatusCode::NOT_FOUND),
            (
                CatalogError::Validation("title is required".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogError::Schema("no such column".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::Storage(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::DeadlineExceeded(Duration::from_secs(1)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn validation_message_reaches_client() {
        let err = AppError::from(CatalogError::Validation("uri is required".into()));
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "uri is required"));
    }
}
