//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 카탈로그 저장소 호출로 옮기는 얇은 전송 계층입니다.
//!
//! 각 하위 모듈:
//! - `documents`: 카탈로그 문서 삽입/조회/목록 핸들러
//! - `health`: 서버 상태 확인 (헬스체크)
//!
//! `/metrics`와 요청 지표 미들웨어는 [`crate::metrics`]에 있습니다.

pub mod documents;
pub mod health;

pub use documents::*;
pub use health::*;

use crate::metrics;
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

/// 전체 라우터를 만듭니다.
///
/// - `/catalog/documents`        : GET(목록), POST(삽입)
/// - `/catalog/documents/{id}`   : GET(단건)
/// - `/healthz`                  : GET(헬스체크)
/// - `/metrics`                  : GET(Prometheus 지표, `state.metrics`가 있을 때만)
pub fn router(state: AppState) -> Router {
    let metrics_handle = state.metrics.clone();

    let catalog_routes = Router::new()
        .route(
            "/catalog/documents",
            get(list_documents).post(insert_document),
        )
        .route("/catalog/documents/{id}", get(get_document));

    let mut app: Router = Router::new()
        .merge(catalog_routes)
        .route("/healthz", get(health_check))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        app = app
            .route("/metrics", get(move || async move { handle.render() }))
            // route_layer: 라우트가 일치한 뒤에 실행되어 MatchedPath를 읽을 수 있습니다.
            .route_layer(middleware::from_fn(metrics::track_requests));
    }

    // HTTP 요청/응답 자동 로깅
    app.layer(TraceLayer::new_for_http())
}
