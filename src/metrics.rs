//! # Prometheus 지표 모듈
//!
//! HTTP 요청마다 횟수와 처리 시간을 기록하고, `GET /metrics`에서
//! Prometheus 텍스트 형식으로 내보냅니다.
//!
//! ## 기록하는 지표
//! - `catalog_http_requests_total{route, method, status}`: 요청 수 (카운터)
//! - `catalog_http_request_duration_seconds{route, method}`: 처리 시간 (히스토그램)
//!
//! `route`는 실제 URL이 아니라 라우트 패턴(`/catalog/documents/{id}`)입니다.
//! 문서 ID마다 시계열이 새로 생기지 않게 하기 위함입니다.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

pub const HTTP_REQUESTS_TOTAL: &str = "catalog_http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "catalog_http_request_duration_seconds";

// 라우터에 일치하지 않은 요청의 route 라벨
const UNMATCHED_ROUTE: &str = "unmatched";

// 전역 recorder는 프로세스당 한 번만 설치할 수 있습니다.
// 설치에 실패한 경우도 None으로 기억해서 다시 시도하지 않습니다.
static PROMETHEUS_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// 전역 Prometheus recorder를 설치하고 렌더링용 핸들을 돌려줍니다.
///
/// 여러 번 호출해도 같은 핸들을 돌려줍니다.
/// 다른 recorder가 이미 설치되어 있으면 `None`.
pub fn install_recorder() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
                describe_histogram!(
                    HTTP_REQUEST_DURATION,
                    "Duration of HTTP requests in seconds"
                );
                tracing::info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(err) => {
                tracing::error!("Failed to install Prometheus recorder: {}", err);
                None
            }
        })
        .clone()
}

fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_string(), |path| path.as_str().to_string())
}

/// 요청 수와 처리 시간을 기록하는 미들웨어
///
/// `MatchedPath`를 읽어야 하므로 `Router::route_layer`로 붙입니다.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = route_label(&request);
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    counter!(
        HTTP_REQUESTS_TOTAL,
        "route" => route.clone(),
        "method" => method.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(HTTP_REQUEST_DURATION, "route" => route, "method" => method)
        .record(start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn install_is_idempotent() {
        let first = install_recorder();
        let second = install_recorder();
        assert_eq!(first.is_some(), second.is_some());
    }

    #[test]
    fn requests_outside_the_router_are_unmatched() {
        let request = Request::builder().uri("/nowhere").body(Body::empty()).unwrap();
        assert_eq!(route_label(&request), UNMATCHED_ROUTE);
    }

    #[tokio::test]
    async fn route_pattern_is_recorded_instead_of_raw_path() {
        let handle = install_recorder().unwrap();
        let app = Router::new()
            .route("/shelves/{id}", get(|| async { StatusCode::OK }))
            .route_layer(axum::middleware::from_fn(track_requests));

        let request = Request::builder()
            .uri("/shelves/12345")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rendered = handle.render();
        assert!(rendered
            .lines()
            .any(|line| line.starts_with(HTTP_REQUESTS_TOTAL)
                && line.contains("route=\"/shelves/{id}\"")));
        assert!(!rendered.contains("/shelves/12345"));
    }
}
