//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /healthz` → `{ "status": "ok" }`
//!
//! 로드밸런서나 컨테이너 오케스트레이터가 프로세스 생존 여부를 확인할 때 사용합니다.
//! 저장소를 건드리지 않으므로 실패하지 않습니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /healthz` — 서버 상태를 확인합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
