//! # 제한 시간(Deadline) 서비스
//!
//! Rust의 future는 drop되는 순간 취소됩니다. 저장소 연산도 마찬가지여서,
//! 진행 중인 삽입 트랜잭션은 커밋되지 않은 채 drop되면 롤백됩니다.
//!
//! `with_deadline()`은 이 성질을 이용해 `tokio::time::timeout`으로
//! 연산 future를 감싸고, 시간이 지나면 future를 drop한 뒤
//! `CatalogError::DeadlineExceeded`를 돌려줍니다. 재시도는 하지 않습니다.

use crate::error::{CatalogError, CatalogResult};
use std::future::Future;
use std::time::Duration;

/// `limit` 안에 끝나지 않으면 연산을 취소하고 `DeadlineExceeded`를 반환합니다.
///
/// # 예시
/// ```ignore
/// let doc = with_deadline(Duration::from_secs(15), catalog.get_document(1)).await?;
/// ```
pub async fn with_deadline<T, F>(limit: Duration, operation: F) -> CatalogResult<T>
where
    F: Future<Output = CatalogResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::DeadlineExceeded(limit)),
    }
}
