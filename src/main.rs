//! # 카탈로그 서버 진입점
//!
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. `DATABASE_URL` 스킴에 맞는 저장소(SQLite/PostgreSQL) 연결 및 스키마 초기화
//! 4. Prometheus recorder 설치, 라우터 설정 후 HTTP 서버 시작
//! 5. SIGINT/SIGTERM을 받으면 진행 중인 요청을 기다렸다가 종료

use anyhow::{Context, Result};
use doc_catalog::{
    config::{Config, DatabaseBackend},
    metrics,
    routes::{self, AppState},
    Catalog, PostgresCatalog, SqliteCatalog,
};
use std::{path::Path, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG 환경변수가 없으면 카탈로그, tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_catalog=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting catalog server on {}:{}", config.host, config.port);

    // URL에는 비밀번호가 들어 있을 수 있으므로 에러 메시지에는 백엔드 종류만 남깁니다.
    let catalog = open_catalog(&config)
        .await
        .with_context(|| format!("failed to open {:?} catalog database", config.database_backend))?;

    // 프로세스가 시작될 때마다 호출해도 안전합니다. (이미 적용된 스키마는 건너뜀)
    catalog
        .initialize()
        .await
        .context("failed to initialize catalog schema")?;

    let metrics = if config.metrics_enabled {
        Some(metrics::install_recorder().context("failed to install Prometheus recorder")?)
    } else {
        None
    };

    let state = AppState {
        catalog: catalog.clone(),
        request_timeout: config.request_timeout,
        metrics,
    };
    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 종료 신호 이후 남은 연결이 반환되기를 최대 shutdown_grace만큼 기다립니다.
    if tokio::time::timeout(config.shutdown_grace, catalog.close())
        .await
        .is_err()
    {
        tracing::warn!("Database pool did not close within {:?}", config.shutdown_grace);
    }
    tracing::info!("Shut down");

    Ok(())
}

/// 설정된 백엔드의 연결 풀을 열어 `Catalog` 트레이트 객체로 돌려줍니다.
async fn open_catalog(config: &Config) -> Result<Arc<dyn Catalog>> {
    let catalog: Arc<dyn Catalog> = match config.database_backend {
        DatabaseBackend::Sqlite => {
            // 데이터베이스 파일이 들어갈 디렉토리가 없으면 생성합니다. (mkdir -p)
            if let Some(parent) = config.sqlite_path().as_deref().and_then(Path::parent) {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    tokio::fs::create_dir_all(parent).await?;
                    tracing::info!("Created database directory: {}", parent.display());
                }
            }
            Arc::new(SqliteCatalog::connect(&config.database_url, config.db_max_connections).await?)
        }
        DatabaseBackend::Postgres => Arc::new(
            PostgresCatalog::connect(&config.database_url, config.db_max_connections).await?,
        ),
    };

    tracing::info!("Opened {:?} catalog", config.database_backend);
    Ok(catalog)
}

/// Ctrl+C(SIGINT) 또는 SIGTERM을 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
