//! # 문서 카탈로그
//!
//! 문서 메타데이터(제목, URI, 종류, 저자, 태그)를 저장하고,
//! 단건 조회와 필터/페이지네이션 목록 조회를 제공하는 카탈로그입니다.
//!
//! - `db`: 카탈로그 저장소 (`Catalog` 트레이트와 SQLite/PostgreSQL 구현)
//! - `models`: 문서/태그/저자/페이지 구조체
//! - `error`: 저장소 에러(`CatalogError`)와 HTTP 에러(`AppError`)
//! - `services`: 제한 시간 래퍼
//! - `routes`: axum 라우터와 핸들러
//! - `metrics`: Prometheus 요청 지표
//! - `config`: 환경변수 설정

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;

pub use db::{Catalog, PostgresCatalog, SqliteCatalog};
pub use error::{AppError, CatalogError, CatalogResult};
