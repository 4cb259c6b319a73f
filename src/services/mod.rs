//! # 서비스 모듈
//!
//! 저장소 호출을 감싸는 보조 로직을 모아둔 모듈입니다.
//! - `deadline`: 저장소 연산에 제한 시간을 씌우는 래퍼

pub mod deadline;

pub use deadline::*;
