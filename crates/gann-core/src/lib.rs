//! # Gann Core
//!
//! Gann 분석 툴킷의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 툴킷 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격/비율 타입 (`Decimal` 기반)
//! - 피벗 및 시계열 데이터 구조체
//! - 시계열 데이터 소스 트레이트
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
