//! Gann 툴킷의 에러 타입.
//!
//! 이 모듈은 데이터 로딩, 설정, 입력 검증 과정에서 발생하는 에러를 정의합니다.
//! 순수 계산 에러는 `gann-analytics`의 `AnalysisError`가 담당합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum GannError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),
}

/// 툴킷 작업을 위한 Result 타입.
pub type GannResult<T> = Result<T, GannError>;

impl From<serde_json::Error> for GannError {
    fn from(err: serde_json::Error) -> Self {
        GannError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GannError {
    fn from(err: std::io::Error) -> Self {
        GannError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for GannError {
    fn from(err: config::ConfigError) -> Self {
        GannError::Config(err.to_string())
    }
}
