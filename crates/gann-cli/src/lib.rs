//! Gann 분석 CLI 도구 모음.
//!
//! 각 명령은 결과를 문자열로 렌더링해 반환하며, 출력은 바이너리가 담당합니다.

pub mod commands;

pub use commands::*;
