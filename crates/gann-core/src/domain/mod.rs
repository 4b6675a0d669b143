//! Gann 분석 도메인 모델.

pub mod cycle;
pub mod pivot;
pub mod series;

pub use cycle::*;
pub use pivot::*;
pub use series::*;
