//! 툴킷 전반에서 사용되는 공통 타입.

mod decimal;
mod options;

pub use decimal::*;
pub use options::*;
