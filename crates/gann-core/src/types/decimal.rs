//! 가격 계산을 위한 Decimal 유틸리티.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// 가격 타입.
pub type Price = Decimal;

/// 시간 단위당 가격 단위 비율 (Gann 각도 기울기).
pub type Ratio = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 소수점 두 자리로 반올림합니다 (0.5는 0에서 멀어지는 방향).
    fn round_price(&self) -> Decimal;

    /// `f64`로 변환합니다. 표현할 수 없는 값은 `NaN`이 됩니다.
    fn to_f64_lossy(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn round_price(&self) -> Decimal {
        self.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}
