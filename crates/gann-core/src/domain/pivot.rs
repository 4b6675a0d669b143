//! 피벗(기준점) 타입.
//!
//! 각도선과 Square of Nine 값이 고정되는 (가격, 시간) 기준점입니다.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// 하루의 밀리초.
pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// 정수 시간 인덱스 기준 피벗.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pivot {
    /// 피벗 가격
    pub price: Price,
    /// 피벗 시간 인덱스 (봉 번호 등)
    pub time_index: i64,
}

impl Pivot {
    pub fn new(price: Price, time_index: i64) -> Self {
        Self { price, time_index }
    }
}

/// 달력 날짜 기준 피벗.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedPivot {
    /// 피벗 가격
    pub price: Price,
    /// 피벗 시각
    pub date: DateTime<Utc>,
}

impl DatedPivot {
    pub fn new(price: Price, date: DateTime<Utc>) -> Self {
        Self { price, date }
    }

    /// 날짜(UTC 자정) 기준 피벗을 생성합니다.
    pub fn on_day(price: Price, day: NaiveDate) -> Self {
        Self::new(price, start_of_day(day))
    }

    /// 피벗에서 `t`까지 경과한 일수.
    pub fn days_until(&self, t: DateTime<Utc>) -> i64 {
        days_between(self.date, t)
    }
}

/// `from`에서 `to`까지의 일수를 내림(floor)으로 계산합니다.
///
/// `to`가 `from`보다 이전이면 음수가 되며, 하루 미만의 음수 차이는 `-1`입니다.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(ONE_DAY_MS)
}

/// 날짜의 UTC 자정 시각.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::default()).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    #[test]
    fn test_days_between_whole_days() {
        let pivot = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(days_between(pivot, pivot + Duration::days(5)), 5);
        assert_eq!(days_between(pivot, pivot - Duration::days(3)), -3);
        assert_eq!(days_between(pivot, pivot), 0);
    }

    #[test]
    fn test_days_between_floors_partial_days() {
        let pivot = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(days_between(pivot, pivot + Duration::hours(23)), 0);
        assert_eq!(days_between(pivot, pivot + Duration::hours(36)), 1);
        assert_eq!(days_between(pivot, pivot - Duration::hours(1)), -1);
    }

    #[test]
    fn test_dated_pivot_on_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let pivot = DatedPivot::on_day(dec!(100), day);
        let later = start_of_day(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(pivot.days_until(later), 30);
    }
}
