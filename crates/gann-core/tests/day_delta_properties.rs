//! 날짜 차이 계산의 속성 테스트

use chrono::{Duration, TimeZone, Utc};
use gann_core::{days_between, ONE_DAY_MS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn day_delta_is_floor_of_elapsed_ms(offset_ms in -10_000_000_000i64..10_000_000_000i64) {
        let pivot = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let t = pivot + Duration::milliseconds(offset_ms);

        let days = days_between(pivot, t);

        prop_assert!(days * ONE_DAY_MS <= offset_ms);
        prop_assert!(offset_ms < (days + 1) * ONE_DAY_MS);
    }

    #[test]
    fn day_delta_is_antisymmetric_for_whole_days(days in -5000i64..5000i64) {
        let pivot = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t = pivot + Duration::days(days);

        prop_assert_eq!(days_between(pivot, t), days);
        prop_assert_eq!(days_between(t, pivot), -days);
    }
}
