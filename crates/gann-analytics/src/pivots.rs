//! 주요 피벗 탐색.
//!
//! 시계열 전체의 최고 고가와 최저 저가를 찾아 각도 투영의 기본 피벗으로 씁니다.

use chrono::NaiveDate;
use gann_core::{Price, PricePoint};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// 시계열 위의 한 피벗.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PivotPoint {
    pub price: Price,
    pub date: NaiveDate,
    /// 시계열 내 위치
    pub index: usize,
}

/// 주요 고점/저점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MajorPivots {
    pub major_high: PivotPoint,
    /// 양수 저가가 하나도 없으면 `None`
    pub major_low: Option<PivotPoint>,
}

/// 시계열에서 최고 고가와 최저 양수 저가를 찾습니다.
///
/// - 빈 시계열이면 `None`.
/// - 같은 가격이면 날짜가 이른 봉이, 날짜도 같으면 먼저 나온 봉이 선택됩니다.
/// - 0 이하의 저가는 데이터 오류로 보고 저점 후보에서 제외합니다.
pub fn find_major_pivots(series: &[PricePoint]) -> Option<MajorPivots> {
    let mut major_high: Option<PivotPoint> = None;
    let mut major_low: Option<PivotPoint> = None;

    for (index, point) in series.iter().enumerate() {
        let replace_high = match &major_high {
            None => true,
            Some(best) => {
                point.high > best.price || (point.high == best.price && point.date < best.date)
            }
        };
        if replace_high {
            major_high = Some(PivotPoint {
                price: point.high,
                date: point.date,
                index,
            });
        }

        if point.low <= Decimal::ZERO {
            continue;
        }
        let replace_low = match &major_low {
            None => true,
            Some(best) => {
                point.low < best.price || (point.low == best.price && point.date < best.date)
            }
        };
        if replace_low {
            major_low = Some(PivotPoint {
                price: point.low,
                date: point.date,
                index,
            });
        }
    }

    let pivots = major_high.map(|major_high| MajorPivots {
        major_high,
        major_low,
    });

    debug!(bars = series.len(), found = pivots.is_some(), "Major pivots scanned");
    pivots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rust_decimal_macros::dec;

    fn bar(day: u32, high: Price, low: Price) -> PricePoint {
        let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        PricePoint::new(date, low, high, low, high)
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(find_major_pivots(&[]), None);
    }

    #[test]
    fn test_high_and_low() {
        let series = vec![
            bar(1, dec!(105), dec!(95)),
            bar(2, dec!(120), dec!(101)),
            bar(3, dec!(110), dec!(90)),
            bar(4, dec!(108), dec!(99)),
        ];
        let pivots = find_major_pivots(&series).unwrap();

        assert_eq!(pivots.major_high.price, dec!(120));
        assert_eq!(pivots.major_high.index, 1);
        let low = pivots.major_low.unwrap();
        assert_eq!(low.price, dec!(90));
        assert_eq!(low.date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }

    #[test]
    fn test_ties_prefer_earliest_date() {
        // 입력 순서와 날짜 순서가 다를 때도 이른 날짜가 선택되어야 함
        let series = vec![
            bar(9, dec!(120), dec!(80)),
            bar(2, dec!(120), dec!(80)),
            bar(5, dec!(100), dec!(90)),
        ];
        let pivots = find_major_pivots(&series).unwrap();
        assert_eq!(pivots.major_high.date.day0(), 1);
        assert_eq!(pivots.major_high.index, 1);
        assert_eq!(pivots.major_low.unwrap().index, 1);
    }

    #[test]
    fn test_non_positive_lows_excluded() {
        let series = vec![
            bar(1, dec!(50), dec!(0)),
            bar(2, dec!(52), dec!(-3)),
            bar(3, dec!(51), dec!(48)),
        ];
        let pivots = find_major_pivots(&series).unwrap();
        assert_eq!(pivots.major_low.unwrap().price, dec!(48));

        let all_bad = vec![bar(1, dec!(50), dec!(0))];
        let pivots = find_major_pivots(&all_bad).unwrap();
        assert_eq!(pivots.major_high.price, dec!(50));
        assert!(pivots.major_low.is_none());
    }
}
