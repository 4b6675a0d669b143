//! Gann 각도 (Gann Angles).
//!
//! 피벗에서 일정한 시간:가격 비율로 뻗어나가는 직선입니다.
//! 시간 단위 하나가 지날 때마다 가격이 `ratio`만큼 움직이며, 상승선과
//! 하락선은 피벗에서 교차합니다.
//!
//! - 상승선: `pivot.price + delta × ratio`
//! - 하락선: `pivot.price − delta × ratio`
//!
//! `delta`는 피벗 이전 시점이면 음수입니다. 음수 가격도 그대로 반환합니다.

use chrono::{DateTime, NaiveDate, Utc};
use gann_core::{DatedPivot, DecimalExt, Pivot, Price, PricePoint, Ratio, RatioSet};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{AnalysisError, AnalysisResult};

/// 투영 가격의 소수 자릿수.
pub const PRICE_SCALE: u32 = 10;

/// 이름이 붙은 시간:가격 비율.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GannAngle {
    /// 표시 이름 (예: "1x1")
    pub name: String,
    /// 시간 단위당 가격 단위
    pub ratio: Ratio,
}

impl GannAngle {
    /// 새 각도를 생성합니다.
    ///
    /// # 에러
    ///
    /// `ratio`가 음수이면 `AnalysisError::InvalidParameter`. 0은 수평선으로 허용됩니다.
    pub fn new(name: impl Into<String>, ratio: Ratio) -> AnalysisResult<Self> {
        let name = name.into();
        if ratio < Decimal::ZERO {
            warn!(%name, %ratio, "Rejected negative Gann ratio");
            return Err(AnalysisError::InvalidParameter(format!(
                "비율은 0 이상이어야 합니다: {} = {}",
                name, ratio
            )));
        }
        Ok(Self { name, ratio })
    }

    /// 가격축과 시간축 단위가 같을 때의 기울기 각도 (도).
    pub fn degrees(&self) -> f64 {
        self.ratio.to_f64_lossy().atan().to_degrees()
    }

    /// 피벗에서 `delta` 단위 떨어진 지점의 상승/하락 가격.
    ///
    /// 이동폭은 `PRICE_SCALE` 자리로 반올림한 뒤 더하고 빼므로 두 가격은
    /// 항상 피벗을 중심으로 대칭입니다. 가격은 뒤쪽 0을 제거한 형태입니다.
    ///
    /// # 에러
    ///
    /// 가격이 `Decimal` 범위를 넘으면 `AnalysisError::CalculationError`.
    pub fn level_at(&self, pivot_price: Price, delta: i64) -> AnalysisResult<AngleLevel> {
        let overflow = || {
            AnalysisError::CalculationError(format!(
                "{} 각도 가격이 표현 범위를 넘습니다: {} ± {} × {}",
                self.name, pivot_price, delta, self.ratio
            ))
        };

        let offset = Decimal::from(delta)
            .checked_mul(self.ratio)
            .ok_or_else(overflow)?
            .round_dp(PRICE_SCALE);
        let up_price = pivot_price.checked_add(offset).ok_or_else(overflow)?;
        let down_price = pivot_price.checked_sub(offset).ok_or_else(overflow)?;

        Ok(AngleLevel {
            name: self.name.clone(),
            ratio: self.ratio,
            degrees: self.degrees(),
            up_price: up_price.normalize(),
            down_price: down_price.normalize(),
        })
    }
}

/// 순서가 있는 각도 목록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GannAngleSet {
    angles: Vec<GannAngle>,
}

impl GannAngleSet {
    /// 사용자 정의 각도 목록. 빈 목록도 허용됩니다.
    pub fn new(angles: Vec<GannAngle>) -> Self {
        Self { angles }
    }

    /// 표준 Gann 팬: 1x8, 1x4, 1x2, 1x1, 2x1, 4x1, 8x1.
    pub fn standard() -> Self {
        Self::from_static(&[
            ("1x8", dec!(0.125)),
            ("1x4", dec!(0.25)),
            ("1x2", dec!(0.5)),
            ("1x1", dec!(1)),
            ("2x1", dec!(2)),
            ("4x1", dec!(4)),
            ("8x1", dec!(8)),
        ])
    }

    /// 표준 팬에 1x3, 3x1을 더한 세트 (비율 오름차순).
    pub fn extended() -> Self {
        Self::from_static(&[
            ("1x8", dec!(0.125)),
            ("1x4", dec!(0.25)),
            ("1x3", Decimal::ONE / dec!(3)),
            ("1x2", dec!(0.5)),
            ("1x1", dec!(1)),
            ("2x1", dec!(2)),
            ("3x1", dec!(3)),
            ("4x1", dec!(4)),
            ("8x1", dec!(8)),
        ])
    }

    pub fn from_ratio_set(set: RatioSet) -> Self {
        match set {
            RatioSet::Standard => Self::standard(),
            RatioSet::Extended => Self::extended(),
        }
    }

    fn from_static(pairs: &[(&str, Ratio)]) -> Self {
        let angles = pairs
            .iter()
            .map(|(name, ratio)| GannAngle {
                name: (*name).to_string(),
                ratio: *ratio,
            })
            .collect();
        Self { angles }
    }

    pub fn as_slice(&self) -> &[GannAngle] {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// 이름으로 각도를 찾습니다.
    pub fn get(&self, name: &str) -> Option<&GannAngle> {
        self.angles.iter().find(|a| a.name == name)
    }
}

impl Default for GannAngleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// 한 각도의 상승/하락 가격.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleLevel {
    pub name: String,
    pub ratio: Ratio,
    /// 기울기 각도 (도)
    pub degrees: f64,
    pub up_price: Price,
    pub down_price: Price,
}

/// 정수 시간 인덱스 기준 투영 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub time_index: i64,
    /// `time_index − pivot.time_index`
    pub delta: i64,
    #[serde(flatten)]
    pub level: AngleLevel,
}

/// 날짜 기준 투영 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedProjectedPoint {
    pub date: DateTime<Utc>,
    /// 피벗으로부터 경과 일수 (내림)
    pub days: i64,
    #[serde(flatten)]
    pub level: AngleLevel,
}

/// 시계열 한 봉에 대한 모든 각도의 가격.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesProjection {
    pub date: NaiveDate,
    pub close: Price,
    pub delta: i64,
    pub levels: Vec<AngleLevel>,
}

/// 정수 시간 도메인 위에 각도선을 투영합니다.
///
/// 결과는 `domain` 순서대로, 각 시점 안에서는 `angles` 순서대로 나열됩니다.
/// 도메인이나 각도가 비어 있으면 빈 결과를 반환합니다.
///
/// # 에러
///
/// 시간 차이나 가격이 표현 범위를 넘으면 `AnalysisError::CalculationError`.
pub fn project(
    pivot: &Pivot,
    domain: &[i64],
    angles: &[GannAngle],
) -> AnalysisResult<Vec<ProjectedPoint>> {
    debug!(
        pivot_price = %pivot.price,
        pivot_index = pivot.time_index,
        points = domain.len(),
        angles = angles.len(),
        "Projecting Gann angles"
    );

    let mut points = Vec::with_capacity(domain.len() * angles.len());
    for &time_index in domain {
        let delta = time_index.checked_sub(pivot.time_index).ok_or_else(|| {
            AnalysisError::CalculationError(format!(
                "시간 차이가 표현 범위를 넘습니다: {} - {}",
                time_index, pivot.time_index
            ))
        })?;
        for angle in angles {
            points.push(ProjectedPoint {
                time_index,
                delta,
                level: angle.level_at(pivot.price, delta)?,
            });
        }
    }
    Ok(points)
}

/// 달력 날짜 도메인 위에 각도선을 투영합니다.
///
/// 경과 일수는 `floor((t − pivot) / 1일)`로 계산합니다.
pub fn project_dates(
    pivot: &DatedPivot,
    dates: &[DateTime<Utc>],
    angles: &[GannAngle],
) -> AnalysisResult<Vec<DatedProjectedPoint>> {
    debug!(
        pivot_price = %pivot.price,
        pivot_date = %pivot.date,
        points = dates.len(),
        angles = angles.len(),
        "Projecting Gann angles over dates"
    );

    let mut points = Vec::with_capacity(dates.len() * angles.len());
    for &date in dates {
        let days = pivot.days_until(date);
        for angle in angles {
            points.push(DatedProjectedPoint {
                date,
                days,
                level: angle.level_at(pivot.price, days)?,
            });
        }
    }
    Ok(points)
}

/// 한 날짜에서 각 각도의 상승/하락 가격.
pub fn project_at(
    pivot: &DatedPivot,
    current: DateTime<Utc>,
    angles: &[GannAngle],
) -> AnalysisResult<Vec<AngleLevel>> {
    let days = pivot.days_until(current);
    angles
        .iter()
        .map(|angle| angle.level_at(pivot.price, days))
        .collect()
}

/// 가격 시계열의 봉 번호를 시간축으로 삼아 각도선을 투영합니다.
///
/// `pivot_index`는 `[0, len − 1]`로 보정되며, 피벗 가격은 그 봉의 종가입니다.
pub fn project_series(
    series: &[PricePoint],
    pivot_index: usize,
    angles: &[GannAngle],
) -> AnalysisResult<Vec<SeriesProjection>> {
    let Some(last) = series.len().checked_sub(1) else {
        return Ok(Vec::new());
    };

    let pivot_index = pivot_index.min(last);
    let pivot_price = series[pivot_index].close;

    debug!(
        bars = series.len(),
        pivot_index,
        %pivot_price,
        "Projecting Gann angles over series"
    );

    series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let delta = i as i64 - pivot_index as i64;
            Ok(SeriesProjection {
                date: point.date,
                close: point.close,
                delta,
                levels: angles
                    .iter()
                    .map(|angle| angle.level_at(pivot_price, delta))
                    .collect::<AnalysisResult<Vec<_>>>()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn one_by_one() -> Vec<GannAngle> {
        vec![GannAngle::new("1x1", dec!(1)).unwrap()]
    }

    #[test]
    fn test_worked_example() {
        let pivot = Pivot::new(dec!(100), 10);
        let points = project(&pivot, &[8, 9, 10, 11, 12], &one_by_one()).unwrap();
        assert_eq!(points.len(), 5);

        let at_12 = &points[4];
        assert_eq!(at_12.time_index, 12);
        assert_eq!(at_12.delta, 2);
        assert_eq!(at_12.level.up_price, dec!(102));
        assert_eq!(at_12.level.down_price, dec!(98));

        let at_8 = &points[0];
        assert_eq!(at_8.delta, -2);
        assert_eq!(at_8.level.up_price, dec!(98));
        assert_eq!(at_8.level.down_price, dec!(102));

        let at_pivot = &points[2];
        assert_eq!(at_pivot.level.up_price, dec!(100));
        assert_eq!(at_pivot.level.down_price, dec!(100));
    }

    #[test]
    fn test_empty_inputs() {
        let pivot = Pivot::new(dec!(100), 0);
        assert!(project(&pivot, &[], GannAngleSet::standard().as_slice()).unwrap().is_empty());
        assert!(project(&pivot, &[1, 2, 3], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_zero_ratio_is_flat() {
        let flat = vec![GannAngle::new("flat", Decimal::ZERO).unwrap()];
        let pivot = Pivot::new(dec!(50), 0);
        for point in project(&pivot, &[-100, 0, 100], &flat).unwrap() {
            assert_eq!(point.level.up_price, dec!(50));
            assert_eq!(point.level.down_price, dec!(50));
        }
    }

    #[test]
    fn test_negative_ratio_rejected() {
        assert!(matches!(
            GannAngle::new("bad", dec!(-1)),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_prices_may_go_negative() {
        let pivot = Pivot::new(dec!(10), 0);
        let angle = GannAngleSet::standard().get("8x1").cloned().unwrap();
        let points = project(&pivot, &[5], &[angle]).unwrap();
        assert_eq!(points[0].level.down_price, dec!(-30));
    }

    #[test]
    fn test_pivot_outside_domain() {
        let pivot = Pivot::new(dec!(100), 100);
        let points = project(&pivot, &[0, 1], &one_by_one()).unwrap();
        assert_eq!(points[0].delta, -100);
        assert_eq!(points[0].level.up_price, dec!(0));
        assert_eq!(points[1].level.down_price, dec!(199));
    }

    #[test]
    fn test_one_by_three_is_symmetric_around_pivot() {
        let third = GannAngleSet::extended().get("1x3").cloned().unwrap();
        let pivot = dec!(-30.81);

        let level = third.level_at(pivot, -237).unwrap();
        assert_eq!(level.up_price, dec!(-109.81));
        assert_eq!(level.down_price, dec!(48.19));
        assert_eq!(level.up_price + level.down_price, pivot * dec!(2));

        let level = third.level_at(pivot, 1).unwrap();
        assert_eq!(level.up_price, dec!(-30.4766666667));
        assert_eq!(level.up_price + level.down_price, pivot * dec!(2));
    }

    #[test]
    fn test_time_delta_overflow_is_an_error() {
        let pivot = Pivot::new(dec!(100), -10);
        assert!(matches!(
            project(&pivot, &[i64::MAX], &one_by_one()),
            Err(AnalysisError::CalculationError(_))
        ));
        // 피벗 이전 방향도 동일
        let pivot = Pivot::new(dec!(100), 10);
        assert!(project(&pivot, &[i64::MIN], &one_by_one()).is_err());
    }

    #[test]
    fn test_price_overflow_is_an_error() {
        let angle = GannAngleSet::standard().get("8x1").cloned().unwrap();
        assert!(matches!(
            angle.level_at(Decimal::MAX, 1),
            Err(AnalysisError::CalculationError(_))
        ));
        assert!(angle.level_at(Decimal::MIN, -1).is_err());
        // 큰 델타도 가격이 범위 안이면 계산됨
        let level = angle.level_at(dec!(0), i64::MAX).unwrap();
        assert_eq!(level.up_price, Decimal::from(i64::MAX) * dec!(8));
    }

    #[test]
    fn test_standard_and_extended_sets() {
        let standard = GannAngleSet::standard();
        let names: Vec<&str> = standard.as_slice().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["1x8", "1x4", "1x2", "1x1", "2x1", "4x1", "8x1"]);

        let extended = GannAngleSet::from_ratio_set(RatioSet::Extended);
        assert_eq!(extended.len(), 9);
        assert_eq!(extended.get("3x1").map(|a| a.ratio), Some(dec!(3)));
        let ratios: Vec<Ratio> = extended.as_slice().iter().map(|a| a.ratio).collect();
        assert!(ratios.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_degrees() {
        let one = GannAngle::new("1x1", dec!(1)).unwrap();
        assert!((one.degrees() - 45.0).abs() < 1e-9);
        let flat = GannAngle::new("flat", dec!(0)).unwrap();
        assert_eq!(flat.degrees(), 0.0);
    }

    #[test]
    fn test_project_dates_floors_days() {
        let pivot_date = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let pivot = DatedPivot::new(dec!(100), pivot_date);
        let dates = [
            pivot_date - Duration::hours(12),
            pivot_date + Duration::hours(47),
        ];
        let points = project_dates(&pivot, &dates, &one_by_one()).unwrap();

        assert_eq!(points[0].days, -1);
        assert_eq!(points[0].level.up_price, dec!(99));
        assert_eq!(points[1].days, 1);
        assert_eq!(points[1].level.up_price, dec!(101));
    }

    #[test]
    fn test_project_at_snapshot() {
        let pivot_date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let pivot = DatedPivot::new(dec!(200), pivot_date);
        let levels = project_at(
            &pivot,
            pivot_date + Duration::days(8),
            GannAngleSet::standard().as_slice(),
        )
        .unwrap();

        assert_eq!(levels.len(), 7);
        assert_eq!(levels[0].name, "1x8");
        assert_eq!(levels[0].up_price, dec!(201));
        assert_eq!(levels[6].name, "8x1");
        assert_eq!(levels[6].down_price, dec!(136));
    }

    #[test]
    fn test_project_series_clamps_pivot() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let series = vec![
            PricePoint::new(day(1), dec!(10), dec!(11), dec!(9), dec!(10)),
            PricePoint::new(day(2), dec!(10), dec!(13), dec!(10), dec!(12)),
            PricePoint::new(day(3), dec!(12), dec!(14), dec!(11), dec!(13)),
        ];

        let projection = project_series(&series, 99, &one_by_one()).unwrap();
        assert_eq!(projection.len(), 3);
        assert_eq!(projection[2].delta, 0);
        assert_eq!(projection[2].levels[0].up_price, dec!(13));
        assert_eq!(projection[0].delta, -2);
        assert_eq!(projection[0].levels[0].up_price, dec!(11));

        assert!(project_series(&[], 0, &one_by_one()).unwrap().is_empty());
    }
}
