//! # Gann Analytics
//!
//! W.D. Gann 기법의 결정적 계산을 제공합니다.
//!
//! ## 지원 기능
//!
//! - **Square of Nine**: 중심 가격에서 바깥으로 나선형으로 채운 그리드와 각도별 지지/저항 레벨
//! - **Gann Angles**: 피벗에서 고정된 시간:가격 비율로 뻗는 상승/하락선 투영
//! - **Major Pivots**: 시계열의 최고 고가/최저 저가 탐색
//! - **Time Cycles**: 주기 도래일과 전환점 계산
//! - **Indicators**: SMA, EMA, RSI, MACD, 볼린저 밴드, VWAP
//!
//! 모든 함수는 입력만으로 결과가 정해지는 순수 함수이며, 공유 상태가 없어
//! 여러 스레드에서 동시에 호출해도 됩니다.
//!
//! # 사용 예시
//!
//! ```
//! use gann_analytics::GannAnalyzer;
//! use gann_core::Pivot;
//! use rust_decimal_macros::dec;
//!
//! let analyzer = GannAnalyzer::new();
//! let grid = analyzer.square_of_nine(dec!(100)).unwrap();
//! assert_eq!(grid.size(), 9);
//!
//! let points = analyzer.project(&Pivot::new(dec!(100), 10), &[12]).unwrap();
//! assert_eq!(points.len(), 7);
//! ```

pub mod angles;
pub mod cycles;
pub mod indicators;
pub mod pivots;
pub mod square_of_nine;

use chrono::{DateTime, NaiveDate, Utc};
use gann_core::{AppConfig, DatedPivot, GannCycle, Pivot, Price, PricePoint, SpiralDirection};
use thiserror::Error;

pub use angles::{
    project, project_at, project_dates, project_series, AngleLevel, DatedProjectedPoint,
    GannAngle, GannAngleSet, ProjectedPoint, SeriesProjection,
};
pub use cycles::{cycle_markers, next_cycle_dates, turning_points, CycleDate, TurningPoint};
pub use indicators::{
    BollingerBandsParams, BollingerBandsResult, EmaParams, IndicatorCalculator, IndicatorParams,
    IndicatorRow, MacdParams, MacdResult, RsiParams, SmaParams,
};
pub use pivots::{find_major_pivots, MajorPivots, PivotPoint};
pub use square_of_nine::{
    price_levels, CompassAngle, LevelKind, PriceLevel, SquareOfNine, MAX_GRID_SIZE, MIN_GRID_SIZE,
};

/// 분석 계산 오류.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 그리드 크기가 3 이상의 홀수가 아님
    #[error("잘못된 그리드 크기: {size} (3 이상 {max} 이하의 홀수여야 합니다)", max = MAX_GRID_SIZE)]
    InvalidGridSize { size: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 분석 결과 타입.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// 설정이 적용된 통합 분석기.
///
/// 나선 방향, 기본 그리드 크기, 각도 세트, 시간 주기를 한 곳에 묶어
/// 호출자가 변형을 매번 지정하지 않도록 합니다.
#[derive(Debug, Clone)]
pub struct GannAnalyzer {
    grid_size: usize,
    direction: SpiralDirection,
    angles: GannAngleSet,
    cycles: Vec<GannCycle>,
}

impl Default for GannAnalyzer {
    fn default() -> Self {
        Self {
            grid_size: 9,
            direction: SpiralDirection::default(),
            angles: GannAngleSet::standard(),
            cycles: GannCycle::defaults(),
        }
    }
}

impl GannAnalyzer {
    /// 기본 설정으로 분석기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 애플리케이션 설정에서 분석기를 생성합니다.
    ///
    /// 그리드 크기와 주기 목록을 여기서 미리 검증합니다.
    pub fn from_config(config: &AppConfig) -> AnalysisResult<Self> {
        let size = config.square_of_nine.size;
        square_of_nine::validate_size(size)?;
        cycle_markers(1, &config.cycles.periods)?;

        Ok(Self {
            grid_size: size,
            direction: config.square_of_nine.direction,
            angles: GannAngleSet::from_ratio_set(config.angles.ratio_set),
            cycles: config.cycles.periods.clone(),
        })
    }

    /// 각도 세트를 교체합니다.
    pub fn with_angles(mut self, angles: GannAngleSet) -> Self {
        self.angles = angles;
        self
    }

    /// 나선 방향을 교체합니다.
    pub fn with_direction(mut self, direction: SpiralDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn angles(&self) -> &GannAngleSet {
        &self.angles
    }

    pub fn cycles(&self) -> &[GannCycle] {
        &self.cycles
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    // ==================== Square of Nine ====================

    /// 설정된 크기로 Square of Nine을 생성합니다.
    pub fn square_of_nine(&self, center: Price) -> AnalysisResult<SquareOfNine> {
        self.square_of_nine_sized(center, self.grid_size)
    }

    /// 크기를 지정해 Square of Nine을 생성합니다.
    pub fn square_of_nine_sized(&self, center: Price, size: usize) -> AnalysisResult<SquareOfNine> {
        SquareOfNine::build_with_direction(center, size, self.direction)
    }

    /// 각도별 지지/저항 레벨.
    pub fn price_levels(&self, center: Price) -> AnalysisResult<Vec<PriceLevel>> {
        price_levels(center)
    }

    // ==================== Gann Angles ====================

    /// 정수 시간 도메인 투영.
    pub fn project(&self, pivot: &Pivot, domain: &[i64]) -> AnalysisResult<Vec<ProjectedPoint>> {
        project(pivot, domain, self.angles.as_slice())
    }

    /// 날짜 도메인 투영.
    pub fn project_dates(
        &self,
        pivot: &DatedPivot,
        dates: &[DateTime<Utc>],
    ) -> AnalysisResult<Vec<DatedProjectedPoint>> {
        project_dates(pivot, dates, self.angles.as_slice())
    }

    /// 한 날짜의 각도별 가격.
    pub fn angles_at(
        &self,
        pivot: &DatedPivot,
        current: DateTime<Utc>,
    ) -> AnalysisResult<Vec<AngleLevel>> {
        project_at(pivot, current, self.angles.as_slice())
    }

    /// 시계열 봉 번호 기준 투영.
    pub fn project_series(
        &self,
        series: &[PricePoint],
        pivot_index: usize,
    ) -> AnalysisResult<Vec<SeriesProjection>> {
        project_series(series, pivot_index, self.angles.as_slice())
    }

    // ==================== Pivots ====================

    pub fn major_pivots(&self, series: &[PricePoint]) -> Option<MajorPivots> {
        find_major_pivots(series)
    }

    // ==================== Indicators ====================

    /// 시계열의 기술적 지표.
    pub fn indicators(
        &self,
        series: &[PricePoint],
        params: &IndicatorParams,
    ) -> AnalysisResult<Vec<IndicatorRow>> {
        IndicatorCalculator::new().compute_all(series, params)
    }

    // ==================== Time Cycles ====================

    /// 설정된 주기들의 다음 도래일.
    pub fn next_cycles(&self, from: NaiveDate) -> AnalysisResult<Vec<CycleDate>> {
        next_cycle_dates(from, &self.cycles)
    }

    /// 설정된 주기들의 전환점.
    pub fn turning_points(
        &self,
        start: NaiveDate,
        horizon: u32,
    ) -> AnalysisResult<Vec<TurningPoint>> {
        turning_points(start, horizon, &self.cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gann_core::RatioSet;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.square_of_nine.size = 5;
        config.square_of_nine.direction = SpiralDirection::Clockwise;
        config.angles.ratio_set = RatioSet::Extended;

        let analyzer = GannAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.grid_size(), 5);
        assert_eq!(analyzer.angles().len(), 9);

        let grid = analyzer.square_of_nine(dec!(1)).unwrap();
        assert_eq!(grid.direction(), SpiralDirection::Clockwise);
        // 시계 방향: 중심 오른쪽 다음은 아래
        assert_eq!(grid.get(3, 3), Some(dec!(3)));
    }

    #[test]
    fn test_from_config_rejects_even_size() {
        let mut config = AppConfig::default();
        config.square_of_nine.size = 8;
        assert!(matches!(
            GannAnalyzer::from_config(&config),
            Err(AnalysisError::InvalidGridSize { size: 8 })
        ));
    }

    #[test]
    fn test_from_config_rejects_zero_cycle() {
        let mut config = AppConfig::default();
        config.cycles.periods.push(GannCycle::new(0, "none"));
        assert!(GannAnalyzer::from_config(&config).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::InvalidGridSize { size: 4 };
        assert!(err.to_string().contains('4'));
    }
}
