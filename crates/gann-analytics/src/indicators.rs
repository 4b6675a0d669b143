//! 기술적 지표 (Technical Indicators).
//!
//! 각도 투영과 함께 차트에 겹쳐 보는 보조 지표들입니다.
//! - SMA / EMA (이동평균)
//! - RSI (Wilder 평활)
//! - MACD (라인, 시그널, 히스토그램)
//! - 볼린저 밴드 (모표준편차)
//! - VWAP (누적 거래량 가중 평균가)
//!
//! 모든 결과는 입력 봉과 같은 길이로 정렬되며, 계산에 필요한 봉이 모자란
//! 구간은 `None`입니다. 기간이 시계열보다 길면 전부 `None`이고 빈 시계열은
//! 빈 결과입니다.
//!
//! # 사용 예시
//!
//! ```
//! use chrono::NaiveDate;
//! use gann_analytics::indicators::{IndicatorCalculator, SmaParams};
//! use gann_core::PricePoint;
//! use rust_decimal_macros::dec;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let series: Vec<PricePoint> = [10, 11, 12]
//!     .iter()
//!     .zip(1..)
//!     .map(|(&c, d)| PricePoint::new(day(d), c.into(), c.into(), c.into(), c.into()))
//!     .collect();
//!
//! let sma = IndicatorCalculator::new().sma(&series, SmaParams { period: 2 }).unwrap();
//! assert_eq!(sma, vec![None, Some(dec!(10.5)), Some(dec!(11.5))]);
//! ```

use chrono::NaiveDate;
use gann_core::{Price, PricePoint};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AnalysisError, AnalysisResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiParams {
    /// 평활 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

/// 한 번에 계산할 지표들의 파라미터.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub sma: SmaParams,
    pub ema: EmaParams,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub bollinger: BollingerBandsParams,
}

/// 봉 하나에 대한 모든 지표 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: Price,
    pub sma: Option<Decimal>,
    pub ema: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub macd: MacdResult,
    pub bollinger: BollingerBandsResult,
    pub vwap: Decimal,
}

/// 기술적 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorCalculator;

impl IndicatorCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA).
    ///
    /// SMA = (C1 + C2 + ... + Cn) / n
    pub fn sma(
        &self,
        series: &[PricePoint],
        params: SmaParams,
    ) -> AnalysisResult<Vec<Option<Decimal>>> {
        sma_values(&closes(series), params.period)
    }

    /// 지수 이동평균 (EMA).
    ///
    /// 첫 값은 처음 `period`개 종가의 SMA이고, 이후
    /// EMA = C × k + 이전 EMA × (1 - k), k = 2 / (period + 1).
    pub fn ema(
        &self,
        series: &[PricePoint],
        params: EmaParams,
    ) -> AnalysisResult<Vec<Option<Decimal>>> {
        ema_values(&closes(series), params.period)
    }

    /// RSI (Relative Strength Index).
    ///
    /// 첫 평균 상승/하락폭은 처음 `period`개 변화의 단순 평균이고, 이후
    /// Wilder 방식 `(이전 평균 × (n - 1) + 현재 변화) / n`으로 갱신합니다.
    /// 평균 하락폭이 0이면 100입니다.
    pub fn rsi(
        &self,
        series: &[PricePoint],
        params: RsiParams,
    ) -> AnalysisResult<Vec<Option<Decimal>>> {
        let period = params.period;
        validate_period(period, "RSI")?;

        let prices = closes(series);
        let mut result = vec![None; prices.len()];
        if prices.len() <= period {
            return Ok(result);
        }

        let mut gains = Vec::with_capacity(prices.len() - 1);
        let mut losses = Vec::with_capacity(prices.len() - 1);
        for pair in prices.windows(2) {
            let change = pair[1].checked_sub(pair[0]).ok_or_else(|| overflow("RSI"))?;
            gains.push(change.max(Decimal::ZERO));
            losses.push((-change).max(Decimal::ZERO));
        }

        let n = Decimal::from(period);
        let keep = Decimal::from(period - 1);
        let mut avg_gain = checked_sum(&gains[..period], "RSI")? / n;
        let mut avg_loss = checked_sum(&losses[..period], "RSI")? / n;
        result[period] = Some(rsi_value(avg_gain, avg_loss)?);

        // gains[i - 1]은 i번째 봉의 변화
        for i in period + 1..prices.len() {
            avg_gain = wilder(avg_gain, keep, gains[i - 1], n)?;
            avg_loss = wilder(avg_loss, keep, losses[i - 1], n)?;
            result[i] = Some(rsi_value(avg_gain, avg_loss)?);
        }

        Ok(result)
    }

    /// MACD.
    ///
    /// MACD 라인은 장기 EMA가 정의되는 봉부터, 시그널과 히스토그램은
    /// 그 뒤 `signal_period - 1`개 봉부터 값을 가집니다.
    pub fn macd(
        &self,
        series: &[PricePoint],
        params: MacdParams,
    ) -> AnalysisResult<Vec<MacdResult>> {
        validate_period(params.fast_period, "MACD 단기")?;
        validate_period(params.slow_period, "MACD 장기")?;
        validate_period(params.signal_period, "MACD 시그널")?;
        if params.fast_period >= params.slow_period {
            return Err(AnalysisError::InvalidParameter(format!(
                "MACD 단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }

        let prices = closes(series);
        let fast = ema_values(&prices, params.fast_period)?;
        let slow = ema_values(&prices, params.slow_period)?;

        let mut result = vec![MacdResult::default(); prices.len()];
        let start = params.slow_period - 1;
        if prices.len() <= start {
            return Ok(result);
        }

        let mut line = Vec::with_capacity(prices.len() - start);
        for (i, row) in result.iter_mut().enumerate().skip(start) {
            let (Some(f), Some(s)) = (fast[i], slow[i]) else {
                continue;
            };
            let macd = f.checked_sub(s).ok_or_else(|| overflow("MACD"))?;
            row.macd = Some(macd);
            line.push(macd);
        }

        let signal = ema_values(&line, params.signal_period)?;
        for (offset, value) in signal.into_iter().enumerate() {
            let Some(signal) = value else {
                continue;
            };
            let row = &mut result[start + offset];
            row.signal = Some(signal);
            if let Some(macd) = row.macd {
                row.histogram = Some(macd.checked_sub(signal).ok_or_else(|| overflow("MACD"))?);
            }
        }

        Ok(result)
    }

    /// 볼린저 밴드.
    ///
    /// 중간 밴드는 SMA, 폭은 창 안 종가의 모표준편차 × 배수입니다.
    pub fn bollinger_bands(
        &self,
        series: &[PricePoint],
        params: BollingerBandsParams,
    ) -> AnalysisResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        validate_period(period, "볼린저 밴드")?;
        if params.std_dev_multiplier < Decimal::ZERO {
            return Err(AnalysisError::InvalidParameter(format!(
                "표준편차 배수는 0 이상이어야 합니다: {}",
                params.std_dev_multiplier
            )));
        }

        let prices = closes(series);
        let mut result = vec![BollingerBandsResult::default(); prices.len()];
        if prices.len() < period {
            return Ok(result);
        }

        let n = Decimal::from(period);
        for i in period - 1..prices.len() {
            let window = &prices[i + 1 - period..=i];
            let mean = checked_sum(window, "볼린저 밴드")? / n;

            let mut squares = Decimal::ZERO;
            for price in window {
                let diff = price.checked_sub(mean).ok_or_else(|| overflow("볼린저 밴드"))?;
                squares = diff
                    .checked_mul(diff)
                    .and_then(|sq| squares.checked_add(sq))
                    .ok_or_else(|| overflow("볼린저 밴드"))?;
            }
            let std_dev = (squares / n)
                .sqrt()
                .ok_or_else(|| overflow("볼린저 밴드 표준편차"))?;
            let width = params
                .std_dev_multiplier
                .checked_mul(std_dev)
                .ok_or_else(|| overflow("볼린저 밴드"))?;

            result[i] = BollingerBandsResult {
                upper: Some(mean.checked_add(width).ok_or_else(|| overflow("볼린저 밴드"))?),
                middle: Some(mean),
                lower: Some(mean.checked_sub(width).ok_or_else(|| overflow("볼린저 밴드"))?),
            };
        }

        Ok(result)
    }

    /// VWAP (Volume Weighted Average Price).
    ///
    /// 대표 가격 `(H + L + C) / 3`을 거래량으로 누적 가중 평균합니다.
    /// 누적 거래량이 0인 동안은 그 봉의 대표 가격을 그대로 씁니다.
    /// 거래량이 없는 봉은 0으로 취급합니다.
    pub fn vwap(&self, series: &[PricePoint]) -> AnalysisResult<Vec<Decimal>> {
        let mut cumulative_value = Decimal::ZERO;
        let mut cumulative_volume = Decimal::ZERO;
        let mut result = Vec::with_capacity(series.len());

        for point in series {
            let volume = point.volume.unwrap_or_default();
            if volume < Decimal::ZERO {
                return Err(AnalysisError::InvalidParameter(format!(
                    "거래량은 0 이상이어야 합니다: {} ({})",
                    volume, point.date
                )));
            }

            let typical = point.typical_price().ok_or_else(|| overflow("VWAP"))?;
            cumulative_value = typical
                .checked_mul(volume)
                .and_then(|v| cumulative_value.checked_add(v))
                .ok_or_else(|| overflow("VWAP"))?;
            cumulative_volume = cumulative_volume
                .checked_add(volume)
                .ok_or_else(|| overflow("VWAP"))?;

            result.push(if cumulative_volume > Decimal::ZERO {
                cumulative_value
                    .checked_div(cumulative_volume)
                    .ok_or_else(|| overflow("VWAP"))?
            } else {
                typical
            });
        }

        Ok(result)
    }

    /// 모든 지표를 계산해 봉별로 묶습니다.
    pub fn compute_all(
        &self,
        series: &[PricePoint],
        params: &IndicatorParams,
    ) -> AnalysisResult<Vec<IndicatorRow>> {
        debug!(bars = series.len(), ?params, "Calculating indicators");

        let sma = self.sma(series, params.sma)?;
        let ema = self.ema(series, params.ema)?;
        let rsi = self.rsi(series, params.rsi)?;
        let macd = self.macd(series, params.macd)?;
        let bollinger = self.bollinger_bands(series, params.bollinger)?;
        let vwap = self.vwap(series)?;

        Ok(series
            .iter()
            .enumerate()
            .map(|(i, point)| IndicatorRow {
                date: point.date,
                close: point.close,
                sma: sma[i],
                ema: ema[i],
                rsi: rsi[i],
                macd: macd[i],
                bollinger: bollinger[i],
                vwap: vwap[i],
            })
            .collect())
    }
}

fn closes(series: &[PricePoint]) -> Vec<Decimal> {
    series.iter().map(|p| p.close).collect()
}

fn validate_period(period: usize, name: &str) -> AnalysisResult<()> {
    if period == 0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "{} 기간은 0보다 커야 합니다",
            name
        )));
    }
    Ok(())
}

fn overflow(name: &str) -> AnalysisError {
    AnalysisError::CalculationError(format!("{} 계산 중 값이 표현 범위를 넘었습니다", name))
}

fn checked_sum(values: &[Decimal], name: &str) -> AnalysisResult<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| overflow(name))
}

fn sma_values(values: &[Decimal], period: usize) -> AnalysisResult<Vec<Option<Decimal>>> {
    validate_period(period, "SMA")?;

    let mut result = vec![None; values.len()];
    if values.len() < period {
        return Ok(result);
    }

    let n = Decimal::from(period);
    for i in period - 1..values.len() {
        result[i] = Some(checked_sum(&values[i + 1 - period..=i], "SMA")? / n);
    }
    Ok(result)
}

fn ema_values(values: &[Decimal], period: usize) -> AnalysisResult<Vec<Option<Decimal>>> {
    validate_period(period, "EMA")?;

    let mut result = vec![None; values.len()];
    if values.len() < period {
        return Ok(result);
    }

    let multiplier = dec!(2) / Decimal::from(period + 1);
    let keep = Decimal::ONE - multiplier;

    let mut ema = checked_sum(&values[..period], "EMA")? / Decimal::from(period);
    result[period - 1] = Some(ema);

    for (i, value) in values.iter().enumerate().skip(period) {
        ema = value
            .checked_mul(multiplier)
            .zip(ema.checked_mul(keep))
            .and_then(|(a, b)| a.checked_add(b))
            .ok_or_else(|| overflow("EMA"))?;
        result[i] = Some(ema);
    }
    Ok(result)
}

fn wilder(
    average: Decimal,
    keep: Decimal,
    current: Decimal,
    n: Decimal,
) -> AnalysisResult<Decimal> {
    average
        .checked_mul(keep)
        .and_then(|weighted| weighted.checked_add(current))
        .map(|sum| sum / n)
        .ok_or_else(|| overflow("RSI"))
}

fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> AnalysisResult<Decimal> {
    if avg_loss == Decimal::ZERO {
        return Ok(dec!(100));
    }
    let rs = avg_gain.checked_div(avg_loss).ok_or_else(|| overflow("RSI"))?;
    let denominator = Decimal::ONE.checked_add(rs).ok_or_else(|| overflow("RSI"))?;
    Ok(dec!(100) - dec!(100) / denominator)
}
