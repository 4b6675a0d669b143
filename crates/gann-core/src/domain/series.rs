//! 가격 시계열과 시계열 데이터 소스.
//!
//! 결정적 분석 코드가 난수 기반 데모 데이터와 분리되어 테스트될 수 있도록
//! 데이터 공급을 `SeriesSource` 트레이트 뒤에 둡니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{GannError, GannResult};
use crate::types::Price;

/// 일봉 가격 데이터.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (없는 데이터도 허용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// 거래량을 설정합니다.
    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = Some(volume);
        self
    }

    /// 대표 가격 `(고가 + 저가 + 종가) / 3`.
    pub fn typical_price(&self) -> Option<Price> {
        self.high
            .checked_add(self.low)?
            .checked_add(self.close)
            .map(|sum| sum / Decimal::from(3))
    }

    /// 고가 < 저가 같은 뒤집힌 봉인지 확인합니다.
    pub fn is_inverted(&self) -> bool {
        self.high < self.low
    }
}

/// 심볼별 가격 시계열 공급자.
pub trait SeriesSource {
    /// `symbol`의 최근 `days`개 데이터를 날짜 오름차순으로 반환합니다.
    ///
    /// 알 수 없는 심볼은 `GannError::NotFound`입니다.
    fn fetch(&self, symbol: &str, days: usize) -> GannResult<Vec<PricePoint>>;
}

/// 메모리에 보관된 시계열 소스.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, Vec<PricePoint>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 심볼의 시계열을 등록합니다. 심볼은 대문자로 정규화됩니다.
    pub fn insert(&mut self, symbol: impl Into<String>, mut points: Vec<PricePoint>) {
        points.sort_by_key(|p| p.date);
        self.series.insert(symbol.into().to_uppercase(), points);
    }
}

impl SeriesSource for InMemorySource {
    fn fetch(&self, symbol: &str, days: usize) -> GannResult<Vec<PricePoint>> {
        let points = self
            .series
            .get(&symbol.to_uppercase())
            .ok_or_else(|| GannError::NotFound(format!("심볼 {}", symbol)))?;

        Ok(tail(points, days))
    }
}

/// 날짜순으로 정렬된 `points`의 마지막 `days`개를 복사합니다.
pub fn tail(points: &[PricePoint], days: usize) -> Vec<PricePoint> {
    let start = points.len().saturating_sub(days);
    points[start..].to_vec()
}
