//! CLI 명령어 구현 모듈.

pub mod angles;
pub mod cycles;
pub mod indicators;
pub mod levels;
pub mod pivots;
pub mod square;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// YYYY-MM-DD 형식의 날짜를 파싱합니다.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {}. Use YYYY-MM-DD", s))
}

/// 가격 문자열을 파싱합니다.
pub fn parse_price(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid price: {}", s))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}
