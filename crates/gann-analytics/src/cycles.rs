//! Gann 시간 주기 (Time Cycles).
//!
//! 기준일로부터 7, 30, 60, 90, 120, 144, 180, 360일 같은 주기가 돌아오는
//! 날짜와, 특정 경과일이 어떤 주기의 전환점인지를 계산합니다.

use chrono::{Days, NaiveDate};
use gann_core::GannCycle;
use serde::Serialize;
use tracing::warn;

use crate::{AnalysisError, AnalysisResult};

/// 다음 주기 도래일.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleDate {
    pub name: String,
    pub days: u32,
    pub date: NaiveDate,
}

/// 주기 전환점이 겹치는 날.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurningPoint {
    /// 기준일로부터 경과일
    pub day: u32,
    pub date: NaiveDate,
    /// 이 날 전환되는 주기들 (일)
    pub cycles: Vec<u32>,
}

fn validate_cycles(cycles: &[GannCycle]) -> AnalysisResult<()> {
    if let Some(bad) = cycles.iter().find(|c| c.days == 0) {
        warn!(name = %bad.name, "Rejected zero-length cycle");
        return Err(AnalysisError::InvalidParameter(format!(
            "주기 길이는 0보다 커야 합니다: {}",
            bad.name
        )));
    }
    Ok(())
}

fn add_days(from: NaiveDate, days: u32) -> AnalysisResult<NaiveDate> {
    from.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| {
            AnalysisError::CalculationError(format!("날짜 범위 초과: {} + {}일", from, days))
        })
}

/// 각 주기가 `from` 이후 처음 돌아오는 날짜 (입력 순서 유지).
pub fn next_cycle_dates(from: NaiveDate, cycles: &[GannCycle]) -> AnalysisResult<Vec<CycleDate>> {
    validate_cycles(cycles)?;

    cycles
        .iter()
        .map(|cycle| {
            Ok(CycleDate {
                name: cycle.name.clone(),
                days: cycle.days,
                date: add_days(from, cycle.days)?,
            })
        })
        .collect()
}

/// `day`에 전환점을 맞는 주기들. 0일째는 어떤 주기의 전환점도 아닙니다.
pub fn cycle_markers(day: u32, cycles: &[GannCycle]) -> AnalysisResult<Vec<u32>> {
    validate_cycles(cycles)?;

    if day == 0 {
        return Ok(Vec::new());
    }
    Ok(cycles
        .iter()
        .filter(|c| day % c.days == 0)
        .map(|c| c.days)
        .collect())
}

/// `start`부터 `horizon`일 동안 하나 이상의 주기가 전환되는 날들.
pub fn turning_points(
    start: NaiveDate,
    horizon: u32,
    cycles: &[GannCycle],
) -> AnalysisResult<Vec<TurningPoint>> {
    validate_cycles(cycles)?;

    let mut points = Vec::new();
    for day in 1..=horizon {
        let markers = cycle_markers(day, cycles)?;
        if markers.is_empty() {
            continue;
        }
        points.push(TurningPoint {
            day,
            date: add_days(start, day)?,
            cycles: markers,
        });
    }
    Ok(points)
}
