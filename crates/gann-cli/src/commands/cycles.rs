//! Gann 시간 주기 출력.

use anyhow::Result;
use chrono::NaiveDate;
use gann_analytics::{CycleDate, GannAnalyzer, TurningPoint};
use serde::Serialize;

use super::{to_json, OutputFormat};

/// 주기 명령 설정.
#[derive(Debug)]
pub struct CyclesConfig {
    /// 기준일
    pub from: NaiveDate,
    /// 지정하면 이 기간 안의 전환점도 출력
    pub horizon: Option<u32>,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct CyclesReport {
    from: NaiveDate,
    next: Vec<CycleDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turning_points: Option<Vec<TurningPoint>>,
}

/// 다음 주기 도래일(과 전환점)을 렌더링합니다.
pub fn render_cycles(analyzer: &GannAnalyzer, config: &CyclesConfig) -> Result<String> {
    let report = CyclesReport {
        from: config.from,
        next: analyzer.next_cycles(config.from)?,
        turning_points: config
            .horizon
            .map(|horizon| analyzer.turning_points(config.from, horizon))
            .transpose()?,
    };

    if config.format == OutputFormat::Json {
        return to_json(&report);
    }

    let mut out = format!("Cycles from {}\n", report.from);
    for cycle in &report.next {
        out.push_str(&format!(
            "  {:<12} {:>4} days  {}\n",
            cycle.name, cycle.days, cycle.date
        ));
    }

    if let Some(points) = &report.turning_points {
        out.push_str("\nTurning points\n");
        for point in points {
            let cycles: Vec<String> = point.cycles.iter().map(u32::to_string).collect();
            out.push_str(&format!(
                "  day {:>4}  {}  [{}]\n",
                point.day,
                point.date,
                cycles.join(", ")
            ));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_cycles_table() {
        let config = CyclesConfig {
            from: from(),
            horizon: Some(60),
            format: OutputFormat::Table,
        };
        let out = render_cycles(&GannAnalyzer::new(), &config).unwrap();
        assert!(out.contains("Weekly"));
        assert!(out.contains("2025-01-08"));
        assert!(out.contains("Turning points"));
        assert!(out.contains("[30, 60]"));
    }

    #[test]
    fn test_cycles_json_without_horizon() {
        let config = CyclesConfig {
            from: from(),
            horizon: None,
            format: OutputFormat::Json,
        };
        let out = render_cycles(&GannAnalyzer::new(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["next"].as_array().unwrap().len(), 8);
        assert!(value.get("turning_points").is_none());
    }
}
