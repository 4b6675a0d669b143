//! 주요 피벗 탐색 및 시계열 각도 투영.
//!
//! 시계열은 `{data_dir}/{SYMBOL}.json` 파일(`PricePoint` 배열)에서 읽습니다.

use anyhow::{Context, Result};
use gann_analytics::{GannAnalyzer, MajorPivots, PivotPoint, SeriesProjection};
use gann_core::{tail, DecimalExt, GannError, GannResult, PricePoint, SeriesSource};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{to_json, OutputFormat};

/// 디렉토리의 JSON 파일을 읽는 시계열 소스.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{}.json", symbol.to_uppercase()))
    }
}

impl SeriesSource for JsonFileSource {
    fn fetch(&self, symbol: &str, days: usize) -> GannResult<Vec<PricePoint>> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(GannError::NotFound(format!(
                "{} ({})",
                symbol,
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(&path)?;
        let mut points: Vec<PricePoint> = serde_json::from_str(&raw)?;
        points.sort_by_key(|p| p.date);

        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(GannError::Data(format!(
                "{}: 같은 거래일({})이 두 번 이상 있습니다",
                path.display(),
                pair[0].date
            )));
        }

        let inverted = points.iter().filter(|p| p.is_inverted()).count();
        if inverted > 0 {
            warn!(symbol, inverted, "Series contains bars with high < low");
        }

        debug!(symbol, bars = points.len(), "Series loaded");
        Ok(tail(&points, days))
    }
}

/// 투영 기준으로 삼을 피벗.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotSide {
    High,
    Low,
}

/// 피벗 명령 설정.
#[derive(Debug)]
pub struct PivotsConfig {
    pub symbol: String,
    pub days: usize,
    /// 지정하면 해당 피벗에서 시계열 각도 투영도 출력
    pub project_from: Option<PivotSide>,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct PivotsReport {
    symbol: String,
    bars: usize,
    pivots: Option<MajorPivots>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    projection: Vec<SeriesProjection>,
}

/// 주요 피벗을 찾아 렌더링합니다.
pub fn render_pivots(
    analyzer: &GannAnalyzer,
    source: &dyn SeriesSource,
    config: &PivotsConfig,
) -> Result<String> {
    let span = gann_core::analysis_span!("pivots", config.symbol);
    let _guard = span.enter();

    let series = source
        .fetch(&config.symbol, config.days)
        .with_context(|| format!("Failed to load series for {}", config.symbol))?;

    let pivots = analyzer.major_pivots(&series);
    info!(symbol = %config.symbol, bars = series.len(), found = pivots.is_some(), "Major pivots");

    let anchor: Option<PivotPoint> = match (config.project_from, &pivots) {
        (Some(PivotSide::High), Some(p)) => Some(p.major_high),
        (Some(PivotSide::Low), Some(p)) => p.major_low,
        _ => None,
    };
    let projection = anchor
        .map(|pivot| analyzer.project_series(&series, pivot.index))
        .transpose()?
        .unwrap_or_default();

    let report = PivotsReport {
        symbol: config.symbol.to_uppercase(),
        bars: series.len(),
        pivots,
        projection,
    };

    match config.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Table => Ok(pivots_table(&report)),
    }
}

fn pivots_table(report: &PivotsReport) -> String {
    let Some(pivots) = &report.pivots else {
        return format!("{}: no data\n", report.symbol);
    };

    let mut out = format!("{} ({} bars)\n", report.symbol, report.bars);
    out.push_str(&format!(
        "  Major high: {} on {}\n",
        pivots.major_high.price, pivots.major_high.date
    ));
    match &pivots.major_low {
        Some(low) => out.push_str(&format!("  Major low:  {} on {}\n", low.price, low.date)),
        None => out.push_str("  Major low:  -\n"),
    }

    if let Some(first) = report.projection.first() {
        let names: Vec<String> = first.levels.iter().map(|l| format!("{:>10}", l.name)).collect();
        out.push_str(&format!("\n{:>10} {:>10} {}\n", "Date", "Close", names.join(" ")));
        for row in &report.projection {
            let ups: Vec<String> = row
                .levels
                .iter()
                .map(|l| format!("{:>10}", l.up_price.round_price()))
                .collect();
            out.push_str(&format!(
                "{:>10} {:>10} {}\n",
                row.date.to_string(),
                row.close,
                ups.join(" ")
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gann_core::InMemorySource;
    use rust_decimal_macros::dec;

    fn source() -> InMemorySource {
        let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
        let mut source = InMemorySource::new();
        source.insert(
            "TSLA",
            vec![
                PricePoint::new(day(1), dec!(250), dec!(255), dec!(245), dec!(252)),
                PricePoint::new(day(2), dec!(252), dec!(262), dec!(250), dec!(260)),
                PricePoint::new(day(3), dec!(260), dec!(261), dec!(240), dec!(241)),
            ],
        );
        source
    }

    #[test]
    fn test_pivots_table() {
        let config = PivotsConfig {
            symbol: "tsla".to_string(),
            days: 60,
            project_from: None,
            format: OutputFormat::Table,
        };
        let out = render_pivots(&GannAnalyzer::new(), &source(), &config).unwrap();
        assert!(out.contains("TSLA (3 bars)"));
        assert!(out.contains("Major high: 262 on 2024-04-02"));
        assert!(out.contains("Major low:  240 on 2024-04-03"));
    }

    #[test]
    fn test_pivots_json_with_projection() {
        let config = PivotsConfig {
            symbol: "TSLA".to_string(),
            days: 60,
            project_from: Some(PivotSide::High),
            format: OutputFormat::Json,
        };
        let out = render_pivots(&GannAnalyzer::new(), &source(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["pivots"]["major_high"]["price"], "262");
        let projection = value["projection"].as_array().unwrap();
        assert_eq!(projection.len(), 3);
        // 피벗 봉(2일)의 종가 260에서 각도선이 교차
        assert_eq!(projection[1]["delta"], 0);
        assert_eq!(projection[1]["levels"][0]["up_price"], "260");
    }

    #[test]
    fn test_unknown_symbol() {
        let config = PivotsConfig {
            symbol: "NOPE".to_string(),
            days: 10,
            project_from: None,
            format: OutputFormat::Table,
        };
        assert!(render_pivots(&GannAnalyzer::new(), &source(), &config).is_err());
    }

    #[test]
    fn test_json_file_source() {
        let dir = std::env::temp_dir().join(format!("gann-series-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let points = source().fetch("TSLA", 10).unwrap();
        std::fs::write(dir.join("TSLA.json"), serde_json::to_string(&points).unwrap()).unwrap();

        let file_source = JsonFileSource::new(&dir);
        let loaded = file_source.fetch("tsla", 2).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].close, dec!(241));
        assert!(matches!(
            file_source.fetch("MSFT", 2),
            Err(GannError::NotFound(_))
        ));
    }

    #[test]
    fn test_json_file_source_rejects_duplicate_dates() {
        let dir = std::env::temp_dir().join(format!("gann-series-dup-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut points = source().fetch("TSLA", 10).unwrap();
        points.push(points[0].clone());
        std::fs::write(dir.join("TSLA.json"), serde_json::to_string(&points).unwrap()).unwrap();

        let result = JsonFileSource::new(&dir).fetch("TSLA", 10);
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(result, Err(GannError::Data(_))));
    }
}
