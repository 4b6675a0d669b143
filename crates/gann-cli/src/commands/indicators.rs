//! 시계열 기술적 지표 출력.

use anyhow::{Context, Result};
use gann_analytics::{GannAnalyzer, IndicatorParams, IndicatorRow};
use gann_core::{DecimalExt, SeriesSource};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{to_json, OutputFormat};

/// 지표 명령 설정.
#[derive(Debug)]
pub struct IndicatorsConfig {
    pub symbol: String,
    pub days: usize,
    pub params: IndicatorParams,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct IndicatorsReport {
    symbol: String,
    bars: usize,
    rows: Vec<IndicatorRow>,
}

/// 종목의 지표를 계산해 렌더링합니다.
pub fn render_indicators(
    analyzer: &GannAnalyzer,
    source: &dyn SeriesSource,
    config: &IndicatorsConfig,
) -> Result<String> {
    let span = gann_core::analysis_span!("indicators", config.symbol);
    let _guard = span.enter();

    let series = source
        .fetch(&config.symbol, config.days)
        .with_context(|| format!("Failed to load series for {}", config.symbol))?;
    let rows = analyzer.indicators(&series, &config.params)?;
    info!(symbol = %config.symbol, bars = rows.len(), "Indicators computed");

    let report = IndicatorsReport {
        symbol: config.symbol.to_uppercase(),
        bars: rows.len(),
        rows,
    };

    match config.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Table => Ok(indicators_table(&report, &config.params)),
    }
}

fn cell(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:>10}", v.round_price()),
        None => format!("{:>10}", "-"),
    }
}

fn indicators_table(report: &IndicatorsReport, params: &IndicatorParams) -> String {
    if report.rows.is_empty() {
        return format!("{}: no data\n", report.symbol);
    }

    let mut out = format!("{} ({} bars)\n", report.symbol, report.bars);
    out.push_str(&format!(
        "{:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "Date",
        "Close",
        format!("SMA{}", params.sma.period),
        format!("EMA{}", params.ema.period),
        format!("RSI{}", params.rsi.period),
        "MACD",
        "BB Upper",
        "BB Lower",
        "VWAP"
    ));
    for row in &report.rows {
        out.push_str(&format!(
            "{:>10} {:>10} {} {} {} {} {} {} {:>10}\n",
            row.date.to_string(),
            row.close,
            cell(row.sma),
            cell(row.ema),
            cell(row.rsi),
            cell(row.macd.macd),
            cell(row.bollinger.upper),
            cell(row.bollinger.lower),
            row.vwap.round_price()
        ));
    }
    out
}
