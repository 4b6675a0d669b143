//! Gann 각도 가격 출력.

use anyhow::Result;
use chrono::NaiveDate;
use gann_analytics::GannAnalyzer;
use gann_core::{start_of_day, DatedPivot, DecimalExt};
use rust_decimal::Decimal;
use tracing::info;

use super::{to_json, OutputFormat};

/// 각도 명령 설정.
#[derive(Debug)]
pub struct AnglesConfig {
    /// 피벗 가격
    pub pivot_price: Decimal,
    /// 피벗 날짜
    pub pivot_date: NaiveDate,
    /// 가격을 구할 날짜
    pub date: NaiveDate,
    pub format: OutputFormat,
}

/// 피벗에서 `date`까지의 각도별 상승/하락 가격을 렌더링합니다.
pub fn render_angles(analyzer: &GannAnalyzer, config: &AnglesConfig) -> Result<String> {
    let pivot = DatedPivot::on_day(config.pivot_price, config.pivot_date);
    let current = start_of_day(config.date);
    let days = pivot.days_until(current);
    let levels = analyzer.angles_at(&pivot, current)?;

    info!(
        pivot_price = %config.pivot_price,
        pivot_date = %config.pivot_date,
        days,
        "Projecting Gann angles"
    );

    if config.format == OutputFormat::Json {
        return to_json(&levels);
    }

    let mut out = format!(
        "Pivot {} @ {} → {} ({} days)\n\n{:>5} {:>8} {:>8} {:>14} {:>8} {:>14} {:>8}\n",
        config.pivot_price,
        config.pivot_date,
        config.date,
        days,
        "Angle",
        "Ratio",
        "Degrees",
        "Up",
        "Up %",
        "Down",
        "Down %"
    );
    for level in &levels {
        out.push_str(&format!(
            "{:>5} {:>8} {:>8.2} {:>14} {:>8} {:>14} {:>8}\n",
            level.name,
            level.ratio.round_dp(4).normalize(),
            level.degrees,
            level.up_price.round_price(),
            percent_from(config.pivot_price, level.up_price),
            level.down_price.round_price(),
            percent_from(config.pivot_price, level.down_price),
        ));
    }
    Ok(out)
}

/// 피벗 대비 변화율 (소수점 첫째 자리, %). 피벗이 0이면 "-".
fn percent_from(pivot: Decimal, price: Decimal) -> String {
    if pivot.is_zero() {
        return "-".to_string();
    }
    let pct = (price - pivot) / pivot * Decimal::from(100);
    format!("{}%", pct.round_dp(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(format: OutputFormat) -> AnglesConfig {
        AnglesConfig {
            pivot_price: dec!(100),
            pivot_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            format,
        }
    }

    #[test]
    fn test_angles_table() {
        let out = render_angles(&GannAnalyzer::new(), &config(OutputFormat::Table)).unwrap();
        assert!(out.contains("(8 days)"));
        assert!(out.contains("1x1"));
        assert!(out.contains("108"));
        assert!(out.contains("8.0%"));
    }

    #[test]
    fn test_angles_json() {
        let out = render_angles(&GannAnalyzer::new(), &config(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let levels = value.as_array().unwrap();
        assert_eq!(levels.len(), 7);
        assert_eq!(levels[3]["name"], "1x1");
        assert_eq!(levels[3]["up_price"], "108");
        assert_eq!(levels[3]["down_price"], "92");
    }

    #[test]
    fn test_percent_from_zero_pivot() {
        assert_eq!(percent_from(Decimal::ZERO, dec!(5)), "-");
        assert_eq!(percent_from(dec!(200), dec!(150)), "-25.0%");
    }
}
