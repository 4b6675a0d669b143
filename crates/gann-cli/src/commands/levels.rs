//! Square of Nine 가격 레벨 출력.

use anyhow::Result;
use gann_analytics::{GannAnalyzer, LevelKind};
use rust_decimal::Decimal;

use super::{to_json, OutputFormat};

/// 중심 가격의 각도별 지지/저항 레벨을 렌더링합니다.
pub fn render_levels(
    analyzer: &GannAnalyzer,
    center: Decimal,
    format: OutputFormat,
) -> Result<String> {
    let levels = analyzer.price_levels(center)?;

    if format == OutputFormat::Json {
        return to_json(&levels);
    }

    let mut out = format!(
        "{:>6} {:>9} {:>14} {:>14}\n",
        "Angle", "Type", "Support", "Resistance"
    );
    for level in &levels {
        let kind = match level.kind {
            LevelKind::Cardinal => "Cardinal",
            LevelKind::Ordinal => "Ordinal",
        };
        out.push_str(&format!(
            "{:>5}° {:>9} {:>14} {:>14}\n",
            level.angle, kind, level.support, level.resistance
        ));
    }
    Ok(out)
}
