//! Square of Nine 그리드 출력.

use anyhow::Result;
use gann_analytics::{CompassAngle, GannAnalyzer, SquareOfNine};
use rust_decimal::Decimal;
use tracing::info;

use super::{to_json, OutputFormat};

/// 그리드 명령 설정.
#[derive(Debug)]
pub struct SquareConfig {
    /// 중심 값
    pub center: Decimal,
    /// 그리드 크기 (없으면 설정값)
    pub size: Option<usize>,
    pub format: OutputFormat,
}

/// 그리드를 생성해 렌더링합니다.
pub fn render_square(analyzer: &GannAnalyzer, config: &SquareConfig) -> Result<String> {
    let size = config.size.unwrap_or_else(|| analyzer.grid_size());
    let grid = analyzer.square_of_nine_sized(config.center, size)?;

    info!(size, center = %config.center, "Rendering Square of Nine");

    match config.format {
        OutputFormat::Json => to_json(&grid),
        OutputFormat::Table => Ok(grid_table(&grid)),
    }
}

fn grid_table(grid: &SquareOfNine) -> String {
    let width = grid
        .rows()
        .iter()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1)
        + 2;
    let center = grid.center_index();

    let mut out = String::new();
    for (r, row) in grid.rows().iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, v)| {
                let cell = if r == center && c == center {
                    format!("[{}]", v)
                } else {
                    v.to_string()
                };
                format!("{:>width$}", cell, width = width)
            })
            .collect();
        out.push_str(line.join(" ").trim_end());
        out.push('\n');
    }

    out.push('\n');
    for angle in CompassAngle::ALL {
        let values: Vec<String> = grid.axis(angle).iter().map(Decimal::to_string).collect();
        out.push_str(&format!("{:>4}°: {}\n", angle.degrees(), values.join(", ")));
    }
    out
}
