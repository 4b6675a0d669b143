//! Gann 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 중심 100의 9x9 Square of Nine
//! gann square --center 100
//!
//! # 각도별 지지/저항 레벨
//! gann levels --center 144
//!
//! # 2024-01-02 피벗(150)에서 2024-03-01까지의 Gann 각도 가격
//! gann angles --pivot-price 150 --pivot-date 2024-01-02 --date 2024-03-01
//!
//! # data/AAPL.json 시계열의 주요 고점/저점과 저점 기준 각도 투영
//! gann pivots -s AAPL --project low
//!
//! # 최근 120개 봉의 SMA50/EMA20/RSI14/MACD/볼린저/VWAP
//! gann indicators -s AAPL --days 120 --sma 50
//!
//! # 다음 Gann 주기 도래일
//! gann cycles --from 2024-01-01 --horizon 180
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use gann_analytics::{GannAnalyzer, GannAngleSet, IndicatorParams};
use gann_core::{init_logging, AppConfig, LogConfig, RatioSet, SpiralDirection};
use std::path::PathBuf;
use tracing::error;

use gann_cli::commands::angles::{render_angles, AnglesConfig};
use gann_cli::commands::cycles::{render_cycles, CyclesConfig};
use gann_cli::commands::indicators::{render_indicators, IndicatorsConfig};
use gann_cli::commands::levels::render_levels;
use gann_cli::commands::pivots::{render_pivots, JsonFileSource, PivotSide, PivotsConfig};
use gann_cli::commands::square::{render_square, SquareConfig};
use gann_cli::commands::{parse_date, parse_price, OutputFormat};

#[derive(Parser)]
#[command(name = "gann")]
#[command(
    about = "Gann analysis CLI - Square of Nine, Gann angles, time cycles",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML, 기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 출력 형식 (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Square of Nine 그리드 출력
    Square {
        /// 중심 값
        #[arg(long)]
        center: String,

        /// 그리드 크기 (3 이상의 홀수, 기본: 설정값)
        #[arg(long)]
        size: Option<usize>,

        /// 나선 방향 (counter_clockwise, clockwise)
        #[arg(long)]
        direction: Option<String>,
    },

    /// Square of Nine 각도별 지지/저항 레벨
    Levels {
        /// 중심 가격
        #[arg(long)]
        center: String,
    },

    /// 피벗에서 특정 날짜까지의 Gann 각도 가격
    Angles {
        /// 피벗 가격
        #[arg(long)]
        pivot_price: String,

        /// 피벗 날짜 (YYYY-MM-DD)
        #[arg(long)]
        pivot_date: String,

        /// 가격을 구할 날짜 (YYYY-MM-DD, 기본: 오늘)
        #[arg(short, long)]
        date: Option<String>,

        /// 비율 세트 (standard, extended, 기본: 설정값)
        #[arg(long)]
        ratio_set: Option<String>,
    },

    /// 시계열의 주요 고점/저점
    Pivots {
        /// 종목 심볼 ({data_dir}/{SYMBOL}.json)
        #[arg(short, long)]
        symbol: String,

        /// 시계열 디렉토리
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// 최근 N개 봉만 사용
        #[arg(long, default_value = "60")]
        days: usize,

        /// 해당 피벗에서 각도 투영 출력
        #[arg(long, value_enum)]
        project: Option<ProjectFrom>,
    },

    /// 시계열의 기술적 지표 (SMA, EMA, RSI, MACD, 볼린저 밴드, VWAP)
    Indicators {
        /// 종목 심볼 ({data_dir}/{SYMBOL}.json)
        #[arg(short, long)]
        symbol: String,

        /// 시계열 디렉토리
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// 최근 N개 봉만 사용
        #[arg(long, default_value = "60")]
        days: usize,

        /// SMA 기간 (기본: 20)
        #[arg(long)]
        sma: Option<usize>,

        /// EMA 기간 (기본: 12)
        #[arg(long)]
        ema: Option<usize>,

        /// RSI 기간 (기본: 14)
        #[arg(long)]
        rsi: Option<usize>,
    },

    /// 다음 Gann 주기 도래일
    Cycles {
        /// 기준일 (YYYY-MM-DD, 기본: 오늘)
        #[arg(long)]
        from: Option<String>,

        /// 전환점을 나열할 기간 (일)
        #[arg(long)]
        horizon: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProjectFrom {
    High,
    Low,
}

impl From<ProjectFrom> for PivotSide {
    fn from(value: ProjectFrom) -> Self {
        match value {
            ProjectFrom::High => PivotSide::High,
            ProjectFrom::Low => PivotSide::Low,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(Some(path)),
        None => AppConfig::load_default(),
    }
    .context("Failed to load configuration")?;
    init_logging(LogConfig::from_settings(&config.logging)?)?;

    if let Err(e) = run(cli, &config) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let format = OutputFormat::parse(&cli.format)?;
    let mut analyzer = GannAnalyzer::from_config(config)?;
    let today = Utc::now().date_naive();

    let output = match cli.command {
        Commands::Square {
            center,
            size,
            direction,
        } => {
            if let Some(direction) = direction {
                analyzer = analyzer.with_direction(direction.parse::<SpiralDirection>()?);
            }
            render_square(
                &analyzer,
                &SquareConfig {
                    center: parse_price(&center)?,
                    size,
                    format,
                },
            )?
        }

        Commands::Levels { center } => render_levels(&analyzer, parse_price(&center)?, format)?,

        Commands::Angles {
            pivot_price,
            pivot_date,
            date,
            ratio_set,
        } => {
            if let Some(set) = ratio_set {
                let set = set.parse::<RatioSet>()?;
                analyzer = analyzer.with_angles(GannAngleSet::from_ratio_set(set));
            }
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);
            render_angles(
                &analyzer,
                &AnglesConfig {
                    pivot_price: parse_price(&pivot_price)?,
                    pivot_date: parse_date(&pivot_date)?,
                    date,
                    format,
                },
            )?
        }

        Commands::Pivots {
            symbol,
            data_dir,
            days,
            project,
        } => {
            let source = JsonFileSource::new(data_dir);
            render_pivots(
                &analyzer,
                &source,
                &PivotsConfig {
                    symbol,
                    days,
                    project_from: project.map(PivotSide::from),
                    format,
                },
            )?
        }

        Commands::Indicators {
            symbol,
            data_dir,
            days,
            sma,
            ema,
            rsi,
        } => {
            let mut params = IndicatorParams::default();
            if let Some(period) = sma {
                params.sma.period = period;
            }
            if let Some(period) = ema {
                params.ema.period = period;
            }
            if let Some(period) = rsi {
                params.rsi.period = period;
            }
            let source = JsonFileSource::new(data_dir);
            render_indicators(
                &analyzer,
                &source,
                &IndicatorsConfig {
                    symbol,
                    days,
                    params,
                    format,
                },
            )?
        }

        Commands::Cycles { from, horizon } => {
            let from = from.as_deref().map(parse_date).transpose()?.unwrap_or(today);
            render_cycles(
                &analyzer,
                &CyclesConfig {
                    from,
                    horizon,
                    format,
                },
            )?
        }
    };

    print!("{}", output);
    Ok(())
}
