//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `GANN__` 접두사 환경 변수 순으로 병합합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::GannCycle;
use crate::types::{RatioSet, SpiralDirection};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// Square of Nine 설정
    pub square_of_nine: SquareOfNineConfig,
    /// Gann 각도 설정
    pub angles: AnglesConfig,
    /// 시간 주기 설정
    pub cycles: CyclesConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Square of Nine 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SquareOfNineConfig {
    /// 그리드 크기 (3 이상의 홀수)
    pub size: usize,
    /// 나선 진행 방향
    pub direction: SpiralDirection,
}

impl Default for SquareOfNineConfig {
    fn default() -> Self {
        Self {
            size: 9,
            direction: SpiralDirection::default(),
        }
    }
}

/// Gann 각도 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnglesConfig {
    /// 사용할 비율 세트
    pub ratio_set: RatioSet,
}

/// 시간 주기 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CyclesConfig {
    /// 추적할 주기 목록
    pub periods: Vec<GannCycle>,
}

impl Default for CyclesConfig {
    fn default() -> Self {
        Self {
            periods: GannCycle::defaults(),
        }
    }
}

impl AppConfig {
    /// 파일(선택)과 환경 변수에서 설정을 로드합니다.
    ///
    /// `path`가 `None`이거나 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("GANN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(Some(Path::new(DEFAULT_CONFIG_PATH)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.square_of_nine.size, 9);
        assert_eq!(
            config.square_of_nine.direction,
            SpiralDirection::CounterClockwise
        );
        assert_eq!(config.angles.ratio_set, RatioSet::Standard);
        assert_eq!(config.cycles.periods.len(), 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert_eq!(config.square_of_nine.size, 9);
    }

    #[test]
    fn test_load_from_toml() {
        let path = std::env::temp_dir().join(format!("gann-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[square_of_nine]
size = 11
direction = "clockwise"

[angles]
ratio_set = "extended"

[[cycles.periods]]
days = 45
name = "45-Day"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.square_of_nine.size, 11);
        assert_eq!(config.square_of_nine.direction, SpiralDirection::Clockwise);
        assert_eq!(config.angles.ratio_set, RatioSet::Extended);
        assert_eq!(config.cycles.periods.len(), 1);
        assert_eq!(config.cycles.periods[0].days, 45);
        assert_eq!(config.logging.format, "pretty");
    }
}
