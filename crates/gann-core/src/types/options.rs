//! 알고리즘 변형 선택 옵션.
//!
//! 레거시 화면마다 달랐던 나선 방향과 비율 세트를 설정값으로 노출합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GannError;

/// Square of Nine 나선 진행 방향.
///
/// 두 방향 모두 중심에서 오른쪽으로 한 칸 이동하며 시작합니다.
/// 화면 좌표(0행이 위쪽) 기준입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiralDirection {
    /// 오른쪽 → 위 → 왼쪽 → 아래 (기본값)
    #[default]
    CounterClockwise,
    /// 오른쪽 → 아래 → 왼쪽 → 위
    Clockwise,
}

impl SpiralDirection {
    /// 한 바퀴의 이동 벡터 `(행 변화, 열 변화)`를 순서대로 반환합니다.
    pub fn turns(&self) -> [(isize, isize); 4] {
        match self {
            SpiralDirection::CounterClockwise => [(0, 1), (-1, 0), (0, -1), (1, 0)],
            SpiralDirection::Clockwise => [(0, 1), (1, 0), (0, -1), (-1, 0)],
        }
    }
}

impl fmt::Display for SpiralDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiralDirection::CounterClockwise => write!(f, "counter_clockwise"),
            SpiralDirection::Clockwise => write!(f, "clockwise"),
        }
    }
}

impl FromStr for SpiralDirection {
    type Err = GannError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "counter_clockwise" | "ccw" => Ok(Self::CounterClockwise),
            "clockwise" | "cw" => Ok(Self::Clockwise),
            other => Err(GannError::InvalidInput(format!(
                "알 수 없는 나선 방향: {} (counter_clockwise, clockwise)",
                other
            ))),
        }
    }
}

/// Gann 각도 비율 세트.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSet {
    /// 1x8, 1x4, 1x2, 1x1, 2x1, 4x1, 8x1
    #[default]
    Standard,
    /// 표준 세트에 1x3, 3x1 추가
    Extended,
}

impl fmt::Display for RatioSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioSet::Standard => write!(f, "standard"),
            RatioSet::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for RatioSet {
    type Err = GannError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "extended" => Ok(Self::Extended),
            other => Err(GannError::InvalidInput(format!(
                "알 수 없는 비율 세트: {} (standard, extended)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spiral_direction_parse() {
        assert_eq!(
            "counter-clockwise".parse::<SpiralDirection>().unwrap(),
            SpiralDirection::CounterClockwise
        );
        assert_eq!("CW".parse::<SpiralDirection>().unwrap(), SpiralDirection::Clockwise);
        assert!("sideways".parse::<SpiralDirection>().is_err());
    }

    #[test]
    fn test_turns_start_right() {
        assert_eq!(SpiralDirection::CounterClockwise.turns()[0], (0, 1));
        assert_eq!(SpiralDirection::CounterClockwise.turns()[1], (-1, 0));
        assert_eq!(SpiralDirection::Clockwise.turns()[1], (1, 0));
    }

    #[test]
    fn test_ratio_set_roundtrip_display() {
        for set in [RatioSet::Standard, RatioSet::Extended] {
            assert_eq!(set.to_string().parse::<RatioSet>().unwrap(), set);
        }
    }
}
