//! Square of Nine.
//!
//! 중심 값에서 시작해 정수를 한 칸씩 늘려가며 바깥으로 나선형으로 채운
//! 정사각 그리드입니다. 중심과 같은 행/열/대각선에 놓인 값들이 각도상
//! 의미 있는 가격 간격(0°, 45°, 90° ...)을 이룹니다.
//!
//! # 사용 예시
//!
//! ```
//! use gann_analytics::SquareOfNine;
//! use rust_decimal_macros::dec;
//!
//! let grid = SquareOfNine::build(dec!(100), 3).unwrap();
//! assert_eq!(grid.get(1, 1), Some(dec!(100)));
//! assert_eq!(grid.get(0, 0), Some(dec!(104)));
//! ```

use gann_core::{DecimalExt, Price, SpiralDirection};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{AnalysisError, AnalysisResult};

/// 최소 그리드 크기.
pub const MIN_GRID_SIZE: usize = 3;

/// 최대 그리드 크기.
pub const MAX_GRID_SIZE: usize = 999;

/// 가격 레벨 계산에 사용하는 각도 (0° ~ 360°, 45° 간격).
pub const LEVEL_ANGLES: [u32; 9] = [0, 45, 90, 135, 180, 225, 270, 315, 360];

/// 중심에서 뻗어나가는 8방위 각도 (화면 기준, 0°는 오른쪽, 90°는 위쪽).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompassAngle {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
    Deg180,
    Deg225,
    Deg270,
    Deg315,
}

impl CompassAngle {
    /// 모든 방위를 0°부터 반시계 방향 순서로 반환합니다.
    pub const ALL: [CompassAngle; 8] = [
        CompassAngle::Deg0,
        CompassAngle::Deg45,
        CompassAngle::Deg90,
        CompassAngle::Deg135,
        CompassAngle::Deg180,
        CompassAngle::Deg225,
        CompassAngle::Deg270,
        CompassAngle::Deg315,
    ];

    /// 도 단위 값에서 변환합니다. 45의 배수가 아니면 `None`.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::Deg0),
            45 => Some(Self::Deg45),
            90 => Some(Self::Deg90),
            135 => Some(Self::Deg135),
            180 => Some(Self::Deg180),
            225 => Some(Self::Deg225),
            270 => Some(Self::Deg270),
            315 => Some(Self::Deg315),
            _ => None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg45 => 45,
            Self::Deg90 => 90,
            Self::Deg135 => 135,
            Self::Deg180 => 180,
            Self::Deg225 => 225,
            Self::Deg270 => 270,
            Self::Deg315 => 315,
        }
    }

    /// 한 칸 이동 벡터 `(행 변화, 열 변화)`.
    fn step(&self) -> (isize, isize) {
        match self {
            Self::Deg0 => (0, 1),
            Self::Deg45 => (-1, 1),
            Self::Deg90 => (-1, 0),
            Self::Deg135 => (-1, -1),
            Self::Deg180 => (0, -1),
            Self::Deg225 => (1, -1),
            Self::Deg270 => (1, 0),
            Self::Deg315 => (1, 1),
        }
    }
}

/// Square of Nine 그리드.
///
/// 생성 후에는 변경되지 않습니다. 모든 칸은 `[center, center + size² - 1]`
/// 범위의 서로 다른 값을 가지며 중심 칸만 `center_value`를 가집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquareOfNine {
    size: usize,
    center_value: Price,
    direction: SpiralDirection,
    rows: Vec<Vec<Price>>,
}

impl SquareOfNine {
    /// 기본 방향(오른쪽 → 위 → 왼쪽 → 아래)으로 그리드를 생성합니다.
    ///
    /// # 에러
    ///
    /// `size`가 3 미만이거나 짝수이거나 `MAX_GRID_SIZE`를 넘으면
    /// `AnalysisError::InvalidGridSize`.
    pub fn build(center_value: Price, size: usize) -> AnalysisResult<Self> {
        Self::build_with_direction(center_value, size, SpiralDirection::default())
    }

    /// 지정한 나선 방향으로 그리드를 생성합니다.
    ///
    /// 현재 방향으로 `step`칸 이동하며 값을 1씩 늘려 기록하고, 방향을 두 번
    /// 바꿀 때마다 `step`을 1 늘립니다. 값이 `size² - 1`번 증가하면 멈춥니다.
    pub fn build_with_direction(
        center_value: Price,
        size: usize,
        direction: SpiralDirection,
    ) -> AnalysisResult<Self> {
        validate_size(size)?;

        let total = size * size;
        let last_offset = (total - 1) as u64;
        let center = size / 2;
        let turns = direction.turns();

        let mut cells: Vec<Option<Price>> = vec![None; total];
        cells[center * size + center] = Some(center_value);

        let (mut row, mut col) = (center as isize, center as isize);
        let mut offset: u64 = 0;
        let mut step = 1usize;
        let mut turn = 0usize;

        'spiral: while offset < last_offset {
            let (d_row, d_col) = turns[turn % turns.len()];
            for _ in 0..step {
                row += d_row;
                col += d_col;
                offset += 1;

                // 범위 밖 칸은 기록하지 않지만 오프셋은 계속 증가
                if let Some(index) = cell_index(row, col, size) {
                    let value = center_value
                        .checked_add(Decimal::from(offset))
                        .ok_or_else(|| {
                            AnalysisError::CalculationError(format!(
                                "그리드 값이 표현 범위를 넘습니다: {} + {}",
                                center_value, offset
                            ))
                        })?;
                    cells[index] = Some(value);
                }

                if offset == last_offset {
                    break 'spiral;
                }
            }

            turn += 1;
            if turn % 2 == 0 {
                step += 1;
            }
        }

        let flat: Vec<Price> = cells
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                AnalysisError::CalculationError("나선이 모든 칸을 채우지 못했습니다".to_string())
            })?;

        let rows = flat.chunks(size).map(<[Price]>::to_vec).collect();

        debug!(size, %center_value, %direction, "Square of Nine built");

        Ok(Self {
            size,
            center_value,
            direction,
            rows,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn center_value(&self) -> Price {
        self.center_value
    }

    pub fn direction(&self) -> SpiralDirection {
        self.direction
    }

    /// 중심 칸의 행/열 인덱스 (`size / 2`).
    pub fn center_index(&self) -> usize {
        self.size / 2
    }

    /// 행 단위 값.
    pub fn rows(&self) -> &[Vec<Price>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Price> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// 값이 놓인 `(행, 열)` 위치를 찾습니다.
    pub fn locate(&self, value: Price) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, cells)| {
            cells.iter().position(|v| *v == value).map(|c| (r, c))
        })
    }

    /// 중심에서 바깥쪽으로 한 방위를 따라 놓인 값들 (중심 제외).
    pub fn axis(&self, angle: CompassAngle) -> Vec<Price> {
        let (d_row, d_col) = angle.step();
        let center = self.center_index() as isize;

        (1..=center)
            .filter_map(|distance| {
                let row = center + d_row * distance;
                let col = center + d_col * distance;
                cell_index(row, col, self.size).map(|_| self.rows[row as usize][col as usize])
            })
            .collect()
    }
}

pub(crate) fn validate_size(size: usize) -> AnalysisResult<()> {
    if size < MIN_GRID_SIZE || size % 2 == 0 || size > MAX_GRID_SIZE {
        warn!(size, "Rejected Square of Nine size");
        return Err(AnalysisError::InvalidGridSize { size });
    }
    Ok(())
}

fn cell_index(row: isize, col: isize, size: usize) -> Option<usize> {
    let size = size as isize;
    if (0..size).contains(&row) && (0..size).contains(&col) {
        Some((row * size + col) as usize)
    } else {
        None
    }
}

/// 레벨 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    /// 90°의 배수 (0°, 360° 포함)
    Cardinal,
    /// 그 외 45° 각도
    Ordinal,
}

/// 한 각도의 지지/저항 가격.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    /// 각도 (도)
    pub angle: u32,
    /// 지지선: (√center − angle/360)²
    pub support: Price,
    /// 저항선: (√center + angle/360)²
    pub resistance: Price,
    pub kind: LevelKind,
}

/// Square of Nine 가격 레벨 계산.
///
/// 중심 가격의 제곱근에 각도 비율(angle/360)을 빼고 더한 뒤 다시 제곱합니다.
/// 결과는 소수점 둘째 자리로 반올림됩니다.
///
/// # 에러
///
/// `center`가 음수이면 `AnalysisError::InvalidParameter`.
pub fn price_levels(center: Price) -> AnalysisResult<Vec<PriceLevel>> {
    if center < Decimal::ZERO {
        warn!(%center, "Rejected negative center price");
        return Err(AnalysisError::InvalidParameter(format!(
            "중심 가격은 0 이상이어야 합니다: {}",
            center
        )));
    }

    let root = center.sqrt().ok_or_else(|| {
        AnalysisError::CalculationError(format!("제곱근 계산 실패: {}", center))
    })?;

    let overflow = || {
        AnalysisError::CalculationError(format!("가격 레벨이 표현 범위를 넘습니다: {}", center))
    };

    let levels = LEVEL_ANGLES
        .iter()
        .map(|&angle| {
            let increment = Decimal::from(angle) / dec!(360);
            let low_root = root - increment;
            let high_root = root + increment;
            let support = low_root.checked_mul(low_root).ok_or_else(overflow)?;
            let resistance = high_root.checked_mul(high_root).ok_or_else(overflow)?;

            Ok(PriceLevel {
                angle,
                support: support.round_price(),
                resistance: resistance.round_price(),
                kind: if angle % 90 == 0 {
                    LevelKind::Cardinal
                } else {
                    LevelKind::Ordinal
                },
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    debug!(%center, "Square of Nine levels calculated");
    Ok(levels)
}
