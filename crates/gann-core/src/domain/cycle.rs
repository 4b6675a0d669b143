//! Gann 시간 주기 정의.

use serde::{Deserialize, Serialize};

/// 이름이 붙은 시간 주기 (일 단위).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GannCycle {
    /// 주기 길이 (일)
    pub days: u32,
    /// 표시 이름
    pub name: String,
}

impl GannCycle {
    pub fn new(days: u32, name: impl Into<String>) -> Self {
        Self {
            days,
            name: name.into(),
        }
    }

    /// Gann의 주요 주기: 7, 30, 60, 90, 120, 144, 180, 360일.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(7, "Weekly"),
            Self::new(30, "Monthly"),
            Self::new(60, "60-Day"),
            Self::new(90, "Quarterly"),
            Self::new(120, "120-Day"),
            Self::new(144, "144-Day"),
            Self::new(180, "Semi-Annual"),
            Self::new(360, "Annual"),
        ]
    }
}
