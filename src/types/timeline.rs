//! Month keys and overlap timeline points

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::ValidationReason;
use crate::{PEAK_THRESHOLD_ELEVATED, PEAK_THRESHOLD_PEAK};

lazy_static! {
    static ref RE_YEAR_MONTH: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
}

/// Calendar month, ordered chronologically (year, then month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1000..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Current UTC month. Only used when the caller supplies no anchor.
    pub fn current() -> Self {
        let now = Utc::now();
        Self { year: now.year(), month: now.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Following month, `None` after 9999-12
    pub fn succ(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Month `n` months later, `None` past 9999-12
    pub fn plus_months(&self, n: u32) -> Option<Self> {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
        let year = i32::try_from(index / 12).ok()?;
        Self::new(year, (index % 12) as u32 + 1)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RE_YEAR_MONTH
            .captures(s.trim())
            .ok_or(ValidationReason::R105_INVALID_ANCHOR_MONTH)?;
        let year: i32 = caps[1].parse().map_err(|_| ValidationReason::R105_INVALID_ANCHOR_MONTH)?;
        let month: u32 = caps[2].parse().map_err(|_| ValidationReason::R105_INVALID_ANCHOR_MONTH)?;
        YearMonth::new(year, month).ok_or(ValidationReason::R105_INVALID_ANCHOR_MONTH)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|reason: ValidationReason| reason.to_string())
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Strength class of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeakLevel {
    Normal,
    Elevated,
    Peak,
}

impl PeakLevel {
    /// Threshold table on overlap strength
    pub fn from_strength(strength: f64) -> Self {
        if strength >= PEAK_THRESHOLD_PEAK {
            PeakLevel::Peak
        } else if strength >= PEAK_THRESHOLD_ELEVATED {
            PeakLevel::Elevated
        } else {
            PeakLevel::Normal
        }
    }

    /// ANSI color for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            PeakLevel::Normal => "\x1b[90m",   // Gray
            PeakLevel::Elevated => "\x1b[33m", // Yellow
            PeakLevel::Peak => "\x1b[32m",     // Green
        }
    }

    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for PeakLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PeakLevel::Normal => "NORMAL",
            PeakLevel::Elevated => "ELEVATED",
            PeakLevel::Peak => "PEAK",
        };
        write!(f, "{}", name)
    }
}

/// One month of the overlap timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapTimelinePoint {
    pub month: YearMonth,
    pub overlap_strength: f64,
    pub time_overlap_weight: f64,
    pub peak_level: PeakLevel,
}
