//! Engine result and calendar projection types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Domain, DomainScore, OverlapTimelinePoint, PeakLevel, YearMonth};
use crate::{GRADE_A_MIN, GRADE_B_MIN, GRADE_C_MIN, GRADE_S_MIN};

/// Letter grade of the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Fixed score → grade table
    pub fn from_score(score: f64) -> Self {
        if score >= GRADE_S_MIN {
            Grade::S
        } else if score >= GRADE_A_MIN {
            Grade::A
        } else if score >= GRADE_B_MIN {
            Grade::B
        } else if score >= GRADE_C_MIN {
            Grade::C
        } else {
            Grade::D
        }
    }

    /// ANSI color for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Grade::S => "\x1b[35m", // Magenta
            Grade::A => "\x1b[32m", // Green
            Grade::B => "\x1b[36m", // Cyan
            Grade::C => "\x1b[33m", // Yellow
            Grade::D => "\x1b[31m", // Red
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        write!(f, "{}", name)
    }
}

/// Complete engine output. Built once per call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResult {
    pub overall_score: f64,
    pub grade: Grade,
    pub domain_scores: BTreeMap<Domain, DomainScore>,
    /// Domain-weighted, chronological, no duplicate months
    pub overlap_timeline: Vec<OverlapTimelinePoint>,
    pub overlap_timeline_by_domain: BTreeMap<Domain, Vec<OverlapTimelinePoint>>,
    pub drivers: Vec<String>,
    pub cautions: Vec<String>,
    /// Version of the table set the result was computed against
    pub table_version: String,
    /// Hex SHA-256 of the table set
    pub table_digest: String,
    /// Hex SHA-256 of the input, for external result caches
    pub input_digest: String,
}

impl MatrixResult {
    pub fn domain(&self, domain: Domain) -> Option<&DomainScore> {
        self.domain_scores.get(&domain)
    }

    /// Plain one-line summary
    pub fn to_parseable_string(&self) -> String {
        format!(
            "overall={:.1} | grade={} | drivers={} | cautions={} | months={}",
            self.overall_score,
            self.grade,
            self.drivers.len(),
            self.cautions.len(),
            self.overlap_timeline.len(),
        )
    }
}

/// Discrete calendar entry derived from a domain timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub month: YearMonth,
    pub domain: Domain,
    pub peak_level: PeakLevel,
    pub overlap_strength: f64,
    pub time_overlap_weight: f64,
    pub title: String,
}
