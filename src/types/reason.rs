//! Reason codes for rejected input

use serde::{Deserialize, Serialize};

/// Why an input was rejected before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ValidationReason {
    // =========================================================================
    // R10x: Four Pillars fields
    // =========================================================================
    /// Day-master element absent
    R101_MISSING_DAY_MASTER,
    /// No pillar elements supplied
    R102_MISSING_PILLARS,
    /// Pillar elements present but not exactly four
    R103_PILLAR_COUNT,

    // =========================================================================
    // R10x: Chart and timing fields
    // =========================================================================
    /// Planet placed outside houses 1-12
    R104_HOUSE_OUT_OF_RANGE,
    /// Anchor month is not a valid "YYYY-MM"
    R105_INVALID_ANCHOR_MONTH,
    /// Aspect with negative/non-finite orb or angle outside 0-360
    R106_INVALID_ASPECT,

    // =========================================================================
    // R10x: Selection
    // =========================================================================
    /// Domain tag is not one of the five domains
    R107_UNKNOWN_DOMAIN,
    /// Timeline horizon outside 1..=MAX_HORIZON_MONTHS, or running past 9999-12
    R108_INVALID_HORIZON,
}

impl ValidationReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_MISSING_DAY_MASTER => "R101_MISSING_DAY_MASTER",
            Self::R102_MISSING_PILLARS => "R102_MISSING_PILLARS",
            Self::R103_PILLAR_COUNT => "R103_PILLAR_COUNT",
            Self::R104_HOUSE_OUT_OF_RANGE => "R104_HOUSE_OUT_OF_RANGE",
            Self::R105_INVALID_ANCHOR_MONTH => "R105_INVALID_ANCHOR_MONTH",
            Self::R106_INVALID_ASPECT => "R106_INVALID_ASPECT",
            Self::R107_UNKNOWN_DOMAIN => "R107_UNKNOWN_DOMAIN",
            Self::R108_INVALID_HORIZON => "R108_INVALID_HORIZON",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_MISSING_DAY_MASTER => "Day-master element is required",
            Self::R102_MISSING_PILLARS => "Pillar elements are required",
            Self::R103_PILLAR_COUNT => "Exactly four pillar elements are required",
            Self::R104_HOUSE_OUT_OF_RANGE => "House number must be 1-12",
            Self::R105_INVALID_ANCHOR_MONTH => "Anchor month must be YYYY-MM",
            Self::R106_INVALID_ASPECT => "Aspect orb/angle out of range",
            Self::R107_UNKNOWN_DOMAIN => "Unknown domain",
            Self::R108_INVALID_HORIZON => "Timeline horizon out of range",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub reason: ValidationReason,
    /// Path of the offending field, e.g. "planet_houses.mars"
    pub field: String,
}

impl ValidationIssue {
    pub fn new(reason: ValidationReason, field: impl Into<String>) -> Self {
        Self { reason, field: field.into() }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.reason, self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_follows_code() {
        let mut reasons = vec![
            ValidationReason::R108_INVALID_HORIZON,
            ValidationReason::R106_INVALID_ASPECT,
            ValidationReason::R101_MISSING_DAY_MASTER,
            ValidationReason::R105_INVALID_ANCHOR_MONTH,
            ValidationReason::R104_HOUSE_OUT_OF_RANGE,
        ];
        reasons.sort();
        let codes: Vec<&str> = reasons.iter().map(|r| r.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }
}
