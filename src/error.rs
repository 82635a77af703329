//! Error types
//!
//! Validation failures are returned to callers as values; table-integrity
//! failures only arise while loading a table set.

use thiserror::Error;

use crate::types::{Layer, ValidationIssue};

/// Input rejected before scoring. Lists every issue found, in field order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid matrix input: {}", summarize(.issues))]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Does the failure carry this reason?
    pub fn has(&self, reason: crate::types::ValidationReason) -> bool {
        self.issues.iter().any(|issue| issue.reason == reason)
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A table set that must not be served
#[derive(Error, Debug)]
pub enum TableError {
    #[error("table document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read table file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{layer}[{key_a}][{key_b}] is missing its '{locale}' keyword")]
    MissingLocale {
        layer: Layer,
        key_a: String,
        key_b: String,
        locale: &'static str,
    },

    #[error("{layer}[{key_a}][{key_b}] score {score} is outside 1-10")]
    ScoreOutOfScale {
        layer: Layer,
        key_a: String,
        key_b: String,
        score: u8,
    },

    #[error("{layer}[{key_a}][{key_b}] level '{level}' does not accept score {score}")]
    LevelScoreMismatch {
        layer: Layer,
        key_a: String,
        key_b: String,
        level: String,
        score: u8,
    },

    #[error("{layer}[{key_a}][{key_b}] level '{level}' is drawn {expected}, not {color}")]
    LevelColorMismatch {
        layer: Layer,
        key_a: String,
        key_b: String,
        level: String,
        color: String,
        expected: String,
    },

    #[error("table set has no version")]
    MissingVersion,
}

/// A fusion configuration outside its documented bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("domain weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("cannot read config: {0}")]
    Io(String),

    #[error("config is not valid JSON: {0}")]
    Parse(String),
}
