//! Destiny Matrix: deterministic fusion of a Four Pillars profile and a
//! Western chart profile into per-domain scores, drivers and a monthly
//! overlap timeline.
//!
//! Pipeline: interaction tables → alignment → time overlap → domain scores
//! → timeline → engine result.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use crate::config::FusionConfig;
pub use crate::core::{calculate_destiny_matrix, input_digest, MatrixEngine};
pub use crate::error::{ConfigError, TableError, ValidationFailure};

// =============================================================================
// SCORE SCALE [C]
// =============================================================================

/// Lowest score an interaction entry may carry
pub const CODE_SCORE_MIN: u8 = 1;

/// Highest score an interaction entry may carry
pub const CODE_SCORE_MAX: u8 = 10;

/// Domain scores live on 0..=100
pub const DOMAIN_SCORE_MIN: f64 = 0.0;
pub const DOMAIN_SCORE_MAX: f64 = 100.0;

/// Base score of a domain where no lookup resolved
pub const NEUTRAL_BASE_SCORE: f64 = 50.0;

// =============================================================================
// ALIGNMENT [C]
// =============================================================================

/// Curvature of the agreement curve `(1 - d/100)^k`
pub const ALIGNMENT_EXPONENT: f64 = 1.5;

/// alignment_term = floor + (1 - floor) * alignment
pub const ALIGNMENT_TERM_FLOOR: f64 = 0.80;

// =============================================================================
// TIME OVERLAP [C]
// =============================================================================

/// Weight with no active events
pub const OVERLAP_WEIGHT_FLOOR: f64 = 1.0;

/// Hard ceiling, never exceeded regardless of event count
pub const OVERLAP_WEIGHT_CEILING: f64 = 1.3;

/// Weight added per event at full contribution (contribution is 0..=1)
pub const OVERLAP_INCREMENT_PER_EVENT: f64 = 0.10;

/// overlap_strength at or above this is a PEAK month
pub const PEAK_THRESHOLD_PEAK: f64 = 1.5;

/// overlap_strength at or above this is an ELEVATED month
pub const PEAK_THRESHOLD_ELEVATED: f64 = 0.6;

// =============================================================================
// CONFIDENCE [C]
// =============================================================================

/// Confidence when nothing resolved
pub const CONFIDENCE_MIN: f64 = 0.20;

/// Resolved lookups needed for full confidence
pub const CONFIDENCE_TARGET_MATCHES: usize = 12;

// =============================================================================
// DOMAIN WEIGHTS [C] - sum = 1.0
// =============================================================================

pub const WEIGHT_CAREER: f64 = 0.25;
pub const WEIGHT_LOVE: f64 = 0.20;
pub const WEIGHT_MONEY: f64 = 0.25;
pub const WEIGHT_HEALTH: f64 = 0.15;
pub const WEIGHT_RELOCATION: f64 = 0.15;

// =============================================================================
// GRADES [C]
// =============================================================================

pub const GRADE_S_MIN: f64 = 85.0;
pub const GRADE_A_MIN: f64 = 70.0;
pub const GRADE_B_MIN: f64 = 55.0;
pub const GRADE_C_MIN: f64 = 40.0;

// =============================================================================
// DRIVERS / CAUTIONS [C]
// =============================================================================

/// Entries scoring at least this are driver candidates
pub const DRIVER_MIN_SCORE: u8 = 7;

/// Entries scoring at most this are caution candidates
pub const CAUTION_MAX_SCORE: u8 = 4;

pub const DRIVERS_PER_DOMAIN: usize = 3;
pub const CAUTIONS_PER_DOMAIN: usize = 3;
pub const TOP_LEVEL_LABELS: usize = 5;

// =============================================================================
// TIMELINE [C]
// =============================================================================

pub const DEFAULT_HORIZON_MONTHS: u32 = 12;
pub const MAX_HORIZON_MONTHS: u32 = 60;

/// Calendar projection caps
pub const CALENDAR_EVENTS_PER_MONTH: usize = 3;
pub const CALENDAR_EVENTS_PER_YEAR: usize = 12;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
