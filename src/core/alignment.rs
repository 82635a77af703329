//! Alignment between the Four Pillars and chart component scores
//!
//! alignment = (1 - |saju - astro| / 100) ^ k, a pure function of the
//! distance between the two 0..=100 scores. Equal scores give 1.0.

use crate::{DOMAIN_SCORE_MAX, DOMAIN_SCORE_MIN};

/// Agreement of two component scores in [0, 1].
///
/// Symmetric, and monotonically non-increasing in |saju - astro|.
/// Inputs are clamped to the domain score range; NaN counts as neutral.
pub fn alignment(saju: f64, astro: f64, exponent: f64) -> f64 {
    let saju = clamp_score(saju);
    let astro = clamp_score(astro);
    let span = DOMAIN_SCORE_MAX - DOMAIN_SCORE_MIN;
    let agreement = 1.0 - (saju - astro).abs() / span;
    agreement.clamp(0.0, 1.0).powf(exponent)
}

/// Multiplier applied to the base score: floor + (1 - floor) * alignment
pub fn alignment_term(alignment: f64, floor: f64) -> f64 {
    let floor = floor.clamp(0.0, 1.0);
    floor + (1.0 - floor) * alignment.clamp(0.0, 1.0)
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return crate::NEUTRAL_BASE_SCORE;
    }
    score.clamp(DOMAIN_SCORE_MIN, DOMAIN_SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ALIGNMENT_EXPONENT, ALIGNMENT_TERM_FLOOR};

    #[test]
    fn test_equal_scores_fully_aligned() {
        assert_eq!(alignment(80.0, 80.0, ALIGNMENT_EXPONENT), 1.0);
        assert_eq!(alignment(0.0, 0.0, ALIGNMENT_EXPONENT), 1.0);
    }

    #[test]
    fn test_opposite_extremes_zero() {
        assert_eq!(alignment(0.0, 100.0, ALIGNMENT_EXPONENT), 0.0);
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(
            alignment(31.0, 77.5, ALIGNMENT_EXPONENT),
            alignment(77.5, 31.0, ALIGNMENT_EXPONENT)
        );
    }

    #[test]
    fn test_closer_is_higher() {
        let near = alignment(60.0, 65.0, ALIGNMENT_EXPONENT);
        let far = alignment(60.0, 90.0, ALIGNMENT_EXPONENT);
        assert!(near > far);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        assert_eq!(alignment(-20.0, 0.0, ALIGNMENT_EXPONENT), 1.0);
        assert_eq!(alignment(150.0, 100.0, ALIGNMENT_EXPONENT), 1.0);
        let nan = alignment(f64::NAN, 50.0, ALIGNMENT_EXPONENT);
        assert_eq!(nan, 1.0);
    }

    #[test]
    fn test_term_bounds() {
        assert_eq!(alignment_term(0.0, ALIGNMENT_TERM_FLOOR), ALIGNMENT_TERM_FLOOR);
        assert!((alignment_term(1.0, ALIGNMENT_TERM_FLOOR) - 1.0).abs() < 1e-12);
    }
}
