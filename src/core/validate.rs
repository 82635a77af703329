//! Input validation
//!
//! Every check runs; a failure lists all issues in field order.

use crate::error::ValidationFailure;
use crate::types::{MatrixInput, ValidationIssue, ValidationReason, YearMonth};
use crate::MAX_HORIZON_MONTHS;

/// Check required fields and documented ranges
pub fn validate_input(input: &MatrixInput) -> Result<(), ValidationFailure> {
    let mut issues = Vec::new();

    if input.day_master_element.is_none() {
        issues.push(ValidationIssue::new(
            ValidationReason::R101_MISSING_DAY_MASTER,
            "day_master_element",
        ));
    }
    match input.pillar_elements.len() {
        0 => issues.push(ValidationIssue::new(
            ValidationReason::R102_MISSING_PILLARS,
            "pillar_elements",
        )),
        4 => {}
        _ => issues.push(ValidationIssue::new(
            ValidationReason::R103_PILLAR_COUNT,
            "pillar_elements",
        )),
    }

    for (planet, house) in &input.planet_houses {
        if !(1..=12).contains(house) {
            issues.push(ValidationIssue::new(
                ValidationReason::R104_HOUSE_OUT_OF_RANGE,
                format!("planet_houses.{}", planet),
            ));
        }
    }

    for (i, aspect) in input.aspects.iter().enumerate() {
        if let Some(orb) = aspect.orb {
            if !orb.is_finite() || orb < 0.0 {
                issues.push(ValidationIssue::new(
                    ValidationReason::R106_INVALID_ASPECT,
                    format!("aspects[{}].orb", i),
                ));
            }
        }
        if let Some(angle) = aspect.angle {
            if !angle.is_finite() || !(0.0..=360.0).contains(&angle) {
                issues.push(ValidationIssue::new(
                    ValidationReason::R106_INVALID_ASPECT,
                    format!("aspects[{}].angle", i),
                ));
            }
        }
    }

    if let Err(issue) = resolve_anchor(input) {
        issues.push(issue);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure::new(issues))
    }
}

/// The input's anchor month, if it supplies one
pub fn resolve_anchor(input: &MatrixInput) -> Result<Option<YearMonth>, ValidationIssue> {
    match input.anchor_month.as_deref() {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|reason| ValidationIssue::new(reason, "anchor_month")),
    }
}

pub fn validate_horizon(horizon_months: u32) -> Result<(), ValidationIssue> {
    if (1..=MAX_HORIZON_MONTHS).contains(&horizon_months) {
        Ok(())
    } else {
        Err(ValidationIssue::new(
            ValidationReason::R108_INVALID_HORIZON,
            "horizon_months",
        ))
    }
}

/// The last timeline month, `anchor + horizon - 1`, must still be a valid
/// "YYYY-MM" key
pub fn validate_span(anchor: YearMonth, horizon_months: u32) -> Result<(), ValidationIssue> {
    match anchor.plus_months(horizon_months.saturating_sub(1)) {
        Some(_) => Ok(()),
        None => Err(ValidationIssue::new(
            ValidationReason::R108_INVALID_HORIZON,
            "horizon_months",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AspectHit, Element};

    #[test]
    fn test_minimal_input_is_valid() {
        let input = MatrixInput::new(Element::Metal, [Element::Metal; 4]);
        assert_eq!(validate_input(&input), Ok(()));
    }

    #[test]
    fn test_empty_input_lists_required_fields() {
        let err = validate_input(&MatrixInput::default()).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.has(ValidationReason::R101_MISSING_DAY_MASTER));
        assert!(err.has(ValidationReason::R102_MISSING_PILLARS));
    }

    #[test]
    fn test_pillar_count() {
        let mut input = MatrixInput::new(Element::Wood, [Element::Wood; 4]);
        input.pillar_elements.pop();
        let err = validate_input(&input).unwrap_err();
        assert!(err.has(ValidationReason::R103_PILLAR_COUNT));
    }

    #[test]
    fn test_range_checks_carry_field_paths() {
        let mut input = MatrixInput::new(Element::Wood, [Element::Wood; 4]);
        input.planet_houses.insert("mars".to_string(), 13);
        input.aspects.push(AspectHit::new("sun", "moon", "trine").with_orb(-1.0));
        input.anchor_month = Some("2025-13".to_string());

        let err = validate_input(&input).unwrap_err();
        let fields: Vec<&str> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["planet_houses.mars", "aspects[0].orb", "anchor_month"]);
        assert!(err.to_string().contains("R104_HOUSE_OUT_OF_RANGE"));
    }

    #[test]
    fn test_horizon() {
        assert!(validate_horizon(1).is_ok());
        assert!(validate_horizon(MAX_HORIZON_MONTHS).is_ok());
        assert!(validate_horizon(0).is_err());
        assert!(validate_horizon(MAX_HORIZON_MONTHS + 1).is_err());
    }

    #[test]
    fn test_span_ends_at_9999_12() {
        let anchor: YearMonth = "9999-01".parse().unwrap();
        assert!(validate_span(anchor, 12).is_ok());
        let err = validate_span(anchor, 13).unwrap_err();
        assert_eq!(err.reason, ValidationReason::R108_INVALID_HORIZON);
        assert_eq!(err.field, "horizon_months");
    }
}
