//! Integration tests for Slice 5
//!
//! Tests the full engine path: MatrixInput JSON → validation → domain scores
//! → timelines → MatrixResult, plus calendar projection

use std::sync::Arc;
use std::thread;

use destiny_matrix::core::{project_calendar_events, CalendarLimits, MatrixEngine, TableSet};
use destiny_matrix::types::{
    AspectHit, Domain, Element, Grade, MatrixInput, RelationHit, ValidationReason, YearMonth,
};
use destiny_matrix::{calculate_destiny_matrix, input_digest, FusionConfig, ValidationFailure};
use pretty_assertions::assert_eq;

const FOUR_EVENTS: [&str; 4] = ["jupiter-return", "saturn-return", "node-return", "eclipse"];

fn wood_chart() -> MatrixInput {
    let mut input = MatrixInput::new(
        Element::Wood,
        [Element::Wood, Element::Fire, Element::Earth, Element::Metal],
    );
    input.pattern = Some("direct_officer".to_string());
    input.relations.push(RelationHit::new("combine", "month-day"));
    input.anchor_month = Some("2025-03".to_string());
    input
}

fn engine() -> MatrixEngine {
    MatrixEngine::new(Arc::new(TableSet::builtin().unwrap()), FusionConfig::default()).unwrap()
}

/// Concurrent events raise the timing weight and move the overall score
#[test]
fn test_wood_chart_with_and_without_events() {
    let quiet = wood_chart();
    let mut busy = wood_chart();
    for event in FOUR_EVENTS {
        busy.active_transits.insert(event.to_string());
    }

    let a = calculate_destiny_matrix(&quiet).unwrap();
    let b = calculate_destiny_matrix(&busy).unwrap();

    assert_ne!(a.overall_score, b.overall_score);
    assert!(Domain::ALL.iter().any(|d| {
        a.domain(*d).unwrap().final_score_adjusted != b.domain(*d).unwrap().final_score_adjusted
    }));
    for domain in Domain::ALL {
        assert_eq!(a.domain(domain).unwrap().time_overlap_weight, 1.0);
        assert!(b.domain(domain).unwrap().time_overlap_weight > 1.0);
    }

    let anchor: YearMonth = "2025-03".parse().unwrap();
    for result in [&a, &b] {
        assert_eq!(result.overlap_timeline[0].month, anchor);
        for pair in result.overlap_timeline.windows(2) {
            assert!(pair[0].month < pair[1].month);
        }
    }
}

/// Same input: byte-identical JSON, across engines and threads
#[test]
fn test_end_to_end_deterministic() {
    let mut input = wood_chart();
    input.active_transits.insert("pluto-square".to_string());
    input.planet_houses.insert("saturn".to_string(), 10);
    input.planet_signs.insert("saturn".to_string(), "Capricorn".to_string());
    input.aspects.push(AspectHit::new("saturn", "sun", "trine").with_orb(2.5));

    let reference = serde_json::to_string(&engine().calculate(&input).unwrap()).unwrap();

    let shared = Arc::new(engine());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&shared);
            let input = input.clone();
            thread::spawn(move || serde_json::to_string(&engine.calculate(&input).unwrap()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), reference);
    }
}

/// The result survives a JSON round trip through the wire format
#[test]
fn test_input_from_json() {
    let json = r#"{
        "day_master_element": "metal",
        "pillar_elements": ["metal", "water", "wood", "fire"],
        "ten_gods": {"direct_wealth": 2, "eating_god": 1},
        "twelve_stages": {"prosper": 1},
        "pattern": "direct_wealth",
        "yongsin": "earth",
        "planet_houses": {"venus": 2, "jupiter": 11},
        "planet_signs": {"venus": "Taurus", "jupiter": "Sagittarius"},
        "aspects": [{"planet_a": "venus", "planet_b": "jupiter", "aspect_type": "trine", "orb": 1.2}],
        "active_transits": ["jupiter-return"],
        "anchor_month": "2026-01"
    }"#;
    let input: MatrixInput = serde_json::from_str(json).unwrap();
    let result = engine().calculate(&input).unwrap();

    let money = result.domain(Domain::Money).unwrap();
    assert!(money.matched_count > 0);
    assert!(money.confidence_score > 0.2);
    assert!(!money.drivers.is_empty());

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"grade\""));
    assert!(json.contains("\"2026-01\""));
    assert!(json.contains("\"money\""));
}

/// Every problem is reported at once, with reason codes and field paths
#[test]
fn test_validation_failure_lists_issues() {
    let mut input = MatrixInput::default();
    input.planet_houses.insert("moon".to_string(), 0);
    input.anchor_month = Some("2025-3".to_string());

    let err: ValidationFailure = calculate_destiny_matrix(&input).unwrap_err();
    let reasons: Vec<ValidationReason> = err.issues.iter().map(|i| i.reason).collect();
    assert_eq!(
        reasons,
        vec![
            ValidationReason::R101_MISSING_DAY_MASTER,
            ValidationReason::R102_MISSING_PILLARS,
            ValidationReason::R104_HOUSE_OUT_OF_RANGE,
            ValidationReason::R105_INVALID_ANCHOR_MONTH,
        ]
    );
    assert!(err.to_string().starts_with("invalid matrix input"));
}

/// Overall score is the weighted mean of the domains; grade follows it
#[test]
fn test_overall_and_grade() {
    let result = engine().calculate(&wood_chart()).unwrap();
    let weights = FusionConfig::default().domain_weights;
    let expected: f64 = Domain::ALL
        .iter()
        .map(|d| weights.get(*d) * result.domain(*d).unwrap().final_score_adjusted)
        .sum();
    assert!((result.overall_score - expected).abs() < 1e-9);
    assert_eq!(result.grade, Grade::from_score(result.overall_score));
    assert!(result.drivers.len() <= 5);
    assert!(result.cautions.len() <= 5);

    let mut drivers = result.drivers.clone();
    drivers.dedup();
    assert_eq!(drivers.len(), result.drivers.len());
}

/// Results name the table set they were computed against
#[test]
fn test_result_carries_table_identity() {
    let tables = TableSet::builtin().unwrap();
    let result = engine().calculate(&wood_chart()).unwrap();
    assert_eq!(result.table_version, tables.version());
    assert_eq!(result.table_digest, tables.digest_hex());
}

/// Digest depends only on content
#[test]
fn test_input_digest_canonical() {
    let a = wood_chart();
    let json = serde_json::to_string(&a).unwrap();
    let b: MatrixInput = serde_json::from_str(&json).unwrap();
    assert_eq!(input_digest(&a), input_digest(&b));

    let mut c = a.clone();
    c.anchor_month = Some("2025-04".to_string());
    assert_ne!(input_digest(&a), input_digest(&c));

    let result = engine().calculate(&a).unwrap();
    assert_eq!(result.input_digest, input_digest(&a));
}

/// Calendar events come only from elevated or peak months, within caps
#[test]
fn test_calendar_projection() {
    let mut input = wood_chart();
    for event in FOUR_EVENTS {
        input.active_transits.insert(event.to_string());
    }
    let result = engine().calculate(&input).unwrap();
    let events = project_calendar_events(&result, CalendarLimits::default());

    assert!(!events.is_empty());
    assert!(events.len() <= 12);
    assert_eq!(events[0].month, result.overlap_timeline[0].month);
    for event in &events {
        let points = &result.overlap_timeline_by_domain[&event.domain];
        let point = points.iter().find(|p| p.month == event.month).unwrap();
        assert_eq!(point.peak_level, event.peak_level);
    }
}
