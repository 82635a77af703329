//! Calendar projection of the per-domain timelines.
//!
//! Only elevated and peak months become events.

use std::collections::BTreeMap;

use crate::types::{CalendarEvent, MatrixResult, PeakLevel};
use crate::{CALENDAR_EVENTS_PER_MONTH, CALENDAR_EVENTS_PER_YEAR};

/// Caps on projected events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarLimits {
    pub per_month: usize,
    pub per_year: usize,
}

impl Default for CalendarLimits {
    fn default() -> Self {
        Self {
            per_month: CALENDAR_EVENTS_PER_MONTH,
            per_year: CALENDAR_EVENTS_PER_YEAR,
        }
    }
}

/// Events ordered by month, then strength (strongest first), then domain
pub fn project_calendar_events(result: &MatrixResult, limits: CalendarLimits) -> Vec<CalendarEvent> {
    let mut candidates: Vec<CalendarEvent> = result
        .overlap_timeline_by_domain
        .iter()
        .flat_map(|(domain, points)| {
            points
                .iter()
                .filter(|p| p.peak_level != PeakLevel::Normal)
                .map(move |p| CalendarEvent {
                    month: p.month,
                    domain: *domain,
                    peak_level: p.peak_level,
                    overlap_strength: p.overlap_strength,
                    time_overlap_weight: p.time_overlap_weight,
                    title: title(domain.title(), p.peak_level),
                })
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.month
            .cmp(&b.month)
            .then(b.overlap_strength.total_cmp(&a.overlap_strength))
            .then(a.domain.cmp(&b.domain))
    });

    let mut per_month: BTreeMap<_, usize> = BTreeMap::new();
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    let mut events = Vec::new();
    for event in candidates {
        let month_count = per_month.entry(event.month).or_insert(0);
        let year_count = per_year.entry(event.month.year()).or_insert(0);
        if *month_count >= limits.per_month || *year_count >= limits.per_year {
            continue;
        }
        *month_count += 1;
        *year_count += 1;
        events.push(event);
    }
    events
}

fn title(domain: &str, level: PeakLevel) -> String {
    match level {
        PeakLevel::Peak => format!("{} peak window", domain),
        _ => format!("{} window opens", domain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::MatrixEngine;
    use crate::types::{Element, MatrixInput, YearMonth};

    fn busy_result() -> MatrixResult {
        let mut input = MatrixInput::new(
            Element::Wood,
            [Element::Wood, Element::Fire, Element::Earth, Element::Metal],
        );
        for event in ["jupiter-return", "saturn-return", "node-return", "eclipse", "pluto-square"] {
            input.active_transits.insert(event.to_string());
        }
        let anchor: YearMonth = "2025-01".parse().unwrap();
        MatrixEngine::with_defaults().calculate_at(&input, anchor).unwrap()
    }

    #[test]
    fn test_caps_hold() {
        let events = project_calendar_events(&busy_result(), CalendarLimits::default());
        assert!(!events.is_empty());
        assert!(events.len() <= CALENDAR_EVENTS_PER_YEAR);

        let mut per_month: BTreeMap<YearMonth, usize> = BTreeMap::new();
        for event in &events {
            *per_month.entry(event.month).or_insert(0) += 1;
            assert_ne!(event.peak_level, PeakLevel::Normal);
        }
        assert!(per_month.values().all(|n| *n <= CALENDAR_EVENTS_PER_MONTH));
    }

    #[test]
    fn test_sorted_by_month_then_strength() {
        let events = project_calendar_events(&busy_result(), CalendarLimits { per_month: 5, per_year: 60 });
        for pair in events.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.month < b.month || (a.month == b.month && a.overlap_strength >= b.overlap_strength));
        }
    }

    #[test]
    fn test_quiet_result_has_no_events() {
        let input = MatrixInput::new(Element::Water, [Element::Water; 4]);
        let result = MatrixEngine::with_defaults()
            .calculate_at(&input, "2025-01".parse().unwrap())
            .unwrap();
        assert!(project_calendar_events(&result, CalendarLimits::default()).is_empty());
    }
}
