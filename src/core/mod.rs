//! Core modules for the Destiny Matrix engine

pub mod tables;
pub mod alignment;
pub mod overlap;
pub mod scoring;
pub mod validate;
pub mod timeline;
pub mod engine;
pub mod calendar;

pub use tables::{LayerTable, TableRegistry, TableSet};
pub use alignment::{alignment, alignment_term};
pub use overlap::{event_window_months, ActiveCells, ActiveEvent, TimeOverlap, TimeOverlapCalculator};
pub use scoring::{DomainScorer, MatrixMatch};
pub use validate::{validate_horizon, validate_input, validate_span};
pub use timeline::{build_timeline, TimelineBuilder, Timelines};
pub use engine::{calculate_destiny_matrix, input_digest, MatrixEngine};
pub use calendar::{project_calendar_events, CalendarLimits};
