//! Core types for the Destiny Matrix

mod code;
mod domain;
mod element;
mod input;
mod reason;
mod result;
mod timeline;

pub use code::{ColorCode, InteractionCode, InteractionLevel, Keyword, Layer};
pub use domain::{Domain, DomainScore, Evidence};
pub use element::{house_key, house_weight, planet_weight, sign_element, Element, WesternElement};
pub use input::{AspectHit, MatrixInput, RelationHit};
pub use reason::{ValidationIssue, ValidationReason};
pub use result::{CalendarEvent, Grade, MatrixResult};
pub use timeline::{OverlapTimelinePoint, PeakLevel, YearMonth};
