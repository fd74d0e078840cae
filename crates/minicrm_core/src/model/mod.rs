//! Domain model for the lead/opportunity console.
//!
//! # Responsibility
//! - Define canonical record shapes and closed enumerations.
//! - Provide pure validation predicates and default-filling factories.
//!
//! # Invariants
//! - Nothing in this module performs I/O or holds state.
//! - Lead identity is stable; opportunity identity is assigned at conversion.

pub mod lead;
pub mod opportunity;
pub mod validation;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Timestamp type shared by every record.
pub type Timestamp = DateTime<Utc>;

/// Generates a fresh opaque identifier.
pub(crate) fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}
