//! Record store abstractions and the in-memory implementation.
//!
//! # Responsibility
//! - Define the data access contract the service layer depends on.
//! - Generate synthetic seed data for a fresh process.
//!
//! # Invariants
//! - Lead writes must pass `validate_lead` on the merged record.
//! - Store APIs return semantic errors (`NotFound`, `Validation`).

pub mod lead_repo;
pub mod seed;
