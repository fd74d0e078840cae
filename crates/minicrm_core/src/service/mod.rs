//! Core use-case services.
//!
//! # Responsibility
//! - Wrap the record store in async entry points with simulated latency.
//! - Keep callers decoupled from the store implementation.

pub mod lead_service;

/// Fixed simulated latencies per operation.
pub mod latency {
    use std::time::Duration;

    pub const GET_LEADS: Duration = Duration::from_millis(300);
    pub const GET_LEAD_BY_ID: Duration = Duration::from_millis(200);
    pub const UPDATE_LEAD: Duration = Duration::from_millis(500);
    pub const CONVERT_TO_OPPORTUNITY: Duration = Duration::from_millis(800);
    pub const GET_OPPORTUNITIES: Duration = Duration::from_millis(200);
    pub const SEARCH_LEADS: Duration = Duration::from_millis(300);
    pub const SIMULATE_FAILURE: Duration = Duration::from_millis(200);
}
