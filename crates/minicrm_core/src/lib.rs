//! Core domain logic for the mini CRM console.
//! This crate is the single source of truth for lead/opportunity invariants.

pub mod app;
pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod search;
pub mod service;

pub use app::coordinator::Coordinator;
pub use app::state::{AppAction, AppState};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogOptions};
pub use model::lead::{create_lead, Lead, LeadId, LeadPatch, LeadSource, LeadStatus};
pub use model::opportunity::{
    create_opportunity, Opportunity, OpportunityId, OpportunityPatch, OpportunityStage,
};
pub use model::validation::{
    validate_email, validate_lead, validate_opportunity, ValidationIssue, ValidationResult,
};
pub use prefs::{MemoryPreferenceStore, PreferenceStore, Preferences, SqlitePreferenceStore};
pub use repo::lead_repo::{InMemoryLeadRepository, LeadRepository, RepoError, RepoResult};
pub use search::query::{
    search_leads, LeadFilters, LeadFiltersPatch, LeadQuery, SortDirection, SortField,
    SortOptions, SortOptionsPatch,
};
pub use service::lead_service::{ErrorKind, LeadService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
