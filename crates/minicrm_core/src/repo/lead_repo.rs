//! Lead/opportunity record store contracts and in-memory implementation.
//!
//! # Responsibility
//! - Own the authoritative lead and opportunity collections.
//! - Enforce full-record validation on every lead mutation.
//!
//! # Invariants
//! - Write paths validate the merged record before replacing stored state.
//! - Reads return copies; callers never alias stored records.
//! - `updated_at` strictly increases on every successful lead update.
//! - Conversion appends the opportunity and flips the lead status together,
//!   or changes nothing.

use chrono::{Duration, Utc};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::lead::{Lead, LeadPatch, LeadStatus};
use crate::model::opportunity::{create_opportunity, Opportunity, OpportunityPatch};
use crate::model::validation::{validate_lead, ValidationResult};
use crate::model::Timestamp;
use crate::repo::seed;
use crate::search::query::{search_leads, LeadQuery};

pub type RepoResult<T> = Result<T, RepoError>;

/// Record store error for lookups and mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// No lead has the requested id.
    NotFound(String),
    /// The merged record violates at least one lead rule.
    Validation(ValidationResult),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "lead not found: {id}"),
            Self::Validation(result) => write!(f, "validation failed: {result}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(result) => Some(result),
        }
    }
}

impl From<ValidationResult> for RepoError {
    fn from(value: ValidationResult) -> Self {
        Self::Validation(value)
    }
}

/// Record store interface used by the lead service.
pub trait LeadRepository {
    /// All leads in insertion order.
    fn list_leads(&self) -> Vec<Lead>;
    fn get_lead(&self, id: &str) -> Option<Lead>;
    /// Merges `updates` onto the stored lead, stamps `updated_at` and
    /// validates the merged record before storing it.
    fn update_lead(&mut self, id: &str, updates: &LeadPatch) -> RepoResult<Lead>;
    /// Creates an opportunity from the lead and marks the lead converted.
    fn convert_lead(&mut self, lead_id: &str, data: OpportunityPatch) -> RepoResult<Opportunity>;
    /// All opportunities in insertion order.
    fn list_opportunities(&self) -> Vec<Opportunity>;
    /// Runs the query engine over the current lead collection.
    fn search_leads(&self, query: &LeadQuery) -> Vec<Lead>;
}

/// Process-lifetime record store backed by two vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadRepository {
    leads: Vec<Lead>,
    opportunities: Vec<Opportunity>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from existing records, keeping their order.
    pub fn with_records(leads: Vec<Lead>, opportunities: Vec<Opportunity>) -> Self {
        Self {
            leads,
            opportunities,
        }
    }

    /// Creates a store with `count` synthetic leads plus an opportunity for
    /// every seeded lead that is already converted.
    ///
    /// The same `rng_seed` always yields the same records apart from
    /// timestamps.
    pub fn seeded(count: usize, rng_seed: u64) -> Self {
        let leads = seed::generate_leads_seeded(count, rng_seed);
        let opportunities = seed::seed_opportunities(&leads);
        debug!(
            "event=store_seed module=repo status=ok leads={} opportunities={}",
            leads.len(),
            opportunities.len()
        );
        Self::with_records(leads, opportunities)
    }

    fn position(&self, id: &str) -> RepoResult<usize> {
        self.leads
            .iter()
            .position(|lead| lead.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    fn merged_update(&self, index: usize, updates: &LeadPatch) -> RepoResult<Lead> {
        let current = &self.leads[index];
        let mut merged = current.merged(updates);
        merged.updated_at = next_timestamp(current.updated_at);

        let validation = validate_lead(&merged.to_patch());
        if !validation.is_valid() {
            warn!(
                "event=lead_update module=repo status=error lead_id={} error_code=validation_failed violations={}",
                current.id,
                validation.errors.len()
            );
            return Err(validation.into());
        }
        Ok(merged)
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn list_leads(&self) -> Vec<Lead> {
        self.leads.clone()
    }

    fn get_lead(&self, id: &str) -> Option<Lead> {
        self.leads.iter().find(|lead| lead.id == id).cloned()
    }

    fn update_lead(&mut self, id: &str, updates: &LeadPatch) -> RepoResult<Lead> {
        let index = self.position(id)?;
        let merged = self.merged_update(index, updates)?;
        self.leads[index] = merged.clone();
        Ok(merged)
    }

    fn convert_lead(&mut self, lead_id: &str, data: OpportunityPatch) -> RepoResult<Opportunity> {
        let index = self.position(lead_id)?;
        let converted = self.merged_update(index, &LeadPatch::status(LeadStatus::Converted))?;
        let opportunity = create_opportunity(&self.leads[index], data);

        let validation = opportunity.validate();
        if !validation.is_valid() {
            warn!(
                "event=lead_convert module=repo status=error lead_id={lead_id} error_code=validation_failed violations={}",
                validation.errors.len()
            );
            return Err(validation.into());
        }

        self.opportunities.push(opportunity.clone());
        self.leads[index] = converted;
        Ok(opportunity)
    }

    fn list_opportunities(&self) -> Vec<Opportunity> {
        self.opportunities.clone()
    }

    fn search_leads(&self, query: &LeadQuery) -> Vec<Lead> {
        search_leads(&self.leads, query)
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Returns a stamp strictly later than `previous`.
///
/// Falls back to `previous + 1ms` when the wall clock has not advanced.
fn next_timestamp(previous: Timestamp) -> Timestamp {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
