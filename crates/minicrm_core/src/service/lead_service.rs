//! Lead use-case service with simulated network latency.
//!
//! # Responsibility
//! - Provide async entry points over a record store implementation.
//! - Translate store errors into the service error taxonomy.
//!
//! # Invariants
//! - Every operation waits for its fixed latency before touching the store.
//! - The store lock is never held across an await point.
//! - Reads return owned copies.

use log::{debug, info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use tokio::time::sleep;

use crate::model::lead::{Lead, LeadPatch};
use crate::model::opportunity::{Opportunity, OpportunityPatch};
use crate::model::validation::ValidationResult;
use crate::repo::lead_repo::{LeadRepository, RepoError};
use crate::search::query::LeadQuery;
use crate::service::latency;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Default probability used by [`LeadService::simulate_failure`].
pub const DEFAULT_FAILURE_RATE: f64 = 0.3;

/// Coarse failure category exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    Unknown,
}

/// Service error for lead/opportunity use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Target lead does not exist.
    NotFound(String),
    /// Merged record failed validation; carries every violated rule.
    ValidationFailed(ValidationResult),
    /// Any other failure, e.g. injected network errors.
    Unknown(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Lead not found: {id}"),
            Self::ValidationFailed(result) => write!(f, "Validation failed: {result}"),
            Self::Unknown(message) => f.write_str(message),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(result) => Some(result),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(result) => Self::ValidationFailed(result),
        }
    }
}

/// Async facade over a record store.
pub struct LeadService<R: LeadRepository> {
    repo: Mutex<R>,
    failure_rate: f64,
}

impl<R: LeadRepository> LeadService<R> {
    /// Creates a service owning the provided store.
    pub fn new(repo: R) -> Self {
        Self {
            repo: Mutex::new(repo),
            failure_rate: DEFAULT_FAILURE_RATE,
        }
    }

    /// Overrides the probability used by `simulate_failure`, clamped to `[0, 1]`.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }

    pub async fn get_leads(&self) -> ServiceResult<Vec<Lead>> {
        sleep(latency::GET_LEADS).await;
        let leads = self.repo()?.list_leads();
        debug!(
            "event=leads_get module=service status=ok count={}",
            leads.len()
        );
        Ok(leads)
    }

    pub async fn get_lead_by_id(&self, id: &str) -> ServiceResult<Option<Lead>> {
        sleep(latency::GET_LEAD_BY_ID).await;
        Ok(self.repo()?.get_lead(id))
    }

    /// Merges `updates` onto a stored lead.
    ///
    /// # Errors
    /// - `NotFound` when no lead has `id`.
    /// - `ValidationFailed` when the merged record is invalid; the stored
    ///   record is left unchanged.
    pub async fn update_lead(&self, id: &str, updates: &LeadPatch) -> ServiceResult<Lead> {
        sleep(latency::UPDATE_LEAD).await;
        let result = self.repo()?.update_lead(id, updates);
        match result {
            Ok(lead) => {
                info!("event=lead_update module=service status=ok lead_id={id}");
                Ok(lead)
            }
            Err(err) => {
                warn!("event=lead_update module=service status=error lead_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Converts a lead into a new opportunity and marks it converted.
    ///
    /// Both changes are applied together; on error neither is visible.
    pub async fn convert_to_opportunity(
        &self,
        lead_id: &str,
        data: OpportunityPatch,
    ) -> ServiceResult<Opportunity> {
        sleep(latency::CONVERT_TO_OPPORTUNITY).await;
        let result = self.repo()?.convert_lead(lead_id, data);
        match result {
            Ok(opportunity) => {
                info!(
                    "event=lead_convert module=service status=ok lead_id={lead_id} opportunity_id={}",
                    opportunity.id
                );
                Ok(opportunity)
            }
            Err(err) => {
                warn!("event=lead_convert module=service status=error lead_id={lead_id} error={err}");
                Err(err.into())
            }
        }
    }

    pub async fn get_opportunities(&self) -> ServiceResult<Vec<Opportunity>> {
        sleep(latency::GET_OPPORTUNITIES).await;
        Ok(self.repo()?.list_opportunities())
    }

    /// Runs the query engine over the current lead collection.
    pub async fn search_leads(&self, query: &LeadQuery) -> ServiceResult<Vec<Lead>> {
        sleep(latency::SEARCH_LEADS).await;
        let leads = self.repo()?.search_leads(query);
        debug!(
            "event=leads_search module=service status=ok query_len={} status_filter={} source_filter={} sort={}:{} hits={}",
            query.text.chars().count(),
            query.filters.status.map_or("", |status| status.as_str()),
            query.filters.source.map_or("", |source| source.as_str()),
            query.sort.field,
            query.sort.direction.as_str(),
            leads.len()
        );
        Ok(leads)
    }

    /// Fails with `Unknown` at the configured failure rate.
    pub async fn simulate_failure(&self) -> ServiceResult<()> {
        sleep(latency::SIMULATE_FAILURE).await;
        if rand::thread_rng().gen_bool(self.failure_rate) {
            warn!("event=simulated_failure module=service status=error");
            return Err(ServiceError::Unknown("Simulated network error".to_string()));
        }
        Ok(())
    }

    fn repo(&self) -> ServiceResult<MutexGuard<'_, R>> {
        self.repo
            .lock()
            .map_err(|_| ServiceError::Unknown("record store lock poisoned".to_string()))
    }
}
