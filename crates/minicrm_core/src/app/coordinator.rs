//! Application state coordinator.
//!
//! # Responsibility
//! - Mediate every UI read/write through the lead service.
//! - Own the UI-visible [`AppState`] and persist view preferences.
//!
//! # Invariants
//! - The state lock is never held across an await point.
//! - Mutations (`update_lead`, `convert_to_opportunity`) record failures in
//!   `error` and return them; reads (`load_initial_data`, `search_leads`)
//!   only record them.
//! - Each search is tagged with a fresh sequence number; late responses from
//!   superseded searches are dropped.

use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::state::{AppAction, AppState};
use crate::model::lead::{Lead, LeadPatch};
use crate::model::opportunity::{Opportunity, OpportunityPatch};
use crate::prefs::{PreferenceStore, Preferences, FILTERS_KEY, SEARCH_QUERY_KEY, SORT_OPTIONS_KEY};
use crate::repo::lead_repo::LeadRepository;
use crate::search::query::{LeadFilters, LeadFiltersPatch, LeadQuery, SortOptions, SortOptionsPatch};
use crate::service::lead_service::{LeadService, ServiceResult};

pub struct Coordinator<R: LeadRepository, P: PreferenceStore> {
    service: Arc<LeadService<R>>,
    prefs: Preferences<P>,
    state: Mutex<AppState>,
    search_seq: AtomicU64,
}

impl<R: LeadRepository, P: PreferenceStore> Coordinator<R, P> {
    /// Creates a coordinator, restoring persisted filters, sort options and
    /// search text on top of the initial state.
    pub fn new(service: Arc<LeadService<R>>, prefs: Preferences<P>) -> Self {
        let defaults = AppState::default();
        let state = AppState {
            filters: prefs.get(FILTERS_KEY, defaults.filters),
            sort_options: prefs.get(SORT_OPTIONS_KEY, defaults.sort_options),
            search_query: prefs.get(SEARCH_QUERY_KEY, defaults.search_query.clone()),
            ..defaults
        };

        Self {
            service,
            prefs,
            state: Mutex::new(state),
            search_seq: AtomicU64::new(0),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state().clone()
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.state().leads.clone()
    }

    pub fn opportunities(&self) -> Vec<Opportunity> {
        self.state().opportunities.clone()
    }

    pub fn selected_lead(&self) -> Option<Lead> {
        self.state().selected_lead.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn service(&self) -> &Arc<LeadService<R>> {
        &self.service
    }

    pub fn preferences(&self) -> &Preferences<P> {
        &self.prefs
    }

    /// Fetches leads and opportunities concurrently.
    pub async fn load_initial_data(&self) {
        self.dispatch(AppAction::SetLoading(true));
        let loaded = tokio::try_join!(self.service.get_leads(), self.service.get_opportunities());

        match loaded {
            Ok((leads, opportunities)) => {
                debug!(
                    "event=initial_load module=app status=ok leads={} opportunities={}",
                    leads.len(),
                    opportunities.len()
                );
                self.dispatch(AppAction::SetLeads(leads));
                self.dispatch(AppAction::SetOpportunities(opportunities));
            }
            Err(err) => {
                warn!("event=initial_load module=app status=error error={err}");
                self.dispatch(AppAction::SetError(err.to_string()));
            }
        }
    }

    /// Runs a search and replaces `leads` with the result.
    ///
    /// Uses the current sort options when `sort` is `None`.
    pub async fn search_leads(&self, query: &str, filters: LeadFilters, sort: Option<SortOptions>) {
        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let sort = sort.unwrap_or_else(|| self.state().sort_options);
        self.dispatch(AppAction::SetLoading(true));

        let query = LeadQuery::new(query, filters, sort);
        match self.service.search_leads(&query).await {
            Ok(leads) => {
                if !self.dispatch(AppAction::SearchResolved { seq, leads }) {
                    debug!("event=leads_search module=app status=discarded seq={seq}");
                }
            }
            Err(err) => {
                warn!("event=leads_search module=app status=error seq={seq} error={err}");
                self.dispatch(AppAction::SetError(err.to_string()));
            }
        }
    }

    /// Re-runs the search with the current query, filters and sort options.
    pub async fn refresh_search(&self) {
        let (query, filters, sort) = {
            let state = self.state();
            (state.search_query.clone(), state.filters, state.sort_options)
        };
        self.search_leads(&query, filters, Some(sort)).await;
    }

    /// Updates one lead and mirrors the stored result into state.
    ///
    /// # Errors
    /// Returns the service error after recording its message in `error`.
    pub async fn update_lead(&self, id: &str, updates: LeadPatch) -> ServiceResult<Lead> {
        self.dispatch(AppAction::SetLoading(true));

        match self.service.update_lead(id, &updates).await {
            Ok(lead) => {
                self.dispatch(AppAction::UpdateLead(lead.clone()));
                self.dispatch(AppAction::SetLoading(false));
                Ok(lead)
            }
            Err(err) => {
                self.dispatch(AppAction::SetError(err.to_string()));
                Err(err)
            }
        }
    }

    /// Converts a lead, appends the opportunity and refreshes the lead.
    ///
    /// # Errors
    /// Returns the service error after recording its message in `error`.
    pub async fn convert_to_opportunity(
        &self,
        lead_id: &str,
        data: OpportunityPatch,
    ) -> ServiceResult<Opportunity> {
        self.dispatch(AppAction::SetLoading(true));

        match self.convert_and_refresh(lead_id, data).await {
            Ok(opportunity) => {
                self.dispatch(AppAction::SetLoading(false));
                Ok(opportunity)
            }
            Err(err) => {
                self.dispatch(AppAction::SetError(err.to_string()));
                Err(err)
            }
        }
    }

    async fn convert_and_refresh(
        &self,
        lead_id: &str,
        data: OpportunityPatch,
    ) -> ServiceResult<Opportunity> {
        let opportunity = self.service.convert_to_opportunity(lead_id, data).await?;
        self.dispatch(AppAction::AddOpportunity(opportunity.clone()));

        if let Some(lead) = self.service.get_lead_by_id(lead_id).await? {
            self.dispatch(AppAction::UpdateLead(lead));
        }
        Ok(opportunity)
    }

    pub fn select_lead(&self, lead: Option<Lead>) {
        self.dispatch(AppAction::SelectLead(lead));
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.prefs.set(SEARCH_QUERY_KEY, &query);
        self.dispatch(AppAction::SetSearchQuery(query));
    }

    /// Merges `patch` into the current filters and persists the result.
    pub fn set_filters(&self, patch: LeadFiltersPatch) {
        let merged = {
            let mut state = self.state();
            state.apply(AppAction::SetFilters(patch));
            state.filters
        };
        self.prefs.set(FILTERS_KEY, &merged);
    }

    /// Merges `patch` into the current sort options and persists the result.
    pub fn set_sort_options(&self, patch: SortOptionsPatch) {
        let merged = {
            let mut state = self.state();
            state.apply(AppAction::SetSortOptions(patch));
            state.sort_options
        };
        self.prefs.set(SORT_OPTIONS_KEY, &merged);
    }

    pub fn clear_error(&self) {
        self.dispatch(AppAction::ClearError);
    }

    fn dispatch(&self, action: AppAction) -> bool {
        self.state().apply(action)
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
