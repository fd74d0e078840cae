//! UI-visible application state and its reducer.
//!
//! # Invariants
//! - State changes only through [`AppState::apply`].
//! - `SetError` and `SetLeads` both clear `loading`.
//! - A search response older than the last applied one is discarded.
//! - `error` is cleared only by `ClearError` or overwritten by a new error.

use serde::Serialize;

use crate::model::lead::Lead;
use crate::model::opportunity::Opportunity;
use crate::search::query::{LeadFilters, LeadFiltersPatch, SortOptions, SortOptionsPatch};

/// Single source of UI-visible state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub leads: Vec<Lead>,
    pub opportunities: Vec<Opportunity>,
    pub selected_lead: Option<Lead>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub filters: LeadFilters,
    pub sort_options: SortOptions,
    /// Sequence number of the last search whose result was applied.
    #[serde(skip)]
    pub applied_search_seq: u64,
}

/// State transition applied by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SetLoading(bool),
    SetError(String),
    ClearError,
    SetLeads(Vec<Lead>),
    /// Result of the search tagged with `seq`.
    SearchResolved { seq: u64, leads: Vec<Lead> },
    SetOpportunities(Vec<Opportunity>),
    UpdateLead(Lead),
    AddOpportunity(Opportunity),
    SelectLead(Option<Lead>),
    SetSearchQuery(String),
    SetFilters(LeadFiltersPatch),
    SetSortOptions(SortOptionsPatch),
}

impl AppState {
    /// Applies one action. Returns `false` when the action was discarded.
    pub fn apply(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::SetLoading(loading) => self.loading = loading,
            AppAction::SetError(message) => {
                self.error = Some(message);
                self.loading = false;
            }
            AppAction::ClearError => self.error = None,
            AppAction::SetLeads(leads) => {
                self.leads = leads;
                self.loading = false;
            }
            AppAction::SearchResolved { seq, leads } => {
                if seq <= self.applied_search_seq {
                    return false;
                }
                self.applied_search_seq = seq;
                self.leads = leads;
                self.loading = false;
            }
            AppAction::SetOpportunities(opportunities) => self.opportunities = opportunities,
            AppAction::UpdateLead(updated) => {
                if let Some(slot) = self.leads.iter_mut().find(|lead| lead.id == updated.id) {
                    *slot = updated.clone();
                }
                if let Some(selected) = self.selected_lead.as_mut() {
                    if selected.id == updated.id {
                        *selected = updated;
                    }
                }
            }
            AppAction::AddOpportunity(opportunity) => self.opportunities.push(opportunity),
            AppAction::SelectLead(lead) => self.selected_lead = lead,
            AppAction::SetSearchQuery(query) => self.search_query = query,
            AppAction::SetFilters(patch) => self.filters = self.filters.merged(patch),
            AppAction::SetSortOptions(patch) => self.sort_options = self.sort_options.merged(patch),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{AppAction, AppState};
    use crate::model::lead::{create_lead, LeadPatch};
    use crate::search::query::{SortDirection, SortField};

    fn lead(name: &str) -> crate::model::lead::Lead {
        create_lead(LeadPatch {
            name: Some(name.to_string()),
            ..LeadPatch::default()
        })
    }

    #[test]
    fn initial_state_sorts_by_score_desc_without_filters() {
        let state = AppState::default();
        assert_eq!(state.sort_options.field, SortField::Score);
        assert_eq!(state.sort_options.direction, SortDirection::Desc);
        assert!(state.filters.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn stale_search_result_is_discarded() {
        let mut state = AppState::default();
        let newer = vec![lead("newer")];
        let older = vec![lead("older")];

        assert!(state.apply(AppAction::SearchResolved {
            seq: 2,
            leads: newer.clone()
        }));
        assert!(!state.apply(AppAction::SearchResolved {
            seq: 1,
            leads: older
        }));
        assert_eq!(state.leads, newer);
        assert_eq!(state.applied_search_seq, 2);
    }

    #[test]
    fn update_lead_replaces_list_entry_and_selection() {
        let mut state = AppState::default();
        let original = lead("Ann");
        let other = lead("Ben");
        state.apply(AppAction::SetLeads(vec![original.clone(), other.clone()]));
        state.apply(AppAction::SelectLead(Some(original.clone())));

        let mut renamed = original.clone();
        renamed.name = "Ann Lee".to_string();
        state.apply(AppAction::UpdateLead(renamed.clone()));

        assert_eq!(state.leads[0], renamed);
        assert_eq!(state.leads[1], other);
        assert_eq!(state.selected_lead, Some(renamed));
    }

    #[test]
    fn set_error_clears_loading_and_sticks_until_cleared() {
        let mut state = AppState::default();
        state.apply(AppAction::SetLoading(true));
        state.apply(AppAction::SetError("boom".to_string()));
        assert!(!state.loading);

        state.apply(AppAction::SetLeads(Vec::new()));
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.apply(AppAction::ClearError);
        assert!(state.error.is_none());
    }
}
