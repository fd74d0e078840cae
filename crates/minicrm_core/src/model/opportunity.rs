//! Opportunity domain model.
//!
//! # Invariants
//! - `lead_id` always comes from the source lead, never from caller input.
//! - `amount`, when present, is a non-negative number.
//! - Opportunities are append-only; no update path exists.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::lead::{Lead, LeadId, UnknownVariant};
use super::validation::{validate_opportunity, ValidationResult};
use super::{fresh_id, Timestamp};

pub type OpportunityId = String;

/// Sales pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityStage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub const ALL: [OpportunityStage; 6] = [
        Self::Prospecting,
        Self::Qualification,
        Self::Proposal,
        Self::Negotiation,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prospecting => "prospecting",
            Self::Qualification => "qualification",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
        }
    }
}

impl FromStr for OpportunityStage {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "opportunity stage",
                value: value.to_string(),
            })
    }
}

impl Display for OpportunityStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deal derived from a converted lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: OpportunityId,
    pub name: String,
    pub stage: OpportunityStage,
    /// `None` means no amount was provided.
    pub amount: Option<f64>,
    pub account_name: String,
    /// Non-owning back-reference to the originating lead.
    pub lead_id: LeadId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial opportunity used as conversion input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunityPatch {
    pub id: Option<OpportunityId>,
    pub name: Option<String>,
    pub stage: Option<OpportunityStage>,
    pub amount: Option<f64>,
    pub account_name: Option<String>,
    /// Ignored by [`create_opportunity`].
    pub lead_id: Option<LeadId>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Builds an opportunity for `lead`, filling unset fields with defaults.
///
/// `name`/`account_name` fall back to the lead's name/company when unset or
/// blank, `stage` to `Prospecting`, `amount` to `None`. `lead_id` is always
/// `lead.id`.
pub fn create_opportunity(lead: &Lead, data: OpportunityPatch) -> Opportunity {
    let now = Utc::now();
    Opportunity {
        id: data.id.unwrap_or_else(fresh_id),
        name: non_blank(data.name).unwrap_or_else(|| lead.name.clone()),
        stage: data.stage.unwrap_or(OpportunityStage::Prospecting),
        amount: data.amount,
        account_name: non_blank(data.account_name).unwrap_or_else(|| lead.company.clone()),
        lead_id: lead.id.clone(),
        created_at: data.created_at.unwrap_or(now),
        updated_at: data.updated_at.unwrap_or(now),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl Opportunity {
    pub fn to_patch(&self) -> OpportunityPatch {
        OpportunityPatch {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            stage: Some(self.stage),
            amount: self.amount,
            account_name: Some(self.account_name.clone()),
            lead_id: Some(self.lead_id.clone()),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        validate_opportunity(&self.to_patch())
    }
}
