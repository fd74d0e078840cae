//! Lead domain model.
//!
//! # Responsibility
//! - Define the prospective-customer record and its closed enumerations.
//! - Provide the default-filling factory and patch merge used by updates.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `score` stays within `[SCORE_MIN, SCORE_MAX]` for stored records.
//! - `status` is not a state machine; `Converted` is only set by conversion
//!   in practice.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::validation::{validate_lead, ValidationResult};
use super::{fresh_id, Timestamp};
use chrono::Utc;

/// Stable opaque lead identifier.
pub type LeadId = String;

pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

/// Where a lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadSource {
    Website,
    Referral,
    SocialMedia,
    EmailCampaign,
    ColdCall,
    TradeShow,
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 7] = [
        Self::Website,
        Self::Referral,
        Self::SocialMedia,
        Self::EmailCampaign,
        Self::ColdCall,
        Self::TradeShow,
        Self::Other,
    ];

    /// Wire string, e.g. `social-media`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Referral => "referral",
            Self::SocialMedia => "social-media",
            Self::EmailCampaign => "email-campaign",
            Self::ColdCall => "cold-call",
            Self::TradeShow => "trade-show",
            Self::Other => "other",
        }
    }
}

/// Qualification state of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Unqualified,
    Converted,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Unqualified,
        Self::Converted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Unqualified => "unqualified",
            Self::Converted => "converted",
        }
    }
}

/// Error returned when parsing an enumeration from its wire string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for LeadSource {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "lead source",
                value: value.to_string(),
            })
    }
}

impl FromStr for LeadStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "lead status",
                value: value.to_string(),
            })
    }
}

impl Display for LeadSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prospective customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub company: String,
    pub email: String,
    pub source: LeadSource,
    /// Qualification score in `[0, 100]`.
    pub score: i32,
    pub status: LeadStatus,
    pub created_at: Timestamp,
    /// Refreshed on every mutation.
    pub updated_at: Timestamp,
}

/// Partial lead used for creation input and updates.
///
/// `None` means "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
    pub id: Option<LeadId>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub source: Option<LeadSource>,
    pub score: Option<i32>,
    pub status: Option<LeadStatus>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl LeadPatch {
    /// Patch that only sets `status`.
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Builds a lead, filling every unset field with its default.
///
/// Defaults: fresh id, empty strings, `Other` source, score 0, `New` status,
/// both timestamps now. Does not validate.
pub fn create_lead(data: LeadPatch) -> Lead {
    let now = Utc::now();
    Lead {
        id: data.id.unwrap_or_else(fresh_id),
        name: data.name.unwrap_or_default(),
        company: data.company.unwrap_or_default(),
        email: data.email.unwrap_or_default(),
        source: data.source.unwrap_or(LeadSource::Other),
        score: data.score.unwrap_or(0),
        status: data.status.unwrap_or(LeadStatus::New),
        created_at: data.created_at.unwrap_or(now),
        updated_at: data.updated_at.unwrap_or(now),
    }
}

impl Lead {
    /// Fully-specified patch carrying every field of this lead.
    pub fn to_patch(&self) -> LeadPatch {
        LeadPatch {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            company: Some(self.company.clone()),
            email: Some(self.email.clone()),
            source: Some(self.source),
            score: Some(self.score),
            status: Some(self.status),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    /// Returns a copy with `updates` merged on top.
    ///
    /// `id` and `created_at` are identity fields and are never overwritten.
    /// `updated_at` is owned by the store and is not taken from `updates`.
    pub fn merged(&self, updates: &LeadPatch) -> Lead {
        Lead {
            id: self.id.clone(),
            name: updates.name.clone().unwrap_or_else(|| self.name.clone()),
            company: updates
                .company
                .clone()
                .unwrap_or_else(|| self.company.clone()),
            email: updates.email.clone().unwrap_or_else(|| self.email.clone()),
            source: updates.source.unwrap_or(self.source),
            score: updates.score.unwrap_or(self.score),
            status: updates.status.unwrap_or(self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn validate(&self) -> ValidationResult {
        validate_lead(&self.to_patch())
    }

    pub fn is_converted(&self) -> bool {
        self.status == LeadStatus::Converted
    }
}
