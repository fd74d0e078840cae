//! Lead filter + sort pipeline.
//!
//! # Responsibility
//! - Apply text, status and source filters to a lead collection.
//! - Order the survivors with a per-field comparator table.
//!
//! # Invariants
//! - Filter order is text, then status, then source, then sort.
//! - Text matching is a case-insensitive substring test over name, company
//!   and email.
//! - Sorting is stable: ties keep their collection order in both directions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::lead::{Lead, LeadSource, LeadStatus, UnknownVariant};

/// Exact-match filters. `None` disables the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFilters {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
}

/// Partial filter update. The outer `None` leaves a filter untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadFiltersPatch {
    pub status: Option<Option<LeadStatus>>,
    pub source: Option<Option<LeadSource>>,
}

impl LeadFilters {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.source.is_none()
    }

    pub fn merged(self, patch: LeadFiltersPatch) -> Self {
        Self {
            status: patch.status.unwrap_or(self.status),
            source: patch.source.unwrap_or(self.source),
        }
    }
}

/// Lead field a result list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Name,
    Company,
    Email,
    Source,
    Score,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        Self::Id,
        Self::Name,
        Self::Company,
        Self::Email,
        Self::Source,
        Self::Score,
        Self::Status,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Company => "company",
            Self::Email => "email",
            Self::Source => "source",
            Self::Score => "score",
            Self::Status => "status",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    /// Ascending comparison of two leads on this field.
    ///
    /// Text fields compare case-insensitively, `Score` numerically and the
    /// timestamps chronologically.
    pub fn compare(self, a: &Lead, b: &Lead) -> Ordering {
        match self {
            Self::Id => compare_text(&a.id, &b.id),
            Self::Name => compare_text(&a.name, &b.name),
            Self::Company => compare_text(&a.company, &b.company),
            Self::Email => compare_text(&a.email, &b.email),
            Self::Source => compare_text(a.source.as_str(), b.source.as_str()),
            Self::Score => a.score.cmp(&b.score),
            Self::Status => compare_text(a.status.as_str(), b.status.as_str()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "sort field",
                value: value.to_string(),
            })
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownVariant {
                kind: "sort direction",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            field: SortField::Score,
            direction: SortDirection::Desc,
        }
    }
}

/// Partial sort update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptionsPatch {
    pub field: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl SortOptions {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn merged(self, patch: SortOptionsPatch) -> Self {
        Self {
            field: patch.field.unwrap_or(self.field),
            direction: patch.direction.unwrap_or(self.direction),
        }
    }

    pub fn compare(&self, a: &Lead, b: &Lead) -> Ordering {
        match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        }
    }
}

/// Full query input for [`search_leads`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadQuery {
    pub text: String,
    pub filters: LeadFilters,
    pub sort: SortOptions,
}

impl LeadQuery {
    pub fn new(text: impl Into<String>, filters: LeadFilters, sort: SortOptions) -> Self {
        Self {
            text: text.into(),
            filters,
            sort,
        }
    }
}

/// Filters and orders `leads`, returning references in result order.
pub fn search_leads<'a>(leads: &'a [Lead], query: &LeadQuery) -> Vec<&'a Lead> {
    let needle = query.text.to_lowercase();
    let mut hits: Vec<&Lead> = leads
        .iter()
        .filter(|lead| needle.is_empty() || matches_text(lead, &needle))
        .filter(|lead| query.filters.status.map_or(true, |status| lead.status == status))
        .filter(|lead| query.filters.source.map_or(true, |source| lead.source == source))
        .collect();

    hits.sort_by(|a, b| query.sort.compare(a, b));
    hits
}

fn matches_text(lead: &Lead, needle: &str) -> bool {
    lead.name.to_lowercase().contains(needle)
        || lead.company.to_lowercase().contains(needle)
        || lead.email.to_lowercase().contains(needle)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
