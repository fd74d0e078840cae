//! Validation predicates for leads and opportunities.
//!
//! # Invariants
//! - Checks accumulate every violated rule; they never stop at the first one.
//! - Message order is stable: name, company/account, email, score/amount.
//! - A missing email reports only `EmailRequired`, never `EmailInvalid`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::lead::{LeadPatch, SCORE_MAX, SCORE_MIN};
use super::opportunity::OpportunityPatch;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// One violated validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    NameRequired,
    CompanyRequired,
    EmailRequired,
    EmailInvalid,
    ScoreOutOfRange,
    AccountNameRequired,
    AmountInvalid,
}

impl ValidationIssue {
    /// User-facing message for this rule.
    pub fn message(self) -> &'static str {
        match self {
            Self::NameRequired => "Name is required",
            Self::CompanyRequired => "Company is required",
            Self::EmailRequired => "Email is required",
            Self::EmailInvalid => "Email format is invalid",
            Self::ScoreOutOfRange => "Score must be between 0 and 100",
            Self::AccountNameRequired => "Account name is required",
            Self::AmountInvalid => "Amount must be a positive number",
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a record validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Violated rules in check order. Empty when the record is valid.
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages in check order.
    pub fn messages(&self) -> Vec<&'static str> {
        self.errors.iter().map(|issue| issue.message()).collect()
    }

    /// Returns whether `issue` was reported.
    pub fn contains(&self, issue: ValidationIssue) -> bool {
        self.errors.contains(&issue)
    }

    /// Converts into `Err(self)` when at least one rule was violated.
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join(", "))
    }
}

impl Error for ValidationResult {}

/// Returns whether `email` has a `local@domain.tld` shape.
///
/// Empty input is invalid.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates a possibly-partial lead.
///
/// Unset text fields count as blank. An unset score is not checked.
pub fn validate_lead(lead: &LeadPatch) -> ValidationResult {
    let mut errors = Vec::new();

    if is_blank(lead.name.as_deref()) {
        errors.push(ValidationIssue::NameRequired);
    }

    if is_blank(lead.company.as_deref()) {
        errors.push(ValidationIssue::CompanyRequired);
    }

    match lead.email.as_deref() {
        email if is_blank(email) => errors.push(ValidationIssue::EmailRequired),
        Some(email) if !validate_email(email) => errors.push(ValidationIssue::EmailInvalid),
        _ => {}
    }

    if let Some(score) = lead.score {
        if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
            errors.push(ValidationIssue::ScoreOutOfRange);
        }
    }

    ValidationResult { errors }
}

/// Validates a possibly-partial opportunity.
///
/// A `None` amount means "not provided" and is valid.
pub fn validate_opportunity(opportunity: &OpportunityPatch) -> ValidationResult {
    let mut errors = Vec::new();

    if is_blank(opportunity.name.as_deref()) {
        errors.push(ValidationIssue::NameRequired);
    }

    if is_blank(opportunity.account_name.as_deref()) {
        errors.push(ValidationIssue::AccountNameRequired);
    }

    if let Some(amount) = opportunity.amount {
        if amount.is_nan() || amount < 0.0 {
            errors.push(ValidationIssue::AmountInvalid);
        }
    }

    ValidationResult { errors }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}
