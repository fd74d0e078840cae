//! Synthetic seed data for the record store.
//!
//! # Invariants
//! - Every generated lead passes `validate_lead`.
//! - `updated_at >= created_at` for every generated lead.
//! - Seeded opportunities reuse the lead id with an `-opp` suffix.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::model::lead::{Lead, LeadSource, LeadStatus, SCORE_MAX, SCORE_MIN};
use crate::model::opportunity::{Opportunity, OpportunityStage};

const FIRST_NAMES: &[&str] = &[
    "Ann", "Ben", "Carla", "Diego", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Kemi",
    "Liam", "Maya", "Noah", "Olga", "Priya", "Quinn", "Rosa", "Sam", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Lee", "Smith", "Garcia", "Okafor", "Novak", "Tanaka", "Silva", "Berg", "Khan", "Moreau",
    "Rossi", "Jensen", "Park", "Walsh", "Ivanova",
];

const COMPANIES: &[&str] = &[
    "Acme Corp",
    "Globex",
    "Initech",
    "Umbrella Labs",
    "Stark Industries",
    "Wayne Enterprises",
    "Hooli",
    "Vandelay Imports",
    "Soylent Co",
    "Wonka Foods",
    "Cyberdyne Systems",
    "Tyrell Corp",
];

const MAX_AGE_DAYS: i64 = 90;

/// Generates `count` synthetic leads using `rng`.
pub fn generate_leads<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Lead> {
    let now = Utc::now();
    (0..count)
        .map(|_| {
            let first = pick(FIRST_NAMES, rng);
            let last = pick(LAST_NAMES, rng);
            let company = pick(COMPANIES, rng);
            let created_at = now - Duration::minutes(rng.gen_range(0..MAX_AGE_DAYS * 24 * 60));
            let age_minutes = (now - created_at).num_minutes();
            let updated_at = created_at + Duration::minutes(rng.gen_range(0..=age_minutes));

            Lead {
                id: Builder::from_random_bytes(rng.gen()).into_uuid().to_string(),
                name: format!("{first} {last}"),
                company: company.to_string(),
                email: format!(
                    "{}.{}@{}.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    company_slug(company)
                ),
                source: *LeadSource::ALL.choose(rng).unwrap_or(&LeadSource::Other),
                score: rng.gen_range(SCORE_MIN..=SCORE_MAX),
                status: *LeadStatus::ALL.choose(rng).unwrap_or(&LeadStatus::New),
                created_at,
                updated_at,
            }
        })
        .collect()
}

/// Generates `count` leads from a deterministic RNG seed.
pub fn generate_leads_seeded(count: usize, rng_seed: u64) -> Vec<Lead> {
    let mut rng = StdRng::seed_from_u64(rng_seed);
    generate_leads(count, &mut rng)
}

/// Builds one prospecting opportunity per already-converted lead.
pub fn seed_opportunities(leads: &[Lead]) -> Vec<Opportunity> {
    leads
        .iter()
        .filter(|lead| lead.is_converted())
        .map(|lead| Opportunity {
            id: format!("{}-opp", lead.id),
            name: lead.name.clone(),
            stage: OpportunityStage::Prospecting,
            amount: None,
            account_name: lead.company.clone(),
            lead_id: lead.id.clone(),
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        })
        .collect()
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or("Unknown")
}

fn company_slug(company: &str) -> String {
    company
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("")
}
