//! Display helpers for console output.

use crate::model::Timestamp;

/// Formats an amount as whole US dollars with thousands separators.
///
/// Returns `N/A` when no amount is set.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount else {
        return "N/A".to_string();
    };
    if !amount.is_finite() {
        return "N/A".to_string();
    }

    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_score(score: i32) -> String {
    format!("{score}/100")
}

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `social-media` -> `Social Media`.
pub fn format_source(source: &str) -> String {
    source
        .split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Coarse "time ago" label for `at` relative to `now`.
pub fn format_relative_date(at: Timestamp, now: Timestamp) -> String {
    let days = (now - at).num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => format!("{} years ago", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize_first, format_currency, format_relative_date, format_score, format_source};
    use chrono::{Duration, Utc};

    #[test]
    fn currency_groups_thousands_and_handles_missing() {
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_currency(Some(0.0)), "$0");
        assert_eq!(format_currency(Some(999.0)), "$999");
        assert_eq!(format_currency(Some(1234567.4)), "$1,234,567");
        assert_eq!(format_currency(Some(-2500.0)), "-$2,500");
    }

    #[test]
    fn source_and_score_labels() {
        assert_eq!(format_source("social-media"), "Social Media");
        assert_eq!(format_source("other"), "Other");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(format_score(85), "85/100");
    }

    #[test]
    fn relative_date_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_date(now, now), "Today");
        assert_eq!(format_relative_date(now - Duration::days(1), now), "Yesterday");
        assert_eq!(format_relative_date(now - Duration::days(3), now), "3 days ago");
        assert_eq!(format_relative_date(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(format_relative_date(now - Duration::days(65), now), "2 months ago");
        assert_eq!(format_relative_date(now - Duration::days(800), now), "2 years ago");
    }
}
