//! Pure input validators for form steps.
//!
//! Each validator takes the raw user string and returns the normalized
//! value on accept, or `None` on reject. Re-prompt hints live with the
//! form steps, not here.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// The ten bookable consultation slots.
pub const TIME_SLOTS: [&str; 10] = [
    "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00",
];

/// Visa categories offered by the quiz, keyed by the digit the user types.
/// `1` is tourism.
pub const VISA_TYPES: [(&str, &str); 4] = [
    ("1", "Tourism"),
    ("2", "Study"),
    ("3", "Work"),
    ("4", "Family reunification"),
];

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?\d{10,15}$").unwrap())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Permissive local@domain.tld shape.
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
    })
}

/// Phone number: optional leading `+`, then 10-15 digits.
pub fn phone(input: &str) -> Option<String> {
    let trimmed = input.trim();
    phone_re().is_match(trimmed).then(|| trimmed.to_string())
}

/// Conventional e-mail shape.
pub fn email(input: &str) -> Option<String> {
    let trimmed = input.trim();
    email_re().is_match(trimmed).then(|| trimmed.to_string())
}

/// Case-insensitive `yes` / `no`, normalized to lowercase.
pub fn yes_no(input: &str) -> Option<String> {
    let normalized = input.trim().to_lowercase();
    matches!(normalized.as_str(), "yes" | "no").then_some(normalized)
}

/// Monthly income: ASCII digits only, any length. Normalized by stripping
/// leading zeros; never rejected for magnitude.
pub fn income(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let stripped = trimmed.trim_start_matches('0');
    Some(if stripped.is_empty() { "0" } else { stripped }.to_string())
}

/// Visa category: one of the digits `1`-`4`.
pub fn visa_type(input: &str) -> Option<String> {
    let trimmed = input.trim();
    VISA_TYPES
        .iter()
        .any(|(key, _)| *key == trimmed)
        .then(|| trimmed.to_string())
}

/// Calendar date in `DD.MM.YYYY`, today or later. `today` is injected so
/// the cutoff is testable.
pub fn date(input: &str, today: NaiveDate) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(input.trim(), "%d.%m.%Y").ok()?;
    (parsed >= today).then(|| parsed.format("%d.%m.%Y").to_string())
}

/// One of the fixed hourly consultation slots.
pub fn time_slot(input: &str) -> Option<String> {
    let trimmed = input.trim();
    TIME_SLOTS
        .iter()
        .any(|slot| *slot == trimmed)
        .then(|| trimmed.to_string())
}

/// Human-readable label for a visa category digit.
pub fn visa_type_label(key: &str) -> &'static str {
    VISA_TYPES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or("Unknown")
}
