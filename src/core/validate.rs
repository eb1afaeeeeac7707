//! Submit-time validation rules and guest-count coercion.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

/// First violated rule of a draft. `Display` is the user-facing copy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Full name blank after trimming.
    #[error("Please enter your full name")]
    EmptyName,
    /// Email not shaped like `local@domain.tld`.
    #[error("Please enter a valid email")]
    InvalidEmail,
    /// Guest count not a non-negative whole number.
    #[error("Guests must be 0 or more")]
    InvalidGuestCount,
    /// Guest slot with a blank name; the index is 0-based.
    #[error("Please enter a name for guest {}", .0 + 1)]
    MissingGuestName(usize),
}

/// Loose `local@domain.tld` shape check.
pub fn is_plausible_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Strict guest-count parse used by validation.
///
/// Blank text counts as zero. Anything else must be a finite, non-negative
/// whole number that fits the entry's `u32` count.
pub fn parse_guest_count(raw: &str) -> Option<u32> {
    let value = coerce_number(raw)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

/// Lenient guest-count coercion used to size the guest slots while typing.
///
/// Unparseable, negative or out-of-range text gives zero; fractions round
/// down. Every count [`parse_guest_count`] accepts sizes to exactly itself.
pub fn guest_slots_for(raw: &str) -> usize {
    match coerce_number(raw) {
        Some(v) if v > 0.0 && v.floor() <= f64::from(u32::MAX) => v.floor() as usize,
        _ => 0,
    }
}

fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
