//! Identity Normalization
//!
//! Phone numbers arrive in whatever format the user typed them in. Matching
//! against the call history works on a reduced form with the usual formatting
//! characters removed.
//!
//! There is no locale-aware parsing and no country code reconciliation, so `+1 555 123 4567` and `555-123-4567`
//! normalize to `15551234567` and `5551234567` and do NOT match.

/// Characters dropped from a raw phone number before comparison.
pub const FORMATTING_CHARS: [char; 5] = ['-', '+', '(', ')', ' '];

/// Reduce a raw phone number to its comparison key.
///
/// Two numbers are the same identity iff their normalized forms are equal.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORMATTING_CHARS.contains(c))
        .collect()
}
