//! Domain name validation and comparison helpers.

use regex::Regex;
use std::sync::LazyLock;

/// Alphanumeric/hyphen labels separated by dots, ending in a TLD of two or
/// more letters.
pub static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("valid domain regex")
});

/// Characters allowed in a store id, which ends up inside a DNS label.
pub static STORE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]{1,48}$").expect("valid store id regex"));

/// Trims and lowercases user input before validation.
pub fn normalize_domain_input(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Whether `domain` is a syntactically valid hostname with a TLD.
pub fn is_valid_domain(domain: &str) -> bool {
    domain.len() <= 253 && DOMAIN_REGEX.is_match(domain)
}

/// Removes one trailing dot from a fully qualified name.
pub fn strip_trailing_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Compares two DNS names, ignoring case and a trailing dot on either side.
pub fn names_match(observed: &str, expected: &str) -> bool {
    strip_trailing_dot(observed.trim()).eq_ignore_ascii_case(strip_trailing_dot(expected.trim()))
}
