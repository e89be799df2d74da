//! Input validation predicates.
//!
//! These never fail: every check answers with a plain `bool` so forms can
//! decide how to present a rejected value.

use std::sync::OnceLock;

use regex::Regex;

const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

const NAME_PATTERN: &str = r"^[A-Za-z]+$";

const PHONE_PATTERN: &str = r"^[0-9]{10}$";

/// Compile a built-in pattern once.
///
/// # Panics
///
/// Panics if a built-in pattern is invalid.
fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid built-in regex pattern"))
}

/// Whether `email` looks like a deliverable address.
///
/// Accepts dotted or quoted local parts and either a domain with a
/// two-letter-or-longer TLD or a bracketed IPv4 literal.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    compiled(&EMAIL, EMAIL_PATTERN).is_match(email)
}

/// Whether `name` is a non-blank run of ASCII letters.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    static NAME: OnceLock<Regex> = OnceLock::new();
    !name.trim().is_empty() && compiled(&NAME, NAME_PATTERN).is_match(name)
}

/// Whether `phone` is exactly ten digits.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    compiled(&PHONE, PHONE_PATTERN).is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "ana@example.com",
            "first.last@sub.example.org",
            "\"quoted name\"@example.com",
            "user@[192.168.0.1]",
            "a-b_c@my-host.io",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "ana",
            "ana@",
            "@example.com",
            "ana@example",
            "ana@example.c",
            "ana smith@example.com",
            "ana..smith@example.com",
            ".ana@example.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("Ana"));
        assert!(is_valid_name("tilly"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name("Ana1"));
        assert!(!is_valid_name("Ana Maria"));
        assert!(!is_valid_name("Zoë"));
        assert!(!is_valid_name("O'Brien"));
    }

    #[test]
    fn test_valid_phone() {
        assert!(is_valid_phone("3125550123"));
    }

    #[test]
    fn test_invalid_phone() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("312555012"));
        assert!(!is_valid_phone("31255501234"));
        assert!(!is_valid_phone("312-555-012"));
        assert!(!is_valid_phone("(312)555012"));
        assert!(!is_valid_phone("٣١٢٥٥٥٠١٢٣"));
    }
}
