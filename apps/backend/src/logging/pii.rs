//! PII redaction for log output.
//!
//! Login and registration flows log email addresses and occasionally raw
//! store errors that may embed tokens. Everything sensitive goes through
//! [`Redacted`] before it reaches a log line.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// Opaque token runs: base64-like or hex, 16 chars or longer.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9+/_.-]{16,}={0,2}\b").unwrap()
});

/// Redacts sensitive information from a string.
///
/// Emails keep the first character of the local part and the full domain;
/// token-like runs are replaced with `[REDACTED_TOKEN]`. Emails are handled
/// first so their domains are not half-eaten by the token pass.
pub fn redact(input: &str) -> String {
    let email_redacted = EMAIL_RE.replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(at_pos) if at_pos > 0 => {
                let first_char = &full_match[..1];
                let domain = &full_match[at_pos..];
                format!("{first_char}***{domain}")
            }
            _ => full_match.to_string(),
        }
    });

    TOKEN_RE
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_redaction() {
        assert_eq!(redact("user@example.com"), "u***@example.com");
        assert_eq!(redact("a@test.org"), "a***@test.org");
        assert_eq!(
            redact("Contact user@example.com or admin@test.org"),
            "Contact u***@example.com or a***@test.org"
        );
    }

    #[test]
    fn test_token_redaction() {
        assert_eq!(
            redact("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
            "[REDACTED_TOKEN]"
        );
        assert_eq!(
            redact("a1b2c3d4e5f678901234567890123456"),
            "[REDACTED_TOKEN]"
        );
        // Short strings should be left untouched
        assert_eq!(redact("short123"), "short123");
    }

    #[test]
    fn test_mixed_content() {
        assert_eq!(
            redact("User user@example.com sent eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
            "User u***@example.com sent [REDACTED_TOKEN]"
        );
    }

    #[test]
    fn test_redacted_wrapper() {
        let redacted = Redacted("user@example.com");
        assert_eq!(format!("{redacted}"), "u***@example.com");
        assert_eq!(format!("{redacted:?}"), "u***@example.com");
    }

    #[test]
    fn test_no_sensitive_data() {
        assert_eq!(redact("Hello world"), "Hello world");
        assert_eq!(redact(""), "");
    }
}
