//! Input validation for submissions.
//!
//! Everything here runs before any write: a batch that fails validation
//! leaves no trace in the ledger or queue.

use std::sync::LazyLock;

use regex::Regex;

use brandgate_shared::{BrandGateError, Result};

/// Standard email address shape: local part, `@`, dotted domain with a
/// 2+ letter top-level label.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
});

/// Scheme plus dotted domain: each label alphanumeric with interior
/// hyphens, ending in a 2+ letter TLD.
static URL_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}")
        .expect("valid regex")
});

/// Full URL including an optional path restricted to the permitted
/// character set.
static URL_FULL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}(/[a-zA-Z0-9\-._~:/?#\[\]@!$&'()*+,;=]*)?$",
    )
    .expect("valid regex")
});

/// Validate a requestor email address.
pub fn validate_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(BrandGateError::InvalidEmail(email.to_string()))
    }
}

/// Validate a retailer URL, reporting which check failed.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(BrandGateError::invalid_url(url, "URL is empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(BrandGateError::invalid_url(
            url,
            "URL must start with http:// or https://",
        ));
    }
    if !URL_DOMAIN_RE.is_match(url) {
        return Err(BrandGateError::invalid_url(url, "invalid domain format"));
    }
    if !URL_FULL_RE.is_match(url) {
        return Err(BrandGateError::invalid_url(url, "invalid URL path format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("first.last+tag@sub.example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["not-an-email", "a@b", "@example.com", "a b@example.com", ""] {
            assert!(validate_email(email).is_err(), "should reject {email:?}");
        }
    }

    #[test]
    fn accepts_retailer_urls() {
        assert!(validate_url("https://brand.example.com/page").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://www.homedepot.com/b/brand-name").is_ok());
    }

    #[test]
    fn rejects_wrong_scheme() {
        let err = validate_url("ftp://x.com").unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn rejects_missing_tld() {
        assert!(validate_url("https://brand").is_err());
        assert!(validate_url("https://brand/page").is_err());
    }

    #[test]
    fn rejects_bad_path_characters() {
        assert!(validate_url("https://example.com/pa ge").is_err());
        assert!(validate_url("https://example.com/page\"").is_err());
    }
}
