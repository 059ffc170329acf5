//! Scrubs API keys, bearer tokens and phone numbers from text before it is logged.

use std::sync::LazyLock;

use regex::Regex;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("phone pattern is valid")
});
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .expect("token pattern is valid")
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    TELEPHONE_RE
        .replace_all(&redacted, "[REDACTED_PHONE]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_phone_and_bearer() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn redacts_openai_style_keys() {
        let clean = redact_sensitive_data("key=sk-proj-abcdefghijklmnopqrstuvwx");
        assert_eq!(clean, "key=[REDACTED_TOKEN]");
    }

    #[test]
    fn leaves_customer_ids_alone() {
        assert_eq!(redact_sensitive_data("customer CUST001"), "customer CUST001");
    }
}
