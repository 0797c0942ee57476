//! Email-domain allowlist policy.

use std::collections::HashSet;

/// A fixed set of permitted email domains, configured at construction and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct EmailDomainPolicy {
    allowed_domains: HashSet<String>,
}

impl EmailDomainPolicy {
    /// Create a policy from the configured allowlist
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate an email address against the allowlist.
    ///
    /// Returns false for absent or empty input and for addresses without an
    /// `@`. Otherwise the entire substring after the first `@` is taken as
    /// the domain and matched exactly, case-sensitively. An address with
    /// more than one `@` only validates if the allowlist entry contains the
    /// remaining `@`s verbatim.
    pub fn validate(&self, address: Option<&str>) -> bool {
        let Some(address) = address else {
            return false;
        };
        if address.is_empty() {
            return false;
        }
        match address.split_once('@') {
            Some((_, domain)) => self.allowed_domains.contains(domain),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> EmailDomainPolicy {
        EmailDomainPolicy::new(["example.com", "test.com"])
    }

    #[test]
    fn test_allowlisted_domains_validate() {
        assert!(policy().validate(Some("user@example.com")));
        assert!(policy().validate(Some("user@test.com")));
    }

    #[test]
    fn test_unlisted_domain_rejected() {
        assert!(!policy().validate(Some("user@invalid.com")));
    }

    #[test]
    fn test_missing_at_sign_rejected() {
        assert!(!policy().validate(Some("invalidemail.com")));
    }

    #[test]
    fn test_absent_and_empty_input_rejected() {
        assert!(!policy().validate(None));
        assert!(!policy().validate(Some("")));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!policy().validate(Some("user@Example.com")));
    }

    #[test]
    fn test_multiple_at_signs_use_first_split() {
        // Everything after the first @ is the domain, so a second @ only
        // matches if the allowlist entry carries it too.
        assert!(!policy().validate(Some("user@foo@example.com")));
        let odd = EmailDomainPolicy::new(["foo@example.com"]);
        assert!(odd.validate(Some("user@foo@example.com")));
    }
}
