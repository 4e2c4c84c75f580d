//! GitHub username validation

use regex::Regex;

use crate::error::{NameCheckError, Result};
use crate::invalid_input;

/// Longest username GitHub accepts
pub const MAX_USERNAME_LEN: usize = 39;

/// Username validator following GitHub's registration rules
pub struct UsernameValidator {
    allowed: Regex,
}

impl UsernameValidator {
    /// Create a new username validator
    pub fn new() -> Result<Self> {
        let allowed = Regex::new(r"^[A-Za-z0-9-]+$")
            .map_err(|e| NameCheckError::internal(e.to_string()))?;

        Ok(Self { allowed })
    }

    /// Validate a username
    pub fn validate(&self, username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(invalid_input!("Username cannot be empty"));
        }

        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(invalid_input!(
                "Username '{}' is too long (max {} characters)",
                username,
                MAX_USERNAME_LEN
            ));
        }

        if !self.allowed.is_match(username) {
            return Err(invalid_input!(
                "Username '{}' may only contain alphanumeric characters or hyphens",
                username
            ));
        }

        if username.starts_with('-') || username.ends_with('-') {
            return Err(invalid_input!("Username '{}' cannot start or end with a hyphen", username));
        }

        if username.contains("--") {
            return Err(invalid_input!("Username '{}' cannot contain consecutive hyphens", username));
        }

        Ok(())
    }

    /// Check if a username could be registered at all
    pub fn is_valid(&self, username: &str) -> bool {
        self.validate(username).is_ok()
    }

    /// Split candidates into registrable names and rejected ones with reasons
    pub fn partition(&self, candidates: Vec<String>) -> (Vec<String>, Vec<(String, NameCheckError)>) {
        let mut valid = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();

        for candidate in candidates {
            match self.validate(&candidate) {
                Ok(()) => valid.push(candidate),
                Err(e) => rejected.push((candidate, e)),
            }
        }

        (valid, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_validation() {
        let validator = UsernameValidator::new().unwrap();

        assert!(validator.validate("octocat").is_ok());
        assert!(validator.validate("mona-lisa").is_ok());
        assert!(validator.validate("A1b2").is_ok());

        assert!(validator.validate("").is_err());
        assert!(validator.validate("-octo").is_err());
        assert!(validator.validate("octo-").is_err());
        assert!(validator.validate("oc--to").is_err());
        assert!(validator.validate("octo_cat").is_err());
        assert!(validator.validate("octo.cat").is_err());
    }

    #[test]
    fn test_length_limit() {
        let validator = UsernameValidator::new().unwrap();
        assert!(validator.is_valid(&"a".repeat(39)));
        assert!(!validator.is_valid(&"a".repeat(40)));
    }

    #[test]
    fn test_partition_keeps_order() {
        let validator = UsernameValidator::new().unwrap();
        let (valid, rejected) = validator.partition(vec![
            "abc".to_string(),
            "a_b".to_string(),
            "cab".to_string(),
        ]);
        assert_eq!(valid, vec!["abc", "cab"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, "a_b");
    }
}
