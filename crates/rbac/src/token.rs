//! Names and capability tokens.
//!
//! Authorities and roles are identified by case-normalized names
//! (uppercase snake_case). Externally they surface as prefixed capability
//! tokens: `AUTHORITY_<name>` and `ROLE_<name>`.

use serde::{Deserialize, Serialize};

use warden_core::{DomainError, DomainResult};

fn normalize(raw: &str, what: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{what} name must not be empty")));
    }

    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => out.push(ch.to_ascii_uppercase()),
            other => {
                return Err(DomainError::validation(format!(
                    "{what} name contains invalid character '{other}'"
                )));
            }
        }
    }
    Ok(out)
}

/// Name of an authority, normalized to uppercase snake_case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorityName(String);

impl AuthorityName {
    /// Parse and normalize a raw authority name.
    ///
    /// `"manage_users"` and `"MANAGE_USERS"` identify the same authority.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        Ok(Self(normalize(raw, "authority")?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AuthorityName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a role, normalized to uppercase snake_case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        Ok(Self(normalize(raw, "role")?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability token as seen by the boundary layer.
///
/// A token is either a role grant (`ROLE_<name>`) or an authority grant
/// (`AUTHORITY_<name>`). The two namespaces cannot collide because the
/// prefixes differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn role(name: &RoleName) -> Self {
        Self(format!("ROLE_{name}"))
    }

    pub fn authority(name: &AuthorityName) -> Self {
        Self(format!("AUTHORITY_{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn names_are_case_normalized() {
        let a = AuthorityName::parse("manage_users").unwrap();
        let b = AuthorityName::parse("  MANAGE_USERS ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "MANAGE_USERS");
    }

    #[test]
    fn empty_and_malformed_names_are_rejected() {
        assert!(matches!(
            AuthorityName::parse("   "),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            RoleName::parse("bad name"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            RoleName::parse("role-name"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn tokens_carry_their_prefix() {
        let role = RoleName::parse("admin").unwrap();
        let authority = AuthorityName::parse("manage_users").unwrap();
        assert_eq!(Token::role(&role).as_str(), "ROLE_ADMIN");
        assert_eq!(Token::authority(&authority).as_str(), "AUTHORITY_MANAGE_USERS");
    }

    #[test]
    fn role_and_authority_tokens_never_collide() {
        let role = RoleName::parse("x").unwrap();
        let authority = AuthorityName::parse("x").unwrap();
        assert_ne!(Token::role(&role), Token::authority(&authority));
    }

    proptest! {
        /// Property: normalization is idempotent — parsing an already
        /// normalized name yields the same name.
        #[test]
        fn normalization_is_idempotent(raw in "[A-Za-z0-9_]{1,32}") {
            let first = AuthorityName::parse(&raw).unwrap();
            let second = AuthorityName::parse(first.as_str()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
