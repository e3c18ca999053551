//! Member records and the registry port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::{DomainError, DomainResult, MemberId};

/// A registered member account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Normalized (trimmed, lowercased) and unique across the registry.
    pub email: String,
    pub display_name: String,
    /// Opaque output of the configured [`crate::PasswordHasher`].
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Normalize an email address for identity comparison.
///
/// Trims whitespace and lowercases. Only the coarsest shape check is done
/// here (`local@domain`); deliverability is not this layer's problem.
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!("invalid email '{raw}'")));
    }
    Ok(email)
}

/// Durable store for member accounts.
pub trait MemberStore: Send + Sync {
    /// Insert the member unless the email is already registered.
    /// Returns `false` on collision.
    fn insert_if_absent(&self, member: Member) -> bool;

    fn find(&self, id: MemberId) -> Option<Member>;

    fn find_by_email(&self, email: &str) -> Option<Member>;
}

impl<S> MemberStore for Arc<S>
where
    S: MemberStore + ?Sized,
{
    fn insert_if_absent(&self, member: Member) -> bool {
        (**self).insert_if_absent(member)
    }

    fn find(&self, id: MemberId) -> Option<Member> {
        (**self).find(id)
    }

    fn find_by_email(&self, email: &str) -> Option<Member> {
        (**self).find_by_email(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "no-at-sign", "@example.com", "alice@", "a@b@c"] {
            assert!(
                matches!(normalize_email(raw), Err(DomainError::Validation(_))),
                "expected rejection for {raw:?}"
            );
        }
    }
}
