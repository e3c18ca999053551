//! Signup and administrative account creation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use warden_core::{DomainError, DomainResult, MemberId};
use warden_rbac::AssignmentLedger;

use crate::credentials::PasswordHasher;
use crate::member::{Member, MemberStore, normalize_email};

/// Role granted to every self-signed-up member.
pub const DEFAULT_ROLE: &str = "USER";

/// Role granted to administratively created accounts.
pub const ADMIN_ROLE: &str = "ADMIN";

const MIN_PASSWORD_LEN: usize = 8;

fn validate_password(raw: &str) -> DomainResult<()> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_display_name(raw: &str) -> DomainResult<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("display name must not be empty"));
    }
    Ok(name)
}

/// Account creation workflows.
pub struct SignupService {
    members: Arc<dyn MemberStore>,
    hasher: Arc<dyn PasswordHasher>,
    ledger: AssignmentLedger,
}

impl SignupService {
    pub fn new(
        members: Arc<dyn MemberStore>,
        hasher: Arc<dyn PasswordHasher>,
        ledger: AssignmentLedger,
    ) -> Self {
        Self {
            members,
            hasher,
            ledger,
        }
    }

    /// Self-service signup. The default `USER` role is granted
    /// system-initiated (`granted_by = None`).
    ///
    /// A failed default-role grant does not fail the signup: the account is
    /// already durable at that point, and the caller-facing contract is
    /// that signup succeeded. The member is left with zero roles and the
    /// failure is surfaced as a warning for operators.
    pub fn signup(&self, email: &str, password: &str, display_name: &str) -> DomainResult<Member> {
        let member = self.register(email, password, display_name)?;

        if let Err(error) = self.ledger.assign(member.id, DEFAULT_ROLE, None) {
            warn!(member = %member.id, %error, "default role grant failed; member has no roles");
        }

        info!(member = %member.id, "member signed up");
        Ok(member)
    }

    /// Administrative account creation. Unlike signup, a failed `ADMIN`
    /// grant fails the whole operation — an admin account without its role
    /// is useless.
    pub fn create_admin(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        created_by: MemberId,
    ) -> DomainResult<Member> {
        let member = self.register(email, password, display_name)?;
        self.ledger.assign(member.id, ADMIN_ROLE, Some(created_by))?;
        info!(member = %member.id, created_by = %created_by, "admin account created");
        Ok(member)
    }

    fn register(&self, email: &str, password: &str, display_name: &str) -> DomainResult<Member> {
        let email = normalize_email(email)?;
        validate_password(password)?;
        let display_name = validate_display_name(display_name)?;

        let member = Member {
            id: MemberId::new(),
            email: email.clone(),
            display_name: display_name.to_string(),
            password_hash: self.hasher.hash(password),
            created_at: Utc::now(),
        };
        if !self.members.insert_if_absent(member.clone()) {
            return Err(DomainError::duplicate_name(format!(
                "email '{email}' is already in use"
            )));
        }
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            validate_password("1234567"),
            Err(DomainError::Validation(_))
        ));
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn display_name_is_trimmed() {
        assert_eq!(validate_display_name("  Alice  ").unwrap(), "Alice");
        assert!(validate_display_name("   ").is_err());
    }
}
