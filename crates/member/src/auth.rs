//! Login: credential verification and bearer-token issuance.

use std::sync::Arc;

use tracing::info;

use warden_core::{DomainError, DomainResult};
use warden_rbac::AuthorityResolver;

use crate::credentials::{PasswordHasher, TokenIssuer};
use crate::member::{Member, MemberStore, normalize_email};

/// Login workflow over the member registry and the resolver.
pub struct LoginService {
    members: Arc<dyn MemberStore>,
    hasher: Arc<dyn PasswordHasher>,
    resolver: Arc<AuthorityResolver>,
    issuer: Arc<dyn TokenIssuer>,
}

impl LoginService {
    pub fn new(
        members: Arc<dyn MemberStore>,
        hasher: Arc<dyn PasswordHasher>,
        resolver: Arc<AuthorityResolver>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            members,
            hasher,
            resolver,
            issuer,
        }
    }

    /// Verify credentials and issue a bearer token carrying the member's
    /// effective capability tokens.
    ///
    /// Unknown email fails `NotFound`; a wrong password fails `Validation`
    /// without revealing which of the two happened in the message shown to
    /// end users (the boundary maps both to the same status).
    pub fn login(&self, email: &str, password: &str) -> DomainResult<String> {
        let email = normalize_email(email)?;
        let member = self
            .members
            .find_by_email(&email)
            .ok_or_else(|| DomainError::not_found(format!("member with email '{email}'")))?;

        if !self.hasher.verify(password, &member.password_hash) {
            return Err(DomainError::validation("invalid credentials"));
        }

        let tokens = self.resolver.resolve(member.id)?;
        info!(member = %member.id, "member logged in");
        Ok(self.issuer.issue(member.id, &tokens))
    }

    /// Post-authentication member lookup.
    pub fn member_by_email(&self, email: &str) -> DomainResult<Member> {
        let email = normalize_email(email)?;
        self.members
            .find_by_email(&email)
            .ok_or_else(|| DomainError::not_found(format!("member with email '{email}'")))
    }
}
