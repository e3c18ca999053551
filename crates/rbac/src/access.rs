//! Access decision facade consumed by the request-gating boundary.

use std::sync::Arc;

use warden_core::{DomainResult, MemberId};

use crate::resolver::AuthorityResolver;
use crate::token::{RoleName, Token};

/// Pure read facade over the resolver's output.
///
/// No side effects; the only failure mode is a propagated `NotFound` for
/// an unknown member.
pub struct AccessDecision {
    resolver: Arc<AuthorityResolver>,
}

impl AccessDecision {
    pub fn new(resolver: Arc<AuthorityResolver>) -> Self {
        Self { resolver }
    }

    /// Whether the member's effective set contains the capability token.
    pub fn has_authority(&self, member: MemberId, token: &Token) -> DomainResult<bool> {
        Ok(self.resolver.resolve(member)?.contains(token))
    }

    /// Whether the member holds the role. Sugar for checking the
    /// `ROLE_<name>` token; name validation belongs to the caller, so the
    /// facade keeps its single failure mode.
    pub fn has_role(&self, member: MemberId, role: &RoleName) -> DomainResult<bool> {
        self.has_authority(member, &Token::role(role))
    }
}
