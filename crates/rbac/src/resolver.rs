//! Authority resolver: computes a member's effective authority set.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use warden_core::{DomainError, DomainResult, MemberId};

use crate::cache::AuthorityCache;
use crate::store::{AssignmentStore, MemberDirectory};
use crate::token::Token;

/// Cache-aside resolver over the assignment ledger.
pub struct AuthorityResolver {
    assignments: Arc<dyn AssignmentStore>,
    directory: Arc<dyn MemberDirectory>,
    cache: Arc<AuthorityCache>,
}

impl AuthorityResolver {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        directory: Arc<dyn MemberDirectory>,
        cache: Arc<AuthorityCache>,
    ) -> Self {
        Self {
            assignments,
            directory,
            cache,
        }
    }

    /// Effective authority set for a member: the union, over every assigned
    /// role, of the role's own token and its member authorities' tokens.
    ///
    /// Unknown member fails `NotFound`; a known member with zero assignments
    /// resolves to the empty set. The generation captured before the ledger
    /// read keeps a racing invalidation from being overwritten by stale
    /// data.
    pub fn resolve(&self, member: MemberId) -> DomainResult<Arc<BTreeSet<Token>>> {
        if let Some(cached) = self.cache.get(member) {
            return Ok(cached);
        }

        let generation = self.cache.begin(member);
        if !self.directory.exists(member) {
            return Err(DomainError::not_found(format!("member {member}")));
        }

        let rows = self.assignments.for_member(member);
        let mut tokens = BTreeSet::new();
        for (_assignment, role) in &rows {
            tokens.insert(role.token());
            for authority in &role.authorities {
                tokens.insert(Token::authority(authority));
            }
        }

        let set = Arc::new(tokens);
        let stored = self.cache.store_if_current(member, generation, set.clone());
        debug!(member = %member, tokens = set.len(), cached = stored, "effective set resolved");
        Ok(set)
    }
}
