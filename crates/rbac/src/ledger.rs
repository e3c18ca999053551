//! Member-role ledger: the record of who holds which role.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use warden_core::{DomainError, DomainResult, MemberId};

use crate::cache::AuthorityCache;
use crate::store::{AssignmentStore, CatalogStore, MemberDirectory};
use crate::token::RoleName;

/// A single (member, role) grant.
///
/// Identity is the (member, role) pair; at most one active row may exist
/// per pair. `granted_by` is `None` for system-initiated grants (e.g. the
/// default role on signup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub member_id: MemberId,
    pub role: RoleName,
    pub granted_by: Option<MemberId>,
    pub assigned_at: DateTime<Utc>,
}

/// Append/remove operations over the assignment ledger.
///
/// Every mutation completes its store write first and invalidates the
/// member's cached effective set second; resolvers that raced the write
/// are cut off by the cache's generation check.
#[derive(Clone)]
pub struct AssignmentLedger {
    assignments: Arc<dyn AssignmentStore>,
    catalog: Arc<dyn CatalogStore>,
    directory: Arc<dyn MemberDirectory>,
    cache: Arc<AuthorityCache>,
}

impl AssignmentLedger {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        catalog: Arc<dyn CatalogStore>,
        directory: Arc<dyn MemberDirectory>,
        cache: Arc<AuthorityCache>,
    ) -> Self {
        Self {
            assignments,
            catalog,
            directory,
            cache,
        }
    }

    /// Grant a role to a member.
    ///
    /// Fails `NotFound` for an unknown member or role, `AlreadyAssigned`
    /// if an active row exists. The uniqueness race is decided by the
    /// store's insert-if-absent, so two concurrent grants for the same
    /// pair produce exactly one row.
    pub fn assign(
        &self,
        member: MemberId,
        role: &str,
        granted_by: Option<MemberId>,
    ) -> DomainResult<RoleAssignment> {
        let role = RoleName::parse(role)?;
        if !self.directory.exists(member) {
            return Err(DomainError::not_found(format!("member {member}")));
        }
        if self.catalog.find_role(&role).is_none() {
            return Err(DomainError::not_found(format!("role '{role}'")));
        }

        let assignment = RoleAssignment {
            member_id: member,
            role: role.clone(),
            granted_by,
            assigned_at: Utc::now(),
        };
        if !self.assignments.insert_if_absent(assignment.clone()) {
            return Err(DomainError::already_assigned(format!(
                "member {member} already holds role '{role}'"
            )));
        }

        self.cache.invalidate(member);
        info!(member = %member, role = %role, "role assigned");
        Ok(assignment)
    }

    /// Revoke a role from a member.
    ///
    /// Fails `NotFound` only for an unknown role name. Revoking an
    /// assignment that does not exist is a silent success (delete-by-key
    /// semantics), a deliberate asymmetry with `assign`.
    pub fn revoke(&self, member: MemberId, role: &str) -> DomainResult<()> {
        let role = RoleName::parse(role)?;
        if self.catalog.find_role(&role).is_none() {
            return Err(DomainError::not_found(format!("role '{role}'")));
        }

        let removed = self.assignments.remove(member, &role);
        self.cache.invalidate(member);
        if removed {
            info!(member = %member, role = %role, "role revoked");
        } else {
            debug!(member = %member, role = %role, "revoke had nothing to remove");
        }
        Ok(())
    }

    /// Active assignment rows for a member (without role payloads).
    pub fn assignments_for(&self, member: MemberId) -> DomainResult<Vec<RoleAssignment>> {
        if !self.directory.exists(member) {
            return Err(DomainError::not_found(format!("member {member}")));
        }
        Ok(self
            .assignments
            .for_member(member)
            .into_iter()
            .map(|(assignment, _role)| assignment)
            .collect())
    }
}
