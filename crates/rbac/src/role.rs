//! Role catalog: named bundles of authorities.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use warden_core::{DomainError, DomainResult};

use crate::cache::AuthorityCache;
use crate::store::{AssignmentStore, CatalogStore, MembershipOutcome};
use crate::token::{AuthorityName, RoleName, Token};

/// A named bundle of authorities.
///
/// # Invariants
/// - The authority membership is owned one-directionally: a role references
///   authorities by name; authorities carry no back-reference to roles.
/// - Membership mutation is idempotent (adding a present authority and
///   removing an absent one are no-ops, not errors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: RoleName,
    pub display_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub authorities: BTreeSet<AuthorityName>,
}

impl Role {
    pub fn new(name: RoleName, display_name: &str, description: &str) -> Self {
        Self {
            name,
            display_name: display_name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            authorities: BTreeSet::new(),
        }
    }

    /// Capability token for the role itself (`ROLE_<name>`).
    pub fn token(&self) -> Token {
        Token::role(&self.name)
    }
}

/// Catalog operations over roles, including authority membership.
pub struct RoleCatalog {
    catalog: Arc<dyn CatalogStore>,
    assignments: Arc<dyn AssignmentStore>,
    cache: Arc<AuthorityCache>,
}

impl RoleCatalog {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        assignments: Arc<dyn AssignmentStore>,
        cache: Arc<AuthorityCache>,
    ) -> Self {
        Self {
            catalog,
            assignments,
            cache,
        }
    }

    /// Create a role. Same duplicate-name policy as the authority catalog.
    pub fn create(&self, name: &str, display_name: &str, description: &str) -> DomainResult<Role> {
        let name = RoleName::parse(name)?;
        let role = Role::new(name.clone(), display_name, description);
        if !self.catalog.insert_role_if_absent(role.clone()) {
            return Err(DomainError::duplicate_name(format!(
                "role '{name}' already exists"
            )));
        }
        info!(role = %name, "role created");
        Ok(role)
    }

    pub fn find(&self, name: &str) -> DomainResult<Role> {
        let name = RoleName::parse(name)?;
        self.catalog
            .find_role(&name)
            .ok_or_else(|| DomainError::not_found(format!("role '{name}'")))
    }

    pub fn list(&self) -> Vec<Role> {
        self.catalog.list_roles()
    }

    /// Add an authority to a role's membership.
    ///
    /// Idempotent. The existence of both sides is verified by the store in
    /// the same critical section as the write, so a concurrent authority
    /// deletion cannot interleave and leave a dangling reference. On an
    /// actual change every member currently assigned the role gets their
    /// cached effective set invalidated — fan-out, not single-key —
    /// strictly after the membership write.
    pub fn add_authority(&self, role: &str, authority: &str) -> DomainResult<()> {
        let role = RoleName::parse(role)?;
        let authority = AuthorityName::parse(authority)?;

        let changed = match self.catalog.attach_authority(&role, &authority) {
            MembershipOutcome::Changed => true,
            MembershipOutcome::Unchanged => false,
            MembershipOutcome::RoleMissing => {
                return Err(DomainError::not_found(format!("role '{role}'")));
            }
            MembershipOutcome::AuthorityMissing => {
                return Err(DomainError::not_found(format!("authority '{authority}'")));
            }
        };

        if changed {
            self.invalidate_holders(&role);
            info!(role = %role, authority = %authority, "authority added to role");
        } else {
            debug!(role = %role, authority = %authority, "authority already on role");
        }
        Ok(())
    }

    /// Remove an authority from a role's membership. Same contract as
    /// [`RoleCatalog::add_authority`].
    pub fn remove_authority(&self, role: &str, authority: &str) -> DomainResult<()> {
        let role = RoleName::parse(role)?;
        let authority = AuthorityName::parse(authority)?;

        let changed = match self.catalog.detach_authority(&role, &authority) {
            MembershipOutcome::Changed => true,
            MembershipOutcome::Unchanged => false,
            MembershipOutcome::RoleMissing => {
                return Err(DomainError::not_found(format!("role '{role}'")));
            }
            MembershipOutcome::AuthorityMissing => {
                return Err(DomainError::not_found(format!("authority '{authority}'")));
            }
        };

        if changed {
            self.invalidate_holders(&role);
            info!(role = %role, authority = %authority, "authority removed from role");
        } else {
            debug!(role = %role, authority = %authority, "authority not on role");
        }
        Ok(())
    }

    fn invalidate_holders(&self, role: &RoleName) {
        let members = self.assignments.members_with_role(role);
        self.cache.invalidate_many(&members);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_token_uses_role_prefix() {
        let role = Role::new(RoleName::parse("admin").unwrap(), "Admin", "");
        assert_eq!(role.token().as_str(), "ROLE_ADMIN");
    }

    #[test]
    fn new_role_owns_no_authorities() {
        let role = Role::new(RoleName::parse("user").unwrap(), "User", "");
        assert!(role.authorities.is_empty());
    }
}
