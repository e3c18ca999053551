//! Storage ports for the RBAC engine.
//!
//! The engine only needs simple key/relationship operations from its
//! backing store; anything conflict-sensitive (duplicate names, duplicate
//! assignments, cross-reference integrity) is decided by a single store
//! primitive so that concurrent writers race inside one critical section
//! rather than across a check-then-act gap.

use std::sync::Arc;

use warden_core::MemberId;

use crate::authority::Authority;
use crate::ledger::RoleAssignment;
use crate::role::Role;
use crate::token::{AuthorityName, RoleName};

/// Outcome of a role-membership mutation, decided atomically by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// The membership set actually changed.
    Changed,
    /// Idempotent no-op: the requested state already held.
    Unchanged,
    RoleMissing,
    AuthorityMissing,
}

/// Outcome of a conditional authority deletion, decided atomically by the
/// store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityRemoval {
    Removed,
    Missing,
    /// At least one role still references the authority; nothing was
    /// deleted.
    Referenced,
}

/// Durable store for both catalogs.
///
/// Authorities and roles live behind one port because their integrity
/// rules cross-reference each other: attaching requires the authority to
/// exist, deleting requires zero role references. An adapter must decide
/// each such operation inside a single lock scope, otherwise a concurrent
/// delete/attach pair can leave a role referencing a deleted authority.
pub trait CatalogStore: Send + Sync {
    /// Insert the authority unless one with the same name exists.
    /// Returns `false` on collision.
    fn insert_authority_if_absent(&self, authority: Authority) -> bool;

    fn find_authority(&self, name: &AuthorityName) -> Option<Authority>;

    fn list_authorities(&self) -> Vec<Authority>;

    /// Delete the authority only if no role references it.
    fn remove_authority_if_unreferenced(&self, name: &AuthorityName) -> AuthorityRemoval;

    /// Insert the role unless one with the same name exists.
    /// Returns `false` on collision.
    fn insert_role_if_absent(&self, role: Role) -> bool;

    fn find_role(&self, name: &RoleName) -> Option<Role>;

    fn list_roles(&self) -> Vec<Role>;

    /// Add an authority to the role's membership, verifying both sides
    /// exist in the same critical section.
    fn attach_authority(&self, role: &RoleName, authority: &AuthorityName) -> MembershipOutcome;

    /// Remove an authority from the role's membership. Same contract as
    /// [`CatalogStore::attach_authority`].
    fn detach_authority(&self, role: &RoleName, authority: &AuthorityName) -> MembershipOutcome;
}

/// Durable store for member-role assignment rows.
pub trait AssignmentStore: Send + Sync {
    /// Insert the row unless the (member, role) pair already has one.
    /// Returns `false` on collision.
    fn insert_if_absent(&self, assignment: RoleAssignment) -> bool;

    /// Delete by (member, role) key. Returns `false` if no row existed.
    fn remove(&self, member: MemberId, role: &RoleName) -> bool;

    /// All active rows for the member, each eagerly joined with its role
    /// (and therefore the role's authority membership) in one call.
    fn for_member(&self, member: MemberId) -> Vec<(RoleAssignment, Role)>;

    /// Every member currently holding the role (fan-out invalidation input).
    fn members_with_role(&self, role: &RoleName) -> Vec<MemberId>;
}

/// Member-existence check provided by the member-management collaborator.
pub trait MemberDirectory: Send + Sync {
    fn exists(&self, member: MemberId) -> bool;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn insert_authority_if_absent(&self, authority: Authority) -> bool {
        (**self).insert_authority_if_absent(authority)
    }

    fn find_authority(&self, name: &AuthorityName) -> Option<Authority> {
        (**self).find_authority(name)
    }

    fn list_authorities(&self) -> Vec<Authority> {
        (**self).list_authorities()
    }

    fn remove_authority_if_unreferenced(&self, name: &AuthorityName) -> AuthorityRemoval {
        (**self).remove_authority_if_unreferenced(name)
    }

    fn insert_role_if_absent(&self, role: Role) -> bool {
        (**self).insert_role_if_absent(role)
    }

    fn find_role(&self, name: &RoleName) -> Option<Role> {
        (**self).find_role(name)
    }

    fn list_roles(&self) -> Vec<Role> {
        (**self).list_roles()
    }

    fn attach_authority(&self, role: &RoleName, authority: &AuthorityName) -> MembershipOutcome {
        (**self).attach_authority(role, authority)
    }

    fn detach_authority(&self, role: &RoleName, authority: &AuthorityName) -> MembershipOutcome {
        (**self).detach_authority(role, authority)
    }
}

impl<S> AssignmentStore for Arc<S>
where
    S: AssignmentStore + ?Sized,
{
    fn insert_if_absent(&self, assignment: RoleAssignment) -> bool {
        (**self).insert_if_absent(assignment)
    }

    fn remove(&self, member: MemberId, role: &RoleName) -> bool {
        (**self).remove(member, role)
    }

    fn for_member(&self, member: MemberId) -> Vec<(RoleAssignment, Role)> {
        (**self).for_member(member)
    }

    fn members_with_role(&self, role: &RoleName) -> Vec<MemberId> {
        (**self).members_with_role(role)
    }
}

impl<S> MemberDirectory for Arc<S>
where
    S: MemberDirectory + ?Sized,
{
    fn exists(&self, member: MemberId) -> bool {
        (**self).exists(member)
    }
}
