//! In-memory implementations of the storage ports.
//!
//! RwLock-guarded maps; each conflict-sensitive operation (insert-if-absent,
//! delete-by-key, membership mutation) runs inside a single lock scope so
//! concurrent writers are serialized at the row level. Intended for
//! tests/dev and as the reference semantics for persistent adapters.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use warden_core::MemberId;
use warden_member::{Member, MemberStore};
use warden_rbac::{
    AssignmentStore, Authority, AuthorityName, AuthorityRemoval, CatalogStore, MemberDirectory,
    MembershipOutcome, Role, RoleAssignment, RoleName,
};

#[derive(Debug, Default)]
struct CatalogMaps {
    authorities: HashMap<AuthorityName, Authority>,
    roles: HashMap<RoleName, Role>,
}

/// In-memory catalog store for authorities and roles.
///
/// Both maps sit behind one lock. That is what makes the conditional
/// operations (`attach_authority`, `remove_authority_if_unreferenced`)
/// atomic: a delete cannot interleave between an attach's existence check
/// and its membership write, and vice versa.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<CatalogMaps>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert_authority_if_absent(&self, authority: Authority) -> bool {
        let mut maps = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if maps.authorities.contains_key(&authority.name) {
            return false;
        }
        maps.authorities.insert(authority.name.clone(), authority);
        true
    }

    fn find_authority(&self, name: &AuthorityName) -> Option<Authority> {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        maps.authorities.get(name).cloned()
    }

    fn list_authorities(&self) -> Vec<Authority> {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        maps.authorities.values().cloned().collect()
    }

    fn remove_authority_if_unreferenced(&self, name: &AuthorityName) -> AuthorityRemoval {
        let mut maps = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !maps.authorities.contains_key(name) {
            return AuthorityRemoval::Missing;
        }
        if maps.roles.values().any(|role| role.authorities.contains(name)) {
            return AuthorityRemoval::Referenced;
        }
        maps.authorities.remove(name);
        AuthorityRemoval::Removed
    }

    fn insert_role_if_absent(&self, role: Role) -> bool {
        let mut maps = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if maps.roles.contains_key(&role.name) {
            return false;
        }
        maps.roles.insert(role.name.clone(), role);
        true
    }

    fn find_role(&self, name: &RoleName) -> Option<Role> {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        maps.roles.get(name).cloned()
    }

    fn list_roles(&self) -> Vec<Role> {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        maps.roles.values().cloned().collect()
    }

    fn attach_authority(&self, role: &RoleName, authority: &AuthorityName) -> MembershipOutcome {
        let mut maps = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !maps.authorities.contains_key(authority) {
            return MembershipOutcome::AuthorityMissing;
        }
        match maps.roles.get_mut(role) {
            None => MembershipOutcome::RoleMissing,
            Some(role) => {
                if role.authorities.insert(authority.clone()) {
                    MembershipOutcome::Changed
                } else {
                    MembershipOutcome::Unchanged
                }
            }
        }
    }

    fn detach_authority(&self, role: &RoleName, authority: &AuthorityName) -> MembershipOutcome {
        let mut maps = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !maps.authorities.contains_key(authority) {
            return MembershipOutcome::AuthorityMissing;
        }
        match maps.roles.get_mut(role) {
            None => MembershipOutcome::RoleMissing,
            Some(role) => {
                if role.authorities.remove(authority) {
                    MembershipOutcome::Changed
                } else {
                    MembershipOutcome::Unchanged
                }
            }
        }
    }
}

/// In-memory assignment ledger store.
///
/// Holds a handle to the catalog store so `for_member` can hand back each
/// assignment's role (with its authority set) in one call.
pub struct InMemoryAssignmentStore {
    rows: RwLock<HashMap<(MemberId, RoleName), RoleAssignment>>,
    catalog: Arc<dyn CatalogStore>,
}

impl InMemoryAssignmentStore {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            catalog,
        }
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn insert_if_absent(&self, assignment: RoleAssignment) -> bool {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let key = (assignment.member_id, assignment.role.clone());
        if rows.contains_key(&key) {
            return false;
        }
        rows.insert(key, assignment);
        true
    }

    fn remove(&self, member: MemberId, role: &RoleName) -> bool {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.remove(&(member, role.clone())).is_some()
    }

    fn for_member(&self, member: MemberId) -> Vec<(RoleAssignment, Role)> {
        let assignments: Vec<RoleAssignment> = {
            let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
            rows.values()
                .filter(|a| a.member_id == member)
                .cloned()
                .collect()
        };

        assignments
            .into_iter()
            .filter_map(|assignment| {
                let role = self.catalog.find_role(&assignment.role)?;
                Some((assignment, role))
            })
            .collect()
    }

    fn members_with_role(&self, role: &RoleName) -> Vec<MemberId> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.values()
            .filter(|a| &a.role == role)
            .map(|a| a.member_id)
            .collect()
    }
}

#[derive(Debug, Default)]
struct MemberMaps {
    by_id: HashMap<MemberId, Member>,
    id_by_email: HashMap<String, MemberId>,
}

/// In-memory member registry. Doubles as the RBAC engine's member
/// directory.
#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    inner: RwLock<MemberMaps>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemberStore for InMemoryMemberStore {
    fn insert_if_absent(&self, member: Member) -> bool {
        let mut maps = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if maps.id_by_email.contains_key(&member.email) {
            return false;
        }
        maps.id_by_email.insert(member.email.clone(), member.id);
        maps.by_id.insert(member.id, member);
        true
    }

    fn find(&self, id: MemberId) -> Option<Member> {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        maps.by_id.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Member> {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let id = maps.id_by_email.get(email)?;
        maps.by_id.get(id).cloned()
    }
}

impl MemberDirectory for InMemoryMemberStore {
    fn exists(&self, member: MemberId) -> bool {
        let maps = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        maps.by_id.contains_key(&member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn authority(name: &str) -> Authority {
        Authority::new(AuthorityName::parse(name).unwrap(), name, "")
    }

    fn role(name: &str) -> Role {
        Role::new(RoleName::parse(name).unwrap(), name, "")
    }

    fn assignment(member: MemberId, role_name: &str) -> RoleAssignment {
        RoleAssignment {
            member_id: member,
            role: RoleName::parse(role_name).unwrap(),
            granted_by: None,
            assigned_at: Utc::now(),
        }
    }

    #[test]
    fn authority_insert_if_absent_rejects_duplicates() {
        let store = InMemoryCatalogStore::new();
        assert!(store.insert_authority_if_absent(authority("MANAGE_USERS")));
        assert!(!store.insert_authority_if_absent(authority("MANAGE_USERS")));
        assert_eq!(store.list_authorities().len(), 1);
    }

    #[test]
    fn role_membership_mutation_is_idempotent() {
        let store = InMemoryCatalogStore::new();
        store.insert_authority_if_absent(authority("MANAGE_USERS"));
        store.insert_role_if_absent(role("ADMIN"));
        let admin = RoleName::parse("ADMIN").unwrap();
        let manage = AuthorityName::parse("MANAGE_USERS").unwrap();

        assert_eq!(store.attach_authority(&admin, &manage), MembershipOutcome::Changed);
        assert_eq!(
            store.attach_authority(&admin, &manage),
            MembershipOutcome::Unchanged
        );

        assert_eq!(store.detach_authority(&admin, &manage), MembershipOutcome::Changed);
        assert_eq!(
            store.detach_authority(&admin, &manage),
            MembershipOutcome::Unchanged
        );
    }

    #[test]
    fn membership_ops_report_the_missing_side() {
        let store = InMemoryCatalogStore::new();
        let ghost = RoleName::parse("GHOST").unwrap();
        let manage = AuthorityName::parse("MANAGE_USERS").unwrap();

        // Neither side exists; the authority check comes first.
        assert_eq!(
            store.attach_authority(&ghost, &manage),
            MembershipOutcome::AuthorityMissing
        );

        store.insert_authority_if_absent(authority("MANAGE_USERS"));
        assert_eq!(
            store.attach_authority(&ghost, &manage),
            MembershipOutcome::RoleMissing
        );
        assert_eq!(
            store.detach_authority(&ghost, &manage),
            MembershipOutcome::RoleMissing
        );
    }

    #[test]
    fn conditional_removal_respects_role_references() {
        let store = InMemoryCatalogStore::new();
        let manage = AuthorityName::parse("MANAGE_USERS").unwrap();
        assert_eq!(
            store.remove_authority_if_unreferenced(&manage),
            AuthorityRemoval::Missing
        );

        store.insert_authority_if_absent(authority("MANAGE_USERS"));
        store.insert_role_if_absent(role("ADMIN"));
        let admin = RoleName::parse("ADMIN").unwrap();
        store.attach_authority(&admin, &manage);

        assert_eq!(
            store.remove_authority_if_unreferenced(&manage),
            AuthorityRemoval::Referenced
        );
        assert!(store.find_authority(&manage).is_some());

        store.detach_authority(&admin, &manage);
        assert_eq!(
            store.remove_authority_if_unreferenced(&manage),
            AuthorityRemoval::Removed
        );
        assert!(store.find_authority(&manage).is_none());
    }

    #[test]
    fn assignment_store_enforces_pair_uniqueness() {
        let catalog: Arc<dyn CatalogStore> = Arc::new(InMemoryCatalogStore::new());
        let store = InMemoryAssignmentStore::new(catalog);
        let member = MemberId::new();

        assert!(store.insert_if_absent(assignment(member, "USER")));
        assert!(!store.insert_if_absent(assignment(member, "USER")));
        assert!(store.insert_if_absent(assignment(member, "ADMIN")));
    }

    #[test]
    fn for_member_joins_roles_eagerly() {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        catalog.insert_authority_if_absent(authority("MANAGE_USERS"));
        catalog.insert_role_if_absent(role("ADMIN"));
        let admin = RoleName::parse("ADMIN").unwrap();
        let manage = AuthorityName::parse("MANAGE_USERS").unwrap();
        catalog.attach_authority(&admin, &manage);

        let store = InMemoryAssignmentStore::new(catalog.clone() as Arc<dyn CatalogStore>);
        let member = MemberId::new();
        store.insert_if_absent(assignment(member, "ADMIN"));

        let rows = store.for_member(member);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].1.authorities.contains(&manage));
    }

    #[test]
    fn members_with_role_lists_all_holders() {
        let catalog: Arc<dyn CatalogStore> = Arc::new(InMemoryCatalogStore::new());
        let store = InMemoryAssignmentStore::new(catalog);
        let a = MemberId::new();
        let b = MemberId::new();
        let c = MemberId::new();
        store.insert_if_absent(assignment(a, "USER"));
        store.insert_if_absent(assignment(b, "USER"));
        store.insert_if_absent(assignment(c, "ADMIN"));

        let user = RoleName::parse("USER").unwrap();
        let mut holders = store.members_with_role(&user);
        holders.sort_by_key(|m| *m.as_uuid());
        let mut expected = vec![a, b];
        expected.sort_by_key(|m| *m.as_uuid());
        assert_eq!(holders, expected);
    }

    #[test]
    fn member_store_rejects_duplicate_email() {
        let store = InMemoryMemberStore::new();
        let first = Member {
            id: MemberId::new(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            password_hash: "h".to_string(),
            created_at: Utc::now(),
        };
        let second = Member {
            id: MemberId::new(),
            email: "alice@example.com".to_string(),
            ..first.clone()
        };

        assert!(store.insert_if_absent(first.clone()));
        assert!(!store.insert_if_absent(second));
        assert!(store.exists(first.id));
        assert_eq!(store.find_by_email("alice@example.com").unwrap().id, first.id);
    }
}
