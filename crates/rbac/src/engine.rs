//! Wiring of the RBAC components over a set of storage ports.

use std::sync::Arc;

use crate::access::AccessDecision;
use crate::authority::AuthorityCatalog;
use crate::cache::AuthorityCache;
use crate::ledger::AssignmentLedger;
use crate::resolver::AuthorityResolver;
use crate::role::RoleCatalog;
use crate::store::{AssignmentStore, CatalogStore, MemberDirectory};

/// The assembled RBAC engine: both catalogs, the assignment ledger, the
/// resolver, and the access facade, all sharing one cache.
pub struct Rbac {
    pub authorities: AuthorityCatalog,
    pub roles: RoleCatalog,
    pub ledger: AssignmentLedger,
    pub resolver: Arc<AuthorityResolver>,
    pub access: AccessDecision,
}

impl Rbac {
    pub fn new(
        catalog_store: Arc<dyn CatalogStore>,
        assignment_store: Arc<dyn AssignmentStore>,
        directory: Arc<dyn MemberDirectory>,
    ) -> Self {
        let cache = Arc::new(AuthorityCache::new());

        let authorities = AuthorityCatalog::new(catalog_store.clone());
        let roles = RoleCatalog::new(
            catalog_store.clone(),
            assignment_store.clone(),
            cache.clone(),
        );
        let ledger = AssignmentLedger::new(
            assignment_store.clone(),
            catalog_store,
            directory.clone(),
            cache.clone(),
        );
        let resolver = Arc::new(AuthorityResolver::new(assignment_store, directory, cache));
        let access = AccessDecision::new(resolver.clone());

        Self {
            authorities,
            roles,
            ledger,
            resolver,
            access,
        }
    }
}
