//! `warden-rbac` — authority resolution and assignment engine.
//!
//! Computes a member's effective permission set from role assignments,
//! keeps it cached with explicit invalidation, and enforces uniqueness and
//! integrity invariants under concurrent mutation. Storage, password
//! hashing, and token issuance are collaborators behind ports; this crate
//! is intentionally decoupled from HTTP and persistence.

pub mod access;
pub mod authority;
pub mod cache;
pub mod engine;
pub mod ledger;
pub mod resolver;
pub mod role;
pub mod seed;
pub mod store;
pub mod token;

pub use access::AccessDecision;
pub use authority::{Authority, AuthorityCatalog};
pub use cache::AuthorityCache;
pub use engine::Rbac;
pub use ledger::{AssignmentLedger, RoleAssignment};
pub use resolver::AuthorityResolver;
pub use role::{Role, RoleCatalog};
pub use seed::{SeedAuthority, SeedConfig, SeedRole, seed};
pub use store::{
    AssignmentStore, AuthorityRemoval, CatalogStore, MemberDirectory, MembershipOutcome,
};
pub use token::{AuthorityName, RoleName, Token};
