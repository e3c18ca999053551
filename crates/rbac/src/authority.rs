//! Authority catalog: the registry of named permission strings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use warden_core::{DomainError, DomainResult};

use crate::store::{AuthorityRemoval, CatalogStore};
use crate::token::{AuthorityName, Token};

/// A single named permission.
///
/// Immutable once created; the catalog only ever grows, and an authority
/// can only be deleted while no role references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub name: AuthorityName,
    pub display_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Authority {
    pub fn new(name: AuthorityName, display_name: &str, description: &str) -> Self {
        Self {
            name,
            display_name: display_name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Capability token this authority grants (`AUTHORITY_<name>`).
    pub fn token(&self) -> Token {
        Token::authority(&self.name)
    }
}

/// Catalog operations over authorities.
pub struct AuthorityCatalog {
    catalog: Arc<dyn CatalogStore>,
}

impl AuthorityCatalog {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Create an authority. Fails with `DuplicateName` if a case-normalized
    /// name already exists; the store's insert-if-absent decides the race.
    pub fn create(
        &self,
        name: &str,
        display_name: &str,
        description: &str,
    ) -> DomainResult<Authority> {
        let name = AuthorityName::parse(name)?;
        let authority = Authority::new(name.clone(), display_name, description);
        if !self.catalog.insert_authority_if_absent(authority.clone()) {
            return Err(DomainError::duplicate_name(format!(
                "authority '{name}' already exists"
            )));
        }
        info!(authority = %name, "authority created");
        Ok(authority)
    }

    pub fn find(&self, name: &str) -> DomainResult<Authority> {
        let name = AuthorityName::parse(name)?;
        self.catalog
            .find_authority(&name)
            .ok_or_else(|| DomainError::not_found(format!("authority '{name}'")))
    }

    /// All authorities, order-irrelevant.
    pub fn list(&self) -> Vec<Authority> {
        self.catalog.list_authorities()
    }

    /// Delete an authority. Fails with `Conflict` while any role still
    /// references it (reject, never cascade). The reference check and the
    /// remove happen in one store critical section, so a concurrent attach
    /// cannot slip in between them.
    pub fn delete(&self, name: &str) -> DomainResult<()> {
        let name = AuthorityName::parse(name)?;
        match self.catalog.remove_authority_if_unreferenced(&name) {
            AuthorityRemoval::Removed => {
                info!(authority = %name, "authority deleted");
                Ok(())
            }
            AuthorityRemoval::Missing => {
                Err(DomainError::not_found(format!("authority '{name}'")))
            }
            AuthorityRemoval::Referenced => Err(DomainError::conflict(format!(
                "authority '{name}' is referenced by at least one role"
            ))),
        }
    }
}
