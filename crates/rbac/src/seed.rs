//! Idempotent bootstrap seeding of the authority and role catalogs.
//!
//! Runs once at process start. Create-if-absent throughout, so reseeding
//! an already-populated store is a no-op. Queries issued before seeding
//! completes fail `NotFound` for the not-yet-created rows; the catalogs
//! are only ever observed through completed store writes, never as a
//! partial set.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use warden_core::{DomainError, DomainResult};

use crate::engine::Rbac;

/// An authority to create at bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAuthority {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

/// A role to create at bootstrap, with the authorities to attach to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRole {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub authorities: Vec<String>,
}

/// Bootstrap catalog data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub authorities: Vec<SeedAuthority>,
    pub roles: Vec<SeedRole>,
}

impl Default for SeedConfig {
    /// Stock catalog: `USER` (no authorities, the signup default) and
    /// `ADMIN` holding `MANAGE_USERS` and `MANAGE_SYSTEM`.
    fn default() -> Self {
        Self {
            authorities: vec![
                SeedAuthority {
                    name: "MANAGE_USERS".to_string(),
                    display_name: "Manage users".to_string(),
                    description: "Deactivate members and change their roles".to_string(),
                },
                SeedAuthority {
                    name: "MANAGE_SYSTEM".to_string(),
                    display_name: "Manage system".to_string(),
                    description: "Change system-wide settings".to_string(),
                },
            ],
            roles: vec![
                SeedRole {
                    name: "USER".to_string(),
                    display_name: "User".to_string(),
                    description: "Default member role".to_string(),
                    authorities: vec![],
                },
                SeedRole {
                    name: "ADMIN".to_string(),
                    display_name: "Administrator".to_string(),
                    description: "System administrator role".to_string(),
                    authorities: vec!["MANAGE_USERS".to_string(), "MANAGE_SYSTEM".to_string()],
                },
            ],
        }
    }
}

/// Seed the catalogs. Safe to run repeatedly.
pub fn seed(rbac: &Rbac, config: &SeedConfig) -> DomainResult<()> {
    info!("seeding catalogs");

    for authority in &config.authorities {
        match rbac.authorities.create(
            &authority.name,
            &authority.display_name,
            &authority.description,
        ) {
            Ok(_) => info!(authority = %authority.name, "seeded authority"),
            Err(DomainError::DuplicateName(_)) => {
                debug!(authority = %authority.name, "authority already present");
            }
            Err(e) => return Err(e),
        }
    }

    for role in &config.roles {
        match rbac
            .roles
            .create(&role.name, &role.display_name, &role.description)
        {
            Ok(_) => info!(role = %role.name, "seeded role"),
            Err(DomainError::DuplicateName(_)) => {
                debug!(role = %role.name, "role already present");
            }
            Err(e) => return Err(e),
        }

        for authority in &role.authorities {
            // Idempotent by contract; attaching an attached authority no-ops.
            rbac.roles.add_authority(&role.name, authority)?;
        }
    }

    info!("catalog seeding complete");
    Ok(())
}
