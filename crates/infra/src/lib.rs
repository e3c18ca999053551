//! Infrastructure layer: storage adapters for the warden ports.
//!
//! Only in-memory adapters live here today; a persistent backend plugs in
//! by implementing the same port traits.

pub mod memory;

pub use memory::{InMemoryAssignmentStore, InMemoryCatalogStore, InMemoryMemberStore};
