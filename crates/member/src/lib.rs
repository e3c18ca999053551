//! `warden-member` — member registry and account workflows.
//!
//! Signup, admin creation, and login around the RBAC engine. Password
//! hashing and bearer-token issuance are ports; their implementations
//! live at the transport boundary.

pub mod auth;
pub mod credentials;
pub mod member;
pub mod signup;

pub use auth::LoginService;
pub use credentials::{PasswordHasher, TokenIssuer};
pub use member::{Member, MemberStore, normalize_email};
pub use signup::SignupService;
