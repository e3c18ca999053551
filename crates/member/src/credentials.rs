//! Ports for the opaque credential collaborators.
//!
//! Algorithm choice (hashing scheme, token format/signing) is intentionally
//! outside this crate; the boundary wires real implementations in.

use std::collections::BTreeSet;
use std::sync::Arc;

use warden_core::MemberId;
use warden_rbac::Token;

/// Password hashing and verification.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, raw: &str) -> String;

    fn verify(&self, raw: &str, hash: &str) -> bool;
}

/// Bearer-token issuance for an authenticated member.
pub trait TokenIssuer: Send + Sync {
    /// Produce an opaque bearer token embedding the member's identity and
    /// effective capability tokens.
    fn issue(&self, member: MemberId, tokens: &BTreeSet<Token>) -> String;
}

impl<H> PasswordHasher for Arc<H>
where
    H: PasswordHasher + ?Sized,
{
    fn hash(&self, raw: &str) -> String {
        (**self).hash(raw)
    }

    fn verify(&self, raw: &str, hash: &str) -> bool {
        (**self).verify(raw, hash)
    }
}

impl<I> TokenIssuer for Arc<I>
where
    I: TokenIssuer + ?Sized,
{
    fn issue(&self, member: MemberId, tokens: &BTreeSet<Token>) -> String {
        (**self).issue(member, tokens)
    }
}
