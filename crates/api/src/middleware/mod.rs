//! Authentication and role extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireProspect`], [`rbac::RequireVisitor`],
//!   [`rbac::RequireAdmin`] -- the caller must hold that role.

pub mod auth;
pub mod rbac;
