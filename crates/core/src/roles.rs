//! Well-known role labels.
//!
//! These must match the seed data in `20250301000001_create_roles_and_users.sql`.

pub const ROLE_PROSPECT: &str = "PROSPECT";
pub const ROLE_VISITOR: &str = "VISITOR";
pub const ROLE_ADMIN: &str = "ADMIN";
