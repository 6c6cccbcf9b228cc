//! Domain logic for the visit scheduling backend.
//!
//! Everything in this crate is free of database and HTTP concerns so the
//! repository layer, the API layer and tests can share the same rules.

pub mod access;
pub mod criteria;
pub mod error;
pub mod geo;
pub mod geo_directory;
pub mod matching;
pub mod recurrence;
pub mod roles;
pub mod types;
pub mod verification;
pub mod visit;
