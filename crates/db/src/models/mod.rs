//! Entity models and DTOs.
//!
//! Entities derive `FromRow` + `Serialize`; request DTOs derive `Deserialize`.

pub mod availability;
pub mod criteria;
pub mod place;
pub mod provider_location;
pub mod role;
pub mod search;
pub mod service_type;
pub mod stats;
pub mod user;
pub mod visit;
