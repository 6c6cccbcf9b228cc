//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-held transaction take `&mut Transaction` instead.

pub mod access_repo;
pub mod availability_repo;
pub mod criteria_repo;
pub mod place_repo;
pub mod provider_location_repo;
pub mod role_repo;
pub mod search_repo;
pub mod service_type_repo;
pub mod stats_repo;
pub mod user_repo;
pub mod visit_repo;

pub use access_repo::AccessRepo;
pub use availability_repo::AvailabilityRepo;
pub use criteria_repo::CriteriaRepo;
pub use place_repo::PlaceRepo;
pub use provider_location_repo::ProviderLocationRepo;
pub use role_repo::RoleRepo;
pub use search_repo::SearchRepo;
pub use service_type_repo::ServiceTypeRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
pub use visit_repo::VisitRepo;

/// Shorthand for a Postgres transaction.
pub type PgTransaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
