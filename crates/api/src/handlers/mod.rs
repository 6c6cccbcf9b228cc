pub mod admin;
pub mod availability;
pub mod criteria;
pub mod location;
pub mod search;
pub mod stats;
pub mod visits;
