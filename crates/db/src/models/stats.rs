//! Home screen counters.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProspectStats {
    pub upcoming_visits: i64,
    pub visits_done: i64,
    /// Completed visits the prospect has not rated yet.
    pub awaiting_review: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisitorStats {
    pub upcoming_visits: i64,
    /// Requests still waiting for the visitor's answer.
    pub awaiting_approval: i64,
    pub awaiting_review: i64,
}
