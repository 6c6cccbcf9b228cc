//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, phone_number, first_name, last_name, email, role_id, \
    biography, profile_picture, pricing, created_at, updated_at";

/// Provides lookups for users, keyed by phone number.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                (phone_number, first_name, last_name, email, role_id, \
                 biography, profile_picture, pricing) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.phone_number)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.role_id)
            .bind(&input.biography)
            .bind(&input.profile_picture)
            .bind(input.pricing)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE phone_number = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Label of the user's role, or `None` if no such user exists.
    pub async fn role_label(pool: &PgPool, phone: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.label FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.phone_number = $1",
        )
        .bind(phone)
        .fetch_optional(pool)
        .await
    }
}
