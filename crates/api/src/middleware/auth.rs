//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use voyo_core::access::Participant;
use voyo_core::error::CoreError;
use voyo_core::roles::{ROLE_PROSPECT, ROLE_VISITOR};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(phone = %user.phone_number, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's phone number (from `claims.sub`).
    pub phone_number: String,
    /// The user's role label.
    pub role: String,
}

impl AuthUser {
    /// Which side of a visit this role takes. Admins take neither.
    pub fn side(&self) -> Option<Participant> {
        match self.role.as_str() {
            ROLE_PROSPECT => Some(Participant::Prospect),
            ROLE_VISITOR => Some(Participant::Visitor),
            _ => None,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            phone_number: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyo_core::roles::ROLE_ADMIN;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            phone_number: "+33600000001".into(),
            role: role.into(),
        }
    }

    #[test]
    fn side_follows_role() {
        assert_eq!(user(ROLE_PROSPECT).side(), Some(Participant::Prospect));
        assert_eq!(user(ROLE_VISITOR).side(), Some(Participant::Visitor));
        assert_eq!(user(ROLE_ADMIN).side(), None);
    }
}
