//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match. A wrong role gets the same 401 as any other failed access check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use voyo_core::error::CoreError;
use voyo_core::roles::{ROLE_ADMIN, ROLE_PROSPECT, ROLE_VISITOR};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.role != role {
        tracing::debug!(phone = %user.phone_number, role = %user.role, required = role, "Role check failed");
        return Err(AppError::Core(CoreError::access_denied()));
    }
    Ok(user)
}

/// Requires the `PROSPECT` role.
///
/// ```ignore
/// async fn book(RequireProspect(user): RequireProspect) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireProspect(pub AuthUser);

impl FromRequestParts<AppState> for RequireProspect {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, ROLE_PROSPECT)
            .await
            .map(RequireProspect)
    }
}

/// Requires the `VISITOR` role.
pub struct RequireVisitor(pub AuthUser);

impl FromRequestParts<AppState> for RequireVisitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, ROLE_VISITOR)
            .await
            .map(RequireVisitor)
    }
}

/// Requires the `ADMIN` role.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, ROLE_ADMIN).await.map(RequireAdmin)
    }
}
