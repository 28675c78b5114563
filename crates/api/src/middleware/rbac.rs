//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parkwise_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn delete_lot(RequireAdmin(admin): RequireAdmin) -> AppResult<StatusCode> {
///     // admin is guaranteed to be an administrator here
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
