//! Capability-based access control.
//!
//! Every mutating handler runs the same guard sequence: capability check
//! first (401), then ownership or assignment (403), then the state
//! precondition (409). [`require_capability`] is the first step;
//! [`RequireAdmin`] wraps it for the administrator-only route subtree.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use traduko_core::capability::{Authorizer, Capability, Role};
use traduko_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Check that the authenticated user's role grants `capability`.
///
/// Returns the parsed [`Role`] so handlers do not re-parse the claim. An
/// unknown role name in the token and a role lacking the capability both
/// reject with 401, keeping the guard order deliberate: who you are is
/// settled before what you own.
pub fn require_capability(
    user: &AuthUser,
    policy: &impl Authorizer,
    capability: Capability,
) -> Result<Role, AppError> {
    let role = Role::parse(&user.role).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(format!(
            "Unknown role '{}'",
            user.role
        )))
    })?;

    if !policy.has_permission(role, capability) {
        return Err(AppError::Core(CoreError::Unauthorized(format!(
            "Role '{}' may not perform this action",
            role.as_str()
        ))));
    }

    Ok(role)
}

/// Requires the `administrator` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an administrator here
///     Ok(Json(()))
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
        if Role::parse(&user.role) != Some(Role::Administrator) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Administrator role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
