//! Handlers for the `/user` resource (self-service role switching).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use traduko_core::capability::{Role, SELF_SERVICE_ROLES};
use traduko_core::error::CoreError;
use traduko_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::AuthResponse;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /user/role`.
#[derive(Debug, Deserialize)]
pub struct SwitchRoleRequest {
    pub role: String,
}

/// PUT /api/v1/user/role
///
/// Switch the caller between `customer` and `translator`. The administrator
/// role can never be entered or left this way. Because the role travels in
/// the JWT, a fresh token is issued with the response.
pub async fn switch_role(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SwitchRoleRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    if Role::parse(&user.role) == Some(Role::Administrator) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Administrators cannot switch roles".into(),
        )));
    }
    if !SELF_SERVICE_ROLES.contains(&input.role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role must be one of: {}",
            SELF_SERVICE_ROLES.join(", ")
        ))));
    }

    let updated = UserRepo::set_role(&state.pool, user.user_id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    tracing::info!(user_id = %updated.id, role = %updated.role, "User switched role");

    let access_token =
        crate::auth::jwt::generate_access_token(updated.id, &updated.role, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: (&updated).into(),
        },
    }))
}
