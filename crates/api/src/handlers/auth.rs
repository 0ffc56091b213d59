//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use traduko_core::capability::SELF_SERVICE_ROLES;
use traduko_core::error::CoreError;
use traduko_core::types::DbId;
use traduko_db::models::user::{CreateUser, User};
use traduko_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    /// `customer` or `translator`; administrators are seeded, never registered.
    pub role: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a customer or translator account. The email must be unique
/// (enforced by `uq_users_email`, surfacing as 409).
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name must not be empty".into(),
        )));
    }
    if !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "Email address is not valid".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if !SELF_SERVICE_ROLES.contains(&input.role.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role must be one of: {}",
            SELF_SERVICE_ROLES.join(", ")
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            name: input.name.trim().to_string(),
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    issue_token(&state, &user)
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");

    issue_token(&state, &user)
}

/// GET /api/v1/auth/me
///
/// The authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserInfo::from(&user),
    }))
}

/// Sign a fresh access token for `user` and wrap it in the standard envelope.
fn issue_token(state: &AppState, user: &User) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: UserInfo::from(user),
        },
    }))
}
