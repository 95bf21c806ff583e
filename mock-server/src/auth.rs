use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{required, ApiFailure};
use crate::state::{AppState, TokenPair, User};

/// The account behind a valid bearer token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(ApiFailure::unauthorized)?;
        let db = state.db.read().await;
        db.access_tokens
            .get(token)
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| {
                debug!("rejected unknown access token");
                ApiFailure::unauthorized()
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordResponse {
    pub success: bool,
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiFailure> {
    let mut db = state.db.write().await;
    let user = db
        .account_by_email(&input.email)
        .filter(|a| a.password == input.password)
        .map(|a| a.user.clone())
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let pair = db.issue_tokens(user.id);
    info!(user_id = user.id, active = user.status, "login");
    Ok(Json(AuthResponse {
        user,
        token: pair.token,
        refresh_token: pair.refresh_token,
        success: true,
        message: "Login successful".to_string(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiFailure> {
    let name = required(input.name, "name")?;
    let email = required(input.email, "email")?;
    let password = required(input.password, "password")?;
    let role = input.role.unwrap_or_else(|| "citizen".to_string());

    let mut db = state.db.write().await;
    if db.account_by_email(&email).is_some() {
        return Err(ApiFailure::new(StatusCode::CONFLICT, "Email already registered"));
    }
    let user = db.insert_account(&name, &email, &password, &role, true);
    let pair = db.issue_tokens(user.id);
    info!(user_id = user.id, "registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            token: pair.token,
            refresh_token: pair.refresh_token,
            success: true,
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Rotate a refresh token: the presented one is consumed and a new pair
/// issued.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiFailure> {
    let mut db = state.db.write().await;
    let user_id = db
        .refresh_tokens
        .remove(&input.refresh_token)
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid refresh token"))?;
    debug!(user_id, "refresh token rotated");
    Ok(Json(db.issue_tokens(user_id)))
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>, ApiFailure> {
    let new_password = required(Some(input.new_password), "newPassword")?;
    let mut db = state.db.write().await;
    let account = db
        .accounts
        .get_mut(&user_id)
        .ok_or_else(|| ApiFailure::not_found("User"))?;
    if account.password != input.current_password {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "Current password is incorrect",
        ));
    }
    account.password = new_password;
    Ok(Json(ChangePasswordResponse {
        success: true,
        message: "Password changed successfully".to_string(),
    }))
}
