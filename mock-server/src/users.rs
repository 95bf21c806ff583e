use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::state::{AppState, User};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub is_active: bool,
}

pub async fn list_users(State(state): State<AppState>, _: CurrentUser) -> Json<Vec<User>> {
    let db = state.db.read().await;
    Json(db.accounts.values().map(|a| a.user.clone()).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiFailure> {
    let db = state.db.read().await;
    db.accounts
        .get(&id)
        .map(|a| Json(a.user.clone()))
        .ok_or_else(|| ApiFailure::not_found("User"))
}

/// Activate or deactivate an account. Deactivation revokes its tokens.
pub async fn update_status(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateStatus>,
) -> Result<Json<User>, ApiFailure> {
    let mut db = state.db.write().await;
    let account = db
        .accounts
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("User"))?;
    account.user.status = input.is_active;
    let user = account.user.clone();
    if !input.is_active {
        db.revoke_user_tokens(id);
    }
    info!(user_id = id, active = input.is_active, "user status updated");
    Ok(Json(user))
}
