//! Request descriptors for every backend endpoint.
//!
//! Pure functions: each `build_*` produces a `RequestDescriptor` with a path
//! relative to the API base URL and, where needed, a JSON body. Nothing here
//! touches the session or the network.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, RequestDescriptor};
use crate::types::{
    CategoryInput, ChangePasswordRequest, LoginCredentials, ProductInput, RefreshTokenRequest,
    RegisterCredentials, UpdateUserStatusRequest,
};

pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";
pub const REFRESH_TOKEN_PATH: &str = "auth/refresh-token";
pub const CHANGE_PASSWORD_PATH: &str = "auth/change-password";

fn with_json<B: Serialize>(
    method: HttpMethod,
    path: String,
    body: &B,
) -> Result<RequestDescriptor, ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(RequestDescriptor::new(method, path).with_body(body))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

pub fn build_login(credentials: &LoginCredentials) -> Result<RequestDescriptor, ApiError> {
    Ok(with_json(HttpMethod::Post, LOGIN_PATH.to_string(), credentials)?.not_refreshable())
}

pub fn build_register(credentials: &RegisterCredentials) -> Result<RequestDescriptor, ApiError> {
    Ok(with_json(HttpMethod::Post, REGISTER_PATH.to_string(), credentials)?.not_refreshable())
}

pub fn build_refresh_token(refresh_token: &str) -> Result<RequestDescriptor, ApiError> {
    let body = RefreshTokenRequest {
        refresh_token: refresh_token.to_string(),
    };
    Ok(with_json(HttpMethod::Post, REFRESH_TOKEN_PATH.to_string(), &body)?.not_refreshable())
}

pub fn build_change_password(request: &ChangePasswordRequest) -> Result<RequestDescriptor, ApiError> {
    with_json(HttpMethod::Post, CHANGE_PASSWORD_PATH.to_string(), request)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub fn build_list_users() -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, "users")
}

pub fn build_get_user(id: i64) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, format!("users/{id}"))
}

pub fn build_update_user_status(id: i64, active: bool) -> Result<RequestDescriptor, ApiError> {
    let body = UpdateUserStatusRequest { is_active: active };
    with_json(HttpMethod::Patch, format!("users/{id}/status"), &body)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub fn build_list_products() -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, "products")
}

pub fn build_get_product(id: i64) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, format!("products/{id}"))
}

pub fn build_create_product(input: &ProductInput) -> Result<RequestDescriptor, ApiError> {
    with_json(HttpMethod::Post, "products".to_string(), input)
}

pub fn build_update_product(id: i64, input: &ProductInput) -> Result<RequestDescriptor, ApiError> {
    with_json(HttpMethod::Put, format!("products/{id}"), input)
}

pub fn build_delete_product(id: i64) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Delete, format!("products/{id}"))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub fn build_list_categories() -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, "categories")
}

pub fn build_get_category(id: i64) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Get, format!("categories/{id}"))
}

pub fn build_create_category(input: &CategoryInput) -> Result<RequestDescriptor, ApiError> {
    with_json(HttpMethod::Post, "categories".to_string(), input)
}

pub fn build_update_category(id: i64, input: &CategoryInput) -> Result<RequestDescriptor, ApiError> {
    with_json(HttpMethod::Put, format!("categories/{id}"), input)
}

pub fn build_delete_category(id: i64) -> RequestDescriptor {
    RequestDescriptor::new(HttpMethod::Delete, format!("categories/{id}"))
}
