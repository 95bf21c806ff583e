//! Typed operations for each backend endpoint.

use tracing::{debug, warn};

use crate::api;
use crate::client::AuthenticatedClient;
use crate::error::ApiError;
use crate::session::Session;
use crate::storage::Storage;
use crate::transport::Transport;
use crate::types::{
    AuthResponse, Category, CategoryInput, ChangePasswordRequest, ChangePasswordResponse,
    LoginCredentials, Product, ProductInput, RegisterCredentials, User,
};

impl<T: Transport, S: Storage> AuthenticatedClient<T, S> {
    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Log in and persist the session. Inactive accounts are rejected
    /// without storing anything.
    pub fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError> {
        let response: AuthResponse = self.send_json(api::build_login(credentials)?)?;
        if !response.user.active {
            warn!(email = %credentials.email, "login attempt by inactive user");
            return Err(ApiError::AccountInactive);
        }
        let session = Session {
            access_token: response.token,
            refresh_token: response.refresh_token,
            user: response.user,
        };
        self.session().save(&session);
        Ok(session)
    }

    /// Create an account. The caller must log in explicitly afterwards.
    pub fn register(&self, credentials: &RegisterCredentials) -> Result<User, ApiError> {
        let response: AuthResponse = self.send_json(api::build_register(credentials)?)?;
        debug!(user_id = response.user.id, "registration successful");
        Ok(response.user)
    }

    pub fn logout(&self) {
        self.session().clear();
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session().load()
    }

    pub fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<ChangePasswordResponse, ApiError> {
        if self.session().access_token().is_none() {
            return Err(ApiError::SessionExpired);
        }
        self.send_json(api::build_change_password(request)?)
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(api::build_list_users())
    }

    pub fn get_user(&self, id: i64) -> Result<User, ApiError> {
        self.send_json(api::build_get_user(id))
    }

    pub fn update_user_status(&self, id: i64, active: bool) -> Result<User, ApiError> {
        self.send_json(api::build_update_user_status(id, active)?)
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    pub fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.send_json(api::build_list_products())
    }

    pub fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        self.send_json(api::build_get_product(id))
    }

    pub fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        self.send_json(api::build_create_product(input)?)
    }

    pub fn update_product(&self, id: i64, input: &ProductInput) -> Result<Product, ApiError> {
        self.send_json(api::build_update_product(id, input)?)
    }

    pub fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.send(api::build_delete_product(id)).map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    pub fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.send_json(api::build_list_categories())
    }

    pub fn get_category(&self, id: i64) -> Result<Category, ApiError> {
        self.send_json(api::build_get_category(id))
    }

    pub fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.send_json(api::build_create_category(input)?)
    }

    pub fn update_category(&self, id: i64, input: &CategoryInput) -> Result<Category, ApiError> {
        self.send_json(api::build_update_category(id, input)?)
    }

    pub fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.send(api::build_delete_category(id)).map(|_| ())
    }
}
