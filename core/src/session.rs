//! Session persistence on top of a `Storage`.
//!
//! The session lives under three keys: `token` (access token),
//! `refreshToken` and `user` (JSON-encoded `User`). Login writes all three,
//! a refresh rewrites the two tokens in place, logout removes them.

use tracing::{debug, warn};

use crate::storage::Storage;
use crate::types::{TokenPair, User};

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Typed view over the session keys of a `Storage`.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// The stored user, or `None` if absent or unreadable.
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "stored user is unreadable, ignoring");
                None
            }
        }
    }

    /// The full session, if every part of it is present.
    pub fn load(&self) -> Option<Session> {
        Some(Session {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            user: self.user()?,
        })
    }

    pub fn save(&self, session: &Session) {
        self.storage.set(TOKEN_KEY, &session.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &session.refresh_token);
        match serde_json::to_string(&session.user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(e) => warn!(error = %e, "failed to encode user for storage"),
        }
        debug!(user_id = session.user.id, "session stored");
    }

    /// Replace both tokens after a successful refresh, keeping the user.
    pub fn update_tokens(&self, pair: &TokenPair) {
        self.storage.set(TOKEN_KEY, &pair.token);
        self.storage.set(REFRESH_TOKEN_KEY, &pair.refresh_token);
    }

    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
        self.storage.remove(USER_KEY);
        debug!("session cleared");
    }
}
