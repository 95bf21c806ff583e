//! Bearer-authenticated client with one-shot token refresh.
//!
//! # Design
//! `send` attaches the stored access token, executes the request through a
//! `Transport` and interprets the response. A 401 on a fresh, refreshable
//! descriptor triggers exactly one refresh-token exchange followed by
//! exactly one re-send of the same descriptor with `retried` set:
//!
//! ```text
//! Pending -> Success
//!         -> Failed
//!         -> Retrying -> Success | Failed
//! ```
//!
//! Any failure of the refresh step, a missing refresh token, or a second 401
//! ends the session: storage is cleared, the `SessionListener` is told where
//! the login page is and the call fails with `ApiError::SessionExpired`.
//! Concurrent callers are not coordinated; each may run its own refresh and
//! the last one to store its token pair wins.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{join_url, HttpRequest, HttpResponse, RequestDescriptor};
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::transport::{Transport, UreqTransport};
use crate::types::TokenPair;

/// Notified when a session ends because it could not be renewed.
pub trait SessionListener {
    /// `login_path` is where the user should be sent to sign in again.
    fn session_expired(&self, login_path: &str);
}

impl<F: Fn(&str)> SessionListener for F {
    fn session_expired(&self, login_path: &str) {
        self(login_path)
    }
}

/// Listener that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl SessionListener for NoopListener {
    fn session_expired(&self, _login_path: &str) {}
}

/// Lifecycle of a single `send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Retrying,
    Success,
    Failed,
}

pub struct AuthenticatedClient<T, S> {
    base_url: String,
    login_path: String,
    transport: T,
    session: SessionStore<S>,
    listener: Arc<dyn SessionListener + Send + Sync>,
}

impl<S: Storage> AuthenticatedClient<UreqTransport, S> {
    /// Client over a ureq agent using the configured timeout.
    pub fn connect(config: &ClientConfig, storage: S) -> Self {
        Self::new(config, UreqTransport::new(config.timeout), storage)
    }
}

impl<T: Transport, S: Storage> AuthenticatedClient<T, S> {
    pub fn new(config: &ClientConfig, transport: T, storage: S) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            transport,
            session: SessionStore::new(storage),
            listener: Arc::new(NoopListener),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn SessionListener + Send + Sync>) -> Self {
        self.listener = listener;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `descriptor` and resolve with its parsed JSON body (`Null` for an
    /// empty body).
    pub fn send(&self, descriptor: RequestDescriptor) -> Result<Value, ApiError> {
        let response = self.dispatch(descriptor)?;
        parse_body(&response)
    }

    /// `send`, then deserialize the body into `R`.
    pub fn send_json<R: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<R, ApiError> {
        let value = self.send(descriptor)?;
        serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Run the request state machine and return the successful response.
    pub fn dispatch(&self, mut descriptor: RequestDescriptor) -> Result<HttpResponse, ApiError> {
        let mut state = RequestState::Pending;
        loop {
            let request = self.authorize(&descriptor);
            debug!(method = %request.method, url = %request.url, retried = descriptor.retried, "sending request");

            let response = match self.transport.execute(&request) {
                Ok(response) => response,
                Err(e) => {
                    advance(&mut state, RequestState::Failed, &descriptor);
                    warn!(error = %e, "no response from server");
                    return Err(ApiError::Network(e.to_string()));
                }
            };

            if response.is_success() {
                advance(&mut state, RequestState::Success, &descriptor);
                return Ok(response);
            }

            if response.status == 401 && descriptor.refreshable {
                if descriptor.retried {
                    advance(&mut state, RequestState::Failed, &descriptor);
                    warn!(path = %descriptor.path, "request rejected after token refresh");
                    return Err(self.end_session());
                }
                advance(&mut state, RequestState::Retrying, &descriptor);
                if let Err(e) = self.refresh() {
                    advance(&mut state, RequestState::Failed, &descriptor);
                    return Err(e);
                }
                descriptor.retried = true;
                continue;
            }

            advance(&mut state, RequestState::Failed, &descriptor);
            let error = ApiError::from_response(&response);
            debug!(status = response.status, error = %error, "request failed");
            return Err(error);
        }
    }

    /// Resolve a descriptor into a wire request carrying the current token.
    fn authorize(&self, descriptor: &RequestDescriptor) -> HttpRequest {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        headers.extend(
            descriptor
                .headers
                .iter()
                .filter(|(k, _)| {
                    !k.eq_ignore_ascii_case("authorization") && !k.eq_ignore_ascii_case("content-type")
                })
                .cloned(),
        );
        if let Some(token) = self.session.access_token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method: descriptor.method,
            url: join_url(&self.base_url, &descriptor.path),
            headers,
            body: descriptor.body.clone(),
        }
    }

    /// Exchange the stored refresh token for a new pair and persist it.
    fn refresh(&self) -> Result<(), ApiError> {
        let Some(refresh_token) = self.session.refresh_token() else {
            warn!("no refresh token available");
            return Err(self.end_session());
        };

        let descriptor = api::build_refresh_token(&refresh_token)?;
        let request = HttpRequest {
            method: descriptor.method,
            url: join_url(&self.base_url, &descriptor.path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: descriptor.body,
        };
        debug!(url = %request.url, "refreshing access token");

        let pair = match self.transport.execute(&request) {
            Ok(response) if response.is_success() => {
                serde_json::from_str::<TokenPair>(&response.body).map_err(|e| e.to_string())
            }
            Ok(response) => Err(ApiError::from_response(&response).to_string()),
            Err(e) => Err(e.to_string()),
        };

        match pair {
            Ok(pair) => {
                self.session.update_tokens(&pair);
                debug!("access token refreshed");
                Ok(())
            }
            Err(reason) => {
                warn!(%reason, "token refresh failed");
                Err(self.end_session())
            }
        }
    }

    fn end_session(&self) -> ApiError {
        self.session.clear();
        self.listener.session_expired(&self.login_path);
        ApiError::SessionExpired
    }
}

fn advance(state: &mut RequestState, next: RequestState, descriptor: &RequestDescriptor) {
    debug!(from = ?state, to = ?next, path = %descriptor.path, "request state");
    *state = next;
}

fn parse_body(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
