//! Client core for the ombudsman complaints-management backend.
//!
//! # Overview
//! Builds request descriptors for every backend endpoint, sends them with
//! bearer authentication and transparently renews an expired access token
//! once per request. Also owns the persisted session and the locale
//! preference that drives text direction.
//!
//! # Design
//! - Endpoint requests are plain data built by `api::build_*`; the only I/O
//!   seam is the `Transport` trait, so the refresh logic is tested with
//!   scripted transports.
//! - Session tokens and the locale live in a `Storage`, the same key-value
//!   area a browser would use (`token`, `refreshToken`, `user`,
//!   `NEXT_LOCALE`).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod locale;
pub mod services;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

pub use client::{AuthenticatedClient, NoopListener, RequestState, SessionListener};
pub use config::ClientConfig;
pub use error::{extract_message, ApiError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestDescriptor};
pub use locale::{direction_for, localized_path, Direction, Locale, LocaleResolver};
pub use session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{
    AuthResponse, Category, CategoryInput, CategoryRef, ChangePasswordRequest,
    ChangePasswordResponse, LoginCredentials, Product, ProductInput, RegisterCredentials, TokenPair,
    UpdateUserStatusRequest, User,
};
