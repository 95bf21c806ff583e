//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port inside a tokio runtime owned by
//! the test, then drives the blocking client over real HTTP with ureq. The
//! same runtime is used to poke the server state (expire or revoke tokens)
//! between calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mock_server::{AppState, ADMIN_EMAIL, ADMIN_PASSWORD};
use ombudsman_core::{
    ApiError, AuthenticatedClient, CategoryInput, ChangePasswordRequest, ClientConfig,
    LoginCredentials, MemoryStorage, ProductInput, RegisterCredentials, SessionListener,
    UreqTransport,
};

struct Server {
    runtime: tokio::runtime::Runtime,
    state: AppState,
    base_url: String,
}

fn start_server() -> Server {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let state = AppState::new();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let server_state = state.clone();
    runtime.spawn(async move {
        let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
        mock_server::run_with_state(listener, server_state).await
    });

    Server {
        runtime,
        state,
        base_url: format!("http://{addr}/"),
    }
}

#[derive(Default)]
struct Expirations(AtomicUsize);

impl SessionListener for Expirations {
    fn session_expired(&self, _login_path: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn client(server: &Server) -> (AuthenticatedClient<UreqTransport, MemoryStorage>, Arc<Expirations>) {
    let expirations = Arc::new(Expirations::default());
    let client = AuthenticatedClient::connect(&ClientConfig::new(&server.base_url), MemoryStorage::new())
        .with_listener(expirations.clone());
    (client, expirations)
}

fn admin() -> LoginCredentials {
    LoginCredentials {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    }
}

#[test]
fn login_and_catalog_lifecycle() {
    let server = start_server();
    let (client, _) = client(&server);

    // Step 1: anonymous call is rejected with no session to refresh.
    let err = client.list_products().unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));

    // Step 2: log in.
    let session = client.login(&admin()).unwrap();
    assert_eq!(session.user.email, ADMIN_EMAIL);
    assert_eq!(client.current_session(), Some(session));

    // Step 3: create a category and a product in it.
    let category = client
        .create_category(&CategoryInput {
            name: Some("Stationery".to_string()),
            description: Some("Forms and registers".to_string()),
        })
        .unwrap();
    let product = client
        .create_product(&ProductInput {
            name: Some("Complaint form".to_string()),
            sku: Some("CF-1".to_string()),
            price: Some(5.0),
            category_id: Some(category.id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(product.unit, "pcs");
    assert_eq!(product.category.as_ref().map(|c| c.id), Some(category.id));

    // Step 4: validation error surfaces the first message of the errors array.
    let err = client
        .create_product(&ProductInput {
            name: Some("No sku".to_string()),
            price: Some(1.0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 400, ref message } if message == "sku is required"));

    // Step 5: update and read back.
    let updated = client
        .update_product(
            product.id,
            &ProductInput {
                reorder_level: Some(20),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.reorder_level, 20);
    assert_eq!(client.get_product(product.id).unwrap(), updated);
    assert_eq!(client.list_categories().unwrap().len(), 1);

    // Step 6: delete both; product is gone.
    client.delete_product(product.id).unwrap();
    client.delete_category(category.id).unwrap();
    assert!(client.get_product(product.id).unwrap_err().is_not_found());
    assert!(client.list_products().unwrap().is_empty());
}

#[test]
fn expired_access_token_is_refreshed_transparently() {
    let server = start_server();
    let (client, expirations) = client(&server);
    let session = client.login(&admin()).unwrap();

    server.runtime.block_on(server.state.expire_access_tokens());

    let users = client.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(expirations.0.load(Ordering::SeqCst), 0);

    let renewed = client.current_session().unwrap();
    assert_ne!(renewed.access_token, session.access_token);
    assert_ne!(renewed.refresh_token, session.refresh_token);
    assert_eq!(renewed.user, session.user);
}

#[test]
fn revoked_refresh_token_ends_session() {
    let server = start_server();
    let (client, expirations) = client(&server);
    client.login(&admin()).unwrap();

    server.runtime.block_on(async {
        server.state.expire_access_tokens().await;
        server.state.revoke_refresh_tokens().await;
    });

    let err = client.list_users().unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(expirations.0.load(Ordering::SeqCst), 1);
    assert!(client.current_session().is_none());
    assert!(client.session().storage().is_empty());
}

#[test]
fn inactive_and_invalid_logins() {
    let server = start_server();
    server
        .runtime
        .block_on(server.state.seed_user("Dormant", "dormant@example.pk", "pw", false));
    let (client, expirations) = client(&server);

    let err = client
        .login(&LoginCredentials {
            email: "dormant@example.pk".to_string(),
            password: "pw".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::AccountInactive));
    assert!(client.session().storage().is_empty());

    let err = client
        .login(&LoginCredentials {
            email: ADMIN_EMAIL.to_string(),
            password: "wrong".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, ref message } if message == "Invalid credentials"));
    assert_eq!(expirations.0.load(Ordering::SeqCst), 0);
}

#[test]
fn register_then_manage_users() {
    let server = start_server();
    let (client, _) = client(&server);

    let user = client
        .register(&RegisterCredentials {
            name: "Sana".to_string(),
            email: "sana@example.pk".to_string(),
            password: "pw".to_string(),
            role: None,
        })
        .unwrap();
    assert!(user.active);
    assert!(client.current_session().is_none());

    client.login(&admin()).unwrap();
    let deactivated = client.update_user_status(user.id, false).unwrap();
    assert!(!deactivated.active);
    assert!(!client.get_user(user.id).unwrap().active);

    let response = client
        .change_password(&ChangePasswordRequest {
            current_password: ADMIN_PASSWORD.to_string(),
            new_password: "rotated".to_string(),
        })
        .unwrap();
    assert!(response.success);

    client.logout();
    assert!(client.login(&admin()).is_err());
}

#[test]
fn unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AuthenticatedClient::connect(
        &ClientConfig::new(&format!("http://{addr}")),
        MemoryStorage::new(),
    );
    let err = client.login(&admin()).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
