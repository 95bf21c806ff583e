//! In-memory backend state shared by every handler.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@ombudsman.gov.pk";
pub const ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub price: f64,
    pub unit: String,
    pub reorder_level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub(crate) struct Account {
    pub user: User,
    pub password: String,
}

#[derive(Clone, Debug)]
pub(crate) struct StoredProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub price: f64,
    pub unit: String,
    pub reorder_level: i64,
    pub category_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Default)]
pub(crate) struct Db {
    next_id: i64,
    pub accounts: BTreeMap<i64, Account>,
    pub access_tokens: HashMap<String, i64>,
    pub refresh_tokens: HashMap<String, i64>,
    pub products: BTreeMap<i64, StoredProduct>,
    pub categories: BTreeMap<i64, Category>,
}

impl Db {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .values()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
    }

    pub fn insert_account(&mut self, name: &str, email: &str, password: &str, role: &str, active: bool) -> User {
        let user = User {
            id: self.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            status: active,
        };
        self.accounts.insert(
            user.id,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }

    pub fn issue_tokens(&mut self, user_id: i64) -> TokenPair {
        let pair = TokenPair {
            token: Uuid::new_v4().to_string(),
            refresh_token: Uuid::new_v4().to_string(),
        };
        self.access_tokens.insert(pair.token.clone(), user_id);
        self.refresh_tokens.insert(pair.refresh_token.clone(), user_id);
        pair
    }

    pub fn revoke_user_tokens(&mut self, user_id: i64) {
        self.access_tokens.retain(|_, owner| *owner != user_id);
        self.refresh_tokens.retain(|_, owner| *owner != user_id);
    }

    pub fn render_product(&self, product: &StoredProduct) -> Product {
        Product {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            sku: product.sku.clone(),
            price: product.price,
            unit: product.unit.clone(),
            reorder_level: product.reorder_level,
            category: product
                .category_id
                .and_then(|id| self.categories.get(&id))
                .map(|c| CategoryRef {
                    id: c.id,
                    name: c.name.clone(),
                }),
        }
    }
}

/// Handle to the backend state. Clones share the same database.
#[derive(Clone, Debug)]
pub struct AppState {
    pub(crate) db: Arc<RwLock<Db>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh state with the administrator account seeded.
    pub fn new() -> Self {
        let mut db = Db::default();
        db.insert_account("Administrator", ADMIN_EMAIL, ADMIN_PASSWORD, "admin", true);
        Self {
            db: Arc::new(RwLock::new(db)),
        }
    }

    pub async fn seed_user(&self, name: &str, email: &str, password: &str, active: bool) -> User {
        self.db
            .write()
            .await
            .insert_account(name, email, password, "citizen", active)
    }

    /// Invalidate every access token, as if they all expired at once.
    /// Refresh tokens stay valid.
    pub async fn expire_access_tokens(&self) {
        self.db.write().await.access_tokens.clear();
    }

    pub async fn revoke_refresh_tokens(&self) {
        self.db.write().await.refresh_tokens.clear();
    }

    pub async fn active_sessions(&self) -> usize {
        self.db.read().await.refresh_tokens.len()
    }
}
