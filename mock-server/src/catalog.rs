//! Product and category CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{required, ApiFailure};
use crate::state::{AppState, Category, Db, Product, StoredProduct};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub reorder_level: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn check_category(db: &Db, category_id: Option<i64>) -> Result<(), ApiFailure> {
    match category_id {
        Some(id) if !db.categories.contains_key(&id) => Err(ApiFailure::validation(format!(
            "category {id} does not exist"
        ))),
        _ => Ok(()),
    }
}

fn check_price(price: Option<f64>) -> Result<(), ApiFailure> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            Err(ApiFailure::validation("price must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

pub async fn list_products(State(state): State<AppState>, _: CurrentUser) -> Json<Vec<Product>> {
    let db = state.db.read().await;
    Json(db.products.values().map(|p| db.render_product(p)).collect())
}

pub async fn get_product(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiFailure> {
    let db = state.db.read().await;
    db.products
        .get(&id)
        .map(|p| Json(db.render_product(p)))
        .ok_or_else(|| ApiFailure::not_found("Product"))
}

pub async fn create_product(
    State(state): State<AppState>,
    _: CurrentUser,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiFailure> {
    let name = required(input.name, "name")?;
    let sku = required(input.sku, "sku")?;
    let price = input
        .price
        .ok_or_else(|| ApiFailure::validation("price is required"))?;
    check_price(Some(price))?;

    let mut db = state.db.write().await;
    check_category(&db, input.category_id)?;
    let product = StoredProduct {
        id: db.next_id(),
        name,
        description: input.description.unwrap_or_default(),
        sku,
        price,
        unit: input.unit.unwrap_or_else(|| "pcs".to_string()),
        reorder_level: input.reorder_level.unwrap_or(0),
        category_id: input.category_id,
    };
    let rendered = db.render_product(&product);
    db.products.insert(product.id, product);
    Ok((StatusCode::CREATED, Json(rendered)))
}

pub async fn update_product(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, ApiFailure> {
    check_price(input.price)?;
    let mut db = state.db.write().await;
    check_category(&db, input.category_id)?;
    let product = db
        .products
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Product"))?;
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(description) = input.description {
        product.description = description;
    }
    if let Some(sku) = input.sku {
        product.sku = sku;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(unit) = input.unit {
        product.unit = unit;
    }
    if let Some(level) = input.reorder_level {
        product.reorder_level = level;
    }
    if input.category_id.is_some() {
        product.category_id = input.category_id;
    }
    let product = product.clone();
    Ok(Json(db.render_product(&product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    let mut db = state.db.write().await;
    db.products
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("Product"))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn list_categories(State(state): State<AppState>, _: CurrentUser) -> Json<Vec<Category>> {
    let db = state.db.read().await;
    Json(db.categories.values().cloned().collect())
}

pub async fn get_category(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiFailure> {
    let db = state.db.read().await;
    db.categories
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Category"))
}

pub async fn create_category(
    State(state): State<AppState>,
    _: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiFailure> {
    let name = required(input.name, "name")?;
    let mut db = state.db.write().await;
    let category = Category {
        id: db.next_id(),
        name,
        description: input.description.unwrap_or_default(),
    };
    db.categories.insert(category.id, category.clone());
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, ApiFailure> {
    let mut db = state.db.write().await;
    let category = db
        .categories
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("Category"))?;
    if let Some(name) = input.name {
        category.name = name;
    }
    if let Some(description) = input.description {
        category.description = description;
    }
    Ok(Json(category.clone()))
}

/// Delete a category and detach it from its products.
pub async fn delete_category(
    State(state): State<AppState>,
    _: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    let mut db = state.db.write().await;
    db.categories
        .remove(&id)
        .ok_or_else(|| ApiFailure::not_found("Category"))?;
    for product in db.products.values_mut() {
        if product.category_id == Some(id) {
            product.category_id = None;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
