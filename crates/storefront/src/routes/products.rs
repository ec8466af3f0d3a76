//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use lumistyle_core::{CategoryFilter, Product};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product with its display price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub display_price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            display_price: product.price.display(),
            product: product.clone(),
        }
    }
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub category: &'static str,
    pub products: Vec<ProductView>,
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductList>> {
    let filter = match query.category.as_deref() {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => CategoryFilter::All,
    };

    let products = state
        .catalog()
        .filter(filter)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(Json(ProductList {
        category: filter.as_str(),
        products,
    }))
}

/// Show a single product.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    state
        .catalog()
        .find_by_id(&id)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
