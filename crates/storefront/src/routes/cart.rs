//! Cart route handlers.
//!
//! A named size or color must match a line exactly; an omitted one matches
//! every line of the product.

use axum::{Json, extract::State};
use lumistyle_core::{CartItem, CartLedger, LineFilter, format_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image: item.product.image.clone(),
            selected_size: item.selected_size.clone(),
            selected_color: item.selected_color.clone(),
            quantity: item.quantity,
            price: item.product.price.display(),
            line_price: format_amount(item.line_total()),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&CartLedger> for CartView {
    fn from(cart: &CartLedger) -> Self {
        let total = cart.total();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total,
            subtotal: format_amount(total),
            item_count: cart.item_count(),
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: String,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().lock().await;
    Json(CartView::from(&*cart))
}

/// Total quantity across all lines.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let cart = state.cart().lock().await;
    Json(CartCount {
        count: cart.item_count(),
    })
}

/// Add one unit of a product variant.
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .find_by_id(&request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let mut cart = state.cart().lock().await;
    cart.add(product, request.size.as_deref(), request.color.as_deref());

    add_breadcrumb("cart", "Added to cart", &[("product_id", product.id.as_str())]);
    tracing::info!(item_count = cart.item_count(), "Added to cart");

    Ok(Json(CartView::from(&*cart)))
}

/// Set the quantity of every line matching the request.
///
/// Quantities below 1 are clamped to 1; a request matching no line is a no-op.
#[instrument(
    skip(state, request),
    fields(product_id = %request.product_id, quantity = request.quantity)
)]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Json<CartView> {
    let filter = LineFilter::new(
        request.product_id.as_str(),
        request.size.as_deref(),
        request.color.as_deref(),
    );

    let mut cart = state.cart().lock().await;
    let updated = cart.set_matching_quantity(&filter, request.quantity);
    tracing::debug!(updated, "Cart quantity updated");

    Json(CartView::from(&*cart))
}

/// Remove every line matching the request.
#[instrument(skip(state, request), fields(product_id = %request.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Json<CartView> {
    let filter = LineFilter::new(
        request.product_id.as_str(),
        request.size.as_deref(),
        request.color.as_deref(),
    );

    let mut cart = state.cart().lock().await;
    let removed = cart.remove_matching(&filter);

    add_breadcrumb("cart", "Removed from cart", &[("product_id", &request.product_id)]);
    tracing::debug!(removed, "Cart lines removed");

    Json(CartView::from(&*cart))
}

/// Checkout is not offered yet.
pub async fn checkout() -> AppError {
    AppError::NotImplemented("Checkout is not available yet".to_string())
}
