use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::{CartItem, CartRemoval, CartSnapshot, StockProblem};
use crate::errors::AppError;
use crate::handlers::identity::CurrentUser;
use crate::state::AppState;

// ── DTOs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i32,
    pub line_price: i64,
    pub stock: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            line_price: item.line_price(),
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            stock: item.stock,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockProblemResponse {
    pub product_id: i32,
    pub product_name: String,
    pub requested: i32,
    pub available: i32,
}

impl From<StockProblem> for StockProblemResponse {
    fn from(p: StockProblem) -> Self {
        Self {
            product_id: p.product_id,
            product_name: p.product_name,
            requested: p.requested,
            available: p.available,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub stock_problems: Vec<StockProblemResponse>,
    pub total_price: i64,
}

impl From<CartSnapshot> for CartResponse {
    fn from(snapshot: CartSnapshot) -> Self {
        Self {
            items: snapshot.items.into_iter().map(Into::into).collect(),
            stock_problems: snapshot.stock_problems.into_iter().map(Into::into).collect(),
            total_price: snapshot.total_price,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i32,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: i32,
    /// Quantity now in the cart; 0 once the line is gone.
    pub quantity: i32,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Current cart with stock problems", body = CartResponse),
        (status = 401, description = "Not logged in"),
    ),
    tag = "cart"
)]
pub async fn view_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let snapshot = web::block(move || state.carts.view_cart(&identity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(snapshot)))
}

/// POST /cart/items
///
/// Adds `quantity` units, merging with an existing line for the product.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line quantity after the add", body = CartLineResponse),
        (status = 400, description = "Quantity out of range"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Product not found"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let AddToCartRequest {
        product_id,
        quantity,
    } = body.into_inner();

    let quantity = web::block(move || state.carts.add_to_cart(&identity, product_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartLineResponse {
        product_id,
        quantity,
    }))
}

/// DELETE /cart/items/{product_id}
///
/// Removes one unit; the line disappears when its last unit is removed.
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Line quantity after the removal", body = CartLineResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Product is not in the cart"),
    ),
    tag = "cart"
)]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let identity = user.into_inner();
    let product_id = path.into_inner();
    let removal = web::block(move || state.carts.remove_from_cart(&identity, product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let quantity = match removal {
        CartRemoval::Decremented { remaining } => remaining,
        CartRemoval::Deleted => 0,
    };
    Ok(HttpResponse::Ok().json(CartLineResponse {
        product_id,
        quantity,
    }))
}
